/// Errors returned by the balance, price and relay APIs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request failed or timed out.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// An endpoint URL could not be built.
    #[error(transparent)]
    InvalidEndpoint(#[from] url::ParseError),
    /// The API answered with a non-success code.
    #[error("api returned code {code}: {message}")]
    Status {
        /// The code returned by the API.
        code: i64,
        /// The message returned by the API.
        message: String,
    },
    /// The API answered with success but without a payload.
    #[error("api response for {0} is missing data")]
    MissingData(&'static str),
}
