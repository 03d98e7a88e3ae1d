//! Chain transport helpers.

mod timeout;
pub use timeout::{TimeoutLayer, TimeoutService};
