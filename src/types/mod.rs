//! Shared primitive types.
mod api;
pub use api::*;

mod authorization;
pub use authorization::*;

mod contracts;
pub use contracts::*;

mod erc20;
pub use erc20::*;

mod outcome;
pub use outcome::*;

mod permit;
pub use permit::*;

mod token;
pub use token::*;

mod transaction;
pub use transaction::*;
