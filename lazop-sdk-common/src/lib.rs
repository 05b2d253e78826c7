//! utils for lazop-sdk

mod error;
pub use error::Error;

pub mod helper;
pub mod sign;
