#![doc = include_str!("../README.md")]

mod client;
pub use client::{Client, PARTNER_ID};

mod config;
pub use config::{ClientConfig, LogLevel};

mod endpoint;
pub use endpoint::Endpoint;

mod error;
pub use error::Error;

mod request;
pub use request::{HttpMethod, Request};

mod response;
pub use response::{Response, ResponseType};

pub mod recorder;
