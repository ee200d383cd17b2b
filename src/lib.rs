pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod payload;
pub mod tls;

pub use client::{ApiClient, ApiResponse};
pub use config::{Cli, Settings, Target};
pub use driver::SmokeDriver;
pub use error::{Error, Result};
