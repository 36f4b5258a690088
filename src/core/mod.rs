pub mod config;
pub mod domain;
pub mod errors;

pub use config::{DappConfig, NetworkConfig};
pub use errors::DappError;
