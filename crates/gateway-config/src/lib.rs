//! Configuration and logging bootstrap for the interactions gateway.

mod config;
mod error;
mod logging;

pub use config::{GatewayConfig, DEFAULT_API_BASE_URL};
pub use error::{ConfigError, ConfigResult};
pub use logging::init_logging;
