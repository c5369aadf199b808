pub mod config;
pub mod error;
pub mod logging;

pub use config::WhyLabsConfig;
pub use error::ConfigError;
pub use logging::{init_tracing, LogFormat};
