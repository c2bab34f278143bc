pub mod duration;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;
pub mod zone;

pub use duration::{parse_duration, InvalidDuration};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use zone::{ZoneConfig, DEFAULT_TIMEOUT};
