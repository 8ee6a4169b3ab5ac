pub mod config;
pub mod logging;

pub use config::Environment;
pub use logging::setup_logging;
