//! Site configuration file.

mod loader;
mod types;

pub use loader::{ConfigError, CONFIG_ENV};
pub use types::SiteConfig;
