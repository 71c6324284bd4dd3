// Configuration module for linesplice
// Defaults can be kept in a TOML file; command-line flags override them

pub mod config_loader;

pub use config_loader::{ConfigLoader, SpliceConfig, DEFAULT_CONFIG_FILE};
