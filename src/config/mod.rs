// Configuration: flags and Actions inputs layered over an optional YAML file.

mod cli;
pub mod env;
mod loader;
mod types;

pub use cli::Cli;
pub use loader::{ConfigError, DEFAULT_CONFIG_FILE, load, load_from_dir};
pub use types::{BoolText, FileConfig, Settings};
