//! Settings loading
//!
//! Reads [`smartthings_domain::ClientSettings`] from files and environment
//! variables.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, find_config_path};
