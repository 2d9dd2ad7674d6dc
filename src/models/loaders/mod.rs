pub mod toml_loader;

pub use toml_loader::{load_registry, load_templates};
