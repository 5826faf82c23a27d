pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_catalog, load_demo_config, load_engine_config, load_recipes};
