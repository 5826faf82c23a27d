//! Reads recipe and configuration files into core types.
//!
//! The format (RON/JSON/TOML) is detected from the file extension. Recipe
//! files hold a list of [`RecipeData`]; in TOML the list sits under a
//! `recipes` key since TOML has no top-level arrays.

use crate::schema::{DemoConfig, RecipeData};
use hexfab_core::catalog::{LoadReport, RecipeCatalog};
use hexfab_core::config::EngineConfig;
use hexfab_core::recipe::Recipe;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Key holding the recipe list in TOML files.
pub const TOML_RECIPES_KEY: &str = "recipes";

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse<T: DeserializeOwned>(content: &str, format: Format) -> Result<T, String> {
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}

fn parse_list<T: DeserializeOwned>(
    content: &str,
    format: Format,
    toml_key: &str,
) -> Result<Vec<T>, String> {
    if format != Format::Toml {
        return parse(content, format);
    }
    let table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
    table
        .get(toml_key)
        .ok_or_else(|| format!("missing key '{toml_key}' in TOML file"))?
        .clone()
        .try_into()
        .map_err(|e: toml::de::Error| e.to_string())
}

/// Read a file and deserialize it according to its extension.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse(&content, format).map_err(|detail| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    })
}

// ===========================================================================
// Recipes
// ===========================================================================

/// Parse recipe records from text. Records are converted but not validated.
pub fn load_recipes_str(content: &str, format: Format) -> Result<Vec<Recipe>, DataLoadError> {
    let records: Vec<RecipeData> =
        parse_list(content, format, TOML_RECIPES_KEY).map_err(|detail| DataLoadError::Parse {
            file: PathBuf::from("<inline>"),
            detail,
        })?;
    Ok(records.into_iter().map(Recipe::from).collect())
}

/// Read recipe records from a file. Records are converted but not validated.
pub fn load_recipes(path: &Path) -> Result<Vec<Recipe>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let records: Vec<RecipeData> =
        parse_list(&content, format, TOML_RECIPES_KEY).map_err(|detail| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail,
        })?;
    Ok(records.into_iter().map(Recipe::from).collect())
}

/// Build a catalog from a recipe file.
///
/// A file that cannot be read or parsed is logged and yields an empty
/// catalog, leaving the engine idle instead of failing.
pub fn load_catalog(path: &Path) -> (RecipeCatalog, LoadReport) {
    match load_recipes(path) {
        Ok(records) => {
            info!(file = %path.display(), records = records.len(), "read recipe file");
            RecipeCatalog::from_records(records)
        }
        Err(e) => {
            error!(file = %path.display(), error = %e, "failed to load recipes");
            (RecipeCatalog::new(), LoadReport::default())
        }
    }
}

// ===========================================================================
// Configuration
// ===========================================================================

pub fn load_engine_config(path: &Path) -> Result<EngineConfig, DataLoadError> {
    deserialize_file(path)
}

/// Load a demo run. A relative recipe path is resolved against the config
/// file's directory.
pub fn load_demo_config(path: &Path) -> Result<DemoConfig, DataLoadError> {
    let mut config: DemoConfig = deserialize_file(path)?;
    if config.recipes.is_relative()
        && let Some(dir) = path.parent()
    {
        config.recipes = dir.join(&config.recipes);
    }
    Ok(config)
}

// ===========================================================================
// Tests
// ===========================================================================
