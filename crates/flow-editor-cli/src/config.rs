//! KDL configuration file.
//!
//! ```kdl
//! storage-key "value"
//! history-depth 100
//! toolbar "extended"
//! ```
//!
//! Every node is optional; missing nodes keep the defaults.

use std::path::{Path, PathBuf};

use flow_editor_core::persist::validate_key;
use flow_editor_core::{EditorConfig, ToolbarVariant};
use kdl::{KdlDocument, KdlValue};
use miette::{IntoDiagnostic, Result, WrapErr, miette};

pub fn parse_config(text: &str) -> Result<EditorConfig> {
    let doc = text.parse::<KdlDocument>().into_diagnostic()?;
    let mut config = EditorConfig::default();

    if let Some(value) = first_value(&doc, "storage-key") {
        let key = value
            .as_string()
            .ok_or_else(|| miette!("storage-key must be a string"))?;
        validate_key(key)?;
        config.storage_key = key.into();
    }

    if let Some(value) = first_value(&doc, "history-depth") {
        let depth = value
            .as_i64()
            .ok_or_else(|| miette!("history-depth must be an integer"))?;
        let depth = usize::try_from(depth)
            .map_err(|_| miette!("history-depth must not be negative, got {depth}"))?;
        config.history_depth = Some(depth);
    }

    if let Some(value) = first_value(&doc, "toolbar") {
        let name = value
            .as_string()
            .ok_or_else(|| miette!("toolbar must be a string"))?;
        config.toolbar = name.parse::<ToolbarVariant>()?;
    }

    Ok(config)
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    Some(doc.get(name)?.entries().first()?.value())
}

/// Load `path`, or the default config file when `path` is None.
///
/// A missing default file is fine; an explicitly named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(EditorConfig::default()),
        },
    };

    if !explicit && !path.exists() {
        return Ok(EditorConfig::default());
    }

    let text = std::fs::read_to_string(&path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loading config");
    parse_config(&text).wrap_err_with(|| format!("in config {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("flow-editor").join("config.kdl"))
}
