//! Editor configuration.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::persist::STORAGE_KEY;
use crate::toolbar::ToolbarVariant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EditorConfig {
    /// Storage slot holding the document snapshot.
    pub storage_key: SmolStr,
    /// Maximum undo depth. `None` keeps every step.
    pub history_depth: Option<usize>,
    /// Which set of mark controls (and shortcuts) the host exposes.
    pub toolbar: ToolbarVariant,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: SmolStr::new_static(STORAGE_KEY),
            history_depth: None,
            toolbar: ToolbarVariant::Basic,
        }
    }
}
