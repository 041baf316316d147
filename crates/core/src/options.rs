use serde::{Deserialize, Serialize};

/// Settings for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertOptions {
    /// Wrap documentation paragraphs at this many characters.
    pub comment_width: Option<usize>,
}
