use serde::{Deserialize, Serialize};

/// Extension of the files the tool operates on, without the leading dot
pub const DEFAULT_EXTENSION: &str = "py";

/// What to strip from each file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalConfig {
    /// Text that must follow `#` for a comment to be removed.
    /// An empty string matches every comment. Entries are spliced into a regex as-is.
    #[serde(rename = "targets", default)]
    pub comment_prefixes: Vec<String>,

    /// Whether to drop triple-quoted docstring spans
    #[serde(rename = "rm_docstring", default)]
    pub strip_docstrings: bool,
}

impl RemovalConfig {
    pub fn new<I, S>(comment_prefixes: I, strip_docstrings: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            comment_prefixes: comment_prefixes.into_iter().map(Into::into).collect(),
            strip_docstrings,
        }
    }

    /// True when processing can never change a file
    pub fn is_identity(&self) -> bool {
        self.comment_prefixes.is_empty() && !self.strip_docstrings
    }
}
