use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// One named unit of input text.
///
/// Several sources may be lexed back to back as a single token stream, which
/// is how the built-in schema is prepended to user schema files. Each source
/// keeps its own path so positions and diagnostics point at the right file.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    text: String,
    path: Option<Arc<Path>>,
}

impl Source {
    /// A source with no associated path.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: None,
        }
    }

    /// A source read from (or attributed to) `path`.
    pub fn with_path(text: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        Self {
            text: text.into(),
            path: Some(Arc::from(path.as_path())),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> Option<&Arc<Path>> {
        self.path.as_ref()
    }
}
