use std::fmt;

// ---------------------------------------------------------------------------
// Container – how the fetched bytes are packaged
// ---------------------------------------------------------------------------

/// Packaging of a remote dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// The response body is the delimited text itself.
    Raw,
    /// The response body is a zip archive holding the delimited text.
    Zip,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Raw => write!(f, "raw"),
            Container::Zip => write!(f, "zip"),
        }
    }
}

// ---------------------------------------------------------------------------
// SourceDescriptor – where one dataset lives
// ---------------------------------------------------------------------------

/// Location and packaging of one remote dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub url: String,
    pub container: Container,
    /// Archive member to extract. `None` picks the first `.csv` entry.
    pub inner_file: Option<String>,
}

impl SourceDescriptor {
    /// A flat delimited file.
    pub fn raw(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            container: Container::Raw,
            inner_file: None,
        }
    }

    /// A zip archive whose CSV member is discovered at load time.
    pub fn zip(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            container: Container::Zip,
            inner_file: None,
        }
    }

    /// Pin the archive member by name instead of discovering it.
    pub fn with_inner_file(mut self, name: impl Into<String>) -> Self {
        self.inner_file = Some(name.into());
        self
    }
}
