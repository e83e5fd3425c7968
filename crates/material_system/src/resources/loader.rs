//! Script loading collaborators used to resolve `import` directives

use std::collections::HashMap;
use std::path::PathBuf;

/// Errors raised while opening a script
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// No script with the given name could be located
    #[error("script '{name}' not found in group '{group}'")]
    NotFound {
        /// Script name
        name: String,
        /// Group searched
        group: String,
    },

    /// The script exists but could not be read
    #[error("failed to read script '{name}': {source}")]
    Io {
        /// Script name
        name: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Synchronous source of script text
pub trait ScriptLoader {
    /// Fetch the full text of a named script
    fn open_script(&self, name: &str, group: &str) -> Result<String, LoadError>;
}

/// Loads scripts from a list of directories, searched in order
#[derive(Debug, Clone, Default)]
pub struct FileSystemLoader {
    roots: Vec<PathBuf>,
}

impl FileSystemLoader {
    /// Create a loader with no search roots
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a search directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }
}

impl ScriptLoader for FileSystemLoader {
    fn open_script(&self, name: &str, group: &str) -> Result<String, LoadError> {
        for root in &self.roots {
            let path = root.join(name);
            if path.is_file() {
                log::debug!("Importing script {}", path.display());
                return std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
                    name: name.to_string(),
                    source,
                });
            }
        }
        Err(LoadError::NotFound {
            name: name.to_string(),
            group: group.to_string(),
        })
    }
}

/// In-memory script table, handy for tools and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    scripts: HashMap<String, String>,
}

impl MemoryLoader {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a script
    pub fn with_script(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.scripts.insert(name.into(), text.into());
        self
    }
}

impl ScriptLoader for MemoryLoader {
    fn open_script(&self, name: &str, group: &str) -> Result<String, LoadError> {
        self.scripts.get(name).cloned().ok_or_else(|| LoadError::NotFound {
            name: name.to_string(),
            group: group.to_string(),
        })
    }
}
