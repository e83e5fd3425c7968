//! Hooks a host can install on a [`super::ScriptCompiler`]

use super::error::CompileError;

/// Receives compiler events
///
/// Every method has a default so implementors only override what they need.
pub trait CompilerListener {
    /// Called for each diagnostic as it is raised
    fn error_raised(&mut self, _error: &CompileError) {}

    /// Supply the text of an imported script; `None` falls back to the loader
    fn import_file(&mut self, _source: &str) -> Option<String> {
        None
    }
}
