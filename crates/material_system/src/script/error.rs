//! Compiler diagnostics
//!
//! Syntax failures from the lexer and parser abort the script they occur in.
//! Everything later in the pipeline is reported as a [`CompileError`] and
//! accumulated so one broken object does not stop its siblings.

use std::fmt;
use std::sync::Arc;

use super::listener::CompilerListener;

/// Lexer and parser failures
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A quoted string runs to the end of input
    #[error("{file}({line}): unterminated quoted string")]
    UnterminatedQuote {
        /// Source name
        file: String,
        /// Line of the opening quote
        line: u32,
    },

    /// A block comment runs to the end of input
    #[error("{file}({line}): unterminated block comment")]
    UnterminatedComment {
        /// Source name
        file: String,
        /// Line of the comment opener
        line: u32,
    },

    /// A token appeared where the grammar does not allow it
    #[error("{file}({line}): unexpected token '{token}'")]
    UnexpectedToken {
        /// Source name
        file: String,
        /// Line of the token
        line: u32,
        /// Offending lexeme
        token: String,
    },

    /// Input ended inside an object body
    #[error("{file}({line}): close brace '}}' expected")]
    CloseBraceExpected {
        /// Source name
        file: String,
        /// Line of the unclosed open brace
        line: u32,
    },
}

impl ScriptError {
    /// Source name the error refers to
    pub fn file(&self) -> &str {
        match self {
            Self::UnterminatedQuote { file, .. }
            | Self::UnterminatedComment { file, .. }
            | Self::UnexpectedToken { file, .. }
            | Self::CloseBraceExpected { file, .. } => file,
        }
    }

    /// Line the error refers to
    pub fn line(&self) -> u32 {
        match self {
            Self::UnterminatedQuote { line, .. }
            | Self::UnterminatedComment { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::CloseBraceExpected { line, .. } => *line,
        }
    }
}

/// Diagnostic categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    /// The lexer or parser rejected the text
    SyntaxError,
    /// A string value was expected
    StringExpected,
    /// A numeric value was expected
    NumberExpected,
    /// More values than the property accepts
    FewerParametersExpected,
    /// A `$variable` was expected
    VariableExpected,
    /// A referenced variable has no definition
    UndefinedVariable,
    /// An object requires a name
    ObjectNameExpected,
    /// The object could not be created
    ObjectAllocationError,
    /// Values have the wrong form or count
    InvalidParameters,
    /// An existing definition was replaced
    DuplicateOverride,
    /// A token or node is not valid in this position
    UnexpectedToken,
    /// The inheritance base does not exist
    ObjectBaseNotFound,
    /// An object inherits from itself through its bases
    CircularInheritance,
    /// Variable values nest deeper than the configured limit
    VariableNestingTooDeep,
    /// The target hardware cannot support the feature
    UnsupportedByRenderSystem,
    /// A referenced object or import source does not exist
    ReferenceToNonExistingObject,
}

impl ErrorCode {
    /// Human readable description
    pub fn description(self) -> &'static str {
        match self {
            Self::SyntaxError => "syntax error",
            Self::StringExpected => "string expected",
            Self::NumberExpected => "number expected",
            Self::FewerParametersExpected => "fewer parameters expected",
            Self::VariableExpected => "variable expected",
            Self::UndefinedVariable => "undefined variable",
            Self::ObjectNameExpected => "object name expected",
            Self::ObjectAllocationError => "object allocation error",
            Self::InvalidParameters => "invalid parameters",
            Self::DuplicateOverride => "duplicate object override",
            Self::UnexpectedToken => "unexpected token",
            Self::ObjectBaseNotFound => "object base not found",
            Self::CircularInheritance => "circular inheritance",
            Self::VariableNestingTooDeep => "variable nesting too deep",
            Self::UnsupportedByRenderSystem => "unsupported by render system",
            Self::ReferenceToNonExistingObject => "reference to a non-existing object",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Diagnostic weight; only errors fail a compile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recorded for information, compilation still succeeds
    Warning,
    /// Compilation fails
    Error,
}

/// Source position of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Source name
    pub file: Arc<str>,
    /// 1-based line
    pub line: u32,
}

impl Location {
    /// Create a location
    pub fn new(file: Arc<str>, line: u32) -> Self {
        Self { file, line }
    }
}

/// One accumulated diagnostic
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{file}({line}): {code}{}", detail(.message))]
pub struct CompileError {
    /// Category
    pub code: ErrorCode,
    /// Weight
    pub severity: Severity,
    /// Source name
    pub file: String,
    /// 1-based line
    pub line: u32,
    /// Detail
    pub message: String,
}

fn detail(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {message}")
    }
}

impl CompileError {
    /// Error at a node location
    pub fn new(code: ErrorCode, location: &Location, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            file: location.file.to_string(),
            line: location.line,
            message: message.into(),
        }
    }

    /// Demote to a warning
    pub fn into_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// True for error severity
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<ScriptError> for CompileError {
    fn from(error: ScriptError) -> Self {
        Self {
            code: ErrorCode::SyntaxError,
            severity: Severity::Error,
            file: error.file().to_string(),
            line: error.line(),
            message: error.to_string(),
        }
    }
}

/// Ordered diagnostic list with optional forwarding to a listener
#[derive(Default)]
pub struct Diagnostics {
    entries: Vec<CompileError>,
    listener: Option<Box<dyn CompilerListener>>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("entries", &self.entries)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Diagnostics {
    /// Record a diagnostic and forward it
    pub fn push(&mut self, error: CompileError) {
        match error.severity {
            Severity::Error => log::error!("{error}"),
            Severity::Warning => log::warn!("{error}"),
        }
        if let Some(listener) = self.listener.as_mut() {
            listener.error_raised(&error);
        }
        self.entries.push(error);
    }

    /// Record an error
    pub fn error(&mut self, code: ErrorCode, location: &Location, message: impl Into<String>) {
        self.push(CompileError::new(code, location, message));
    }

    /// Record a warning
    pub fn warning(&mut self, code: ErrorCode, location: &Location, message: impl Into<String>) {
        self.push(CompileError::new(code, location, message).into_warning());
    }

    /// All diagnostics in the order raised
    pub fn entries(&self) -> &[CompileError] {
        &self.entries
    }

    /// Error count
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_error()).count()
    }

    /// Discard recorded diagnostics
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Move the recorded entries out, leaving the listener installed
    pub fn take(&mut self) -> Diagnostics {
        Diagnostics {
            entries: std::mem::take(&mut self.entries),
            listener: None,
        }
    }

    pub(crate) fn set_listener(&mut self, listener: Option<Box<dyn CompilerListener>>) {
        self.listener = listener;
    }

    pub(crate) fn listener_mut(&mut self) -> Option<&mut (dyn CompilerListener + 'static)> {
        self.listener.as_deref_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location_and_message() {
        let location = Location::new(Arc::from("a.material"), 3);
        let error = CompileError::new(ErrorCode::NumberExpected, &location, "ambient");
        assert_eq!(error.to_string(), "a.material(3): number expected: ambient");
    }

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let location = Location::new(Arc::from("a.material"), 1);
        let mut diagnostics = Diagnostics::default();
        diagnostics.warning(ErrorCode::DuplicateOverride, &location, "M");
        diagnostics.error(ErrorCode::UndefinedVariable, &location, "$c");
        assert_eq!(diagnostics.entries().len(), 2);
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_syntax_error_conversion() {
        let error: CompileError = ScriptError::UnterminatedQuote {
            file: "x".into(),
            line: 7,
        }
        .into();
        assert_eq!(error.code, ErrorCode::SyntaxError);
        assert_eq!(error.line, 7);
    }
}
