//! Material script front end and compiler
//!
//! Text is tokenized, grouped into a concrete tree and converted into an
//! abstract tree. [`ScriptCompiler`] then resolves imports, inheritance and
//! variables before translating objects into the material system.

pub mod ast;
pub mod builder;
pub mod compiler;
pub mod error;
pub mod keywords;
pub mod lexer;
pub mod listener;
pub mod parser;
mod translators;

pub use compiler::ScriptCompiler;
pub use error::{CompileError, Diagnostics, ErrorCode, Location, ScriptError, Severity};
pub use keywords::Keyword;
pub use listener::CompilerListener;
pub use translators::UNLIMITED_MIPMAPS;
