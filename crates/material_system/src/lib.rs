//! # Material System
//!
//! Compiler for text material scripts and the render-state object model they
//! populate.
//!
//! ## Features
//!
//! - **Script Front End**: Lexer, concrete and abstract syntax trees with per-node locations
//! - **Inheritance**: `import` directives and `object : base` overlays
//! - **Variables**: Lexically scoped `$name` expansion
//! - **Object Model**: Materials, techniques, passes and texture units in a pass arena
//! - **Hardware Compile**: Capability checks, texture unit splitting and illumination stages
//! - **Sort Hashes**: Deterministic pass hashes with a dirty set and graveyard
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use material_system::prelude::*;
//!
//! let mut system = MaterialSystem::new(RenderCapabilities::default());
//! let mut compiler = ScriptCompiler::new(CompilerConfig::default());
//! let ok = compiler.compile(
//!     "material Wall { technique { pass { ambient 0.2 0.2 0.2 } } }",
//!     "wall.material",
//!     DEFAULT_GROUP,
//!     &mut system,
//! );
//! for error in compiler.diagnostics().entries() {
//!     eprintln!("{error}");
//! }
//! assert!(ok);
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod material;
pub mod resources;
pub mod script;
pub mod system;

pub use system::MaterialSystem;

/// Common imports for material system users
pub mod prelude {
    pub use crate::{
        config::{CompilerConfig, Config, MaterialSystemConfig},
        foundation::math::ColourValue,
        material::{Material, MaterialManager, Pass, Technique, TextureUnitState},
        resources::{FileSystemLoader, MemoryLoader, RenderCapabilities, ScriptLoader, DEFAULT_GROUP},
        script::{CompileError, CompilerListener, Diagnostics, ErrorCode, ScriptCompiler, Severity},
        MaterialSystem,
    };
}

#[cfg(test)]
mod tests;
