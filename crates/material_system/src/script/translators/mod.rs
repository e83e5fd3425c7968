//! Semantic translation of resolved ASTs into live objects
//!
//! Each top-level object class has a translator. Properties are dispatched on
//! their interned keyword; a malformed property is reported and skipped
//! without affecting its siblings.

mod common;
mod compositor;
mod gpu_program;
mod material;
mod parameters;
mod particle;
mod pass;
mod program_ref;
mod technique;
mod texture_unit;

pub use texture_unit::UNLIMITED_MIPMAPS;

use crate::config::CompilerConfig;
use crate::resources::ResourceError;
use crate::script::ast::{AbstractNode, ObjectNode};
use crate::script::error::{Diagnostics, ErrorCode, Location};
use crate::script::keywords::Keyword;
use crate::system::MaterialSystem;

/// State shared by translators during one compile
pub(crate) struct Translator<'a> {
    pub config: &'a CompilerConfig,
    pub group: &'a str,
    pub diagnostics: &'a mut Diagnostics,
}

impl<'a> Translator<'a> {
    pub fn new(config: &'a CompilerConfig, group: &'a str, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            config,
            group,
            diagnostics,
        }
    }

    pub fn error(&mut self, code: ErrorCode, location: &Location, message: impl Into<String>) {
        self.diagnostics.error(code, location, message);
    }

    /// Resolve a duplicate-name creation failure according to the override policy
    ///
    /// Returns true when the existing resource may be reused.
    pub fn allow_duplicate(&mut self, err: &ResourceError, location: &Location) -> bool {
        let ResourceError::AlreadyExists { kind, name, group } = err else {
            self.error(ErrorCode::ObjectAllocationError, location, err.to_string());
            return false;
        };
        if self.config.allow_override {
            self.diagnostics.warning(
                ErrorCode::DuplicateOverride,
                location,
                format!("{kind} '{name}' from group '{group}' is overridden"),
            );
            true
        } else {
            self.error(
                ErrorCode::ObjectAllocationError,
                location,
                format!("{kind} '{name}' is already defined in group '{group}'"),
            );
            false
        }
    }

    /// Report a child node the current translator does not understand
    pub fn unexpected(&mut self, node: &AbstractNode, context: &str) {
        self.error(
            ErrorCode::UnexpectedToken,
            node.location(),
            format!("'{}' is not valid in {context}", node.text()),
        );
    }
}

/// Translate one top-level object into the material system
pub(crate) fn translate_object(tr: &mut Translator<'_>, system: &mut MaterialSystem, object: &ObjectNode) {
    if object.is_abstract {
        return;
    }
    match object.id {
        Keyword::Material => material::translate(tr, system, object),
        Keyword::VertexProgram | Keyword::FragmentProgram | Keyword::GeometryProgram => {
            gpu_program::translate(tr, system, object);
        }
        Keyword::ParticleSystem => particle::translate(tr, system, object),
        Keyword::Compositor => compositor::translate(tr, system, object),
        _ => tr.error(
            ErrorCode::UnexpectedToken,
            &object.location,
            format!("unknown object class '{}'", object.cls),
        ),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::config::CompilerConfig;
    use crate::script::compiler::ScriptCompiler;
    use crate::script::error::Diagnostics;
    use crate::system::MaterialSystem;

    /// Compile a script into a fresh system and hand back its diagnostics
    pub(crate) fn compile(text: &str, config: CompilerConfig) -> (MaterialSystem, Diagnostics) {
        let mut system = MaterialSystem::default();
        let mut compiler = ScriptCompiler::new(config);
        compiler.compile(text, "test.material", "General", &mut system);
        (system, compiler.take_diagnostics())
    }
}
