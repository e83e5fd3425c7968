//! Binding of a GPU program to a pass slot
//!
//! The program is referenced by name and only resolved when [`GpuProgramUsage::validate`]
//! runs, so scripts may reference programs declared later. Parameters start out
//! shared with the program's defaults and are copied on first write.

use std::sync::Arc;

use crate::foundation::collections::GpuProgramKey;
use crate::resources::{GpuProgramManager, GpuProgramParameters, GpuProgramType};

/// Errors raised when a usage is validated
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramUsageError {
    /// No program has the referenced name
    #[error("GPU program '{0}' not found")]
    NotFound(String),

    /// The program exists but belongs to another stage
    #[error("GPU program '{name}' is a {found:?} program, expected {expected:?}")]
    WrongType {
        /// Program name
        name: String,
        /// Stage of the slot
        expected: GpuProgramType,
        /// Stage of the program
        found: GpuProgramType,
    },
}

/// A program reference held by one pass slot
#[derive(Debug, Clone, PartialEq)]
pub struct GpuProgramUsage {
    program_type: GpuProgramType,
    program_name: String,
    program: Option<GpuProgramKey>,
    parameters: Option<Arc<GpuProgramParameters>>,
    includes_defaults: bool,
}

impl GpuProgramUsage {
    /// Create an unbound usage for a stage
    pub fn new(program_type: GpuProgramType) -> Self {
        Self {
            program_type,
            program_name: String::new(),
            program: None,
            parameters: None,
            includes_defaults: false,
        }
    }

    /// Stage of the slot
    pub fn program_type(&self) -> GpuProgramType {
        self.program_type
    }

    /// Reference a program by name, binding immediately if it is already known
    ///
    /// Any parameters set for a previous program are discarded.
    pub fn set_program_name(&mut self, name: impl Into<String>, programs: &GpuProgramManager) {
        self.program_name = name.into();
        self.program = None;
        self.parameters = None;
        self.includes_defaults = false;
        if let Err(err) = self.validate(programs) {
            log::debug!("Deferring program binding: {}", err);
        }
    }

    /// Referenced program name
    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// Resolved program, if validation succeeded
    pub fn program(&self) -> Option<GpuProgramKey> {
        self.program
    }

    /// Resolve the program name and attach the program's default parameters
    ///
    /// Parameters written before the program was known are layered over the defaults.
    pub fn validate(&mut self, programs: &GpuProgramManager) -> Result<GpuProgramKey, ProgramUsageError> {
        let key = programs
            .get_by_name(&self.program_name)
            .ok_or_else(|| ProgramUsageError::NotFound(self.program_name.clone()))?;
        let program = programs
            .get(key)
            .ok_or_else(|| ProgramUsageError::NotFound(self.program_name.clone()))?;

        if program.program_type() != self.program_type {
            return Err(ProgramUsageError::WrongType {
                name: self.program_name.clone(),
                expected: self.program_type,
                found: program.program_type(),
            });
        }

        self.program = Some(key);
        if !self.includes_defaults {
            let defaults = program.default_parameters();
            self.parameters = Some(match self.parameters.take() {
                None => Arc::clone(defaults),
                Some(local) => {
                    let mut merged = GpuProgramParameters::clone(defaults);
                    merged.merge_from(&local);
                    Arc::new(merged)
                }
            });
            self.includes_defaults = true;
        }
        Ok(key)
    }

    /// Current parameters, if any have been attached
    pub fn parameters(&self) -> Option<&GpuProgramParameters> {
        self.parameters.as_deref()
    }

    /// Parameters for writing; detaches from shared defaults on first use
    pub fn parameters_mut(&mut self) -> &mut GpuProgramParameters {
        Arc::make_mut(self.parameters.get_or_insert_with(Default::default))
    }

    /// True while the parameters are still the program's shared defaults
    pub fn shares_parameters_with(&self, defaults: &Arc<GpuProgramParameters>) -> bool {
        self.parameters.as_ref().is_some_and(|params| Arc::ptr_eq(params, defaults))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{GpuConstant, GpuProgram};

    fn manager_with(name: &str, program_type: GpuProgramType) -> GpuProgramManager {
        let mut programs = GpuProgramManager::new();
        let mut program = GpuProgram::new(name, program_type, "glsl");
        program
            .default_parameters_mut()
            .set_named("shininess", GpuConstant::Float(vec![8.0]));
        programs.create("General", program).unwrap();
        programs
    }

    #[test]
    fn test_binds_known_program_and_shares_defaults() {
        let programs = manager_with("Phong", GpuProgramType::Vertex);
        let mut usage = GpuProgramUsage::new(GpuProgramType::Vertex);
        usage.set_program_name("Phong", &programs);

        let program = programs.find("Phong").unwrap();
        assert!(usage.program().is_some());
        assert!(usage.shares_parameters_with(program.default_parameters()));

        usage.parameters_mut().set_named("shininess", GpuConstant::Float(vec![32.0]));
        assert!(!usage.shares_parameters_with(program.default_parameters()));
        assert_eq!(
            program.default_parameters().named("shininess"),
            Some(&GpuConstant::Float(vec![8.0]))
        );
    }

    #[test]
    fn test_deferred_validation_layers_local_parameters() {
        let mut usage = GpuProgramUsage::new(GpuProgramType::Vertex);
        usage.set_program_name("Later", &GpuProgramManager::new());
        assert!(usage.program().is_none());
        usage.parameters_mut().set_indexed(0, GpuConstant::Int(vec![1]));

        let mut programs = manager_with("Later", GpuProgramType::Vertex);
        let key = usage.validate(&programs).unwrap();
        assert_eq!(usage.program(), Some(key));
        let params = usage.parameters().unwrap();
        assert_eq!(params.indexed(0), Some(&GpuConstant::Int(vec![1])));
        assert_eq!(params.named("shininess"), Some(&GpuConstant::Float(vec![8.0])));

        // revalidating after the defaults change keeps the already merged set
        programs
            .get_mut(key)
            .unwrap()
            .default_parameters_mut()
            .set_named("extra", GpuConstant::Float(vec![1.0]));
        usage.validate(&programs).unwrap();
        assert!(usage.parameters().unwrap().named("extra").is_none());
    }

    #[test]
    fn test_wrong_stage_is_rejected() {
        let programs = manager_with("Blur", GpuProgramType::Fragment);
        let mut usage = GpuProgramUsage::new(GpuProgramType::Vertex);
        usage.set_program_name("Blur", &programs);
        assert!(matches!(
            usage.validate(&programs),
            Err(ProgramUsageError::WrongType { .. })
        ));
    }
}
