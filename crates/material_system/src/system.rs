//! Material system state shared by every compiled script

use crate::config::MaterialSystemConfig;
use crate::material::{CompileOptions, MaterialManager};
use crate::resources::{CompositorManager, GpuProgramManager, ParticleSystemManager, RenderCapabilities};

/// Registries populated by script compilation plus the target hardware profile
#[derive(Debug, Clone, Default)]
pub struct MaterialSystem {
    /// Materials and the pass arena
    pub materials: MaterialManager,
    /// GPU program declarations
    pub programs: GpuProgramManager,
    /// Compositor definitions
    pub compositors: CompositorManager,
    /// Particle system templates
    pub particle_systems: ParticleSystemManager,
    /// Hardware profile techniques are compiled against
    pub capabilities: RenderCapabilities,
}

impl MaterialSystem {
    /// Create empty registries for a hardware profile
    pub fn new(capabilities: RenderCapabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    /// Create empty registries from a configuration
    pub fn from_config(config: &MaterialSystemConfig) -> Self {
        Self::new(config.capabilities.clone())
    }

    /// Compile every material against the current capabilities
    ///
    /// Returns the number of techniques found unsupported.
    pub fn compile_all(&mut self, auto_manage_texture_units: bool) -> usize {
        let keys: Vec<_> = self.materials.iter().map(|(key, _)| key).collect();
        let mut unsupported = 0;
        for key in keys {
            let options = CompileOptions {
                capabilities: &self.capabilities,
                programs: &self.programs,
                auto_manage_texture_units,
            };
            unsupported += self.materials.compile(key, options).len();
        }
        self.materials.process_pending_updates();
        unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::TextureUnitState;

    #[test]
    fn test_compile_all_reports_unsupported_techniques() {
        let mut system = MaterialSystem::new(RenderCapabilities::minimal(1));
        let key = system.materials.create("Multi", "General").unwrap();
        let (material, passes) = system.materials.get_with_passes_mut(key).unwrap();
        let technique = material.create_technique();
        let pass_key = technique.create_pass(passes);
        let pass = passes.get_mut(pass_key).unwrap();
        pass.add_texture_unit(TextureUnitState::with_texture("a.png"));
        pass.add_texture_unit(TextureUnitState::with_texture("b.png"));

        assert_eq!(system.compile_all(false), 1);
        assert_eq!(system.compile_all(true), 0);
        let material = system.materials.get(key).unwrap();
        assert_eq!(material.technique(0).unwrap().num_passes(), 2);
    }
}
