//! Techniques: ordered pass lists gated by hardware support
//!
//! Compilation checks every pass against the capability profile, splits
//! fixed-function passes that use too many texture units, and on success
//! derives the illumination pass sequence used for additive multi-light
//! rendering.

use crate::foundation::collections::PassKey;
use crate::material::pass::{Pass, PassParent, ProgramSlot};
use crate::material::pass_store::PassStore;
use crate::material::program_usage::ProgramUsageError;
use crate::material::types::IlluminationStage;
use crate::resources::capabilities::Capabilities;
use crate::resources::{GpuProgramManager, RenderCapabilities};

/// Reason a technique cannot run on the target hardware
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TechniqueUnsupported {
    /// A program reference could not be resolved
    #[error("pass {pass}: {source}")]
    Program {
        /// Pass index
        pass: usize,
        /// Resolution failure
        #[source]
        source: ProgramUsageError,
    },

    /// The bound program cannot run on this hardware
    #[error("pass {pass}: {slot:?} program '{program}' is not supported")]
    ProgramUnsupported {
        /// Pass index
        pass: usize,
        /// Slot holding the program
        slot: ProgramSlot,
        /// Program name
        program: String,
    },

    /// The pass needs more texture units than the hardware offers
    #[error("pass {pass}: {requested} texture units requested, {available} available")]
    TooManyTextureUnits {
        /// Pass index
        pass: usize,
        /// Units used by the pass
        requested: usize,
        /// Units supported by the hardware
        available: usize,
    },

    /// A texture unit samples a cube map
    #[error("pass {pass}, texture unit {unit}: cube mapping is not supported")]
    CubeMappingUnsupported {
        /// Pass index
        pass: usize,
        /// Texture unit index
        unit: usize,
    },

    /// A texture unit uses dot3 blending
    #[error("pass {pass}, texture unit {unit}: dot3 blending is not supported")]
    Dot3Unsupported {
        /// Pass index
        pass: usize,
        /// Texture unit index
        unit: usize,
    },
}

/// One stage of the decomposed illumination sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IlluminationPass {
    /// Stage this entry renders
    pub stage: IlluminationStage,
    /// Pass to render
    pub pass: PassKey,
    /// Technique pass it was derived from
    pub original: PassKey,
    /// True when `pass` is a synthesized copy owned by this entry
    pub owns_pass: bool,
}

/// Settings consumed by [`Technique::compile`]
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions<'a> {
    /// Hardware profile
    pub capabilities: &'a RenderCapabilities,
    /// Programs referenced by passes
    pub programs: &'a GpuProgramManager,
    /// Split oversized fixed-function passes instead of rejecting them
    pub auto_manage_texture_units: bool,
}

/// One rendering strategy of a material
#[derive(Debug, Clone, Default)]
pub struct Technique {
    name: String,
    scheme: String,
    lod_index: u16,
    passes: Vec<PassKey>,
    supported: bool,
    illumination_passes: Vec<IlluminationPass>,
    shadow_caster_material: Option<String>,
    shadow_receiver_material: Option<String>,
    parent: PassParent,
}

impl Technique {
    /// Create an empty technique
    pub fn new() -> Self {
        Self {
            scheme: "Default".to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn with_parent(parent: PassParent) -> Self {
        Self { parent, ..Self::new() }
    }

    /// Optional technique name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the technique name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Material scheme
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Set the material scheme
    pub fn set_scheme(&mut self, scheme: impl Into<String>) {
        self.scheme = scheme.into();
    }

    /// Level of detail index
    pub fn lod_index(&self) -> u16 {
        self.lod_index
    }

    /// Set the level of detail index
    pub fn set_lod_index(&mut self, index: u16) {
        self.lod_index = index;
    }

    /// Material used for shadow casting
    pub fn shadow_caster_material(&self) -> Option<&str> {
        self.shadow_caster_material.as_deref()
    }

    /// Set the shadow caster material
    pub fn set_shadow_caster_material(&mut self, name: Option<String>) {
        self.shadow_caster_material = name;
    }

    /// Material used for shadow receiving
    pub fn shadow_receiver_material(&self) -> Option<&str> {
        self.shadow_receiver_material.as_deref()
    }

    /// Set the shadow receiver material
    pub fn set_shadow_receiver_material(&mut self, name: Option<String>) {
        self.shadow_receiver_material = name;
    }

    /// Owner written into passes created by this technique
    pub fn parent(&self) -> PassParent {
        self.parent
    }

    /// Update the owner and propagate it to every pass
    pub fn set_parent(&mut self, parent: PassParent, store: &mut PassStore) {
        self.parent = parent;
        for &key in &self.passes {
            if let Some(pass) = store.get_mut(key) {
                pass.set_parent(parent);
            }
        }
    }

    /// Append a pass with default state
    pub fn create_pass(&mut self, store: &mut PassStore) -> PassKey {
        self.add_pass(store, Pass::new())
    }

    /// Append an existing pass
    pub fn add_pass(&mut self, store: &mut PassStore, mut pass: Pass) -> PassKey {
        pass.set_index(self.passes.len());
        pass.set_parent(self.parent);
        let key = store.insert(pass);
        self.passes.push(key);
        self.supported = false;
        key
    }

    /// Pass handles in order
    pub fn passes(&self) -> &[PassKey] {
        &self.passes
    }

    /// Pass handle at an index
    pub fn pass(&self, index: usize) -> Option<PassKey> {
        self.passes.get(index).copied()
    }

    /// Number of passes
    pub fn num_passes(&self) -> usize {
        self.passes.len()
    }

    /// Remove one pass and queue it for deletion
    pub fn remove_pass(&mut self, store: &mut PassStore, index: usize) {
        if index < self.passes.len() {
            self.clear_illumination_passes(store);
            let key = self.passes.remove(index);
            store.queue_for_deletion(key);
            self.reindex(store);
            self.supported = false;
        }
    }

    /// Remove every pass and queue them for deletion
    pub fn remove_all_passes(&mut self, store: &mut PassStore) {
        self.clear_illumination_passes(store);
        for key in self.passes.drain(..) {
            store.queue_for_deletion(key);
        }
        self.supported = false;
    }

    /// Result of the last compilation
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// True when the first pass blends with the destination
    pub fn is_transparent(&self, store: &PassStore) -> bool {
        self.passes
            .first()
            .and_then(|&key| store.get(key))
            .is_some_and(Pass::is_transparent)
    }

    /// Derived illumination sequence
    pub fn illumination_passes(&self) -> &[IlluminationPass] {
        &self.illumination_passes
    }

    /// Validate against the hardware, splitting passes where allowed
    ///
    /// On success the technique is marked supported and its illumination
    /// passes are rebuilt. Any failure leaves it unsupported.
    pub fn compile(&mut self, store: &mut PassStore, options: CompileOptions<'_>) -> Result<(), TechniqueUnsupported> {
        self.supported = false;
        self.clear_illumination_passes(store);

        self.check_passes(store, options)?;

        self.supported = true;
        self.compile_illumination_passes(store);
        Ok(())
    }

    fn check_passes(&mut self, store: &mut PassStore, options: CompileOptions<'_>) -> Result<(), TechniqueUnsupported> {
        let caps = options.capabilities;
        let available = caps.num_texture_units();

        let mut index = 0;
        while index < self.passes.len() {
            let key = self.passes[index];
            let Some(pass) = store.get_mut(key) else {
                self.passes.remove(index);
                continue;
            };

            for (slot, usage) in pass.programs_mut() {
                if matches!(slot, ProgramSlot::Vertex | ProgramSlot::Fragment | ProgramSlot::Geometry) {
                    usage
                        .validate(options.programs)
                        .map_err(|source| TechniqueUnsupported::Program { pass: index, source })?;
                }
            }

            let requested = pass.num_texture_units();
            if pass.has_fragment_program() {
                Self::check_program(pass, ProgramSlot::Fragment, index, options)?;
                if requested > available {
                    return Err(TechniqueUnsupported::TooManyTextureUnits {
                        pass: index,
                        requested,
                        available,
                    });
                }
            } else {
                for (unit_index, unit) in pass.texture_units().iter().enumerate() {
                    if unit.requires_cube_mapping() && !caps.has_capability(Capabilities::CUBEMAPPING) {
                        return Err(TechniqueUnsupported::CubeMappingUnsupported { pass: index, unit: unit_index });
                    }
                    if unit.is_dot3() && !caps.has_capability(Capabilities::DOT3) {
                        return Err(TechniqueUnsupported::Dot3Unsupported { pass: index, unit: unit_index });
                    }
                }

                if requested > available {
                    if !options.auto_manage_texture_units || available == 0 {
                        return Err(TechniqueUnsupported::TooManyTextureUnits {
                            pass: index,
                            requested,
                            available,
                        });
                    }
                    self.split_pass(store, index, available);
                }
            }

            let Some(pass) = store.get(self.passes[index]) else {
                continue;
            };
            if pass.has_vertex_program() {
                Self::check_program(pass, ProgramSlot::Vertex, index, options)?;
            }
            if pass.has_geometry_program() {
                Self::check_program(pass, ProgramSlot::Geometry, index, options)?;
            }

            index += 1;
        }
        Ok(())
    }

    fn check_program(
        pass: &Pass,
        slot: ProgramSlot,
        index: usize,
        options: CompileOptions<'_>,
    ) -> Result<(), TechniqueUnsupported> {
        let Some(usage) = pass.program(slot) else {
            return Ok(());
        };
        let supported = usage
            .program()
            .and_then(|key| options.programs.get(key))
            .is_some_and(|program| program.is_supported(options.capabilities));
        if supported {
            Ok(())
        } else {
            Err(TechniqueUnsupported::ProgramUnsupported {
                pass: index,
                slot,
                program: usage.program_name().to_string(),
            })
        }
    }

    /// Move units beyond `limit` into new passes inserted after `index`
    ///
    /// Each new pass blends with the fallback factors of its first unit so the
    /// chain renders like the original multitextured pass.
    fn split_pass(&mut self, store: &mut PassStore, index: usize, limit: usize) {
        let mut current = self.passes[index];
        let mut insert_at = index + 1;

        loop {
            let moved = match store.get_mut(current) {
                Some(pass) => pass.split_off_texture_units(limit),
                None => break,
            };
            let Some(first) = moved.first() else {
                break;
            };

            let mut split = Pass::new();
            let (src, dest) = first.colour_blend_fallback();
            split.set_scene_blending(src, dest);
            split.set_parent(self.parent);
            for unit in moved {
                split.add_texture_unit(unit);
            }
            log::debug!(
                "Split pass {} of technique '{}': {} texture units moved to a new pass",
                index,
                self.name,
                split.num_texture_units()
            );

            let key = store.insert(split);
            self.passes.insert(insert_at, key);
            insert_at += 1;
            current = key;
        }

        self.reindex(store);
    }

    fn reindex(&self, store: &mut PassStore) {
        for (index, &key) in self.passes.iter().enumerate() {
            if let Some(pass) = store.get_mut(key) {
                pass.set_index(index);
            }
        }
    }

    /// Drop the illumination sequence, destroying synthesized passes
    pub fn clear_illumination_passes(&mut self, store: &mut PassStore) {
        for entry in self.illumination_passes.drain(..) {
            if entry.owns_pass {
                store.queue_for_deletion(entry.pass);
            }
        }
    }

    /// Decompose the passes into ambient, per-light and decal stages
    ///
    /// Transparent techniques are left undecomposed.
    pub fn compile_illumination_passes(&mut self, store: &mut PassStore) {
        self.clear_illumination_passes(store);
        if self.is_transparent(store) {
            return;
        }

        let mut stage = IlluminationStage::Ambient;
        let mut index = 0;

        while index < self.passes.len() {
            let original = self.passes[index];
            let Some(pass) = store.get(original) else {
                index += 1;
                continue;
            };

            match stage {
                IlluminationStage::Ambient => {
                    let fully_black = pass.lighting_enabled()
                        && pass.ambient().is_black()
                        && pass.diffuse().is_black()
                        && pass.specular().is_black()
                        && pass.emissive().is_black();

                    if pass.is_ambient_only() && !fully_black {
                        self.push_wholesale(IlluminationStage::Ambient, original);
                        index += 1;
                    } else {
                        // A fully black pass still lays down depth through a colourless clone
                        if fully_black || !pass.ambient().is_black() || !pass.emissive().is_black() {
                            let clone = pass.ambient_stage_clone();
                            self.push_owned(store, IlluminationStage::Ambient, original, clone);
                        }
                        stage = IlluminationStage::PerLight;
                    }
                }
                IlluminationStage::PerLight => {
                    if pass.iterate_per_light() {
                        self.push_wholesale(IlluminationStage::PerLight, original);
                        index += 1;
                    } else {
                        if pass.lighting_enabled() && (!pass.diffuse().is_black() || !pass.specular().is_black()) {
                            let clone = pass.per_light_stage_clone();
                            self.push_owned(store, IlluminationStage::PerLight, original, clone);
                        }
                        stage = IlluminationStage::Decal;
                    }
                }
                IlluminationStage::Decal | IlluminationStage::Unknown => {
                    if pass.num_texture_units() > 0 {
                        if pass.lighting_enabled() {
                            let clone = pass.decal_stage_clone();
                            self.push_owned(store, IlluminationStage::Decal, original, clone);
                        } else {
                            self.push_wholesale(IlluminationStage::Decal, original);
                        }
                    }
                    index += 1;
                }
            }
        }

        log::trace!(
            "Technique '{}' decomposed into {} illumination passes",
            self.name,
            self.illumination_passes.len()
        );
    }

    fn push_wholesale(&mut self, stage: IlluminationStage, original: PassKey) {
        self.illumination_passes.push(IlluminationPass {
            stage,
            pass: original,
            original,
            owns_pass: false,
        });
    }

    fn push_owned(&mut self, store: &mut PassStore, stage: IlluminationStage, original: PassKey, clone: Pass) {
        let pass = store.insert(clone);
        self.illumination_passes.push(IlluminationPass {
            stage,
            pass,
            original,
            owns_pass: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::ColourValue;
    use crate::material::types::{CompareFunction, SceneBlendFactor, TextureType};
    use crate::material::{LayerBlendOperationEx, LayerBlendSource, TextureUnitState};
    use crate::material::program_usage::GpuProgramUsage;
    use crate::resources::{GpuProgram, GpuProgramType};

    fn compile(
        technique: &mut Technique,
        store: &mut PassStore,
        caps: &RenderCapabilities,
        programs: &GpuProgramManager,
    ) -> Result<(), TechniqueUnsupported> {
        technique.compile(
            store,
            CompileOptions {
                capabilities: caps,
                programs,
                auto_manage_texture_units: true,
            },
        )
    }

    fn textured_pass(count: usize) -> Pass {
        let mut pass = Pass::new();
        for i in 0..count {
            pass.add_texture_unit(TextureUnitState::with_texture(format!("t{i}.png")));
        }
        pass
    }

    fn names(store: &PassStore, key: PassKey) -> Vec<String> {
        store
            .get(key)
            .unwrap()
            .texture_units()
            .iter()
            .map(|unit| unit.texture_name().to_string())
            .collect()
    }

    #[test]
    fn test_split_two_excess_units() {
        let mut store = PassStore::new();
        let mut technique = Technique::new();
        let mut pass = textured_pass(4);
        pass.texture_unit_mut(2)
            .unwrap()
            .set_colour_op_multipass_fallback(SceneBlendFactor::One, SceneBlendFactor::One);
        technique.add_pass(&mut store, pass);

        let caps = RenderCapabilities::default().with_texture_units(2);
        compile(&mut technique, &mut store, &caps, &GpuProgramManager::new()).unwrap();

        assert!(technique.is_supported());
        assert_eq!(technique.num_passes(), 2);
        assert_eq!(names(&store, technique.passes()[0]), ["t0.png", "t1.png"]);
        assert_eq!(names(&store, technique.passes()[1]), ["t2.png", "t3.png"]);
        let split = store.get(technique.passes()[1]).unwrap();
        assert_eq!(split.index(), 1);
        assert_eq!(split.scene_blending(), (SceneBlendFactor::One, SceneBlendFactor::One));
    }

    #[test]
    fn test_split_repeats_until_units_fit() {
        let mut store = PassStore::new();
        let mut technique = Technique::new();
        technique.add_pass(&mut store, textured_pass(5));
        technique.add_pass(&mut store, textured_pass(1));

        let caps = RenderCapabilities::default().with_texture_units(2);
        compile(&mut technique, &mut store, &caps, &GpuProgramManager::new()).unwrap();

        assert_eq!(technique.num_passes(), 4);
        let all: Vec<String> = technique.passes()[..3].iter().flat_map(|&key| names(&store, key)).collect();
        assert_eq!(all, ["t0.png", "t1.png", "t2.png", "t3.png", "t4.png"]);
        for (index, &key) in technique.passes().iter().enumerate() {
            let pass = store.get(key).unwrap();
            assert!(pass.num_texture_units() <= 2);
            assert_eq!(pass.index(), index);
        }
    }

    #[test]
    fn test_oversized_pass_without_auto_manage() {
        let mut store = PassStore::new();
        let mut technique = Technique::new();
        technique.add_pass(&mut store, textured_pass(3));
        let caps = RenderCapabilities::default().with_texture_units(2);
        let programs = GpuProgramManager::new();

        let result = technique.compile(
            &mut store,
            CompileOptions {
                capabilities: &caps,
                programs: &programs,
                auto_manage_texture_units: false,
            },
        );
        assert!(matches!(result, Err(TechniqueUnsupported::TooManyTextureUnits { .. })));
        assert!(!technique.is_supported());
        assert_eq!(technique.num_passes(), 1);
    }

    #[test]
    fn test_fragment_program_pass_is_never_split() {
        let mut programs = GpuProgramManager::new();
        let mut program = GpuProgram::new("Blend", GpuProgramType::Fragment, "asm");
        program.syntax = "ps_2_0".into();
        programs.create("General", program).unwrap();

        let mut store = PassStore::new();
        let mut technique = Technique::new();
        let mut pass = textured_pass(3);
        let mut usage = GpuProgramUsage::new(GpuProgramType::Fragment);
        usage.set_program_name("Blend", &programs);
        pass.set_program(ProgramSlot::Fragment, Some(usage));
        technique.add_pass(&mut store, pass);

        let caps = RenderCapabilities::default().with_texture_units(2);
        let result = compile(&mut technique, &mut store, &caps, &programs);
        assert!(matches!(result, Err(TechniqueUnsupported::TooManyTextureUnits { .. })));
        assert_eq!(technique.num_passes(), 1);
    }

    #[test]
    fn test_unsupported_and_missing_programs() {
        let mut programs = GpuProgramManager::new();
        programs
            .create("General", GpuProgram::new("Skin", GpuProgramType::Vertex, "glsl"))
            .unwrap();

        let mut store = PassStore::new();
        let mut technique = Technique::new();
        let key = technique.create_pass(&mut store);
        let mut usage = GpuProgramUsage::new(GpuProgramType::Vertex);
        usage.set_program_name("Skin", &programs);
        store.get_mut(key).unwrap().set_program(ProgramSlot::Vertex, Some(usage));

        let no_vp = RenderCapabilities::default().without_capabilities(Capabilities::VERTEX_PROGRAM);
        assert!(matches!(
            compile(&mut technique, &mut store, &no_vp, &programs),
            Err(TechniqueUnsupported::ProgramUnsupported { slot: ProgramSlot::Vertex, .. })
        ));
        assert!(compile(&mut technique, &mut store, &RenderCapabilities::default(), &programs).is_ok());

        let mut usage = GpuProgramUsage::new(GpuProgramType::Vertex);
        usage.set_program_name("Missing", &programs);
        store.get_mut(key).unwrap().set_program(ProgramSlot::Vertex, Some(usage));
        assert!(matches!(
            compile(&mut technique, &mut store, &RenderCapabilities::default(), &programs),
            Err(TechniqueUnsupported::Program { .. })
        ));
    }

    #[test]
    fn test_fixed_function_capability_checks() {
        let programs = GpuProgramManager::new();
        let mut store = PassStore::new();
        let mut technique = Technique::new();
        let mut pass = Pass::new();
        let mut unit = TextureUnitState::new();
        unit.set_texture_name("env.dds", TextureType::CubeMap);
        pass.add_texture_unit(unit);
        technique.add_pass(&mut store, pass);

        let caps = RenderCapabilities::minimal(4);
        assert!(matches!(
            compile(&mut technique, &mut store, &caps, &programs),
            Err(TechniqueUnsupported::CubeMappingUnsupported { pass: 0, unit: 0 })
        ));

        let mut technique = Technique::new();
        let mut pass = Pass::new();
        let mut unit = TextureUnitState::with_texture("bump.png");
        unit.set_colour_operation_ex(LayerBlendOperationEx::DotProduct, LayerBlendSource::Texture, LayerBlendSource::Diffuse);
        pass.add_texture_unit(unit);
        technique.add_pass(&mut store, pass);
        assert!(matches!(
            compile(&mut technique, &mut store, &caps, &programs),
            Err(TechniqueUnsupported::Dot3Unsupported { .. })
        ));
        assert!(compile(&mut technique, &mut store, &caps.with_capabilities(Capabilities::DOT3), &programs).is_ok());
    }

    fn illumination(pass: Pass) -> (Technique, PassStore) {
        let mut store = PassStore::new();
        let mut technique = Technique::new();
        technique.add_pass(&mut store, pass);
        technique.compile_illumination_passes(&mut store);
        (technique, store)
    }

    #[test]
    fn test_unlit_pass_used_wholesale() {
        let mut pass = textured_pass(1);
        pass.set_lighting_enabled(false);
        let (technique, _) = illumination(pass);

        let stages = technique.illumination_passes();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].stage, IlluminationStage::Ambient);
        assert!(!stages[0].owns_pass);
        assert_eq!(stages[0].pass, technique.passes()[0]);
    }

    #[test]
    fn test_fully_black_pass_gets_colourless_ambient_only() {
        let mut pass = Pass::new();
        pass.set_ambient(ColourValue::BLACK);
        pass.set_diffuse(ColourValue::BLACK);
        let (technique, store) = illumination(pass);

        let stages = technique.illumination_passes();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].stage, IlluminationStage::Ambient);
        assert!(stages[0].owns_pass);
        assert!(!store.get(stages[0].pass).unwrap().colour_write());
    }

    #[test]
    fn test_black_ambient_lit_pass_has_no_ambient_stage() {
        let mut pass = Pass::new();
        pass.set_ambient(ColourValue::BLACK);
        pass.set_emissive(ColourValue::BLACK);
        pass.set_diffuse(ColourValue::WHITE);
        let (technique, _) = illumination(pass);

        let stages: Vec<IlluminationStage> = technique.illumination_passes().iter().map(|p| p.stage).collect();
        assert_eq!(stages, [IlluminationStage::PerLight]);
    }

    #[test]
    fn test_alpha_rejecting_pass_clones_drop_units() {
        let mut pass = textured_pass(2);
        pass.set_alpha_rejection(CompareFunction::GreaterEqual, 128);
        let (technique, store) = illumination(pass);

        let stages = technique.illumination_passes();
        assert_eq!(stages.len(), 3);
        for entry in &stages[..2] {
            let clone = store.get(entry.pass).unwrap();
            assert_eq!(clone.num_texture_units(), 0);
            assert_eq!(clone.alpha_rejection(), (CompareFunction::GreaterEqual, 128));
        }
        assert_eq!(store.get(stages[2].pass).unwrap().num_texture_units(), 2);
    }

    #[test]
    fn test_lit_textured_pass_splits_into_three_stages() {
        let mut pass = textured_pass(1);
        pass.set_specular(ColourValue::rgb(0.5, 0.5, 0.5));
        let (technique, store) = illumination(pass);

        let stages: Vec<IlluminationStage> = technique.illumination_passes().iter().map(|p| p.stage).collect();
        assert_eq!(
            stages,
            [IlluminationStage::Ambient, IlluminationStage::PerLight, IlluminationStage::Decal]
        );

        let ambient = store.get(technique.illumination_passes()[0].pass).unwrap();
        assert!(ambient.diffuse().is_black() && ambient.specular().is_black());
        assert_eq!(ambient.num_texture_units(), 0);

        let per_light = store.get(technique.illumination_passes()[1].pass).unwrap();
        assert!(per_light.ambient().is_black());
        assert_eq!(per_light.scene_blending(), (SceneBlendFactor::One, SceneBlendFactor::One));

        let decal = store.get(technique.illumination_passes()[2].pass).unwrap();
        assert!(!decal.lighting_enabled());
        assert_eq!(decal.scene_blending(), (SceneBlendFactor::DestColour, SceneBlendFactor::Zero));
        assert!(technique.illumination_passes().iter().all(|p| p.owns_pass));
    }

    #[test]
    fn test_per_light_pass_used_wholesale() {
        let mut store = PassStore::new();
        let mut technique = Technique::new();
        let mut ambient = Pass::new();
        ambient.set_diffuse(ColourValue::BLACK);
        technique.add_pass(&mut store, ambient);
        let mut lit = Pass::new();
        lit.set_ambient(ColourValue::BLACK);
        lit.set_iterate_per_light(true, None);
        technique.add_pass(&mut store, lit);

        technique.compile_illumination_passes(&mut store);
        let stages = technique.illumination_passes();
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[1].stage, IlluminationStage::PerLight);
        assert!(!stages[1].owns_pass);
    }

    #[test]
    fn test_transparent_technique_is_not_decomposed() {
        let mut pass = textured_pass(1);
        pass.set_scene_blending(SceneBlendFactor::SourceAlpha, SceneBlendFactor::OneMinusSourceAlpha);
        let (technique, _) = illumination(pass);
        assert!(technique.illumination_passes().is_empty());
    }

    #[test]
    fn test_clearing_queues_owned_clones() {
        let (mut technique, mut store) = illumination(textured_pass(1));
        let owned = technique.illumination_passes().iter().filter(|p| p.owns_pass).count();
        assert_eq!(owned, 3);

        technique.clear_illumination_passes(&mut store);
        assert_eq!(store.pending_deletions(), 3);
        store.process_pending_updates();
        assert_eq!(store.len(), 1);
    }
}
