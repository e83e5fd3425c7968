//! Pass render state
//!
//! A pass is one draw submission: surface colours, blending, depth and culling
//! state, lighting iteration, fog, point sprites, texture units and programs.
//! Passes live in a [`super::PassStore`] arena and carry a packed sort hash.

use crate::foundation::collections::MaterialKey;
use crate::foundation::math::ColourValue;
use crate::material::program_usage::GpuProgramUsage;
use crate::material::texture_unit::TextureUnitState;
use crate::material::types::{
    CompareFunction, CullingMode, FogMode, IlluminationStage,
    LightType, ManualCullingMode, PolygonMode, SceneBlendFactor, SceneBlendOperation, SceneBlendType,
    ShadeOptions, TrackVertexColour,
};
use crate::resources::GpuProgramType;

/// Program slots of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramSlot {
    /// Vertex program
    Vertex,
    /// Fragment program
    Fragment,
    /// Geometry program
    Geometry,
    /// Vertex program used when rendering shadow casters
    ShadowCasterVertex,
    /// Vertex program used when rendering shadow receivers
    ShadowReceiverVertex,
    /// Fragment program used when rendering shadow receivers
    ShadowReceiverFragment,
}

impl ProgramSlot {
    /// Every slot in storage order
    pub const ALL: [ProgramSlot; 6] = [
        ProgramSlot::Vertex,
        ProgramSlot::Fragment,
        ProgramSlot::Geometry,
        ProgramSlot::ShadowCasterVertex,
        ProgramSlot::ShadowReceiverVertex,
        ProgramSlot::ShadowReceiverFragment,
    ];

    /// Program stage accepted by the slot
    pub fn program_type(self) -> GpuProgramType {
        match self {
            ProgramSlot::Vertex | ProgramSlot::ShadowCasterVertex | ProgramSlot::ShadowReceiverVertex => {
                GpuProgramType::Vertex
            }
            ProgramSlot::Fragment | ProgramSlot::ShadowReceiverFragment => GpuProgramType::Fragment,
            ProgramSlot::Geometry => GpuProgramType::Geometry,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Owner of a pass, used for diagnostics and upward lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassParent {
    /// Owning material, when attached to one
    pub material: Option<MaterialKey>,
    /// Index of the owning technique within the material
    pub technique: usize,
}

/// Depth bias settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DepthBias {
    /// Constant bias
    pub constant: f32,
    /// Bias scaled by slope
    pub slope_scale: f32,
    /// Extra bias added per pass iteration
    pub per_iteration: f32,
}

/// Fog settings that override the scene fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogSettings {
    /// Override the scene fog at all
    pub enabled: bool,
    /// Falloff mode
    pub mode: FogMode,
    /// Fog colour
    pub colour: ColourValue,
    /// Exponential density
    pub density: f32,
    /// Linear start distance
    pub start: f32,
    /// Linear end distance
    pub end: f32,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: FogMode::None,
            colour: ColourValue::WHITE,
            density: 0.001,
            start: 0.0,
            end: 1.0,
        }
    }
}

/// Point sprite settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSettings {
    /// Point size
    pub size: f32,
    /// Render points as sprites
    pub sprites: bool,
    /// Attenuate size with distance
    pub attenuation: bool,
    /// Constant, linear and quadratic attenuation
    pub attenuation_coefficients: [f32; 3],
    /// Minimum attenuated size
    pub min_size: f32,
    /// Maximum attenuated size, zero for hardware limit
    pub max_size: f32,
}

impl Default for PointSettings {
    fn default() -> Self {
        Self {
            size: 1.0,
            sprites: false,
            attenuation: false,
            attenuation_coefficients: [1.0, 0.0, 0.0],
            min_size: 0.0,
            max_size: 0.0,
        }
    }
}

/// Per-light iteration settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightIteration {
    /// Repeat the pass for each light
    pub per_light: bool,
    /// Lights handled by each repetition
    pub lights_per_iteration: u16,
    /// Restrict iteration to one light type
    pub only_light_type: Option<LightType>,
    /// Plain repetition count when not iterating per light
    pub count: u32,
}

impl Default for LightIteration {
    fn default() -> Self {
        Self {
            per_light: false,
            lights_per_iteration: 1,
            only_light_type: None,
            count: 1,
        }
    }
}

/// A single rendering pass
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    name: String,
    index: usize,
    parent: PassParent,
    hash: u32,

    ambient: ColourValue,
    diffuse: ColourValue,
    specular: ColourValue,
    emissive: ColourValue,
    shininess: f32,
    tracking: TrackVertexColour,

    source_blend: SceneBlendFactor,
    dest_blend: SceneBlendFactor,
    source_blend_alpha: SceneBlendFactor,
    dest_blend_alpha: SceneBlendFactor,
    separate_blend: bool,
    blend_operation: SceneBlendOperation,
    alpha_blend_operation: SceneBlendOperation,
    separate_blend_operation: bool,

    depth_check: bool,
    depth_write: bool,
    depth_func: CompareFunction,
    depth_bias: DepthBias,
    alpha_reject_func: CompareFunction,
    alpha_reject_value: u8,
    alpha_to_coverage: bool,
    transparent_sorting: bool,
    colour_write: bool,

    cull_mode: CullingMode,
    manual_cull_mode: ManualCullingMode,

    lighting: bool,
    max_lights: u16,
    start_light: u16,
    iteration: LightIteration,
    shading: ShadeOptions,
    polygon_mode: PolygonMode,
    polygon_mode_overrideable: bool,
    normalise_normals: bool,
    light_scissor: bool,
    light_clip_planes: bool,
    illumination_stage: IlluminationStage,
    fog: FogSettings,
    point: PointSettings,

    texture_units: Vec<TextureUnitState>,
    programs: [Option<GpuProgramUsage>; 6],
}

impl Default for Pass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass {
    /// Create a pass with default render state
    pub fn new() -> Self {
        Self {
            name: String::new(),
            index: 0,
            parent: PassParent::default(),
            hash: 0,
            ambient: ColourValue::WHITE,
            diffuse: ColourValue::WHITE,
            specular: ColourValue::BLACK,
            emissive: ColourValue::BLACK,
            shininess: 0.0,
            tracking: TrackVertexColour::empty(),
            source_blend: SceneBlendFactor::One,
            dest_blend: SceneBlendFactor::Zero,
            source_blend_alpha: SceneBlendFactor::One,
            dest_blend_alpha: SceneBlendFactor::Zero,
            separate_blend: false,
            blend_operation: SceneBlendOperation::Add,
            alpha_blend_operation: SceneBlendOperation::Add,
            separate_blend_operation: false,
            depth_check: true,
            depth_write: true,
            depth_func: CompareFunction::LessEqual,
            depth_bias: DepthBias::default(),
            alpha_reject_func: CompareFunction::AlwaysPass,
            alpha_reject_value: 0,
            alpha_to_coverage: false,
            transparent_sorting: true,
            colour_write: true,
            cull_mode: CullingMode::Clockwise,
            manual_cull_mode: ManualCullingMode::Back,
            lighting: true,
            max_lights: 8,
            start_light: 0,
            iteration: LightIteration::default(),
            shading: ShadeOptions::Gouraud,
            polygon_mode: PolygonMode::Solid,
            polygon_mode_overrideable: true,
            normalise_normals: false,
            light_scissor: false,
            light_clip_planes: false,
            illumination_stage: IlluminationStage::Unknown,
            fog: FogSettings::default(),
            point: PointSettings::default(),
            texture_units: Vec::new(),
            programs: Default::default(),
        }
    }

    /// Optional pass name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the pass name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Position within the owning technique
    pub fn index(&self) -> usize {
        self.index
    }

    /// Update the position within the owning technique
    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Owner of the pass
    pub fn parent(&self) -> PassParent {
        self.parent
    }

    /// Attach the pass to an owner
    pub fn set_parent(&mut self, parent: PassParent) {
        self.parent = parent;
    }

    /// Sort hash as of the last batch update
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Recompute the packed sort hash
    ///
    /// Bits 28..32 hold the pass index, bits 14..28 a hash of unit 0's texture
    /// name and bits 0..14 a hash of unit 1's. Later units are not considered.
    pub fn recalculate_hash(&mut self) {
        let unit_hash = |unit: Option<&TextureUnitState>| -> u32 {
            match unit.map(TextureUnitState::texture_name) {
                Some(name) if !name.is_empty() => fnv1a(name) % (1 << 14),
                _ => 0,
            }
        };

        let index = (self.index as u32 & 0xF) << 28;
        self.hash = index | (unit_hash(self.texture_units.first()) << 14) | unit_hash(self.texture_units.get(1));
    }

    /// Ambient reflectance
    pub fn ambient(&self) -> ColourValue {
        self.ambient
    }

    /// Set ambient reflectance
    pub fn set_ambient(&mut self, colour: ColourValue) {
        self.ambient = colour;
    }

    /// Diffuse reflectance
    pub fn diffuse(&self) -> ColourValue {
        self.diffuse
    }

    /// Set diffuse reflectance
    pub fn set_diffuse(&mut self, colour: ColourValue) {
        self.diffuse = colour;
    }

    /// Specular reflectance
    pub fn specular(&self) -> ColourValue {
        self.specular
    }

    /// Set specular reflectance
    pub fn set_specular(&mut self, colour: ColourValue) {
        self.specular = colour;
    }

    /// Self illumination
    pub fn emissive(&self) -> ColourValue {
        self.emissive
    }

    /// Set self illumination
    pub fn set_emissive(&mut self, colour: ColourValue) {
        self.emissive = colour;
    }

    /// Specular exponent
    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    /// Set the specular exponent
    pub fn set_shininess(&mut self, shininess: f32) {
        self.shininess = shininess;
    }

    /// Channels following the vertex colour
    pub fn vertex_colour_tracking(&self) -> TrackVertexColour {
        self.tracking
    }

    /// Set or clear vertex colour tracking for some channels
    pub fn set_vertex_colour_tracking(&mut self, channels: TrackVertexColour, enabled: bool) {
        self.tracking.set(channels, enabled);
    }

    /// Apply a blend preset
    pub fn set_scene_blend_type(&mut self, blend: SceneBlendType) {
        let (src, dest) = blend.factors();
        self.set_scene_blending(src, dest);
    }

    /// Set colour and alpha blending to the same factors
    pub fn set_scene_blending(&mut self, src: SceneBlendFactor, dest: SceneBlendFactor) {
        self.source_blend = src;
        self.dest_blend = dest;
        self.source_blend_alpha = src;
        self.dest_blend_alpha = dest;
        self.separate_blend = false;
    }

    /// Set distinct colour and alpha blend factors
    pub fn set_separate_scene_blending(
        &mut self,
        src: SceneBlendFactor,
        dest: SceneBlendFactor,
        src_alpha: SceneBlendFactor,
        dest_alpha: SceneBlendFactor,
    ) {
        self.source_blend = src;
        self.dest_blend = dest;
        self.source_blend_alpha = src_alpha;
        self.dest_blend_alpha = dest_alpha;
        self.separate_blend = true;
    }

    /// Colour blend factors
    pub fn scene_blending(&self) -> (SceneBlendFactor, SceneBlendFactor) {
        (self.source_blend, self.dest_blend)
    }

    /// Alpha blend factors
    pub fn scene_blending_alpha(&self) -> (SceneBlendFactor, SceneBlendFactor) {
        (self.source_blend_alpha, self.dest_blend_alpha)
    }

    /// True when alpha uses its own factors
    pub fn has_separate_scene_blending(&self) -> bool {
        self.separate_blend
    }

    /// Set the blend operation for colour and alpha
    pub fn set_scene_blending_operation(&mut self, op: SceneBlendOperation) {
        self.blend_operation = op;
        self.alpha_blend_operation = op;
        self.separate_blend_operation = false;
    }

    /// Set distinct colour and alpha blend operations
    pub fn set_separate_scene_blending_operation(&mut self, op: SceneBlendOperation, alpha_op: SceneBlendOperation) {
        self.blend_operation = op;
        self.alpha_blend_operation = alpha_op;
        self.separate_blend_operation = true;
    }

    /// Colour and alpha blend operations
    pub fn scene_blending_operation(&self) -> (SceneBlendOperation, SceneBlendOperation) {
        (self.blend_operation, self.alpha_blend_operation)
    }

    /// Depth test enabled
    pub fn depth_check(&self) -> bool {
        self.depth_check
    }

    /// Enable the depth test
    pub fn set_depth_check(&mut self, enabled: bool) {
        self.depth_check = enabled;
    }

    /// Depth write enabled
    pub fn depth_write(&self) -> bool {
        self.depth_write
    }

    /// Enable depth writes
    pub fn set_depth_write(&mut self, enabled: bool) {
        self.depth_write = enabled;
    }

    /// Depth comparison
    pub fn depth_function(&self) -> CompareFunction {
        self.depth_func
    }

    /// Set the depth comparison
    pub fn set_depth_function(&mut self, func: CompareFunction) {
        self.depth_func = func;
    }

    /// Depth bias
    pub fn depth_bias(&self) -> DepthBias {
        self.depth_bias
    }

    /// Set constant and slope scaled depth bias
    pub fn set_depth_bias(&mut self, constant: f32, slope_scale: f32) {
        self.depth_bias.constant = constant;
        self.depth_bias.slope_scale = slope_scale;
    }

    /// Set bias added for each iteration
    pub fn set_iteration_depth_bias(&mut self, bias: f32) {
        self.depth_bias.per_iteration = bias;
    }

    /// Alpha rejection test
    pub fn alpha_rejection(&self) -> (CompareFunction, u8) {
        (self.alpha_reject_func, self.alpha_reject_value)
    }

    /// Set the alpha rejection test
    pub fn set_alpha_rejection(&mut self, func: CompareFunction, value: u8) {
        self.alpha_reject_func = func;
        self.alpha_reject_value = value;
    }

    /// Alpha to coverage enabled
    pub fn alpha_to_coverage(&self) -> bool {
        self.alpha_to_coverage
    }

    /// Enable alpha to coverage
    pub fn set_alpha_to_coverage(&mut self, enabled: bool) {
        self.alpha_to_coverage = enabled;
    }

    /// Whether transparent geometry using this pass is depth sorted
    pub fn transparent_sorting(&self) -> bool {
        self.transparent_sorting
    }

    /// Enable depth sorting of transparent geometry
    pub fn set_transparent_sorting(&mut self, enabled: bool) {
        self.transparent_sorting = enabled;
    }

    /// Colour writes enabled
    pub fn colour_write(&self) -> bool {
        self.colour_write
    }

    /// Enable colour writes
    pub fn set_colour_write(&mut self, enabled: bool) {
        self.colour_write = enabled;
    }

    /// Hardware culling mode
    pub fn culling_mode(&self) -> CullingMode {
        self.cull_mode
    }

    /// Set hardware culling
    pub fn set_culling_mode(&mut self, mode: CullingMode) {
        self.cull_mode = mode;
    }

    /// Software culling mode
    pub fn manual_culling_mode(&self) -> ManualCullingMode {
        self.manual_cull_mode
    }

    /// Set software culling
    pub fn set_manual_culling_mode(&mut self, mode: ManualCullingMode) {
        self.manual_cull_mode = mode;
    }

    /// Dynamic lighting enabled
    pub fn lighting_enabled(&self) -> bool {
        self.lighting
    }

    /// Enable dynamic lighting
    pub fn set_lighting_enabled(&mut self, enabled: bool) {
        self.lighting = enabled;
    }

    /// Maximum lights considered
    pub fn max_simultaneous_lights(&self) -> u16 {
        self.max_lights
    }

    /// Set the maximum lights considered
    pub fn set_max_simultaneous_lights(&mut self, count: u16) {
        self.max_lights = count;
    }

    /// First light considered
    pub fn start_light(&self) -> u16 {
        self.start_light
    }

    /// Set the first light considered
    pub fn set_start_light(&mut self, light: u16) {
        self.start_light = light;
    }

    /// Iteration settings
    pub fn iteration(&self) -> LightIteration {
        self.iteration
    }

    /// Repeat the pass per light, optionally for one light type only
    pub fn set_iterate_per_light(&mut self, enabled: bool, only_light_type: Option<LightType>) {
        self.iteration.per_light = enabled;
        self.iteration.only_light_type = only_light_type;
    }

    /// Lights handled by each per-light repetition
    pub fn set_light_count_per_iteration(&mut self, count: u16) {
        self.iteration.lights_per_iteration = count;
    }

    /// Plain repetition count
    pub fn set_pass_iteration_count(&mut self, count: u32) {
        self.iteration.count = count;
    }

    /// True when the pass runs once per light
    pub fn iterate_per_light(&self) -> bool {
        self.iteration.per_light
    }

    /// Shading mode
    pub fn shading_mode(&self) -> ShadeOptions {
        self.shading
    }

    /// Set the shading mode
    pub fn set_shading_mode(&mut self, mode: ShadeOptions) {
        self.shading = mode;
    }

    /// Polygon mode
    pub fn polygon_mode(&self) -> PolygonMode {
        self.polygon_mode
    }

    /// Set the polygon mode
    pub fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.polygon_mode = mode;
    }

    /// Whether the camera may override the polygon mode
    pub fn polygon_mode_overrideable(&self) -> bool {
        self.polygon_mode_overrideable
    }

    /// Allow the camera to override the polygon mode
    pub fn set_polygon_mode_overrideable(&mut self, enabled: bool) {
        self.polygon_mode_overrideable = enabled;
    }

    /// Normals renormalised after transform
    pub fn normalise_normals(&self) -> bool {
        self.normalise_normals
    }

    /// Renormalise normals after transform
    pub fn set_normalise_normals(&mut self, enabled: bool) {
        self.normalise_normals = enabled;
    }

    /// Scissor rendering to each light's extent
    pub fn light_scissoring(&self) -> bool {
        self.light_scissor
    }

    /// Enable light scissoring
    pub fn set_light_scissoring(&mut self, enabled: bool) {
        self.light_scissor = enabled;
    }

    /// Clip rendering to each light's volume
    pub fn light_clip_planes(&self) -> bool {
        self.light_clip_planes
    }

    /// Enable light clip planes
    pub fn set_light_clip_planes(&mut self, enabled: bool) {
        self.light_clip_planes = enabled;
    }

    /// Manual illumination stage
    pub fn illumination_stage(&self) -> IlluminationStage {
        self.illumination_stage
    }

    /// Assign the illumination stage manually
    pub fn set_illumination_stage(&mut self, stage: IlluminationStage) {
        self.illumination_stage = stage;
    }

    /// Fog override
    pub fn fog(&self) -> FogSettings {
        self.fog
    }

    /// Set the fog override
    pub fn set_fog(&mut self, fog: FogSettings) {
        self.fog = fog;
    }

    /// Point sprite settings
    pub fn point(&self) -> PointSettings {
        self.point
    }

    /// Mutable point sprite settings
    pub fn point_mut(&mut self) -> &mut PointSettings {
        &mut self.point
    }

    /// Append a texture unit
    pub fn add_texture_unit(&mut self, unit: TextureUnitState) -> usize {
        self.texture_units.push(unit);
        self.texture_units.len() - 1
    }

    /// Texture units in order
    pub fn texture_units(&self) -> &[TextureUnitState] {
        &self.texture_units
    }

    /// Borrow a texture unit
    pub fn texture_unit(&self, index: usize) -> Option<&TextureUnitState> {
        self.texture_units.get(index)
    }

    /// Mutably borrow a texture unit
    pub fn texture_unit_mut(&mut self, index: usize) -> Option<&mut TextureUnitState> {
        self.texture_units.get_mut(index)
    }

    /// Iterate mutably over texture units
    pub fn texture_units_mut(&mut self) -> impl Iterator<Item = &mut TextureUnitState> {
        self.texture_units.iter_mut()
    }

    /// Number of texture units
    pub fn num_texture_units(&self) -> usize {
        self.texture_units.len()
    }

    /// Remove every texture unit
    pub fn remove_all_texture_units(&mut self) {
        self.texture_units.clear();
    }

    /// Detach the units from `keep` onwards, leaving the first `keep` in place
    pub fn split_off_texture_units(&mut self, keep: usize) -> Vec<TextureUnitState> {
        if keep >= self.texture_units.len() {
            return Vec::new();
        }
        self.texture_units.split_off(keep)
    }

    /// Program bound to a slot
    pub fn program(&self, slot: ProgramSlot) -> Option<&GpuProgramUsage> {
        self.programs[slot.index()].as_ref()
    }

    /// Mutable program binding
    pub fn program_mut(&mut self, slot: ProgramSlot) -> Option<&mut GpuProgramUsage> {
        self.programs[slot.index()].as_mut()
    }

    /// Bind or clear a slot
    pub fn set_program(&mut self, slot: ProgramSlot, usage: Option<GpuProgramUsage>) {
        self.programs[slot.index()] = usage;
    }

    /// Bound programs with their slots
    pub fn programs_mut(&mut self) -> impl Iterator<Item = (ProgramSlot, &mut GpuProgramUsage)> {
        ProgramSlot::ALL
            .into_iter()
            .zip(self.programs.iter_mut())
            .filter_map(|(slot, usage)| usage.as_mut().map(|usage| (slot, usage)))
    }

    /// True when a vertex program is bound
    pub fn has_vertex_program(&self) -> bool {
        self.program(ProgramSlot::Vertex).is_some()
    }

    /// True when a fragment program is bound
    pub fn has_fragment_program(&self) -> bool {
        self.program(ProgramSlot::Fragment).is_some()
    }

    /// True when a geometry program is bound
    pub fn has_geometry_program(&self) -> bool {
        self.program(ProgramSlot::Geometry).is_some()
    }

    /// True when programmable in any stage
    pub fn is_programmable(&self) -> bool {
        self.has_vertex_program() || self.has_fragment_program() || self.has_geometry_program()
    }

    /// True when the pass contributes no diffuse or specular lighting
    pub fn is_ambient_only(&self) -> bool {
        !self.lighting || !self.colour_write || (self.diffuse.is_black() && self.specular.is_black())
    }

    /// True when the destination colour takes part in blending
    pub fn is_transparent(&self) -> bool {
        self.dest_blend != SceneBlendFactor::Zero
    }

    /// Copy used as the ambient stage of illumination splitting
    pub(crate) fn ambient_stage_clone(&self) -> Self {
        let mut pass = self.stripped_clone();
        pass.diffuse = ColourValue::BLACK;
        pass.specular = ColourValue::BLACK;
        if pass.ambient.is_black() && pass.emissive.is_black() {
            pass.colour_write = false;
        }
        pass
    }

    /// Copy used as the per-light stage of illumination splitting
    pub(crate) fn per_light_stage_clone(&self) -> Self {
        let mut pass = self.stripped_clone();
        pass.ambient = ColourValue::BLACK;
        pass.emissive = ColourValue::BLACK;
        pass.set_scene_blending(SceneBlendFactor::One, SceneBlendFactor::One);
        pass
    }

    /// Copy used as the decal stage of illumination splitting
    pub(crate) fn decal_stage_clone(&self) -> Self {
        let mut pass = self.clone();
        pass.ambient = ColourValue::BLACK;
        pass.diffuse = ColourValue::BLACK;
        pass.specular = ColourValue::BLACK;
        pass.emissive = ColourValue::BLACK;
        pass.lighting = false;
        pass.set_iterate_per_light(false, None);
        pass.set_scene_blending(SceneBlendFactor::DestColour, SceneBlendFactor::Zero);
        pass
    }

    fn stripped_clone(&self) -> Self {
        let mut pass = self.clone();
        pass.texture_units.clear();
        pass.set_program(ProgramSlot::Fragment, None);
        pass
    }
}

/// 32-bit FNV-1a string hash
pub(crate) fn fnv1a(text: &str) -> u32 {
    text.bytes()
        .fold(0x811c_9dc5_u32, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let pass = Pass::new();
        assert_eq!(pass.ambient(), ColourValue::WHITE);
        assert_eq!(pass.diffuse(), ColourValue::WHITE);
        assert_eq!(pass.specular(), ColourValue::BLACK);
        assert_eq!(pass.scene_blending(), (SceneBlendFactor::One, SceneBlendFactor::Zero));
        assert_eq!(pass.depth_function(), CompareFunction::LessEqual);
        assert_eq!(pass.culling_mode(), CullingMode::Clockwise);
        assert_eq!(pass.manual_culling_mode(), ManualCullingMode::Back);
        assert_eq!(pass.max_simultaneous_lights(), 8);
        assert!(pass.lighting_enabled());
        assert!(!pass.is_transparent());
        assert!(!pass.is_ambient_only());
    }

    #[test]
    fn test_hash_layout() {
        let mut pass = Pass::new();
        pass.set_index(3);
        pass.add_texture_unit(TextureUnitState::with_texture("a.png"));
        pass.add_texture_unit(TextureUnitState::with_texture("b.png"));
        pass.recalculate_hash();

        let expected = (3 << 28) | ((fnv1a("a.png") % (1 << 14)) << 14) | (fnv1a("b.png") % (1 << 14));
        assert_eq!(pass.hash(), expected);
    }

    #[test]
    fn test_hash_ignores_third_unit() {
        let mut pass = Pass::new();
        pass.add_texture_unit(TextureUnitState::with_texture("a.png"));
        pass.add_texture_unit(TextureUnitState::with_texture("b.png"));
        pass.add_texture_unit(TextureUnitState::with_texture("c.png"));
        pass.recalculate_hash();
        let before = pass.hash();

        pass.texture_unit_mut(2).unwrap().set_texture_name("d.png", crate::material::TextureType::TwoD);
        pass.recalculate_hash();
        assert_eq!(pass.hash(), before);
    }

    #[test]
    fn test_hash_blank_units_contribute_zero() {
        let mut pass = Pass::new();
        pass.set_index(1);
        pass.add_texture_unit(TextureUnitState::new());
        pass.recalculate_hash();
        assert_eq!(pass.hash(), 1 << 28);
    }

    #[test]
    fn test_ambient_only_classification() {
        let mut pass = Pass::new();
        pass.set_lighting_enabled(false);
        assert!(pass.is_ambient_only());

        let mut pass = Pass::new();
        pass.set_diffuse(ColourValue::BLACK);
        assert!(pass.is_ambient_only());

        let mut pass = Pass::new();
        pass.set_colour_write(false);
        assert!(pass.is_ambient_only());
    }

    #[test]
    fn test_split_off_keeps_lowest_units() {
        let mut pass = Pass::new();
        for name in ["0", "1", "2", "3"] {
            pass.add_texture_unit(TextureUnitState::with_texture(name));
        }
        let moved = pass.split_off_texture_units(3);
        assert_eq!(pass.num_texture_units(), 3);
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].texture_name(), "3");
        assert!(pass.split_off_texture_units(5).is_empty());
    }

    #[test]
    fn test_stage_clones() {
        let mut pass = Pass::new();
        pass.set_ambient(ColourValue::BLACK);
        pass.add_texture_unit(TextureUnitState::with_texture("t.png"));

        let ambient = pass.ambient_stage_clone();
        assert!(!ambient.colour_write());
        assert_eq!(ambient.num_texture_units(), 0);

        let per_light = pass.per_light_stage_clone();
        assert_eq!(per_light.scene_blending(), (SceneBlendFactor::One, SceneBlendFactor::One));
        assert_eq!(per_light.num_texture_units(), 0);

        let decal = pass.decal_stage_clone();
        assert!(!decal.lighting_enabled());
        assert_eq!(decal.num_texture_units(), 1);
        assert_eq!(decal.scene_blending(), (SceneBlendFactor::DestColour, SceneBlendFactor::Zero));
    }
}
