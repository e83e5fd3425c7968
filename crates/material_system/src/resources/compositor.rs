//! Compositor definitions
//!
//! A compositor is a list of techniques, each declaring intermediate render
//! textures and the target passes that fill them. Execution belongs to a render
//! backend; this module only holds what scripts describe.

use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::foundation::collections::CompositorKey;
use crate::foundation::math::ColourValue;
use crate::material::CompareFunction;
use crate::resources::pixel_format::PixelFormat;
use crate::resources::registry::{Resource, ResourceError, ResourceRegistry};

/// Earliest render queue, used as the default first queue of a scene pass
pub const RENDER_QUEUE_BACKGROUND: u8 = 0;
/// Latest sky queue, used as the default last queue of a scene pass
pub const RENDER_QUEUE_SKIES_LATE: u8 = 95;

bitflags! {
    /// Frame buffers cleared by a clear pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameBuffers: u8 {
        /// Colour buffer
        const COLOUR = 1 << 0;
        /// Depth buffer
        const DEPTH = 1 << 1;
        /// Stencil buffer
        const STENCIL = 1 << 2;
    }
}

/// Stencil buffer operation
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StencilOperation {
    #[default]
    Keep,
    Zero,
    Replace,
    Increment,
    Decrement,
    IncrementWrap,
    DecrementWrap,
    Invert,
}

/// Stencil state of a stencil pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilState {
    /// Stencil test enabled
    pub check: bool,
    /// Comparison against the reference value
    pub func: CompareFunction,
    /// Reference value
    pub reference: u32,
    /// Comparison mask
    pub mask: u32,
    /// Operation when the stencil test fails
    pub fail_op: StencilOperation,
    /// Operation when the depth test fails
    pub depth_fail_op: StencilOperation,
    /// Operation when both tests pass
    pub pass_op: StencilOperation,
    /// Apply the inverse operations to back faces
    pub two_sided: bool,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            check: true,
            func: CompareFunction::AlwaysPass,
            reference: 0,
            mask: u32::MAX,
            fail_op: StencilOperation::Keep,
            depth_fail_op: StencilOperation::Keep,
            pass_op: StencilOperation::Keep,
            two_sided: false,
        }
    }
}

/// What a composition pass does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositionPassType {
    /// Clear frame buffers
    #[default]
    Clear,
    /// Set stencil state
    Stencil,
    /// Render the scene
    RenderScene,
    /// Render a full-screen quad with a material
    RenderQuad,
}

/// Texture input of a quad pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassInput {
    /// Local texture name
    pub texture: String,
    /// Attachment index for multi-render-target textures
    pub mrt_index: usize,
}

/// One pass of a target pass
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionPass {
    /// Pass kind
    pub pass_type: CompositionPassType,
    /// Quad material
    pub material_name: Option<String>,
    /// Inputs by texture unit index
    pub inputs: BTreeMap<usize, PassInput>,
    /// Identifier reported to listeners
    pub identifier: u32,
    /// First render queue of a scene pass
    pub first_render_queue: u8,
    /// Last render queue of a scene pass
    pub last_render_queue: u8,
    /// Buffers a clear pass clears
    pub clear_buffers: FrameBuffers,
    /// Clear colour
    pub clear_colour: ColourValue,
    /// Clear depth
    pub clear_depth: f32,
    /// Clear stencil
    pub clear_stencil: u32,
    /// Stencil state
    pub stencil: StencilState,
}

impl CompositionPass {
    /// Create a pass of the given kind
    pub fn new(pass_type: CompositionPassType) -> Self {
        Self {
            pass_type,
            material_name: None,
            inputs: BTreeMap::new(),
            identifier: 0,
            first_render_queue: RENDER_QUEUE_BACKGROUND,
            last_render_queue: RENDER_QUEUE_SKIES_LATE,
            clear_buffers: FrameBuffers::COLOUR | FrameBuffers::DEPTH,
            clear_colour: ColourValue::new(0.0, 0.0, 0.0, 0.0),
            clear_depth: 1.0,
            clear_stencil: 0,
            stencil: StencilState::default(),
        }
    }

    /// Bind a texture to an input slot
    pub fn set_input(&mut self, id: usize, texture: impl Into<String>, mrt_index: usize) {
        self.inputs.insert(
            id,
            PassInput {
                texture: texture.into(),
                mrt_index,
            },
        );
    }
}

/// How a target pass is initialised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetInputMode {
    /// Start from nothing
    #[default]
    None,
    /// Start from the previous compositor's output
    Previous,
}

/// Render target filled by a list of passes
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionTargetPass {
    /// Texture rendered into; empty for the output target
    pub output_name: String,
    /// Input mode
    pub input_mode: TargetInputMode,
    /// Render only on the first frame
    pub only_initial: bool,
    /// Scene visibility mask
    pub visibility_mask: u32,
    /// LOD bias
    pub lod_bias: f32,
    /// Material scheme
    pub material_scheme: String,
    /// Render shadows
    pub shadows: bool,
    passes: Vec<CompositionPass>,
}

impl CompositionTargetPass {
    /// Create a target pass writing to a local texture, or the output when empty
    pub fn new(output_name: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            input_mode: TargetInputMode::None,
            only_initial: false,
            visibility_mask: u32::MAX,
            lod_bias: 1.0,
            material_scheme: String::new(),
            shadows: true,
            passes: Vec::new(),
        }
    }

    /// Append a pass
    pub fn create_pass(&mut self, pass_type: CompositionPassType) -> &mut CompositionPass {
        self.passes.push(CompositionPass::new(pass_type));
        let last = self.passes.len() - 1;
        &mut self.passes[last]
    }

    /// Passes in order
    pub fn passes(&self) -> &[CompositionPass] {
        &self.passes
    }
}

/// Intermediate texture of a composition technique
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDefinition {
    /// Local name
    pub name: String,
    /// Fixed width, 0 when derived from the target
    pub width: u32,
    /// Fixed height, 0 when derived from the target
    pub height: u32,
    /// Target width multiplier
    pub width_factor: f32,
    /// Target height multiplier
    pub height_factor: f32,
    /// One format per render target attachment
    pub formats: Vec<PixelFormat>,
    /// Share the target's anti-aliasing
    pub fsaa: bool,
    /// Gamma-corrected writes
    pub hw_gamma_write: bool,
    /// Share between compositor instances
    pub pooled: bool,
}

impl TextureDefinition {
    /// Create a definition sized to the target
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: 0,
            height: 0,
            width_factor: 1.0,
            height_factor: 1.0,
            formats: Vec::new(),
            fsaa: true,
            hw_gamma_write: false,
            pooled: false,
        }
    }
}

/// One way of implementing a compositor
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositionTechnique {
    /// Scheme selecting among techniques
    pub scheme: String,
    /// Logical name
    pub compositor_logic: String,
    texture_definitions: Vec<TextureDefinition>,
    target_passes: Vec<CompositionTargetPass>,
    output_target: Option<CompositionTargetPass>,
}

impl CompositionTechnique {
    /// Declare a texture
    pub fn create_texture_definition(&mut self, name: impl Into<String>) -> &mut TextureDefinition {
        self.texture_definitions.push(TextureDefinition::new(name));
        let last = self.texture_definitions.len() - 1;
        &mut self.texture_definitions[last]
    }

    /// Declared textures
    pub fn texture_definitions(&self) -> &[TextureDefinition] {
        &self.texture_definitions
    }

    /// Find a declared texture
    pub fn texture_definition(&self, name: &str) -> Option<&TextureDefinition> {
        self.texture_definitions.iter().find(|def| def.name == name)
    }

    /// Append a target pass
    pub fn create_target_pass(&mut self, output_name: impl Into<String>) -> &mut CompositionTargetPass {
        self.target_passes.push(CompositionTargetPass::new(output_name));
        let last = self.target_passes.len() - 1;
        &mut self.target_passes[last]
    }

    /// Intermediate target passes
    pub fn target_passes(&self) -> &[CompositionTargetPass] {
        &self.target_passes
    }

    /// Output target pass, created on first access
    pub fn output_target_pass_mut(&mut self) -> &mut CompositionTargetPass {
        self.output_target.get_or_insert_with(|| CompositionTargetPass::new(""))
    }

    /// Output target pass
    pub fn output_target_pass(&self) -> Option<&CompositionTargetPass> {
        self.output_target.as_ref()
    }
}

/// Named compositor
#[derive(Debug, Clone, PartialEq)]
pub struct Compositor {
    name: String,
    techniques: Vec<CompositionTechnique>,
}

impl Resource for Compositor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Compositor {
    /// Create an empty compositor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            techniques: Vec::new(),
        }
    }

    /// Compositor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a technique
    pub fn create_technique(&mut self) -> &mut CompositionTechnique {
        self.techniques.push(CompositionTechnique::default());
        let last = self.techniques.len() - 1;
        &mut self.techniques[last]
    }

    /// Techniques in order
    pub fn techniques(&self) -> &[CompositionTechnique] {
        &self.techniques
    }

    /// Drop all techniques
    pub fn remove_all_techniques(&mut self) {
        self.techniques.clear();
    }
}

/// Registry of compositors
#[derive(Debug, Clone)]
pub struct CompositorManager {
    registry: ResourceRegistry<CompositorKey, Compositor>,
}

impl Default for CompositorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositorManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            registry: ResourceRegistry::new("compositor"),
        }
    }

    /// Create a compositor, failing if the name is taken
    pub fn create(&mut self, name: &str, group: &str) -> Result<CompositorKey, ResourceError> {
        self.registry.create(group, Compositor::new(name))
    }

    /// Look up by name
    pub fn get_by_name(&self, name: &str) -> Option<CompositorKey> {
        self.registry.get_by_name(name)
    }

    /// Borrow a compositor by name
    pub fn find(&self, name: &str) -> Option<&Compositor> {
        self.get_by_name(name).and_then(|key| self.registry.get(key))
    }

    /// Borrow a compositor
    pub fn get(&self, key: CompositorKey) -> Option<&Compositor> {
        self.registry.get(key)
    }

    /// Mutably borrow a compositor
    pub fn get_mut(&mut self, key: CompositorKey) -> Option<&mut Compositor> {
        self.registry.get_mut(key)
    }

    /// Group that defined a compositor
    pub fn group(&self, key: CompositorKey) -> Option<&str> {
        self.registry.group(key)
    }

    /// Discard a compositor's techniques and move it to another group
    pub fn reset(&mut self, key: CompositorKey, group: &str) {
        if let Some(compositor) = self.registry.get_mut(key) {
            compositor.remove_all_techniques();
        }
        self.registry.set_group(key, group);
    }

    /// Number of compositors
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True when no compositors exist
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Iterate over compositors
    pub fn iter(&self) -> impl Iterator<Item = (CompositorKey, &Compositor)> {
        self.registry.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_defaults() {
        let pass = CompositionPass::new(CompositionPassType::Clear);
        assert_eq!(pass.clear_buffers, FrameBuffers::COLOUR | FrameBuffers::DEPTH);
        assert_eq!(pass.last_render_queue, RENDER_QUEUE_SKIES_LATE);
        assert_eq!(pass.stencil.mask, u32::MAX);
    }

    #[test]
    fn test_output_target_created_once() {
        let mut technique = CompositionTechnique::default();
        technique.output_target_pass_mut().create_pass(CompositionPassType::RenderQuad);
        technique.output_target_pass_mut().create_pass(CompositionPassType::Clear);
        assert_eq!(technique.output_target_pass().map(|t| t.passes().len()), Some(2));
    }

    #[test]
    fn test_manager_reset_clears_techniques() {
        let mut manager = CompositorManager::new();
        let key = manager.create("Bloom", "General").unwrap();
        manager.get_mut(key).unwrap().create_technique().create_texture_definition("rt0");
        assert!(manager.create("Bloom", "Other").is_err());

        manager.reset(key, "Other");
        assert!(manager.get(key).unwrap().techniques().is_empty());
        assert_eq!(manager.group(key), Some("Other"));
    }
}
