//! Texture unit state
//!
//! One sampling stage of a pass: texture names, addressing, filtering, layer
//! blending and texture coordinate animation.

use std::collections::BTreeMap;

use crate::foundation::math::{ColourValue, Mat4};
use crate::material::types::{
    BindingType, ContentType, EnvMapType, FilterOptions, LayerBlendOperation, LayerBlendOperationEx,
    LayerBlendSource, LayerBlendType, SceneBlendFactor, TextureAddressingMode, TextureFilterOptions,
    TextureTransformType, TextureType, UvwAddressingMode, WaveformType,
};
use crate::resources::PixelFormat;

/// Suffixes of the six faces of a cube map given as separate textures
pub const CUBE_FACE_SUFFIXES: [&str; 6] = ["_fr", "_bk", "_lf", "_rt", "_up", "_dn"];

/// Full description of how a texture layer combines with the layers before it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerBlendModeEx {
    /// Colour or alpha channel
    pub blend_type: LayerBlendType,
    /// Combining operation
    pub operation: LayerBlendOperationEx,
    /// First input
    pub source1: LayerBlendSource,
    /// Second input
    pub source2: LayerBlendSource,
    /// Manual colour used when `source1` is manual
    pub colour_arg1: ColourValue,
    /// Manual colour used when `source2` is manual
    pub colour_arg2: ColourValue,
    /// Manual alpha used when `source1` is manual
    pub alpha_arg1: f32,
    /// Manual alpha used when `source2` is manual
    pub alpha_arg2: f32,
    /// Blend factor for [`LayerBlendOperationEx::BlendManual`]
    pub factor: f32,
}

impl LayerBlendModeEx {
    fn modulate(blend_type: LayerBlendType) -> Self {
        Self {
            blend_type,
            operation: LayerBlendOperationEx::Modulate,
            source1: LayerBlendSource::Texture,
            source2: LayerBlendSource::Current,
            colour_arg1: ColourValue::WHITE,
            colour_arg2: ColourValue::WHITE,
            alpha_arg1: 1.0,
            alpha_arg2: 1.0,
            factor: 0.0,
        }
    }
}

/// Animated texture coordinate effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureEffect {
    /// Generated coordinates
    EnvironmentMap(EnvMapType),
    /// Scroll both axes at the same speed
    UvScroll {
        /// Units per second
        speed: f32,
    },
    /// Scroll the u axis
    UScroll {
        /// Units per second
        speed: f32,
    },
    /// Scroll the v axis
    VScroll {
        /// Units per second
        speed: f32,
    },
    /// Rotate around the texture centre
    Rotate {
        /// Turns per second
        speed: f32,
    },
    /// Waveform driven transform component
    Transform {
        /// Component being animated
        transform: TextureTransformType,
        /// Wave shape
        waveform: WaveformType,
        /// Wave base value
        base: f32,
        /// Cycles per second
        frequency: f32,
        /// Offset into the cycle
        phase: f32,
        /// Wave amplitude
        amplitude: f32,
    },
}

/// One texture sampling stage of a pass
#[derive(Debug, Clone, PartialEq)]
pub struct TextureUnitState {
    name: String,
    texture_alias: String,
    frames: Vec<String>,
    current_frame: usize,
    animation_duration: f32,
    cubic: bool,
    texture_type: TextureType,
    num_mipmaps: Option<u32>,
    is_alpha: bool,
    desired_format: PixelFormat,
    hardware_gamma: bool,
    tex_coord_set: u32,
    address_mode: UvwAddressingMode,
    border_colour: ColourValue,
    min_filter: FilterOptions,
    mag_filter: FilterOptions,
    mip_filter: FilterOptions,
    max_anisotropy: u32,
    mipmap_bias: f32,
    colour_blend: LayerBlendModeEx,
    alpha_blend: LayerBlendModeEx,
    colour_fallback_src: SceneBlendFactor,
    colour_fallback_dest: SceneBlendFactor,
    u_scroll: f32,
    v_scroll: f32,
    u_scale: f32,
    v_scale: f32,
    rotate: f32,
    manual_transform: Option<Mat4>,
    effects: Vec<TextureEffect>,
    binding_type: BindingType,
    content_type: ContentType,
}

impl Default for TextureUnitState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureUnitState {
    /// Create a blank unit that modulates with the previous layers
    pub fn new() -> Self {
        let (min_filter, mag_filter, mip_filter) = TextureFilterOptions::Bilinear.filters();
        Self {
            name: String::new(),
            texture_alias: String::new(),
            frames: Vec::new(),
            current_frame: 0,
            animation_duration: 0.0,
            cubic: false,
            texture_type: TextureType::TwoD,
            num_mipmaps: None,
            is_alpha: false,
            desired_format: PixelFormat::Unknown,
            hardware_gamma: false,
            tex_coord_set: 0,
            address_mode: UvwAddressingMode::uniform(TextureAddressingMode::Wrap),
            border_colour: ColourValue::BLACK,
            min_filter,
            mag_filter,
            mip_filter,
            max_anisotropy: 1,
            mipmap_bias: 0.0,
            colour_blend: LayerBlendModeEx::modulate(LayerBlendType::Colour),
            alpha_blend: LayerBlendModeEx::modulate(LayerBlendType::Alpha),
            colour_fallback_src: SceneBlendFactor::DestColour,
            colour_fallback_dest: SceneBlendFactor::Zero,
            u_scroll: 0.0,
            v_scroll: 0.0,
            u_scale: 1.0,
            v_scale: 1.0,
            rotate: 0.0,
            manual_transform: None,
            effects: Vec::new(),
            binding_type: BindingType::Fragment,
            content_type: ContentType::Named,
        }
    }

    /// Create a unit bound to a 2D texture
    pub fn with_texture(name: impl Into<String>) -> Self {
        let mut unit = Self::new();
        unit.set_texture_name(name, TextureType::TwoD);
        unit
    }

    /// Optional unit name used for lookups and inheritance
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the unit name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Alias this unit answers to when a material applies texture aliases
    pub fn texture_alias(&self) -> &str {
        &self.texture_alias
    }

    /// Set the texture alias
    pub fn set_texture_alias(&mut self, alias: impl Into<String>) {
        self.texture_alias = alias.into();
    }

    /// Bind a single texture; cube maps given this way are treated as one combined texture
    pub fn set_texture_name(&mut self, name: impl Into<String>, texture_type: TextureType) {
        let name = name.into();
        if texture_type == TextureType::CubeMap {
            self.set_cubic_texture_name(&name, true);
            return;
        }
        self.frames = if name.is_empty() { Vec::new() } else { vec![name] };
        self.current_frame = 0;
        self.animation_duration = 0.0;
        self.cubic = false;
        self.texture_type = texture_type;
    }

    /// Bind a cube map, either as one combined texture or as six separate face textures
    pub fn set_cubic_texture_name(&mut self, name: &str, for_uvw: bool) {
        if for_uvw {
            self.set_cubic_texture_names(&[name.to_string()], true);
        } else {
            let (base, ext) = split_extension(name);
            let faces: Vec<String> = CUBE_FACE_SUFFIXES.iter().map(|suffix| format!("{base}{suffix}{ext}")).collect();
            self.set_cubic_texture_names(&faces, false);
        }
    }

    /// Bind explicit cube faces; one name for a combined map, six for separate faces
    pub fn set_cubic_texture_names(&mut self, names: &[String], for_uvw: bool) {
        let count = if for_uvw { 1 } else { 6 };
        self.frames = names.iter().take(count).cloned().collect();
        self.current_frame = 0;
        self.animation_duration = 0.0;
        self.cubic = true;
        self.texture_type = if for_uvw { TextureType::CubeMap } else { TextureType::TwoD };
    }

    /// Bind `count` frames named `base_N.ext`
    pub fn set_animated_texture_name(&mut self, name: &str, count: usize, duration: f32) {
        let (base, ext) = split_extension(name);
        let frames: Vec<String> = (0..count).map(|i| format!("{base}_{i}{ext}")).collect();
        self.set_animated_texture_names(frames, duration);
    }

    /// Bind an explicit list of animation frames
    pub fn set_animated_texture_names(&mut self, frames: Vec<String>, duration: f32) {
        self.frames = frames;
        self.current_frame = 0;
        self.animation_duration = duration;
        self.cubic = false;
    }

    /// Name of the texture currently bound
    pub fn texture_name(&self) -> &str {
        self.frames.get(self.current_frame).map_or("", String::as_str)
    }

    /// Name of one frame
    pub fn frame_texture_name(&self, frame: usize) -> Option<&str> {
        self.frames.get(frame).map(String::as_str)
    }

    /// Number of frames (six for separate cube faces)
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Select the current frame
    pub fn set_current_frame(&mut self, frame: usize) {
        if frame < self.frames.len() {
            self.current_frame = frame;
        }
    }

    /// Current frame
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Seconds for a full animation cycle
    pub fn animation_duration(&self) -> f32 {
        self.animation_duration
    }

    /// True for cube maps in either form
    pub fn is_cubic(&self) -> bool {
        self.cubic
    }

    /// True when the unit samples a single combined cube map
    pub fn requires_cube_mapping(&self) -> bool {
        self.texture_type == TextureType::CubeMap
    }

    /// True when no texture is bound and the content is not supplied by the renderer
    pub fn is_blank(&self) -> bool {
        self.content_type == ContentType::Named && self.texture_name().is_empty()
    }

    /// Texture dimensionality
    pub fn texture_type(&self) -> TextureType {
        self.texture_type
    }

    /// Requested mipmap count, `None` for the system default
    pub fn num_mipmaps(&self) -> Option<u32> {
        self.num_mipmaps
    }

    /// Request a mipmap count
    pub fn set_num_mipmaps(&mut self, count: Option<u32>) {
        self.num_mipmaps = count;
    }

    /// Whether a single channel texture loads into alpha
    pub fn is_alpha(&self) -> bool {
        self.is_alpha
    }

    /// Load a single channel texture into alpha
    pub fn set_is_alpha(&mut self, is_alpha: bool) {
        self.is_alpha = is_alpha;
    }

    /// Pixel format requested for the texture, `Unknown` for the file's own
    pub fn desired_format(&self) -> PixelFormat {
        self.desired_format
    }

    /// Request a pixel format
    pub fn set_desired_format(&mut self, format: PixelFormat) {
        self.desired_format = format;
    }

    /// Texture is sampled with gamma correction
    pub fn hardware_gamma(&self) -> bool {
        self.hardware_gamma
    }

    /// Enable gamma-corrected sampling
    pub fn set_hardware_gamma(&mut self, enabled: bool) {
        self.hardware_gamma = enabled;
    }

    /// Texture coordinate set used by this unit
    pub fn tex_coord_set(&self) -> u32 {
        self.tex_coord_set
    }

    /// Select the texture coordinate set
    pub fn set_tex_coord_set(&mut self, set: u32) {
        self.tex_coord_set = set;
    }

    /// Addressing mode per axis
    pub fn address_mode(&self) -> UvwAddressingMode {
        self.address_mode
    }

    /// Set addressing on every axis
    pub fn set_address_mode(&mut self, mode: TextureAddressingMode) {
        self.address_mode = UvwAddressingMode::uniform(mode);
    }

    /// Set addressing per axis
    pub fn set_address_mode_uvw(&mut self, mode: UvwAddressingMode) {
        self.address_mode = mode;
    }

    /// Colour sampled outside the texture in border mode
    pub fn border_colour(&self) -> ColourValue {
        self.border_colour
    }

    /// Set the border colour
    pub fn set_border_colour(&mut self, colour: ColourValue) {
        self.border_colour = colour;
    }

    /// Apply a filtering preset
    pub fn set_texture_filtering(&mut self, options: TextureFilterOptions) {
        let (min, mag, mip) = options.filters();
        self.set_filtering(min, mag, mip);
    }

    /// Set min, mag and mip filters explicitly
    pub fn set_filtering(&mut self, min: FilterOptions, mag: FilterOptions, mip: FilterOptions) {
        self.min_filter = min;
        self.mag_filter = mag;
        self.mip_filter = mip;
    }

    /// Min, mag and mip filters
    pub fn filtering(&self) -> (FilterOptions, FilterOptions, FilterOptions) {
        (self.min_filter, self.mag_filter, self.mip_filter)
    }

    /// Maximum anisotropy
    pub fn max_anisotropy(&self) -> u32 {
        self.max_anisotropy
    }

    /// Set maximum anisotropy
    pub fn set_max_anisotropy(&mut self, value: u32) {
        self.max_anisotropy = value;
    }

    /// Mipmap level of detail bias
    pub fn mipmap_bias(&self) -> f32 {
        self.mipmap_bias
    }

    /// Set mipmap bias
    pub fn set_mipmap_bias(&mut self, bias: f32) {
        self.mipmap_bias = bias;
    }

    /// Apply a simple blend preset along with its multipass fallback
    pub fn set_colour_operation(&mut self, op: LayerBlendOperation) {
        use LayerBlendSource::{Current, Texture};
        use SceneBlendFactor::*;
        let (ex, src, dest) = match op {
            LayerBlendOperation::Replace => (LayerBlendOperationEx::Source1, One, Zero),
            LayerBlendOperation::Add => (LayerBlendOperationEx::Add, One, One),
            LayerBlendOperation::Modulate => (LayerBlendOperationEx::Modulate, DestColour, Zero),
            LayerBlendOperation::AlphaBlend => {
                (LayerBlendOperationEx::BlendTextureAlpha, SourceAlpha, OneMinusSourceAlpha)
            }
        };
        self.set_colour_operation_ex(ex, Texture, Current);
        self.set_colour_op_multipass_fallback(src, dest);
    }

    /// Set an extended colour blend with default manual arguments
    pub fn set_colour_operation_ex(
        &mut self,
        operation: LayerBlendOperationEx,
        source1: LayerBlendSource,
        source2: LayerBlendSource,
    ) {
        self.set_colour_operation_ex_full(
            operation,
            source1,
            source2,
            ColourValue::WHITE,
            ColourValue::WHITE,
            0.0,
        );
    }

    /// Set an extended colour blend including manual colours and blend factor
    pub fn set_colour_operation_ex_full(
        &mut self,
        operation: LayerBlendOperationEx,
        source1: LayerBlendSource,
        source2: LayerBlendSource,
        arg1: ColourValue,
        arg2: ColourValue,
        factor: f32,
    ) {
        let blend = &mut self.colour_blend;
        blend.operation = operation;
        blend.source1 = source1;
        blend.source2 = source2;
        blend.colour_arg1 = arg1;
        blend.colour_arg2 = arg2;
        blend.factor = factor;
    }

    /// Scene blend used when this unit is split into its own pass
    pub fn set_colour_op_multipass_fallback(&mut self, src: SceneBlendFactor, dest: SceneBlendFactor) {
        self.colour_fallback_src = src;
        self.colour_fallback_dest = dest;
    }

    /// Multipass fallback factors
    pub fn colour_blend_fallback(&self) -> (SceneBlendFactor, SceneBlendFactor) {
        (self.colour_fallback_src, self.colour_fallback_dest)
    }

    /// Colour blend description
    pub fn colour_blend_mode(&self) -> &LayerBlendModeEx {
        &self.colour_blend
    }

    /// Set an extended alpha blend
    pub fn set_alpha_operation(
        &mut self,
        operation: LayerBlendOperationEx,
        source1: LayerBlendSource,
        source2: LayerBlendSource,
        arg1: f32,
        arg2: f32,
        factor: f32,
    ) {
        let blend = &mut self.alpha_blend;
        blend.operation = operation;
        blend.source1 = source1;
        blend.source2 = source2;
        blend.alpha_arg1 = arg1;
        blend.alpha_arg2 = arg2;
        blend.factor = factor;
    }

    /// Alpha blend description
    pub fn alpha_blend_mode(&self) -> &LayerBlendModeEx {
        &self.alpha_blend
    }

    /// True when the colour blend needs dot3 hardware support
    pub fn is_dot3(&self) -> bool {
        self.colour_blend.operation == LayerBlendOperationEx::DotProduct
    }

    /// Static scroll offset
    pub fn set_texture_scroll(&mut self, u: f32, v: f32) {
        self.u_scroll = u;
        self.v_scroll = v;
        self.manual_transform = None;
    }

    /// Static scale
    pub fn set_texture_scale(&mut self, u: f32, v: f32) {
        self.u_scale = u;
        self.v_scale = v;
        self.manual_transform = None;
    }

    /// Static rotation in radians
    pub fn set_texture_rotate(&mut self, radians: f32) {
        self.rotate = radians;
        self.manual_transform = None;
    }

    /// Scroll offsets
    pub fn texture_scroll(&self) -> (f32, f32) {
        (self.u_scroll, self.v_scroll)
    }

    /// Scale factors
    pub fn texture_scale(&self) -> (f32, f32) {
        (self.u_scale, self.v_scale)
    }

    /// Rotation in radians
    pub fn texture_rotate(&self) -> f32 {
        self.rotate
    }

    /// Replace the texture transform with an explicit matrix
    pub fn set_texture_transform(&mut self, transform: Mat4) {
        self.manual_transform = Some(transform);
    }

    /// Current texture coordinate transform
    ///
    /// Scale is applied about the texture centre, then the scroll offset, then
    /// rotation about the centre. An explicit matrix overrides all three.
    pub fn texture_transform(&self) -> Mat4 {
        if let Some(transform) = self.manual_transform {
            return transform;
        }

        let mut xform = Mat4::identity();
        if self.u_scale != 1.0 || self.v_scale != 1.0 {
            xform[(0, 0)] = 1.0 / self.u_scale;
            xform[(1, 1)] = 1.0 / self.v_scale;
            xform[(0, 3)] = -0.5 * xform[(0, 0)] + 0.5;
            xform[(1, 3)] = -0.5 * xform[(1, 1)] + 0.5;
        }

        if self.u_scroll != 0.0 || self.v_scroll != 0.0 {
            let mut translate = Mat4::identity();
            translate[(0, 3)] = self.u_scroll;
            translate[(1, 3)] = self.v_scroll;
            xform = translate * xform;
        }

        if self.rotate != 0.0 {
            let (sin, cos) = self.rotate.sin_cos();
            let mut rot = Mat4::identity();
            rot[(0, 0)] = cos;
            rot[(0, 1)] = -sin;
            rot[(1, 0)] = sin;
            rot[(1, 1)] = cos;
            rot[(0, 3)] = 0.5 + (-0.5 * cos + 0.5 * sin);
            rot[(1, 3)] = 0.5 + (-0.5 * sin - 0.5 * cos);
            xform = rot * xform;
        }

        xform
    }

    /// Enable or disable generated environment coordinates
    pub fn set_environment_map(&mut self, enabled: bool, map_type: EnvMapType) {
        self.effects.retain(|effect| !matches!(effect, TextureEffect::EnvironmentMap(_)));
        if enabled {
            self.effects.push(TextureEffect::EnvironmentMap(map_type));
        }
    }

    /// Animate scrolling; zero speeds remove the effect
    pub fn set_scroll_animation(&mut self, u_speed: f32, v_speed: f32) {
        self.effects.retain(|effect| {
            !matches!(
                effect,
                TextureEffect::UvScroll { .. } | TextureEffect::UScroll { .. } | TextureEffect::VScroll { .. }
            )
        });
        if u_speed == 0.0 && v_speed == 0.0 {
            return;
        }
        if u_speed == v_speed {
            self.effects.push(TextureEffect::UvScroll { speed: u_speed });
        } else {
            if u_speed != 0.0 {
                self.effects.push(TextureEffect::UScroll { speed: u_speed });
            }
            if v_speed != 0.0 {
                self.effects.push(TextureEffect::VScroll { speed: v_speed });
            }
        }
    }

    /// Animate rotation; zero speed removes the effect
    pub fn set_rotate_animation(&mut self, speed: f32) {
        self.effects.retain(|effect| !matches!(effect, TextureEffect::Rotate { .. }));
        if speed != 0.0 {
            self.effects.push(TextureEffect::Rotate { speed });
        }
    }

    /// Drive one transform component with a waveform, replacing any wave on that component
    pub fn set_transform_animation(
        &mut self,
        transform: TextureTransformType,
        waveform: WaveformType,
        base: f32,
        frequency: f32,
        phase: f32,
        amplitude: f32,
    ) {
        self.effects.retain(|effect| {
            !matches!(effect, TextureEffect::Transform { transform: existing, .. } if *existing == transform)
        });
        self.effects.push(TextureEffect::Transform {
            transform,
            waveform,
            base,
            frequency,
            phase,
            amplitude,
        });
    }

    /// Active animation effects
    pub fn effects(&self) -> &[TextureEffect] {
        &self.effects
    }

    /// Program stage the unit is bound to
    pub fn binding_type(&self) -> BindingType {
        self.binding_type
    }

    /// Bind to a program stage
    pub fn set_binding_type(&mut self, binding: BindingType) {
        self.binding_type = binding;
    }

    /// Content source
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Set the content source
    pub fn set_content_type(&mut self, content: ContentType) {
        self.content_type = content;
    }

    /// Rebind the texture if this unit's alias appears in `aliases`
    ///
    /// Returns true when the alias matched. With `apply` false only the match is reported.
    pub fn apply_texture_aliases(&mut self, aliases: &BTreeMap<String, String>, apply: bool) -> bool {
        let Some(texture) = aliases.get(&self.texture_alias) else {
            return false;
        };
        if !apply {
            return true;
        }

        let texture = texture.clone();
        if self.cubic {
            let for_uvw = self.texture_type == TextureType::CubeMap;
            self.set_cubic_texture_name(&texture, for_uvw);
        } else if self.frames.len() > 1 {
            let (count, duration) = (self.frames.len(), self.animation_duration);
            self.set_animated_texture_name(&texture, count, duration);
        } else {
            self.set_texture_name(texture, self.texture_type);
        }
        true
    }
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) => name.split_at(dot),
        None => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let unit = TextureUnitState::new();
        assert!(unit.is_blank());
        assert_eq!(unit.texture_type(), TextureType::TwoD);
        assert_eq!(unit.num_mipmaps(), None);
        assert_eq!(unit.colour_blend_mode().operation, LayerBlendOperationEx::Modulate);
        assert_eq!(
            unit.colour_blend_fallback(),
            (SceneBlendFactor::DestColour, SceneBlendFactor::Zero)
        );
        assert_eq!(unit.address_mode(), UvwAddressingMode::uniform(TextureAddressingMode::Wrap));
    }

    #[test]
    fn test_separate_cube_faces() {
        let mut unit = TextureUnitState::new();
        unit.set_cubic_texture_name("sky.jpg", false);
        assert_eq!(unit.num_frames(), 6);
        assert_eq!(unit.frame_texture_name(0), Some("sky_fr.jpg"));
        assert_eq!(unit.frame_texture_name(5), Some("sky_dn.jpg"));
        assert!(unit.is_cubic());
        assert!(!unit.requires_cube_mapping());
    }

    #[test]
    fn test_combined_cube_needs_cube_mapping() {
        let mut unit = TextureUnitState::new();
        unit.set_texture_name("env.dds", TextureType::CubeMap);
        assert_eq!(unit.texture_name(), "env.dds");
        assert!(unit.requires_cube_mapping());
    }

    #[test]
    fn test_animated_frame_names() {
        let mut unit = TextureUnitState::new();
        unit.set_animated_texture_name("flame.png", 3, 1.5);
        assert_eq!(unit.frame_texture_name(2), Some("flame_2.png"));
        assert_relative_eq!(unit.animation_duration(), 1.5);
    }

    #[test]
    fn test_colour_op_sets_fallback() {
        let mut unit = TextureUnitState::new();
        unit.set_colour_operation(LayerBlendOperation::Add);
        assert_eq!(unit.colour_blend_fallback(), (SceneBlendFactor::One, SceneBlendFactor::One));
        unit.set_colour_operation(LayerBlendOperation::AlphaBlend);
        assert_eq!(
            unit.colour_blend_fallback(),
            (SceneBlendFactor::SourceAlpha, SceneBlendFactor::OneMinusSourceAlpha)
        );
        assert_eq!(unit.colour_blend_mode().operation, LayerBlendOperationEx::BlendTextureAlpha);
    }

    #[test]
    fn test_scale_about_centre() {
        let mut unit = TextureUnitState::new();
        unit.set_texture_scale(2.0, 4.0);
        let m = unit.texture_transform();
        assert_relative_eq!(m[(0, 0)], 0.5);
        assert_relative_eq!(m[(1, 1)], 0.25);
        assert_relative_eq!(m[(0, 3)], 0.25);
        assert_relative_eq!(m[(1, 3)], 0.375);
    }

    #[test]
    fn test_manual_transform_wins_until_scroll_changes() {
        let mut unit = TextureUnitState::new();
        let mut manual = Mat4::identity();
        manual[(0, 3)] = 7.0;
        unit.set_texture_transform(manual);
        assert_relative_eq!(unit.texture_transform()[(0, 3)], 7.0);

        unit.set_texture_scroll(0.25, 0.0);
        assert_relative_eq!(unit.texture_transform()[(0, 3)], 0.25);
    }

    #[test]
    fn test_scroll_animation_replaces_previous() {
        let mut unit = TextureUnitState::new();
        unit.set_scroll_animation(0.1, 0.1);
        assert_eq!(unit.effects(), &[TextureEffect::UvScroll { speed: 0.1 }]);
        unit.set_scroll_animation(0.2, 0.0);
        assert_eq!(unit.effects(), &[TextureEffect::UScroll { speed: 0.2 }]);
        unit.set_scroll_animation(0.0, 0.0);
        assert!(unit.effects().is_empty());
    }

    #[test]
    fn test_alias_rebinds_texture() {
        let mut unit = TextureUnitState::with_texture("placeholder.png");
        unit.set_texture_alias("DiffuseMap");

        let mut aliases = BTreeMap::new();
        aliases.insert("DiffuseMap".to_string(), "brick.png".to_string());
        assert!(unit.apply_texture_aliases(&aliases, false));
        assert_eq!(unit.texture_name(), "placeholder.png");
        assert!(unit.apply_texture_aliases(&aliases, true));
        assert_eq!(unit.texture_name(), "brick.png");

        aliases.clear();
        assert!(!unit.apply_texture_aliases(&aliases, true));
    }
}
