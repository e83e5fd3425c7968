//! Render state enumerations shared by passes and texture units

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Blending factor applied to source or destination colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneBlendFactor {
    /// 1
    One,
    /// 0
    Zero,
    /// Destination colour
    DestColour,
    /// Source colour
    SourceColour,
    /// 1 - destination colour
    OneMinusDestColour,
    /// 1 - source colour
    OneMinusSourceColour,
    /// Destination alpha
    DestAlpha,
    /// Source alpha
    SourceAlpha,
    /// 1 - destination alpha
    OneMinusDestAlpha,
    /// 1 - source alpha
    OneMinusSourceAlpha,
}

/// Common blend presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneBlendType {
    /// Blend by source alpha
    TransparentAlpha,
    /// Blend by source colour
    TransparentColour,
    /// Add source and destination
    Add,
    /// Multiply destination by source
    Modulate,
    /// Overwrite destination
    Replace,
}

impl SceneBlendType {
    /// Source and destination factors for this preset
    pub fn factors(self) -> (SceneBlendFactor, SceneBlendFactor) {
        use SceneBlendFactor::*;
        match self {
            SceneBlendType::TransparentAlpha => (SourceAlpha, OneMinusSourceAlpha),
            SceneBlendType::TransparentColour => (SourceColour, OneMinusSourceColour),
            SceneBlendType::Add => (One, One),
            SceneBlendType::Modulate => (DestColour, Zero),
            SceneBlendType::Replace => (One, Zero),
        }
    }
}

/// Operation combining blended source and destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneBlendOperation {
    /// source + dest
    Add,
    /// source - dest
    Subtract,
    /// dest - source
    ReverseSubtract,
    /// min(source, dest)
    Min,
    /// max(source, dest)
    Max,
}

/// Comparison used by depth, stencil and alpha tests
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunction {
    AlwaysFail,
    AlwaysPass,
    Less,
    LessEqual,
    Equal,
    NotEqual,
    GreaterEqual,
    Greater,
}

/// Hardware culling by vertex winding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullingMode {
    /// Draw both faces
    None,
    /// Cull clockwise faces
    Clockwise,
    /// Cull anticlockwise faces
    Anticlockwise,
}

/// Software culling by face normal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualCullingMode {
    /// Keep everything
    None,
    /// Cull back faces
    Back,
    /// Cull front faces
    Front,
}

/// Shading interpolation
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeOptions {
    Flat,
    Gouraud,
    Phong,
}

/// Rasterisation mode
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    Points,
    Wireframe,
    Solid,
}

/// Fog falloff
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogMode {
    None,
    Exp,
    Exp2,
    Linear,
}

/// Light types a per-light iteration can be restricted to
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    Point,
    Directional,
    Spotlight,
}

/// Stage of decomposed multi-light rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IlluminationStage {
    /// Ambient and emissive contribution
    Ambient,
    /// Additive contribution of one light
    PerLight,
    /// Texture modulation after lighting
    Decal,
    /// Classified automatically
    Unknown,
}

bitflags! {
    /// Colour channels that follow the vertex colour
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TrackVertexColour: u8 {
        /// Ambient follows vertex colour
        const AMBIENT = 1 << 0;
        /// Diffuse follows vertex colour
        const DIFFUSE = 1 << 1;
        /// Specular follows vertex colour
        const SPECULAR = 1 << 2;
        /// Emissive follows vertex colour
        const EMISSIVE = 1 << 3;
    }
}

/// Texture dimensionality
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureType {
    OneD,
    TwoD,
    ThreeD,
    CubeMap,
}

/// Sampling outside [0, 1]
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureAddressingMode {
    Wrap,
    Mirror,
    Clamp,
    Border,
}

/// Addressing for each texture axis
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvwAddressingMode {
    pub u: TextureAddressingMode,
    pub v: TextureAddressingMode,
    pub w: TextureAddressingMode,
}

impl UvwAddressingMode {
    /// Same mode on every axis
    pub const fn uniform(mode: TextureAddressingMode) -> Self {
        Self { u: mode, v: mode, w: mode }
    }
}

/// Filter for one sampling stage
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOptions {
    None,
    Point,
    Linear,
    Anisotropic,
}

/// Filter presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureFilterOptions {
    /// Point sampling without mipmaps
    None,
    /// Linear min/mag, point mip
    Bilinear,
    /// Linear everywhere
    Trilinear,
    /// Anisotropic min/mag, linear mip
    Anisotropic,
}

impl TextureFilterOptions {
    /// Min, mag and mip filters for the preset
    pub fn filters(self) -> (FilterOptions, FilterOptions, FilterOptions) {
        use FilterOptions::*;
        match self {
            TextureFilterOptions::None => (Point, Point, None),
            TextureFilterOptions::Bilinear => (Linear, Linear, Point),
            TextureFilterOptions::Trilinear => (Linear, Linear, Linear),
            TextureFilterOptions::Anisotropic => (Anisotropic, Anisotropic, Linear),
        }
    }
}

/// Simple texture layer blend presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerBlendOperation {
    /// Replace previous layers
    Replace,
    /// Add to previous layers
    Add,
    /// Multiply with previous layers
    Modulate,
    /// Blend by this layer's alpha
    AlphaBlend,
}

/// Extended texture layer blend operations
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerBlendOperationEx {
    Source1,
    Source2,
    Modulate,
    ModulateX2,
    ModulateX4,
    Add,
    AddSigned,
    AddSmooth,
    Subtract,
    BlendDiffuseAlpha,
    BlendTextureAlpha,
    BlendCurrentAlpha,
    BlendManual,
    DotProduct,
    BlendDiffuseColour,
}

/// Inputs of an extended blend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerBlendSource {
    /// Result of previous layers
    Current,
    /// This layer's texture
    Texture,
    /// Interpolated diffuse colour
    Diffuse,
    /// Interpolated specular colour
    Specular,
    /// Manually supplied value
    Manual,
}

/// Channel an extended blend applies to
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerBlendType {
    Colour,
    Alpha,
}

/// Automatic texture coordinate generation
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMapType {
    Planar,
    Curved,
    Reflection,
    Normal,
}

/// Texture transform component driven by a waveform
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureTransformType {
    TranslateU,
    TranslateV,
    ScaleU,
    ScaleV,
    Rotate,
}

/// Periodic function shapes
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformType {
    Sine,
    Triangle,
    Square,
    Sawtooth,
    InverseSawtooth,
    Pwm,
}

/// Program stage a texture unit is bound to
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    Fragment,
    Vertex,
}

/// Where a texture unit's content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// Named texture resource
    Named,
    /// Shadow texture supplied by the renderer
    Shadow,
}
