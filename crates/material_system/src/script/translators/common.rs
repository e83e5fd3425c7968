//! Value extraction shared by translators
//!
//! The `*_at` helpers report a diagnostic naming the property when a value is
//! missing or has the wrong kind, and return `None` so the caller can skip the
//! property.

use crate::foundation::math::ColourValue;
use crate::material::{
    CompareFunction, CullingMode, EnvMapType, FilterOptions, FogMode, IlluminationStage, LayerBlendOperation,
    LayerBlendOperationEx, LayerBlendSource, LightType, ManualCullingMode, PolygonMode, SceneBlendFactor,
    SceneBlendOperation, SceneBlendType, ShadeOptions, TextureAddressingMode, TextureFilterOptions,
    TextureTransformType, TextureType, WaveformType,
};
use crate::resources::StencilOperation;
use crate::script::ast::{AbstractNode, AtomNode, PropertyNode};
use crate::script::error::ErrorCode;
use crate::script::keywords::Keyword;

use super::Translator;

impl Translator<'_> {
    /// Check the value count is within `min..=max`
    pub fn expect_values(&mut self, prop: &PropertyNode, min: usize, max: usize) -> bool {
        let count = prop.values.len();
        if count < min {
            let message = if min == max {
                format!("{} expects {min} values, found {count}", prop.name)
            } else {
                format!("{} expects at least {min} values, found {count}", prop.name)
            };
            self.error(ErrorCode::InvalidParameters, &prop.location, message);
            false
        } else if count > max {
            self.error(
                ErrorCode::FewerParametersExpected,
                &prop.location,
                format!("{} expects at most {max} values, found {count}", prop.name),
            );
            false
        } else {
            true
        }
    }

    fn atom_at<'n>(&mut self, prop: &'n PropertyNode, index: usize, code: ErrorCode) -> Option<&'n AtomNode> {
        match prop.values.get(index) {
            Some(AbstractNode::Atom(atom)) => Some(atom),
            Some(other) => {
                self.error(code, other.location(), format!("{}: unexpected '{}'", prop.name, other.text()));
                None
            }
            None => {
                self.error(code, &prop.location, format!("{}: value {} missing", prop.name, index + 1));
                None
            }
        }
    }

    /// Any atom as text
    pub fn string_at(&mut self, prop: &PropertyNode, index: usize) -> Option<String> {
        self.atom_at(prop, index, ErrorCode::StringExpected).map(|atom| atom.value.clone())
    }

    /// Numeric atom
    pub fn number_at(&mut self, prop: &PropertyNode, index: usize) -> Option<f32> {
        let atom = self.atom_at(prop, index, ErrorCode::NumberExpected)?;
        let number = atom.number();
        if number.is_none() {
            self.error(
                ErrorCode::NumberExpected,
                &atom.location,
                format!("{}: '{}' is not a number", prop.name, atom.value),
            );
        }
        number
    }

    /// Non-negative integer; hexadecimal is accepted with a `0x` prefix
    pub fn uint_at(&mut self, prop: &PropertyNode, index: usize) -> Option<u32> {
        let atom = self.atom_at(prop, index, ErrorCode::NumberExpected)?;
        let parsed = match atom.value.strip_prefix("0x").or_else(|| atom.value.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => atom.value.parse::<u32>().ok(),
        };
        if parsed.is_none() {
            self.error(
                ErrorCode::NumberExpected,
                &atom.location,
                format!("{}: '{}' is not a non-negative integer", prop.name, atom.value),
            );
        }
        parsed
    }

    /// Integer narrowed to `u16`
    pub fn u16_at(&mut self, prop: &PropertyNode, index: usize) -> Option<u16> {
        let value = self.uint_at(prop, index)?;
        match u16::try_from(value) {
            Ok(value) => Some(value),
            Err(_) => {
                self.error(
                    ErrorCode::InvalidParameters,
                    &prop.location,
                    format!("{}: {value} is out of range", prop.name),
                );
                None
            }
        }
    }

    /// Truth value: `on`, `off`, `true`, `false`, `yes` or `no`
    pub fn bool_at(&mut self, prop: &PropertyNode, index: usize) -> Option<bool> {
        let atom = self.atom_at(prop, index, ErrorCode::InvalidParameters)?;
        let value = truth_value(atom.id);
        if value.is_none() {
            self.error(
                ErrorCode::InvalidParameters,
                &atom.location,
                format!("{}: expected on or off, found '{}'", prop.name, atom.value),
            );
        }
        value
    }

    /// Enumerated keyword resolved by `map`
    pub fn enum_at<T>(&mut self, prop: &PropertyNode, index: usize, map: fn(Keyword) -> Option<T>) -> Option<T> {
        let atom = self.atom_at(prop, index, ErrorCode::InvalidParameters)?;
        let value = map(atom.id);
        if value.is_none() {
            self.error(
                ErrorCode::InvalidParameters,
                &atom.location,
                format!("{}: invalid value '{}'", prop.name, atom.value),
            );
        }
        value
    }

    /// Three or four numbers starting at `start`; alpha defaults to one
    pub fn colour_at(&mut self, prop: &PropertyNode, start: usize, count: usize) -> Option<ColourValue> {
        if count != 3 && count != 4 {
            self.error(
                ErrorCode::InvalidParameters,
                &prop.location,
                format!("{}: a colour needs 3 or 4 numbers", prop.name),
            );
            return None;
        }
        let r = self.number_at(prop, start)?;
        let g = self.number_at(prop, start + 1)?;
        let b = self.number_at(prop, start + 2)?;
        let a = if count == 4 { self.number_at(prop, start + 3)? } else { 1.0 };
        Some(ColourValue::new(r, g, b, a))
    }

    /// A single truth value
    pub fn single_bool(&mut self, prop: &PropertyNode) -> Option<bool> {
        if !self.expect_values(prop, 1, 1) {
            return None;
        }
        self.bool_at(prop, 0)
    }

    /// A single number
    pub fn single_number(&mut self, prop: &PropertyNode) -> Option<f32> {
        if !self.expect_values(prop, 1, 1) {
            return None;
        }
        self.number_at(prop, 0)
    }

    /// A single non-negative integer
    pub fn single_uint(&mut self, prop: &PropertyNode) -> Option<u32> {
        if !self.expect_values(prop, 1, 1) {
            return None;
        }
        self.uint_at(prop, 0)
    }

    /// A single string
    pub fn single_string(&mut self, prop: &PropertyNode) -> Option<String> {
        if !self.expect_values(prop, 1, 1) {
            return None;
        }
        self.string_at(prop, 0)
    }

    /// A single enumerated keyword
    pub fn single_enum<T>(&mut self, prop: &PropertyNode, map: fn(Keyword) -> Option<T>) -> Option<T> {
        if !self.expect_values(prop, 1, 1) {
            return None;
        }
        self.enum_at(prop, 0, map)
    }

    /// A colour filling the whole value list
    pub fn whole_colour(&mut self, prop: &PropertyNode) -> Option<ColourValue> {
        self.colour_at(prop, 0, prop.values.len())
    }
}

/// Space separated text of every value, for free-form parameters
pub fn joined_values(values: &[AbstractNode]) -> String {
    values.iter().map(AbstractNode::text).collect::<Vec<_>>().join(" ")
}

pub fn truth_value(id: Keyword) -> Option<bool> {
    match id {
        Keyword::On | Keyword::True | Keyword::Yes => Some(true),
        Keyword::Off | Keyword::False | Keyword::No => Some(false),
        _ => None,
    }
}

pub fn scene_blend_type(id: Keyword) -> Option<SceneBlendType> {
    match id {
        Keyword::Add => Some(SceneBlendType::Add),
        Keyword::Modulate => Some(SceneBlendType::Modulate),
        Keyword::ColourBlend => Some(SceneBlendType::TransparentColour),
        Keyword::AlphaBlend => Some(SceneBlendType::TransparentAlpha),
        Keyword::Replace => Some(SceneBlendType::Replace),
        _ => None,
    }
}

pub fn blend_factor(id: Keyword) -> Option<SceneBlendFactor> {
    match id {
        Keyword::One => Some(SceneBlendFactor::One),
        Keyword::Zero => Some(SceneBlendFactor::Zero),
        Keyword::DestColour => Some(SceneBlendFactor::DestColour),
        Keyword::SrcColour => Some(SceneBlendFactor::SourceColour),
        Keyword::OneMinusDestColour => Some(SceneBlendFactor::OneMinusDestColour),
        Keyword::OneMinusSrcColour => Some(SceneBlendFactor::OneMinusSourceColour),
        Keyword::DestAlpha => Some(SceneBlendFactor::DestAlpha),
        Keyword::SrcAlpha => Some(SceneBlendFactor::SourceAlpha),
        Keyword::OneMinusDestAlpha => Some(SceneBlendFactor::OneMinusDestAlpha),
        Keyword::OneMinusSrcAlpha => Some(SceneBlendFactor::OneMinusSourceAlpha),
        _ => None,
    }
}

pub fn blend_operation(id: Keyword) -> Option<SceneBlendOperation> {
    match id {
        Keyword::Add => Some(SceneBlendOperation::Add),
        Keyword::Subtract => Some(SceneBlendOperation::Subtract),
        Keyword::ReverseSubtract => Some(SceneBlendOperation::ReverseSubtract),
        Keyword::Min => Some(SceneBlendOperation::Min),
        Keyword::Max => Some(SceneBlendOperation::Max),
        _ => None,
    }
}

pub fn compare_function(id: Keyword) -> Option<CompareFunction> {
    match id {
        Keyword::AlwaysFail => Some(CompareFunction::AlwaysFail),
        Keyword::AlwaysPass => Some(CompareFunction::AlwaysPass),
        Keyword::Less => Some(CompareFunction::Less),
        Keyword::LessEqual => Some(CompareFunction::LessEqual),
        Keyword::Equal => Some(CompareFunction::Equal),
        Keyword::NotEqual => Some(CompareFunction::NotEqual),
        Keyword::GreaterEqual => Some(CompareFunction::GreaterEqual),
        Keyword::Greater => Some(CompareFunction::Greater),
        _ => None,
    }
}

pub fn culling_mode(id: Keyword) -> Option<CullingMode> {
    match id {
        Keyword::Clockwise => Some(CullingMode::Clockwise),
        Keyword::Anticlockwise => Some(CullingMode::Anticlockwise),
        Keyword::None => Some(CullingMode::None),
        _ => None,
    }
}

pub fn manual_culling_mode(id: Keyword) -> Option<ManualCullingMode> {
    match id {
        Keyword::Back => Some(ManualCullingMode::Back),
        Keyword::Front => Some(ManualCullingMode::Front),
        Keyword::None => Some(ManualCullingMode::None),
        _ => None,
    }
}

pub fn shade_options(id: Keyword) -> Option<ShadeOptions> {
    match id {
        Keyword::Flat => Some(ShadeOptions::Flat),
        Keyword::Gouraud => Some(ShadeOptions::Gouraud),
        Keyword::Phong => Some(ShadeOptions::Phong),
        _ => None,
    }
}

pub fn polygon_mode(id: Keyword) -> Option<PolygonMode> {
    match id {
        Keyword::Points => Some(PolygonMode::Points),
        Keyword::Wireframe => Some(PolygonMode::Wireframe),
        Keyword::Solid => Some(PolygonMode::Solid),
        _ => None,
    }
}

pub fn fog_mode(id: Keyword) -> Option<FogMode> {
    match id {
        Keyword::None => Some(FogMode::None),
        Keyword::Exp => Some(FogMode::Exp),
        Keyword::Exp2 => Some(FogMode::Exp2),
        Keyword::Linear => Some(FogMode::Linear),
        _ => None,
    }
}

pub fn illumination_stage(id: Keyword) -> Option<IlluminationStage> {
    match id {
        Keyword::Ambient => Some(IlluminationStage::Ambient),
        Keyword::PerLight => Some(IlluminationStage::PerLight),
        Keyword::Decal => Some(IlluminationStage::Decal),
        _ => None,
    }
}

pub fn light_type(id: Keyword) -> Option<LightType> {
    match id {
        Keyword::Point => Some(LightType::Point),
        Keyword::Directional => Some(LightType::Directional),
        Keyword::Spot => Some(LightType::Spotlight),
        _ => None,
    }
}

pub fn texture_type(id: Keyword) -> Option<TextureType> {
    match id {
        Keyword::Tex1D => Some(TextureType::OneD),
        Keyword::Tex2D => Some(TextureType::TwoD),
        Keyword::Tex3D => Some(TextureType::ThreeD),
        Keyword::Cubic => Some(TextureType::CubeMap),
        _ => None,
    }
}

pub fn addressing_mode(id: Keyword) -> Option<TextureAddressingMode> {
    match id {
        Keyword::Wrap => Some(TextureAddressingMode::Wrap),
        Keyword::Clamp => Some(TextureAddressingMode::Clamp),
        Keyword::Mirror => Some(TextureAddressingMode::Mirror),
        Keyword::Border => Some(TextureAddressingMode::Border),
        _ => None,
    }
}

pub fn texture_filtering(id: Keyword) -> Option<TextureFilterOptions> {
    match id {
        Keyword::None => Some(TextureFilterOptions::None),
        Keyword::Bilinear => Some(TextureFilterOptions::Bilinear),
        Keyword::Trilinear => Some(TextureFilterOptions::Trilinear),
        Keyword::Anisotropic => Some(TextureFilterOptions::Anisotropic),
        _ => None,
    }
}

pub fn filter_option(id: Keyword) -> Option<FilterOptions> {
    match id {
        Keyword::None => Some(FilterOptions::None),
        Keyword::Point => Some(FilterOptions::Point),
        Keyword::Linear => Some(FilterOptions::Linear),
        Keyword::Anisotropic => Some(FilterOptions::Anisotropic),
        _ => None,
    }
}

pub fn layer_blend_operation(id: Keyword) -> Option<LayerBlendOperation> {
    match id {
        Keyword::Replace => Some(LayerBlendOperation::Replace),
        Keyword::Add => Some(LayerBlendOperation::Add),
        Keyword::Modulate => Some(LayerBlendOperation::Modulate),
        Keyword::AlphaBlend => Some(LayerBlendOperation::AlphaBlend),
        _ => None,
    }
}

pub fn layer_blend_operation_ex(id: Keyword) -> Option<LayerBlendOperationEx> {
    match id {
        Keyword::Source1 => Some(LayerBlendOperationEx::Source1),
        Keyword::Source2 => Some(LayerBlendOperationEx::Source2),
        Keyword::Modulate => Some(LayerBlendOperationEx::Modulate),
        Keyword::ModulateX2 => Some(LayerBlendOperationEx::ModulateX2),
        Keyword::ModulateX4 => Some(LayerBlendOperationEx::ModulateX4),
        Keyword::Add => Some(LayerBlendOperationEx::Add),
        Keyword::AddSigned => Some(LayerBlendOperationEx::AddSigned),
        Keyword::AddSmooth => Some(LayerBlendOperationEx::AddSmooth),
        Keyword::Subtract => Some(LayerBlendOperationEx::Subtract),
        Keyword::BlendDiffuseAlpha => Some(LayerBlendOperationEx::BlendDiffuseAlpha),
        Keyword::BlendTextureAlpha => Some(LayerBlendOperationEx::BlendTextureAlpha),
        Keyword::BlendCurrentAlpha => Some(LayerBlendOperationEx::BlendCurrentAlpha),
        Keyword::BlendManual => Some(LayerBlendOperationEx::BlendManual),
        Keyword::DotProduct => Some(LayerBlendOperationEx::DotProduct),
        Keyword::BlendDiffuseColour => Some(LayerBlendOperationEx::BlendDiffuseColour),
        _ => None,
    }
}

pub fn layer_blend_source(id: Keyword) -> Option<LayerBlendSource> {
    match id {
        Keyword::SrcCurrent => Some(LayerBlendSource::Current),
        Keyword::SrcTexture => Some(LayerBlendSource::Texture),
        Keyword::SrcDiffuse => Some(LayerBlendSource::Diffuse),
        Keyword::SrcSpecular => Some(LayerBlendSource::Specular),
        Keyword::SrcManual => Some(LayerBlendSource::Manual),
        _ => None,
    }
}

pub fn env_map_type(id: Keyword) -> Option<EnvMapType> {
    match id {
        Keyword::Spherical => Some(EnvMapType::Curved),
        Keyword::Planar => Some(EnvMapType::Planar),
        Keyword::CubicReflection => Some(EnvMapType::Reflection),
        Keyword::CubicNormal => Some(EnvMapType::Normal),
        _ => None,
    }
}

pub fn transform_type(id: Keyword) -> Option<TextureTransformType> {
    match id {
        Keyword::ScrollX => Some(TextureTransformType::TranslateU),
        Keyword::ScrollY => Some(TextureTransformType::TranslateV),
        Keyword::ScaleX => Some(TextureTransformType::ScaleU),
        Keyword::ScaleY => Some(TextureTransformType::ScaleV),
        Keyword::Rotate => Some(TextureTransformType::Rotate),
        _ => None,
    }
}

pub fn waveform_type(id: Keyword) -> Option<WaveformType> {
    match id {
        Keyword::Sine => Some(WaveformType::Sine),
        Keyword::Triangle => Some(WaveformType::Triangle),
        Keyword::Square => Some(WaveformType::Square),
        Keyword::Sawtooth => Some(WaveformType::Sawtooth),
        Keyword::InverseSawtooth => Some(WaveformType::InverseSawtooth),
        Keyword::Pwm => Some(WaveformType::Pwm),
        _ => None,
    }
}

pub fn stencil_operation(id: Keyword) -> Option<StencilOperation> {
    match id {
        Keyword::Keep => Some(StencilOperation::Keep),
        Keyword::Zero => Some(StencilOperation::Zero),
        Keyword::Replace => Some(StencilOperation::Replace),
        Keyword::Increment => Some(StencilOperation::Increment),
        Keyword::Decrement => Some(StencilOperation::Decrement),
        Keyword::IncrementWrap => Some(StencilOperation::IncrementWrap),
        Keyword::DecrementWrap => Some(StencilOperation::DecrementWrap),
        Keyword::Invert => Some(StencilOperation::Invert),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::script::error::{Diagnostics, Location};
    use std::sync::Arc;

    fn property(name: &str, values: &[&str]) -> PropertyNode {
        let location = Location::new(Arc::from("t"), 1);
        let mut prop = PropertyNode::new(name, location.clone());
        prop.values = values
            .iter()
            .map(|v| AbstractNode::Atom(AtomNode::new(*v, false, location.clone())))
            .collect();
        prop
    }

    #[test]
    fn test_colour_alpha_defaults_to_one() {
        let config = CompilerConfig::default();
        let mut diagnostics = Diagnostics::default();
        let mut tr = Translator::new(&config, "General", &mut diagnostics);
        let colour = tr.whole_colour(&property("ambient", &["0.2", "0.2", "0.2"])).unwrap();
        assert_eq!(colour, ColourValue::new(0.2, 0.2, 0.2, 1.0));
        assert!(tr.whole_colour(&property("ambient", &["1", "1"])).is_none());
        assert!(tr.whole_colour(&property("ambient", &["1", "x", "1"])).is_none());
        assert_eq!(diagnostics.error_count(), 2);
    }

    #[test]
    fn test_uint_accepts_hex() {
        let config = CompilerConfig::default();
        let mut diagnostics = Diagnostics::default();
        let mut tr = Translator::new(&config, "General", &mut diagnostics);
        assert_eq!(tr.single_uint(&property("mask", &["0xFF"])), Some(255));
        assert_eq!(tr.single_uint(&property("mask", &["-1"])), None);
    }

    #[test]
    fn test_arity_codes() {
        let config = CompilerConfig::default();
        let mut diagnostics = Diagnostics::default();
        let mut tr = Translator::new(&config, "General", &mut diagnostics);
        assert!(tr.single_bool(&property("lighting", &[])).is_none());
        assert!(tr.single_bool(&property("lighting", &["on", "off"])).is_none());
        assert_eq!(tr.single_bool(&property("lighting", &["yes"])), Some(true));
        let codes: Vec<ErrorCode> = diagnostics.entries().iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::InvalidParameters, ErrorCode::FewerParametersExpected]);
    }
}
