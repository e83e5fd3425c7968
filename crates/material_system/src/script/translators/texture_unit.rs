//! `texture_unit` blocks

use crate::foundation::math::{ColourValue, Mat4};
use crate::material::{
    BindingType, ContentType, EnvMapType, LayerBlendOperationEx, LayerBlendSource, TextureAddressingMode, TextureType,
    TextureUnitState, UvwAddressingMode,
};
use crate::resources::PixelFormat;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::error::ErrorCode;
use crate::script::keywords::Keyword;

use super::common::{
    addressing_mode, blend_factor, env_map_type, filter_option, layer_blend_operation, layer_blend_operation_ex,
    layer_blend_source, texture_filtering, texture_type, transform_type, truth_value, waveform_type,
};
use super::Translator;

/// Mipmap count recorded for `unlimited`
pub const UNLIMITED_MIPMAPS: u32 = u32::MAX;

pub(super) fn translate(tr: &mut Translator<'_>, unit: &mut TextureUnitState, object: &ObjectNode) {
    for child in &object.children {
        match child {
            AbstractNode::Property(prop) => translate_property(tr, unit, prop),
            other => tr.unexpected(other, "texture_unit"),
        }
    }
}

fn translate_property(tr: &mut Translator<'_>, unit: &mut TextureUnitState, prop: &PropertyNode) {
    match prop.id {
        Keyword::TextureAlias => {
            if let Some(alias) = tr.single_string(prop) {
                unit.set_texture_alias(alias);
            }
        }
        Keyword::Texture => translate_texture(tr, unit, prop),
        Keyword::AnimTexture => translate_anim_texture(tr, unit, prop),
        Keyword::CubicTexture => translate_cubic_texture(tr, unit, prop),
        Keyword::TexCoordSet => {
            if let Some(set) = tr.single_uint(prop) {
                unit.set_tex_coord_set(set);
            }
        }
        Keyword::TexAddressMode => {
            if !tr.expect_values(prop, 1, 3) {
                return;
            }
            let mut modes = [TextureAddressingMode::Wrap; 3];
            for index in 0..prop.values.len() {
                match tr.enum_at(prop, index, addressing_mode) {
                    Some(mode) => modes[index] = mode,
                    None => return,
                }
            }
            if prop.values.len() == 1 {
                unit.set_address_mode(modes[0]);
            } else {
                unit.set_address_mode_uvw(UvwAddressingMode {
                    u: modes[0],
                    v: modes[1],
                    w: modes[2],
                });
            }
        }
        Keyword::TexBorderColour => {
            if let Some(colour) = tr.whole_colour(prop) {
                unit.set_border_colour(colour);
            }
        }
        Keyword::Filtering => match prop.values.len() {
            1 => {
                if let Some(options) = tr.enum_at(prop, 0, texture_filtering) {
                    unit.set_texture_filtering(options);
                }
            }
            3 => {
                let min = tr.enum_at(prop, 0, filter_option);
                let mag = tr.enum_at(prop, 1, filter_option);
                let mip = tr.enum_at(prop, 2, filter_option);
                if let (Some(min), Some(mag), Some(mip)) = (min, mag, mip) {
                    unit.set_filtering(min, mag, mip);
                }
            }
            count => tr.error(
                ErrorCode::InvalidParameters,
                &prop.location,
                format!("filtering expects 1 or 3 values, found {count}"),
            ),
        },
        Keyword::MaxAnisotropy => {
            if let Some(value) = tr.single_uint(prop) {
                unit.set_max_anisotropy(value);
            }
        }
        Keyword::MipmapBias => {
            if let Some(bias) = tr.single_number(prop) {
                unit.set_mipmap_bias(bias);
            }
        }
        Keyword::ColourOp => {
            if let Some(op) = tr.single_enum(prop, layer_blend_operation) {
                unit.set_colour_operation(op);
            }
        }
        Keyword::ColourOpEx => translate_colour_op_ex(tr, unit, prop),
        Keyword::AlphaOpEx => translate_alpha_op_ex(tr, unit, prop),
        Keyword::ColourOpMultipassFallback => {
            if !tr.expect_values(prop, 2, 2) {
                return;
            }
            if let (Some(src), Some(dest)) = (tr.enum_at(prop, 0, blend_factor), tr.enum_at(prop, 1, blend_factor)) {
                unit.set_colour_op_multipass_fallback(src, dest);
            }
        }
        Keyword::EnvMap => {
            if !tr.expect_values(prop, 1, 1) {
                return;
            }
            let is_off = prop.values[0].as_atom().and_then(|atom| truth_value(atom.id)) == Some(false);
            if is_off {
                unit.set_environment_map(false, EnvMapType::Curved);
            } else if let Some(map_type) = tr.enum_at(prop, 0, env_map_type) {
                unit.set_environment_map(true, map_type);
            }
        }
        Keyword::Scroll => {
            if let Some((u, v)) = number_pair(tr, prop) {
                unit.set_texture_scroll(u, v);
            }
        }
        Keyword::ScrollAnim => {
            if let Some((u, v)) = number_pair(tr, prop) {
                unit.set_scroll_animation(u, v);
            }
        }
        Keyword::Rotate => {
            if let Some(degrees) = tr.single_number(prop) {
                unit.set_texture_rotate(degrees.to_radians());
            }
        }
        Keyword::RotateAnim => {
            if let Some(speed) = tr.single_number(prop) {
                unit.set_rotate_animation(speed);
            }
        }
        Keyword::Scale => {
            if let Some((u, v)) = number_pair(tr, prop) {
                unit.set_texture_scale(u, v);
            }
        }
        Keyword::WaveXform => {
            if !tr.expect_values(prop, 6, 6) {
                return;
            }
            let transform = tr.enum_at(prop, 0, transform_type);
            let waveform = tr.enum_at(prop, 1, waveform_type);
            let mut numbers = [0.0f32; 4];
            for (offset, number) in numbers.iter_mut().enumerate() {
                match tr.number_at(prop, offset + 2) {
                    Some(value) => *number = value,
                    None => return,
                }
            }
            if let (Some(transform), Some(waveform)) = (transform, waveform) {
                let [base, frequency, phase, amplitude] = numbers;
                unit.set_transform_animation(transform, waveform, base, frequency, phase, amplitude);
            }
        }
        Keyword::Transform => {
            if !tr.expect_values(prop, 16, 16) {
                return;
            }
            let mut elements = [0.0f32; 16];
            for (index, element) in elements.iter_mut().enumerate() {
                match tr.number_at(prop, index) {
                    Some(value) => *element = value,
                    None => return,
                }
            }
            unit.set_texture_transform(Mat4::from_row_slice(&elements));
        }
        Keyword::BindingType => {
            let binding = tr.single_enum(prop, |id| match id {
                Keyword::Vertex => Some(BindingType::Vertex),
                Keyword::Fragment => Some(BindingType::Fragment),
                _ => None,
            });
            if let Some(binding) = binding {
                unit.set_binding_type(binding);
            }
        }
        Keyword::ContentType => {
            let content = tr.single_enum(prop, |id| match id {
                Keyword::Named => Some(ContentType::Named),
                Keyword::Shadow => Some(ContentType::Shadow),
                _ => None,
            });
            if let Some(content) = content {
                unit.set_content_type(content);
            }
        }
        _ => tr.error(
            ErrorCode::UnexpectedToken,
            &prop.location,
            format!("'{}' is not a texture_unit property", prop.name),
        ),
    }
}

fn number_pair(tr: &mut Translator<'_>, prop: &PropertyNode) -> Option<(f32, f32)> {
    if !tr.expect_values(prop, 2, 2) {
        return None;
    }
    let u = tr.number_at(prop, 0)?;
    let v = tr.number_at(prop, 1)?;
    Some((u, v))
}

/// `texture <name> [type] [unlimited | mipmaps] [alpha] [format] [gamma]`
fn translate_texture(tr: &mut Translator<'_>, unit: &mut TextureUnitState, prop: &PropertyNode) {
    if !tr.expect_values(prop, 1, 6) {
        return;
    }
    let Some(name) = tr.string_at(prop, 0) else {
        return;
    };

    let mut kind = TextureType::TwoD;
    let mut mipmaps = None;
    let mut is_alpha = false;
    let mut format = PixelFormat::Unknown;
    let mut gamma = false;
    for value in &prop.values[1..] {
        let Some(atom) = value.as_atom() else {
            tr.unexpected(value, "texture");
            return;
        };
        if let Some(parsed) = texture_type(atom.id) {
            kind = parsed;
        } else if atom.id == Keyword::Unlimited {
            mipmaps = Some(UNLIMITED_MIPMAPS);
        } else if atom.id == Keyword::Alpha {
            is_alpha = true;
        } else if atom.id == Keyword::Gamma {
            gamma = true;
        } else if let Ok(count) = atom.value.parse::<u32>() {
            mipmaps = Some(count);
        } else {
            let parsed = PixelFormat::from_name(&atom.value);
            if parsed == PixelFormat::Unknown {
                tr.error(
                    ErrorCode::InvalidParameters,
                    &atom.location,
                    format!("texture: invalid option '{}'", atom.value),
                );
                return;
            }
            format = parsed;
        }
    }

    unit.set_texture_name(name, kind);
    unit.set_num_mipmaps(mipmaps);
    unit.set_is_alpha(is_alpha);
    unit.set_desired_format(format);
    unit.set_hardware_gamma(gamma);
}

/// `anim_texture <base> <count> <duration>` or `anim_texture <frame>... <duration>`
fn translate_anim_texture(tr: &mut Translator<'_>, unit: &mut TextureUnitState, prop: &PropertyNode) {
    if !tr.expect_values(prop, 3, usize::MAX) {
        return;
    }
    let count_given = prop.values.len() == 3
        && prop.values[1]
            .as_atom()
            .is_some_and(|atom| !atom.quoted && atom.value.parse::<u32>().is_ok());
    if count_given {
        let (Some(base), Some(count), Some(duration)) =
            (tr.string_at(prop, 0), tr.uint_at(prop, 1), tr.number_at(prop, 2))
        else {
            return;
        };
        unit.set_animated_texture_name(&base, count as usize, duration);
        return;
    }

    let last = prop.values.len() - 1;
    let mut frames = Vec::with_capacity(last);
    for index in 0..last {
        match tr.string_at(prop, index) {
            Some(frame) => frames.push(frame),
            None => return,
        }
    }
    if let Some(duration) = tr.number_at(prop, last) {
        unit.set_animated_texture_names(frames, duration);
    }
}

/// `cubic_texture <name> combinedUVW|separateUV` or six faces then the mode
fn translate_cubic_texture(tr: &mut Translator<'_>, unit: &mut TextureUnitState, prop: &PropertyNode) {
    let count = prop.values.len();
    if count != 2 && count != 7 {
        tr.error(
            ErrorCode::InvalidParameters,
            &prop.location,
            format!("cubic_texture expects 2 or 7 values, found {count}"),
        );
        return;
    }
    let for_uvw = tr.enum_at(prop, count - 1, |id| match id {
        Keyword::CombinedUvw => Some(true),
        Keyword::SeparateUv => Some(false),
        _ => None,
    });
    let Some(for_uvw) = for_uvw else {
        return;
    };

    if count == 2 {
        if let Some(name) = tr.string_at(prop, 0) {
            unit.set_cubic_texture_name(&name, for_uvw);
        }
        return;
    }
    let mut faces = Vec::with_capacity(6);
    for index in 0..6 {
        match tr.string_at(prop, index) {
            Some(face) => faces.push(face),
            None => return,
        }
    }
    unit.set_cubic_texture_names(&faces, for_uvw);
}

/// Blend op and both sources, returning the index of the next value
fn blend_header(
    tr: &mut Translator<'_>,
    prop: &PropertyNode,
) -> Option<(LayerBlendOperationEx, LayerBlendSource, LayerBlendSource, usize)> {
    if !tr.expect_values(prop, 3, 10) {
        return None;
    }
    let op = tr.enum_at(prop, 0, layer_blend_operation_ex);
    let source1 = tr.enum_at(prop, 1, layer_blend_source);
    let source2 = tr.enum_at(prop, 2, layer_blend_source);
    Some((op?, source1?, source2?, 3))
}

fn manual_factor(
    tr: &mut Translator<'_>,
    prop: &PropertyNode,
    op: LayerBlendOperationEx,
    next: &mut usize,
) -> Option<f32> {
    if op != LayerBlendOperationEx::BlendManual {
        return Some(0.0);
    }
    let factor = tr.number_at(prop, *next)?;
    *next += 1;
    Some(factor)
}

/// `colour_op_ex <op> <src1> <src2> [factor] [r g b] [r g b]`
fn translate_colour_op_ex(tr: &mut Translator<'_>, unit: &mut TextureUnitState, prop: &PropertyNode) {
    let Some((op, source1, source2, mut next)) = blend_header(tr, prop) else {
        return;
    };
    let Some(factor) = manual_factor(tr, prop, op, &mut next) else {
        return;
    };

    let mut arg1 = ColourValue::WHITE;
    let mut arg2 = ColourValue::WHITE;
    for (source, arg) in [(source1, &mut arg1), (source2, &mut arg2)] {
        if source == LayerBlendSource::Manual {
            let Some(colour) = tr.colour_at(prop, next, 3) else {
                return;
            };
            *arg = colour;
            next += 3;
        }
    }
    if next != prop.values.len() {
        tr.error(
            ErrorCode::InvalidParameters,
            &prop.location,
            format!("colour_op_ex expects {next} values, found {}", prop.values.len()),
        );
        return;
    }
    unit.set_colour_operation_ex_full(op, source1, source2, arg1, arg2, factor);
}

/// `alpha_op_ex <op> <src1> <src2> [factor] [a] [a]`
fn translate_alpha_op_ex(tr: &mut Translator<'_>, unit: &mut TextureUnitState, prop: &PropertyNode) {
    let Some((op, source1, source2, mut next)) = blend_header(tr, prop) else {
        return;
    };
    let Some(factor) = manual_factor(tr, prop, op, &mut next) else {
        return;
    };

    let mut arg1 = 1.0;
    let mut arg2 = 1.0;
    for (source, arg) in [(source1, &mut arg1), (source2, &mut arg2)] {
        if source == LayerBlendSource::Manual {
            let Some(alpha) = tr.number_at(prop, next) else {
                return;
            };
            *arg = alpha;
            next += 1;
        }
    }
    if next != prop.values.len() {
        tr.error(
            ErrorCode::InvalidParameters,
            &prop.location,
            format!("alpha_op_ex expects {next} values, found {}", prop.values.len()),
        );
        return;
    }
    unit.set_alpha_operation(op, source1, source2, arg1, arg2, factor);
}

#[cfg(test)]
mod tests {
    use super::super::tests::compile;
    use super::UNLIMITED_MIPMAPS;
    use crate::config::CompilerConfig;
    use crate::foundation::math::ColourValue;
    use crate::material::{
        EnvMapType, FilterOptions, LayerBlendOperationEx, LayerBlendSource, TextureEffect, TextureType,
        TextureUnitState,
    };
    use crate::resources::PixelFormat;
    use crate::system::MaterialSystem;
    use approx::assert_relative_eq;

    fn unit_script(body: &str) -> String {
        format!("material M\n{{\n technique\n {{\n  pass\n  {{\n   texture_unit\n   {{\n{body}\n   }}\n  }}\n }}\n}}\n")
    }

    fn first_unit(system: &MaterialSystem) -> TextureUnitState {
        let material = system.materials.find("M").unwrap();
        let key = material.technique(0).unwrap().pass(0).unwrap();
        system.materials.passes().get(key).unwrap().texture_unit(0).unwrap().clone()
    }

    #[test]
    fn test_texture_options() {
        let (system, diagnostics) =
            compile(&unit_script("texture sky.dds 3d unlimited alpha PF_L8 gamma"), CompilerConfig::default());
        assert_eq!(diagnostics.error_count(), 0);
        let unit = first_unit(&system);
        assert_eq!(unit.texture_name(), "sky.dds");
        assert_eq!(unit.texture_type(), TextureType::ThreeD);
        assert_eq!(unit.num_mipmaps(), Some(UNLIMITED_MIPMAPS));
        assert!(unit.is_alpha());
        assert_eq!(unit.desired_format(), PixelFormat::L8);
        assert!(unit.hardware_gamma());
    }

    #[test]
    fn test_anim_texture_forms() {
        let (system, _) = compile(&unit_script("anim_texture flame.png 3 1.5"), CompilerConfig::default());
        let unit = first_unit(&system);
        assert_eq!(unit.num_frames(), 3);
        assert_eq!(unit.frame_texture_name(2), Some("flame_2.png"));

        let (system, _) = compile(&unit_script("anim_texture a.png b.png 2"), CompilerConfig::default());
        let unit = first_unit(&system);
        assert_eq!(unit.num_frames(), 2);
        assert_relative_eq!(unit.animation_duration(), 2.0);
    }

    #[test]
    fn test_colour_op_ex_manual_sources() {
        let (system, diagnostics) = compile(
            &unit_script("colour_op_ex blend_manual src_manual src_current 0.25 1 0 0"),
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 0);
        let unit = first_unit(&system);
        let blend = unit.colour_blend_mode();
        assert_eq!(blend.operation, LayerBlendOperationEx::BlendManual);
        assert_eq!(blend.source1, LayerBlendSource::Manual);
        assert_eq!(blend.colour_arg1, ColourValue::RED);
        assert_relative_eq!(blend.factor, 0.25);
    }

    #[test]
    fn test_effects_and_filtering() {
        let (system, diagnostics) = compile(
            &unit_script("env_map cubic_reflection\nrotate_anim 0.5\nfiltering point linear none\nrotate 90"),
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 0);
        let unit = first_unit(&system);
        assert!(unit.effects().contains(&TextureEffect::EnvironmentMap(EnvMapType::Reflection)));
        assert!(unit.effects().contains(&TextureEffect::Rotate { speed: 0.5 }));
        assert_eq!(unit.filtering(), (FilterOptions::Point, FilterOptions::Linear, FilterOptions::None));
        assert_relative_eq!(unit.texture_rotate(), std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_cubic_separate_faces() {
        let (system, _) = compile(&unit_script("cubic_texture sky.jpg separateUV"), CompilerConfig::default());
        let unit = first_unit(&system);
        assert!(unit.is_cubic());
        assert_eq!(unit.num_frames(), 6);
    }
}
