//! `compositor` blocks

use crate::resources::{
    CompositionPass, CompositionPassType, CompositionTargetPass, CompositionTechnique, FrameBuffers, PixelFormat,
    TargetInputMode, TextureDefinition,
};
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::error::ErrorCode;
use crate::script::keywords::Keyword;
use crate::system::MaterialSystem;

use super::common::{compare_function, stencil_operation};
use super::Translator;

pub(super) fn translate(tr: &mut Translator<'_>, system: &mut MaterialSystem, object: &ObjectNode) {
    if object.name.is_empty() {
        tr.error(ErrorCode::ObjectNameExpected, &object.location, "compositor requires a name");
        return;
    }

    let manager = &mut system.compositors;
    let key = match manager.create(&object.name, tr.group) {
        Ok(key) => key,
        Err(err) => {
            let Some(key) = manager.get_by_name(&object.name) else {
                tr.error(ErrorCode::ObjectAllocationError, &object.location, err.to_string());
                return;
            };
            if !tr.allow_duplicate(&err, &object.location) {
                return;
            }
            manager.reset(key, tr.group);
            key
        }
    };
    let Some(compositor) = manager.get_mut(key) else {
        return;
    };

    for child in &object.children {
        match child {
            AbstractNode::Object(child) if child.id == Keyword::Technique => {
                translate_technique(tr, compositor.create_technique(), child);
            }
            other => tr.unexpected(other, "compositor"),
        }
    }
}

fn translate_technique(tr: &mut Translator<'_>, technique: &mut CompositionTechnique, object: &ObjectNode) {
    for child in &object.children {
        match child {
            AbstractNode::Property(prop) => match prop.id {
                Keyword::Texture => translate_texture(tr, technique, prop),
                Keyword::Scheme => {
                    if let Some(scheme) = tr.single_string(prop) {
                        technique.scheme = scheme;
                    }
                }
                Keyword::CompositorLogic => {
                    if let Some(logic) = tr.single_string(prop) {
                        technique.compositor_logic = logic;
                    }
                }
                _ => tr.unexpected(child, "compositor technique"),
            },
            AbstractNode::Object(target) if target.id == Keyword::Target => {
                if target.name.is_empty() {
                    tr.error(ErrorCode::ObjectNameExpected, &target.location, "target requires an output name");
                    continue;
                }
                translate_target(tr, technique.create_target_pass(target.name.clone()), target);
            }
            AbstractNode::Object(target) if target.id == Keyword::TargetOutput => {
                translate_target(tr, technique.output_target_pass_mut(), target);
            }
            other => tr.unexpected(other, "compositor technique"),
        }
    }
}

/// `texture <name> <width> <height> <format>... [pooled] [gamma] [no_fsaa]`
fn translate_texture(tr: &mut Translator<'_>, technique: &mut CompositionTechnique, prop: &PropertyNode) {
    if !tr.expect_values(prop, 4, usize::MAX) {
        return;
    }
    let Some(name) = tr.string_at(prop, 0) else {
        return;
    };
    let mut definition = TextureDefinition::new(name);
    let mut next = 1;

    let Some((width, width_factor)) = texture_size(tr, prop, &mut next, Keyword::TargetWidth, Keyword::TargetWidthScaled)
    else {
        return;
    };
    let Some((height, height_factor)) =
        texture_size(tr, prop, &mut next, Keyword::TargetHeight, Keyword::TargetHeightScaled)
    else {
        return;
    };
    definition.width = width;
    definition.width_factor = width_factor;
    definition.height = height;
    definition.height_factor = height_factor;

    for value in &prop.values[next..] {
        let Some(atom) = value.as_atom() else {
            tr.unexpected(value, "texture");
            return;
        };
        match atom.id {
            Keyword::Pooled => definition.pooled = true,
            Keyword::Gamma => definition.hw_gamma_write = true,
            Keyword::NoFsaa => definition.fsaa = false,
            _ => {
                let format = PixelFormat::from_name(&atom.value);
                if format == PixelFormat::Unknown {
                    tr.error(
                        ErrorCode::InvalidParameters,
                        &atom.location,
                        format!("texture: unknown pixel format '{}'", atom.value),
                    );
                    return;
                }
                definition.formats.push(format);
            }
        }
    }
    if definition.formats.is_empty() {
        tr.error(ErrorCode::InvalidParameters, &prop.location, "texture requires at least one pixel format");
        return;
    }
    let name = definition.name.clone();
    *technique.create_texture_definition(name) = definition;
}

/// Fixed size, target size, or scaled target size; a fixed size has factor zero
fn texture_size(
    tr: &mut Translator<'_>,
    prop: &PropertyNode,
    next: &mut usize,
    target: Keyword,
    scaled: Keyword,
) -> Option<(u32, f32)> {
    let id = prop.values.get(*next).and_then(AbstractNode::as_atom).map(|atom| atom.id);
    let size = if id == Some(target) {
        *next += 1;
        (0, 1.0)
    } else if id == Some(scaled) {
        let factor = tr.number_at(prop, *next + 1)?;
        *next += 2;
        (0, factor)
    } else {
        let size = tr.uint_at(prop, *next)?;
        *next += 1;
        (size, 0.0)
    };
    Some(size)
}

fn translate_target(tr: &mut Translator<'_>, target: &mut CompositionTargetPass, object: &ObjectNode) {
    for child in &object.children {
        match child {
            AbstractNode::Property(prop) => match prop.id {
                Keyword::Input => {
                    let mode = tr.single_enum(prop, |id| match id {
                        Keyword::None => Some(TargetInputMode::None),
                        Keyword::Previous => Some(TargetInputMode::Previous),
                        _ => None,
                    });
                    if let Some(mode) = mode {
                        target.input_mode = mode;
                    }
                }
                Keyword::OnlyInitial => {
                    if let Some(enabled) = tr.single_bool(prop) {
                        target.only_initial = enabled;
                    }
                }
                Keyword::VisibilityMask => {
                    if let Some(mask) = tr.single_uint(prop) {
                        target.visibility_mask = mask;
                    }
                }
                Keyword::LodBias => {
                    if let Some(bias) = tr.single_number(prop) {
                        target.lod_bias = bias;
                    }
                }
                Keyword::MaterialScheme => {
                    if let Some(scheme) = tr.single_string(prop) {
                        target.material_scheme = scheme;
                    }
                }
                Keyword::Shadows => {
                    if let Some(enabled) = tr.single_bool(prop) {
                        target.shadows = enabled;
                    }
                }
                _ => tr.unexpected(child, "target"),
            },
            AbstractNode::Object(pass) if pass.id == Keyword::Pass => {
                let pass_type = match Keyword::from_word(&pass.name) {
                    Keyword::Clear => CompositionPassType::Clear,
                    Keyword::Stencil => CompositionPassType::Stencil,
                    Keyword::RenderScene => CompositionPassType::RenderScene,
                    Keyword::RenderQuad => CompositionPassType::RenderQuad,
                    _ => {
                        tr.error(
                            ErrorCode::InvalidParameters,
                            &pass.location,
                            format!("unknown compositor pass type '{}'", pass.name),
                        );
                        continue;
                    }
                };
                translate_pass(tr, target.create_pass(pass_type), pass);
            }
            other => tr.unexpected(other, "target"),
        }
    }
}

fn translate_pass(tr: &mut Translator<'_>, pass: &mut CompositionPass, object: &ObjectNode) {
    for child in &object.children {
        let AbstractNode::Property(prop) = child else {
            tr.unexpected(child, "compositor pass");
            continue;
        };
        match prop.id {
            Keyword::Material => {
                if let Some(material) = tr.single_string(prop) {
                    pass.material_name = Some(material);
                }
            }
            Keyword::Input => {
                if !tr.expect_values(prop, 2, 3) {
                    continue;
                }
                let id = tr.uint_at(prop, 0);
                let texture = tr.string_at(prop, 1);
                let mrt = if prop.values.len() == 3 { tr.uint_at(prop, 2) } else { Some(0) };
                if let (Some(id), Some(texture), Some(mrt)) = (id, texture, mrt) {
                    pass.set_input(id as usize, texture, mrt as usize);
                }
            }
            Keyword::Identifier => {
                if let Some(identifier) = tr.single_uint(prop) {
                    pass.identifier = identifier;
                }
            }
            Keyword::FirstRenderQueue | Keyword::LastRenderQueue => {
                let Some(queue) = tr.single_uint(prop) else {
                    continue;
                };
                let Ok(queue) = u8::try_from(queue) else {
                    tr.error(
                        ErrorCode::InvalidParameters,
                        &prop.location,
                        format!("{}: render queue {queue} is out of range", prop.name),
                    );
                    continue;
                };
                if prop.id == Keyword::FirstRenderQueue {
                    pass.first_render_queue = queue;
                } else {
                    pass.last_render_queue = queue;
                }
            }
            Keyword::Buffers => {
                let mut buffers = FrameBuffers::empty();
                for index in 0..prop.values.len() {
                    let buffer = tr.enum_at(prop, index, |id| match id {
                        Keyword::Colour => Some(FrameBuffers::COLOUR),
                        Keyword::Depth => Some(FrameBuffers::DEPTH),
                        Keyword::Stencil => Some(FrameBuffers::STENCIL),
                        _ => None,
                    });
                    match buffer {
                        Some(buffer) => buffers |= buffer,
                        None => break,
                    }
                }
                pass.clear_buffers = buffers;
            }
            Keyword::ColourValue => {
                if let Some(colour) = tr.whole_colour(prop) {
                    pass.clear_colour = colour;
                }
            }
            Keyword::DepthValue => {
                if let Some(depth) = tr.single_number(prop) {
                    pass.clear_depth = depth;
                }
            }
            Keyword::StencilValue => {
                if let Some(value) = tr.single_uint(prop) {
                    pass.clear_stencil = value;
                }
            }
            Keyword::Check => {
                if let Some(enabled) = tr.single_bool(prop) {
                    pass.stencil.check = enabled;
                }
            }
            Keyword::CompFunc => {
                if let Some(func) = tr.single_enum(prop, compare_function) {
                    pass.stencil.func = func;
                }
            }
            Keyword::RefValue => {
                if let Some(value) = tr.single_uint(prop) {
                    pass.stencil.reference = value;
                }
            }
            Keyword::Mask => {
                if let Some(mask) = tr.single_uint(prop) {
                    pass.stencil.mask = mask;
                }
            }
            Keyword::FailOp => {
                if let Some(op) = tr.single_enum(prop, stencil_operation) {
                    pass.stencil.fail_op = op;
                }
            }
            Keyword::DepthFailOp => {
                if let Some(op) = tr.single_enum(prop, stencil_operation) {
                    pass.stencil.depth_fail_op = op;
                }
            }
            Keyword::PassOp => {
                if let Some(op) = tr.single_enum(prop, stencil_operation) {
                    pass.stencil.pass_op = op;
                }
            }
            Keyword::TwoSided => {
                if let Some(enabled) = tr.single_bool(prop) {
                    pass.stencil.two_sided = enabled;
                }
            }
            _ => tr.unexpected(child, "compositor pass"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::compile;
    use crate::config::CompilerConfig;
    use crate::foundation::math::ColourValue;
    use crate::resources::{CompositionPassType, FrameBuffers, PixelFormat, StencilOperation, TargetInputMode};

    const BLOOM: &str = "compositor Bloom\n{\n technique\n {\n  texture rt0 target_width_scaled 0.25 256 PF_A8R8G8B8 pooled\n  target rt0\n  {\n   input previous\n  }\n  target_output\n  {\n   input none\n   pass clear\n   {\n    buffers colour stencil\n    colour_value 0 0 0 1\n   }\n   pass render_quad\n   {\n    material Bloom/Blur\n    input 0 rt0\n    pass_op replace\n   }\n  }\n }\n}\n";

    #[test]
    fn test_compositor_structure() {
        let (system, diagnostics) = compile(BLOOM, CompilerConfig::default());
        assert_eq!(diagnostics.error_count(), 0);
        let compositor = system.compositors.find("Bloom").unwrap();
        let technique = &compositor.techniques()[0];

        let texture = technique.texture_definition("rt0").unwrap();
        assert_eq!(texture.width, 0);
        assert_eq!(texture.width_factor, 0.25);
        assert_eq!(texture.height, 256);
        assert_eq!(texture.formats, vec![PixelFormat::A8R8G8B8]);
        assert!(texture.pooled);

        assert_eq!(technique.target_passes()[0].input_mode, TargetInputMode::Previous);
        let output = technique.output_target_pass().unwrap();
        let passes = output.passes();
        assert_eq!(passes[0].pass_type, CompositionPassType::Clear);
        assert_eq!(passes[0].clear_buffers, FrameBuffers::COLOUR | FrameBuffers::STENCIL);
        assert_eq!(passes[0].clear_colour, ColourValue::BLACK);
        assert_eq!(passes[1].material_name.as_deref(), Some("Bloom/Blur"));
        assert_eq!(passes[1].inputs[&0].texture, "rt0");
        assert_eq!(passes[1].stencil.pass_op, StencilOperation::Replace);
    }

    #[test]
    fn test_texture_requires_format() {
        let (_, diagnostics) = compile(
            "compositor C\n{\n technique\n {\n  texture rt0 128 128 pooled\n }\n}\n",
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 1);
    }
}
