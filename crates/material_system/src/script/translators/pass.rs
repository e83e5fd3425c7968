//! `pass` blocks

use crate::foundation::math::ColourValue;
use crate::material::{FogMode, FogSettings, Pass, ProgramSlot, TextureUnitState, TrackVertexColour};
use crate::resources::GpuProgramManager;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::error::ErrorCode;
use crate::script::keywords::Keyword;

use super::common::{
    blend_factor, blend_operation, compare_function, culling_mode, fog_mode, illumination_stage, light_type,
    manual_culling_mode, polygon_mode, scene_blend_type, shade_options,
};
use super::{program_ref, texture_unit, Translator};

pub(super) fn translate(tr: &mut Translator<'_>, pass: &mut Pass, programs: &GpuProgramManager, object: &ObjectNode) {
    if !object.name.is_empty() {
        pass.set_name(object.name.clone());
    }

    for node in &object.children {
        match node {
            AbstractNode::Property(prop) => translate_property(tr, pass, prop),
            AbstractNode::Object(child) => match program_slot(child.id) {
                Some(slot) => program_ref::translate(tr, pass, programs, slot, child),
                None if child.id == Keyword::TextureUnit => {
                    let mut unit = TextureUnitState::new();
                    unit.set_texture_filtering(tr.config.default_filtering);
                    unit.set_max_anisotropy(tr.config.default_anisotropy);
                    if !child.name.is_empty() {
                        unit.set_name(child.name.clone());
                    }
                    texture_unit::translate(tr, &mut unit, child);
                    pass.add_texture_unit(unit);
                }
                None => tr.unexpected(node, "pass"),
            },
            other => tr.unexpected(other, "pass"),
        }
    }
}

fn program_slot(id: Keyword) -> Option<ProgramSlot> {
    match id {
        Keyword::VertexProgramRef => Some(ProgramSlot::Vertex),
        Keyword::FragmentProgramRef => Some(ProgramSlot::Fragment),
        Keyword::GeometryProgramRef => Some(ProgramSlot::Geometry),
        Keyword::ShadowCasterVertexProgramRef => Some(ProgramSlot::ShadowCasterVertex),
        Keyword::ShadowReceiverVertexProgramRef => Some(ProgramSlot::ShadowReceiverVertex),
        Keyword::ShadowReceiverFragmentProgramRef => Some(ProgramSlot::ShadowReceiverFragment),
        _ => None,
    }
}

fn translate_property(tr: &mut Translator<'_>, pass: &mut Pass, prop: &PropertyNode) {
    match prop.id {
        Keyword::Ambient => {
            if let Some(colour) = tracked_colour(tr, pass, prop, TrackVertexColour::AMBIENT) {
                pass.set_ambient(colour);
            }
        }
        Keyword::Diffuse => {
            if let Some(colour) = tracked_colour(tr, pass, prop, TrackVertexColour::DIFFUSE) {
                pass.set_diffuse(colour);
            }
        }
        Keyword::Emissive => {
            if let Some(colour) = tracked_colour(tr, pass, prop, TrackVertexColour::EMISSIVE) {
                pass.set_emissive(colour);
            }
        }
        Keyword::Specular => translate_specular(tr, pass, prop),
        Keyword::SceneBlend => match prop.values.len() {
            1 => {
                if let Some(blend) = tr.enum_at(prop, 0, scene_blend_type) {
                    pass.set_scene_blend_type(blend);
                }
            }
            2 => {
                if let (Some(src), Some(dest)) = (tr.enum_at(prop, 0, blend_factor), tr.enum_at(prop, 1, blend_factor)) {
                    pass.set_scene_blending(src, dest);
                }
            }
            _ => {
                tr.expect_values(prop, 1, 2);
            }
        },
        Keyword::SeparateSceneBlend => match prop.values.len() {
            2 => {
                let colour = tr.enum_at(prop, 0, scene_blend_type);
                let alpha = tr.enum_at(prop, 1, scene_blend_type);
                if let (Some(colour), Some(alpha)) = (colour, alpha) {
                    let (src, dest) = colour.factors();
                    let (src_alpha, dest_alpha) = alpha.factors();
                    pass.set_separate_scene_blending(src, dest, src_alpha, dest_alpha);
                }
            }
            4 => {
                let mut factors = [None; 4];
                for (index, factor) in factors.iter_mut().enumerate() {
                    *factor = tr.enum_at(prop, index, blend_factor);
                }
                if let [Some(src), Some(dest), Some(src_alpha), Some(dest_alpha)] = factors {
                    pass.set_separate_scene_blending(src, dest, src_alpha, dest_alpha);
                }
            }
            _ => tr.error(
                ErrorCode::InvalidParameters,
                &prop.location,
                "separate_scene_blend expects 2 blend types or 4 blend factors",
            ),
        },
        Keyword::SceneBlendOp => {
            if let Some(op) = tr.single_enum(prop, blend_operation) {
                pass.set_scene_blending_operation(op);
            }
        }
        Keyword::SeparateSceneBlendOp => {
            if !tr.expect_values(prop, 2, 2) {
                return;
            }
            if let (Some(op), Some(alpha_op)) = (tr.enum_at(prop, 0, blend_operation), tr.enum_at(prop, 1, blend_operation)) {
                pass.set_separate_scene_blending_operation(op, alpha_op);
            }
        }
        Keyword::DepthCheck => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.set_depth_check(enabled);
            }
        }
        Keyword::DepthWrite => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.set_depth_write(enabled);
            }
        }
        Keyword::DepthFunc => {
            if let Some(func) = tr.single_enum(prop, compare_function) {
                pass.set_depth_function(func);
            }
        }
        Keyword::DepthBias => {
            if !tr.expect_values(prop, 1, 2) {
                return;
            }
            let constant = tr.number_at(prop, 0);
            let slope = if prop.values.len() == 2 { tr.number_at(prop, 1) } else { Some(0.0) };
            if let (Some(constant), Some(slope)) = (constant, slope) {
                pass.set_depth_bias(constant, slope);
            }
        }
        Keyword::IterationDepthBias => {
            if let Some(bias) = tr.single_number(prop) {
                pass.set_iteration_depth_bias(bias);
            }
        }
        Keyword::AlphaRejection => translate_alpha_rejection(tr, pass, prop),
        Keyword::AlphaToCoverage => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.set_alpha_to_coverage(enabled);
            }
        }
        Keyword::LightScissor => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.set_light_scissoring(enabled);
            }
        }
        Keyword::LightClipPlanes => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.set_light_clip_planes(enabled);
            }
        }
        Keyword::TransparentSorting => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.set_transparent_sorting(enabled);
            }
        }
        Keyword::IlluminationStage => {
            if let Some(stage) = tr.single_enum(prop, illumination_stage) {
                pass.set_illumination_stage(stage);
            }
        }
        Keyword::CullHardware => {
            if let Some(mode) = tr.single_enum(prop, culling_mode) {
                pass.set_culling_mode(mode);
            }
        }
        Keyword::CullSoftware => {
            if let Some(mode) = tr.single_enum(prop, manual_culling_mode) {
                pass.set_manual_culling_mode(mode);
            }
        }
        Keyword::NormaliseNormals => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.set_normalise_normals(enabled);
            }
        }
        Keyword::Lighting => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.set_lighting_enabled(enabled);
            }
        }
        Keyword::Shading => {
            if let Some(mode) = tr.single_enum(prop, shade_options) {
                pass.set_shading_mode(mode);
            }
        }
        Keyword::PolygonMode => {
            if let Some(mode) = tr.single_enum(prop, polygon_mode) {
                pass.set_polygon_mode(mode);
            }
        }
        Keyword::PolygonModeOverrideable => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.set_polygon_mode_overrideable(enabled);
            }
        }
        Keyword::FogOverride => translate_fog(tr, pass, prop),
        Keyword::ColourWrite => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.set_colour_write(enabled);
            }
        }
        Keyword::MaxLights => {
            if tr.expect_values(prop, 1, 1) {
                if let Some(count) = tr.u16_at(prop, 0) {
                    pass.set_max_simultaneous_lights(count);
                }
            }
        }
        Keyword::StartLight => {
            if tr.expect_values(prop, 1, 1) {
                if let Some(light) = tr.u16_at(prop, 0) {
                    pass.set_start_light(light);
                }
            }
        }
        Keyword::Iteration => translate_iteration(tr, pass, prop),
        Keyword::PointSize => {
            if let Some(size) = tr.single_number(prop) {
                pass.point_mut().size = size;
            }
        }
        Keyword::PointSprites => {
            if let Some(enabled) = tr.single_bool(prop) {
                pass.point_mut().sprites = enabled;
            }
        }
        Keyword::PointSizeAttenuation => translate_point_attenuation(tr, pass, prop),
        Keyword::PointSizeMin => {
            if let Some(size) = tr.single_number(prop) {
                pass.point_mut().min_size = size;
            }
        }
        Keyword::PointSizeMax => {
            if let Some(size) = tr.single_number(prop) {
                pass.point_mut().max_size = size;
            }
        }
        _ => tr.error(
            ErrorCode::UnexpectedToken,
            &prop.location,
            format!("'{}' is not a pass property", prop.name),
        ),
    }
}

fn is_vertex_colour(prop: &PropertyNode) -> bool {
    matches!(prop.values.first(), Some(AbstractNode::Atom(atom)) if atom.id == Keyword::VertexColour)
}

/// `vertexcolour` or an explicit colour; the tracking bit follows the choice
fn tracked_colour(
    tr: &mut Translator<'_>,
    pass: &mut Pass,
    prop: &PropertyNode,
    channel: TrackVertexColour,
) -> Option<ColourValue> {
    if is_vertex_colour(prop) {
        if tr.expect_values(prop, 1, 1) {
            pass.set_vertex_colour_tracking(channel, true);
        }
        return None;
    }
    let colour = tr.whole_colour(prop)?;
    pass.set_vertex_colour_tracking(channel, false);
    Some(colour)
}

fn translate_specular(tr: &mut Translator<'_>, pass: &mut Pass, prop: &PropertyNode) {
    if is_vertex_colour(prop) {
        if !tr.expect_values(prop, 1, 2) {
            return;
        }
        if prop.values.len() == 2 {
            let Some(shininess) = tr.number_at(prop, 1) else {
                return;
            };
            pass.set_shininess(shininess);
        }
        pass.set_vertex_colour_tracking(TrackVertexColour::SPECULAR, true);
        return;
    }

    let (colour, shininess) = match prop.values.len() {
        3 => (tr.colour_at(prop, 0, 3), None),
        4 => (tr.colour_at(prop, 0, 3), tr.number_at(prop, 3)),
        5 => (tr.colour_at(prop, 0, 4), tr.number_at(prop, 4)),
        _ => {
            tr.error(
                ErrorCode::InvalidParameters,
                &prop.location,
                "specular expects vertexcolour or 3 to 5 numbers",
            );
            return;
        }
    };
    let Some(colour) = colour else {
        return;
    };
    if prop.values.len() > 3 && shininess.is_none() {
        return;
    }
    pass.set_specular(colour);
    if let Some(shininess) = shininess {
        pass.set_shininess(shininess);
    }
    pass.set_vertex_colour_tracking(TrackVertexColour::SPECULAR, false);
}

fn translate_alpha_rejection(tr: &mut Translator<'_>, pass: &mut Pass, prop: &PropertyNode) {
    if !tr.expect_values(prop, 1, 2) {
        return;
    }
    let Some(func) = tr.enum_at(prop, 0, compare_function) else {
        return;
    };
    let value = if prop.values.len() == 2 {
        let Some(value) = tr.uint_at(prop, 1) else {
            return;
        };
        match u8::try_from(value) {
            Ok(value) => value,
            Err(_) => {
                tr.error(
                    ErrorCode::InvalidParameters,
                    &prop.location,
                    format!("alpha_rejection value {value} exceeds 255"),
                );
                return;
            }
        }
    } else {
        0
    };
    pass.set_alpha_rejection(func, value);
}

/// `fog_override <bool> [type [r g b density start end]]`
fn translate_fog(tr: &mut Translator<'_>, pass: &mut Pass, prop: &PropertyNode) {
    let count = prop.values.len();
    if !matches!(count, 1 | 2 | 8) {
        tr.error(
            ErrorCode::InvalidParameters,
            &prop.location,
            format!("fog_override expects 1, 2 or 8 values, found {count}"),
        );
        return;
    }
    let Some(enabled) = tr.bool_at(prop, 0) else {
        return;
    };
    let mut fog = FogSettings {
        enabled,
        ..FogSettings::default()
    };
    if count >= 2 {
        let Some(mode) = tr.enum_at(prop, 1, fog_mode) else {
            return;
        };
        fog.mode = mode;
    }
    if count == 8 {
        let colour = tr.colour_at(prop, 2, 3);
        let density = tr.number_at(prop, 5);
        let start = tr.number_at(prop, 6);
        let end = tr.number_at(prop, 7);
        let (Some(colour), Some(density), Some(start), Some(end)) = (colour, density, start, end) else {
            return;
        };
        fog.colour = colour;
        fog.density = density;
        fog.start = start;
        fog.end = end;
    }
    if !enabled {
        fog.mode = FogMode::None;
    }
    pass.set_fog(fog);
}

/// `once`, `once_per_light [type]` or `N [per_light [type] | per_n_lights n [type]]`
fn translate_iteration(tr: &mut Translator<'_>, pass: &mut Pass, prop: &PropertyNode) {
    if !tr.expect_values(prop, 1, 4) {
        return;
    }
    let first = prop.values[0].as_atom().map(|atom| atom.id);
    match first {
        Some(Keyword::Once) => {
            if tr.expect_values(prop, 1, 1) {
                pass.set_iterate_per_light(false, None);
                pass.set_pass_iteration_count(1);
            }
        }
        Some(Keyword::OncePerLight) => {
            if !tr.expect_values(prop, 1, 2) {
                return;
            }
            let only = if prop.values.len() == 2 {
                match tr.enum_at(prop, 1, light_type) {
                    Some(kind) => Some(kind),
                    None => return,
                }
            } else {
                None
            };
            pass.set_iterate_per_light(true, only);
            pass.set_light_count_per_iteration(1);
            pass.set_pass_iteration_count(1);
        }
        _ => {
            let Some(count) = tr.uint_at(prop, 0) else {
                return;
            };
            if prop.values.len() == 1 {
                pass.set_iterate_per_light(false, None);
                pass.set_pass_iteration_count(count);
                return;
            }
            let mode = prop.values[1].as_atom().map(|atom| atom.id);
            match mode {
                Some(Keyword::PerLight) => {
                    if !tr.expect_values(prop, 2, 3) {
                        return;
                    }
                    let only = if prop.values.len() == 3 {
                        match tr.enum_at(prop, 2, light_type) {
                            Some(kind) => Some(kind),
                            None => return,
                        }
                    } else {
                        None
                    };
                    pass.set_iterate_per_light(true, only);
                    pass.set_light_count_per_iteration(1);
                    pass.set_pass_iteration_count(count);
                }
                Some(Keyword::PerNLights) => {
                    if !tr.expect_values(prop, 3, 4) {
                        return;
                    }
                    let Some(lights) = tr.u16_at(prop, 2) else {
                        return;
                    };
                    let only = if prop.values.len() == 4 {
                        match tr.enum_at(prop, 3, light_type) {
                            Some(kind) => Some(kind),
                            None => return,
                        }
                    } else {
                        None
                    };
                    pass.set_iterate_per_light(true, only);
                    pass.set_light_count_per_iteration(lights);
                    pass.set_pass_iteration_count(count);
                }
                _ => tr.error(
                    ErrorCode::InvalidParameters,
                    prop.values[1].location(),
                    format!("iteration: expected per_light or per_n_lights, found '{}'", prop.values[1].text()),
                ),
            }
        }
    }
}

/// `point_size_attenuation <bool> [constant linear quadratic]`
fn translate_point_attenuation(tr: &mut Translator<'_>, pass: &mut Pass, prop: &PropertyNode) {
    let count = prop.values.len();
    if count != 1 && count != 4 {
        tr.error(
            ErrorCode::InvalidParameters,
            &prop.location,
            "point_size_attenuation expects on/off optionally followed by 3 coefficients",
        );
        return;
    }
    let Some(enabled) = tr.bool_at(prop, 0) else {
        return;
    };
    let mut coefficients = pass.point().attenuation_coefficients;
    if count == 4 {
        for (index, coefficient) in coefficients.iter_mut().enumerate() {
            match tr.number_at(prop, index + 1) {
                Some(value) => *coefficient = value,
                None => return,
            }
        }
    }
    let point = pass.point_mut();
    point.attenuation = enabled;
    point.attenuation_coefficients = coefficients;
}

#[cfg(test)]
mod tests {
    use super::super::tests::compile;
    use crate::config::CompilerConfig;
    use crate::foundation::math::ColourValue;
    use crate::material::{
        CompareFunction, CullingMode, FogMode, LightType, Pass, SceneBlendFactor, TrackVertexColour,
    };
    use crate::script::error::ErrorCode;
    use crate::system::MaterialSystem;

    fn first_pass(system: &MaterialSystem, material: &str) -> Pass {
        let material = system.materials.find(material).unwrap();
        let key = material.technique(0).unwrap().pass(0).unwrap();
        system.materials.passes().get(key).unwrap().clone()
    }

    fn pass_script(body: &str) -> String {
        format!("material M\n{{\n technique\n {{\n  pass\n  {{\n{body}\n  }}\n }}\n}}\n")
    }

    #[test]
    fn test_colours_and_tracking() {
        let (system, diagnostics) = compile(
            &pass_script("ambient vertexcolour\ndiffuse 0.5 0.5 0.5 0.25\nspecular 1 1 1 32\nemissive 0 0 0"),
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 0);
        let pass = first_pass(&system, "M");
        assert!(pass.vertex_colour_tracking().contains(TrackVertexColour::AMBIENT));
        assert_eq!(pass.diffuse(), ColourValue::new(0.5, 0.5, 0.5, 0.25));
        assert_eq!(pass.specular(), ColourValue::WHITE);
        assert_eq!(pass.shininess(), 32.0);
    }

    #[test]
    fn test_blending_and_depth() {
        let (system, diagnostics) = compile(
            &pass_script("scene_blend alpha_blend\ndepth_write off\ndepth_func less\ncull_hardware none\ndepth_bias 1 2"),
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 0);
        let pass = first_pass(&system, "M");
        assert_eq!(
            pass.scene_blending(),
            (SceneBlendFactor::SourceAlpha, SceneBlendFactor::OneMinusSourceAlpha)
        );
        assert!(!pass.depth_write());
        assert_eq!(pass.depth_function(), CompareFunction::Less);
        assert_eq!(pass.culling_mode(), CullingMode::None);
        assert_eq!(pass.depth_bias().slope_scale, 2.0);
        assert!(pass.is_transparent());
    }

    #[test]
    fn test_iteration_forms() {
        let (system, diagnostics) = compile(&pass_script("iteration 2 per_n_lights 3 point"), CompilerConfig::default());
        assert_eq!(diagnostics.error_count(), 0);
        let iteration = first_pass(&system, "M").iteration();
        assert!(iteration.per_light);
        assert_eq!(iteration.count, 2);
        assert_eq!(iteration.lights_per_iteration, 3);
        assert_eq!(iteration.only_light_type, Some(LightType::Point));

        let (system, _) = compile(&pass_script("iteration once_per_light directional"), CompilerConfig::default());
        let iteration = first_pass(&system, "M").iteration();
        assert!(iteration.per_light);
        assert_eq!(iteration.only_light_type, Some(LightType::Directional));

        let (_, diagnostics) = compile(&pass_script("iteration 2 per_pixel"), CompilerConfig::default());
        assert_eq!(diagnostics.entries()[0].code, ErrorCode::InvalidParameters);
    }

    #[test]
    fn test_fog_override_full_form() {
        let (system, diagnostics) = compile(
            &pass_script("fog_override true linear 1 0 0 0.1 10 100"),
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 0);
        let fog = first_pass(&system, "M").fog();
        assert!(fog.enabled);
        assert_eq!(fog.mode, FogMode::Linear);
        assert_eq!(fog.colour, ColourValue::RED);
        assert_eq!(fog.end, 100.0);
    }

    #[test]
    fn test_bad_property_keeps_siblings() {
        let (system, diagnostics) = compile(
            &pass_script("lighting maybe\nalpha_rejection greater 300\nmax_lights 4"),
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 2);
        let pass = first_pass(&system, "M");
        assert!(pass.lighting_enabled());
        assert_eq!(pass.max_simultaneous_lights(), 4);
    }
}
