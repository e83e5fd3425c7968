//! `material` blocks

use crate::material::{CompileOptions, Material};
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::error::ErrorCode;
use crate::script::keywords::Keyword;
use crate::system::MaterialSystem;

use super::{technique, Translator};

pub(super) fn translate(tr: &mut Translator<'_>, system: &mut MaterialSystem, object: &ObjectNode) {
    if object.name.is_empty() {
        tr.error(ErrorCode::ObjectNameExpected, &object.location, "material requires a name");
        return;
    }

    let key = match system.materials.create(&object.name, tr.group) {
        Ok(key) => key,
        Err(err) => {
            let Some(key) = system.materials.get_by_name(&object.name) else {
                tr.error(ErrorCode::ObjectAllocationError, &object.location, err.to_string());
                return;
            };
            if !tr.allow_duplicate(&err, &object.location) {
                return;
            }
            system.materials.reset(key, tr.group);
            key
        }
    };

    let MaterialSystem {
        materials,
        programs,
        capabilities,
        ..
    } = system;
    let Some((material, passes)) = materials.get_with_passes_mut(key) else {
        return;
    };

    for child in &object.children {
        match child {
            AbstractNode::Property(prop) => translate_property(tr, material, prop),
            AbstractNode::Object(child) if child.id == Keyword::Technique => {
                let technique = material.create_technique();
                technique::translate(tr, technique, passes, programs, child);
            }
            other => tr.unexpected(other, "material"),
        }
    }

    let aliases = material.texture_aliases().clone();
    if !aliases.is_empty() {
        material.apply_texture_aliases(passes, &aliases, true);
    }

    if tr.config.compile_materials {
        let options = CompileOptions {
            capabilities: &*capabilities,
            programs: &*programs,
            auto_manage_texture_units: tr.config.auto_manage_texture_units,
        };
        for (index, reason) in material.compile(passes, options) {
            log::debug!("Material '{}' technique {index} unsupported: {reason}", object.name);
        }
    }
    log::debug!("Translated material '{}'", object.name);
}

fn translate_property(tr: &mut Translator<'_>, material: &mut Material, prop: &PropertyNode) {
    match prop.id {
        Keyword::LodDistances => {
            if !tr.expect_values(prop, 1, usize::MAX) {
                return;
            }
            let mut distances = Vec::with_capacity(prop.values.len());
            for index in 0..prop.values.len() {
                match tr.number_at(prop, index) {
                    Some(distance) => distances.push(distance),
                    None => return,
                }
            }
            material.set_lod_distances(distances);
        }
        Keyword::ReceiveShadows => {
            if let Some(enabled) = tr.single_bool(prop) {
                material.set_receive_shadows(enabled);
            }
        }
        Keyword::TransparencyCastsShadows => {
            if let Some(enabled) = tr.single_bool(prop) {
                material.set_transparency_casts_shadows(enabled);
            }
        }
        Keyword::SetTextureAlias => {
            if !tr.expect_values(prop, 2, 2) {
                return;
            }
            if let (Some(alias), Some(texture)) = (tr.string_at(prop, 0), tr.string_at(prop, 1)) {
                material.set_texture_alias(alias, texture);
            }
        }
        _ => tr.error(
            ErrorCode::UnexpectedToken,
            &prop.location,
            format!("'{}' is not a material property", prop.name),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::compile;
    use crate::config::CompilerConfig;
    use crate::script::error::ErrorCode;

    #[test]
    fn test_material_properties() {
        let (system, diagnostics) = compile(
            "material Rock\n{\n lod_distances 100 200\n receive_shadows off\n transparency_casts_shadows on\n technique\n {\n  pass\n  {\n  }\n }\n}\n",
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 0);
        let material = system.materials.find("Rock").unwrap();
        assert_eq!(material.lod_distances(), &[100.0, 200.0]);
        assert!(!material.receive_shadows());
        assert!(material.transparency_casts_shadows());
        assert_eq!(material.num_techniques(), 1);
        assert!(material.is_compiled());
    }

    #[test]
    fn test_texture_alias_applied() {
        let (system, diagnostics) = compile(
            "material Wall\n{\n set_texture_alias DiffuseMap brick.png\n technique\n {\n  pass\n  {\n   texture_unit\n   {\n    texture_alias DiffuseMap\n    texture blank.png\n   }\n  }\n }\n}\n",
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 0);
        let material = system.materials.find("Wall").unwrap();
        let pass_key = material.technique(0).unwrap().pass(0).unwrap();
        let pass = system.materials.passes().get(pass_key).unwrap();
        assert_eq!(pass.texture_unit(0).unwrap().texture_name(), "brick.png");
    }

    #[test]
    fn test_unknown_property_is_reported() {
        let (system, diagnostics) = compile("material M\n{\n glow on\n}\n", CompilerConfig::default());
        assert_eq!(diagnostics.entries()[0].code, ErrorCode::UnexpectedToken);
        assert!(system.materials.find("M").is_some());
    }
}
