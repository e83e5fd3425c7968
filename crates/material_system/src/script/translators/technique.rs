//! `technique` blocks

use crate::material::{PassStore, Technique};
use crate::resources::GpuProgramManager;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::error::ErrorCode;
use crate::script::keywords::Keyword;

use super::{pass, Translator};

pub(super) fn translate(
    tr: &mut Translator<'_>,
    technique: &mut Technique,
    passes: &mut PassStore,
    programs: &GpuProgramManager,
    object: &ObjectNode,
) {
    if !object.name.is_empty() {
        technique.set_name(object.name.clone());
    }

    for child in &object.children {
        match child {
            AbstractNode::Property(prop) => translate_property(tr, technique, prop),
            AbstractNode::Object(child) if child.id == Keyword::Pass => {
                let key = technique.create_pass(passes);
                if let Some(pass) = passes.get_mut(key) {
                    pass::translate(tr, pass, programs, child);
                }
            }
            other => tr.unexpected(other, "technique"),
        }
    }
}

fn translate_property(tr: &mut Translator<'_>, technique: &mut Technique, prop: &PropertyNode) {
    match prop.id {
        Keyword::Scheme => {
            if let Some(scheme) = tr.single_string(prop) {
                technique.set_scheme(scheme);
            }
        }
        Keyword::LodIndex => {
            if !tr.expect_values(prop, 1, 1) {
                return;
            }
            if let Some(index) = tr.u16_at(prop, 0) {
                technique.set_lod_index(index);
            }
        }
        Keyword::ShadowCasterMaterial => {
            if let Some(name) = tr.single_string(prop) {
                technique.set_shadow_caster_material(Some(name));
            }
        }
        Keyword::ShadowReceiverMaterial => {
            if let Some(name) = tr.single_string(prop) {
                technique.set_shadow_receiver_material(Some(name));
            }
        }
        _ => tr.error(
            ErrorCode::UnexpectedToken,
            &prop.location,
            format!("'{}' is not a technique property", prop.name),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::compile;
    use crate::config::CompilerConfig;

    #[test]
    fn test_technique_properties() {
        let (system, diagnostics) = compile(
            "material M\n{\n technique Low\n {\n  scheme Mobile\n  lod_index 2\n  shadow_caster_material Caster\n  pass first\n  {\n  }\n  pass second\n  {\n  }\n }\n}\n",
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 0);
        let material = system.materials.find("M").unwrap();
        let technique = material.technique(0).unwrap();
        assert_eq!(technique.name(), "Low");
        assert_eq!(technique.scheme(), "Mobile");
        assert_eq!(technique.lod_index(), 2);
        assert_eq!(technique.shadow_caster_material(), Some("Caster"));
        assert_eq!(technique.num_passes(), 2);
        let second = system.materials.passes().get(technique.pass(1).unwrap()).unwrap();
        assert_eq!(second.name(), "second");
        assert_eq!(second.index(), 1);
    }
}
