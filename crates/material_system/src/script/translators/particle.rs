//! `particle_system` blocks
//!
//! Parameters are kept as text and checked against the factory tables of the
//! renderer, emitter or affector type they are set on.

use crate::resources::{ParamDictionary, ParticleError};
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::error::{ErrorCode, Location};
use crate::script::keywords::Keyword;
use crate::system::MaterialSystem;

use super::common::joined_values;
use super::Translator;

pub(super) fn translate(tr: &mut Translator<'_>, system: &mut MaterialSystem, object: &ObjectNode) {
    if object.name.is_empty() {
        tr.error(ErrorCode::ObjectNameExpected, &object.location, "particle_system requires a name");
        return;
    }

    let manager = &mut system.particle_systems;
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
    let Some((template, factories)) = manager.get_mut(key) else {
        return;
    };

    // The renderer decides which parameters the template accepts
    if let Some(prop) = object.property(Keyword::Renderer) {
        if let Some(renderer) = tr.single_string(prop) {
            if !factories.has_renderer(&renderer) {
                tr.error(
                    ErrorCode::InvalidParameters,
                    &prop.location,
                    format!("unknown particle renderer '{renderer}'"),
                );
            } else {
                template.set_renderer(&renderer, factories);
            }
        }
    }

    for child in &object.children {
        match child {
            AbstractNode::Property(prop) if prop.id == Keyword::Renderer => {}
            AbstractNode::Property(prop) => {
                let result = template.set_parameter(&prop.name, joined_values(&prop.values));
                report(tr, result, &prop.location);
            }
            AbstractNode::Object(child) if child.id == Keyword::Emitter => {
                match factories.create_emitter(&child.name) {
                    Ok(mut emitter) => {
                        set_parameters(tr, &mut emitter.parameters, child);
                        template.add_emitter(emitter);
                    }
                    Err(err) => report(tr, Err(err), &child.location),
                }
            }
            AbstractNode::Object(child) if child.id == Keyword::Affector => {
                match factories.create_affector(&child.name) {
                    Ok(mut affector) => {
                        set_parameters(tr, &mut affector.parameters, child);
                        template.add_affector(affector);
                    }
                    Err(err) => report(tr, Err(err), &child.location),
                }
            }
            other => tr.unexpected(other, "particle_system"),
        }
    }
}

fn set_parameters(tr: &mut Translator<'_>, parameters: &mut ParamDictionary, object: &ObjectNode) {
    for child in &object.children {
        match child {
            AbstractNode::Property(PropertyNode { name, values, location, .. }) => {
                let result = parameters.set(name, joined_values(values));
                report(tr, result, location);
            }
            other => tr.unexpected(other, &object.cls),
        }
    }
}

fn report(tr: &mut Translator<'_>, result: Result<(), ParticleError>, location: &Location) {
    if let Err(err) = result {
        tr.error(ErrorCode::InvalidParameters, location, err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::compile;
    use crate::config::CompilerConfig;
    use crate::script::error::ErrorCode;

    #[test]
    fn test_particle_system() {
        let (system, diagnostics) = compile(
            "particle_system Smoke\n{\n material SmokeMat\n quota 500\n billboard_type point\n renderer billboard\n emitter Point\n {\n  angle 11\n  colour 0.8 0.8 0.8 1\n }\n affector LinearForce\n {\n  force_vector 0 -9.8 0\n }\n}\n",
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 0);
        let template = system.particle_systems.find("Smoke").unwrap();
        assert_eq!(template.material_name(), Some("SmokeMat"));
        assert_eq!(template.quota(), 500);
        assert_eq!(template.emitters()[0].parameters.get("colour"), Some("0.8 0.8 0.8 1"));
        assert_eq!(template.affectors()[0].affector_type(), "LinearForce");
        assert_eq!(template.parameters().get("billboard_type"), Some("point"));
    }

    #[test]
    fn test_unknown_types_and_parameters() {
        let (system, diagnostics) = compile(
            "particle_system Bad\n{\n glitter 4\n emitter Fountain\n {\n }\n}\n",
            CompilerConfig::default(),
        );
        let codes: Vec<_> = diagnostics.entries().iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::InvalidParameters, ErrorCode::InvalidParameters]);
        assert!(system.particle_systems.find("Bad").unwrap().emitters().is_empty());
    }
}
