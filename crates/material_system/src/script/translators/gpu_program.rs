//! `vertex_program`, `fragment_program` and `geometry_program` declarations

use crate::resources::{GpuProgram, GpuProgramType};
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::error::ErrorCode;
use crate::script::keywords::Keyword;
use crate::system::MaterialSystem;

use super::common::joined_values;
use super::{parameters, Translator};

pub(super) fn translate(tr: &mut Translator<'_>, system: &mut MaterialSystem, object: &ObjectNode) {
    let program_type = match object.id {
        Keyword::FragmentProgram => GpuProgramType::Fragment,
        Keyword::GeometryProgram => GpuProgramType::Geometry,
        _ => GpuProgramType::Vertex,
    };
    if object.name.is_empty() {
        tr.error(ErrorCode::ObjectNameExpected, &object.location, format!("{} requires a name", object.cls));
        return;
    }
    let language = match object.values.first() {
        Some(AbstractNode::Atom(atom)) => atom.value.clone(),
        _ => {
            tr.error(
                ErrorCode::StringExpected,
                &object.location,
                format!("{} '{}' requires a language", object.cls, object.name),
            );
            return;
        }
    };

    let programs = &mut system.programs;
    let key = match programs.create(tr.group, GpuProgram::new(object.name.clone(), program_type, language.clone())) {
        Ok(key) => key,
        Err(err) => {
            let Some(key) = programs.get_by_name(&object.name) else {
                tr.error(ErrorCode::ObjectAllocationError, &object.location, err.to_string());
                return;
            };
            if !tr.allow_duplicate(&err, &object.location) {
                return;
            }
            programs.set_group(key, tr.group);
            if let Some(program) = programs.get_mut(key) {
                program.reset(program_type, language);
            }
            key
        }
    };
    let Some(program) = programs.get_mut(key) else {
        return;
    };

    for child in &object.children {
        match child {
            AbstractNode::Property(prop) => translate_property(tr, program, prop),
            AbstractNode::Object(params) if params.id == Keyword::DefaultParams => {
                for node in &params.children {
                    match node {
                        AbstractNode::Property(prop) => {
                            if !parameters::translate_parameter(tr, program.default_parameters_mut(), prop) {
                                tr.error(
                                    ErrorCode::UnexpectedToken,
                                    &prop.location,
                                    format!("'{}' is not valid in default_params", prop.name),
                                );
                            }
                        }
                        other => tr.unexpected(other, "default_params"),
                    }
                }
            }
            other => tr.unexpected(other, &object.cls),
        }
    }
    log::debug!("Declared {} '{}' ({})", object.cls, object.name, program.language());
}

fn translate_property(tr: &mut Translator<'_>, program: &mut GpuProgram, prop: &PropertyNode) {
    match prop.id {
        Keyword::Source => {
            if let Some(source) = tr.single_string(prop) {
                program.source = source;
            }
        }
        Keyword::Syntax => {
            if let Some(syntax) = tr.single_string(prop) {
                program.syntax = syntax;
            }
        }
        Keyword::EntryPoint => {
            if let Some(entry) = tr.single_string(prop) {
                program.entry_point = entry;
            }
        }
        Keyword::Profiles | Keyword::Target => {
            if !tr.expect_values(prop, 1, usize::MAX) {
                return;
            }
            let mut profiles = Vec::with_capacity(prop.values.len());
            for index in 0..prop.values.len() {
                match tr.string_at(prop, index) {
                    Some(profile) => profiles.push(profile),
                    None => return,
                }
            }
            program.profiles = profiles;
        }
        Keyword::IncludesSkeletalAnimation => {
            if let Some(enabled) = tr.single_bool(prop) {
                program.skeletal_animation = enabled;
            }
        }
        Keyword::IncludesMorphAnimation => {
            if let Some(enabled) = tr.single_bool(prop) {
                program.morph_animation = enabled;
            }
        }
        Keyword::IncludesPoseAnimation => {
            if tr.expect_values(prop, 1, 1) {
                if let Some(poses) = tr.u16_at(prop, 0) {
                    program.pose_animation = poses;
                }
            }
        }
        Keyword::UsesVertexTextureFetch => {
            if let Some(enabled) = tr.single_bool(prop) {
                program.vertex_texture_fetch = enabled;
            }
        }
        Keyword::UsesAdjacencyInformation => {
            if let Some(enabled) = tr.single_bool(prop) {
                program.adjacency_information = enabled;
            }
        }
        _ => {
            program
                .custom_parameters
                .insert(prop.name.clone(), joined_values(&prop.values));
        }
    }
}
