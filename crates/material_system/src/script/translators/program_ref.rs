//! `*_program_ref` blocks inside a pass

use crate::material::{GpuProgramUsage, Pass, ProgramSlot};
use crate::resources::GpuProgramManager;
use crate::script::ast::{AbstractNode, ObjectNode};
use crate::script::error::ErrorCode;

use super::{parameters, Translator};

pub(super) fn translate(
    tr: &mut Translator<'_>,
    pass: &mut Pass,
    programs: &GpuProgramManager,
    slot: ProgramSlot,
    object: &ObjectNode,
) {
    if object.name.is_empty() {
        tr.error(
            ErrorCode::ObjectNameExpected,
            &object.location,
            format!("{} requires a program name", object.cls),
        );
        return;
    }

    let mut usage = GpuProgramUsage::new(slot.program_type());
    usage.set_program_name(object.name.clone(), programs);
    for child in &object.children {
        match child {
            AbstractNode::Property(prop) => {
                if !parameters::translate_parameter(tr, usage.parameters_mut(), prop) {
                    tr.error(
                        ErrorCode::UnexpectedToken,
                        &prop.location,
                        format!("'{}' is not valid in {}", prop.name, object.cls),
                    );
                }
            }
            other => tr.unexpected(other, &object.cls),
        }
    }
    pass.set_program(slot, Some(usage));
}

#[cfg(test)]
mod tests {
    use super::super::tests::compile;
    use crate::config::CompilerConfig;
    use crate::material::ProgramSlot;
    use crate::resources::{AutoConstantExtra, AutoConstantType, GpuConstant};
    use crate::script::error::ErrorCode;

    #[test]
    fn test_program_ref_binds_and_layers_parameters() {
        let (system, diagnostics) = compile(
            "vertex_program Lit glsl\n{\n source lit.vert\n default_params\n {\n  param_named scale float 2\n }\n}\n\
             material M\n{\n technique\n {\n  pass\n  {\n   vertex_program_ref Lit\n   {\n    param_named_auto wvp worldviewproj_matrix\n    param_indexed 0 float4 1 2\n   }\n  }\n }\n}\n",
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.error_count(), 0);
        let material = system.materials.find("M").unwrap();
        let pass = system.materials.passes().get(material.technique(0).unwrap().pass(0).unwrap()).unwrap();
        let usage = pass.program(ProgramSlot::Vertex).unwrap();
        assert!(usage.program().is_some());
        let params = usage.parameters().unwrap();
        assert_eq!(params.named("scale"), Some(&GpuConstant::Float(vec![2.0])));
        assert_eq!(
            params.named("wvp"),
            Some(&GpuConstant::Auto {
                kind: AutoConstantType::WorldViewProjMatrix,
                extra: AutoConstantExtra::None,
            })
        );
        assert_eq!(params.indexed(0), Some(&GpuConstant::Float(vec![1.0, 2.0, 0.0, 0.0])));
    }

    #[test]
    fn test_program_ref_requires_name() {
        let (_, diagnostics) = compile(
            "material M\n{\n technique\n {\n  pass\n  {\n   fragment_program_ref\n   {\n   }\n  }\n }\n}\n",
            CompilerConfig::default(),
        );
        assert_eq!(diagnostics.entries()[0].code, ErrorCode::ObjectNameExpected);
    }
}
