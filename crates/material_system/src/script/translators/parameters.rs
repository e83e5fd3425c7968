//! `param_*` properties shared by program references and `default_params`

use crate::resources::{AutoConstantExtra, AutoConstantType, AutoExtraKind, GpuConstant, GpuProgramParameters};
use crate::script::ast::PropertyNode;
use crate::script::error::ErrorCode;
use crate::script::keywords::Keyword;

use super::Translator;

/// Where a constant is bound
enum Target {
    Named(String),
    Indexed(usize),
}

/// Element type and count of an explicit constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstantType {
    Float(usize),
    Int(usize),
}

/// `float`, `floatN`, `int`, `intN` or `matrixRxC`
fn constant_type(word: &str) -> Option<ConstantType> {
    let sized = |suffix: &str| -> Option<usize> {
        if suffix.is_empty() {
            return Some(1);
        }
        suffix.parse::<usize>().ok().filter(|count| (1..=64).contains(count))
    };
    if let Some(dims) = word.strip_prefix("matrix") {
        let (rows, cols) = dims.split_once('x')?;
        let count = rows.parse::<usize>().ok()? * cols.parse::<usize>().ok()?;
        return (count > 0).then_some(ConstantType::Float(count));
    }
    if let Some(suffix) = word.strip_prefix("float") {
        return sized(suffix).map(ConstantType::Float);
    }
    if let Some(suffix) = word.strip_prefix("int") {
        return sized(suffix).map(ConstantType::Int);
    }
    None
}

/// Apply one `param_*` property; returns false when the property is not a parameter
pub(super) fn translate_parameter(tr: &mut Translator<'_>, params: &mut GpuProgramParameters, prop: &PropertyNode) -> bool {
    match prop.id {
        Keyword::ParamNamed | Keyword::ParamIndexed => {
            let Some(target) = target(tr, prop) else {
                return true;
            };
            if let Some(constant) = explicit_constant(tr, prop) {
                bind(params, target, constant);
            }
            true
        }
        Keyword::ParamNamedAuto | Keyword::ParamIndexedAuto => {
            let Some(target) = target(tr, prop) else {
                return true;
            };
            if let Some(constant) = auto_constant(tr, prop) {
                bind(params, target, constant);
            }
            true
        }
        _ => false,
    }
}

fn bind(params: &mut GpuProgramParameters, target: Target, constant: GpuConstant) {
    match target {
        Target::Named(name) => params.set_named(name, constant),
        Target::Indexed(index) => params.set_indexed(index, constant),
    }
}

fn target(tr: &mut Translator<'_>, prop: &PropertyNode) -> Option<Target> {
    if !tr.expect_values(prop, 2, usize::MAX) {
        return None;
    }
    match prop.id {
        Keyword::ParamIndexed | Keyword::ParamIndexedAuto => {
            tr.uint_at(prop, 0).map(|index| Target::Indexed(index as usize))
        }
        _ => tr.string_at(prop, 0).map(Target::Named),
    }
}

/// `<target> <type> <values...>`; missing values are zero filled
fn explicit_constant(tr: &mut Translator<'_>, prop: &PropertyNode) -> Option<GpuConstant> {
    let type_name = tr.string_at(prop, 1)?;
    let Some(kind) = constant_type(&type_name) else {
        tr.error(
            ErrorCode::InvalidParameters,
            prop.values[1].location(),
            format!("{}: unknown constant type '{type_name}'", prop.name),
        );
        return None;
    };

    let supplied = prop.values.len() - 2;
    let capacity = match kind {
        ConstantType::Float(count) | ConstantType::Int(count) => count,
    };
    if supplied > capacity {
        tr.error(
            ErrorCode::InvalidParameters,
            &prop.location,
            format!("{}: {type_name} holds {capacity} values, found {supplied}", prop.name),
        );
        return None;
    }

    match kind {
        ConstantType::Float(count) => {
            let mut values = vec![0.0; count];
            for (offset, value) in values.iter_mut().take(supplied).enumerate() {
                *value = tr.number_at(prop, offset + 2)?;
            }
            Some(GpuConstant::Float(values))
        }
        ConstantType::Int(count) => {
            let mut values = vec![0; count];
            for (offset, value) in values.iter_mut().take(supplied).enumerate() {
                let number = tr.number_at(prop, offset + 2)?;
                if number.fract() != 0.0 {
                    tr.error(
                        ErrorCode::NumberExpected,
                        prop.values[offset + 2].location(),
                        format!("{}: {number} is not an integer", prop.name),
                    );
                    return None;
                }
                *value = number as i32;
            }
            Some(GpuConstant::Int(values))
        }
    }
}

/// `<target> <auto name> [extra]`
fn auto_constant(tr: &mut Translator<'_>, prop: &PropertyNode) -> Option<GpuConstant> {
    if !tr.expect_values(prop, 2, 3) {
        return None;
    }
    let auto_name = tr.string_at(prop, 1)?;
    let Some(kind) = AutoConstantType::from_name(&auto_name) else {
        tr.error(
            ErrorCode::InvalidParameters,
            prop.values[1].location(),
            format!("{}: unknown auto constant '{auto_name}'", prop.name),
        );
        return None;
    };

    let has_extra = prop.values.len() == 3;
    let extra = match kind.extra_kind() {
        AutoExtraKind::None => {
            if has_extra {
                tr.error(
                    ErrorCode::FewerParametersExpected,
                    &prop.location,
                    format!("{}: '{auto_name}' takes no extra value", prop.name),
                );
                return None;
            }
            AutoConstantExtra::None
        }
        AutoExtraKind::Int => AutoConstantExtra::Int(if has_extra { tr.uint_at(prop, 2)? } else { 0 }),
        AutoExtraKind::Real => AutoConstantExtra::Real(if has_extra { tr.number_at(prop, 2)? } else { 0.0 }),
    };
    Some(GpuConstant::Auto { kind, extra })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_types() {
        assert_eq!(constant_type("float"), Some(ConstantType::Float(1)));
        assert_eq!(constant_type("float4"), Some(ConstantType::Float(4)));
        assert_eq!(constant_type("int2"), Some(ConstantType::Int(2)));
        assert_eq!(constant_type("matrix4x4"), Some(ConstantType::Float(16)));
        assert_eq!(constant_type("double"), None);
        assert_eq!(constant_type("floatx"), None);
    }
}
