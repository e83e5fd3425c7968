//! Integration tests for script compilation into the material system
//!
//! Covers the documented end-to-end example, duplicate-name policy and
//! imports served from disk.

use crate::config::CompilerConfig;
use crate::foundation::math::ColourValue;
use crate::material::{Pass, TextureType};
use crate::resources::{FileSystemLoader, DEFAULT_GROUP};
use crate::script::{ErrorCode, ScriptCompiler, Severity};
use crate::system::MaterialSystem;

#[cfg(test)]
mod tests {
    use super::*;

    const WALL: &str = "material M
{
    technique
    {
        pass
        {
            ambient 0.2 0.2 0.2
            diffuse 1 1 1 1

            texture_unit
            {
                texture wall.jpg
            }
        }
    }
}
";

    const WALL_ONE_LINE: &str =
        "material M { technique { pass { ambient 0.2 0.2 0.2 diffuse 1 1 1 1 texture_unit { texture wall.jpg } } } }";

    fn pass_of<'a>(system: &'a MaterialSystem, material: &str, technique: usize, pass: usize) -> &'a Pass {
        let material = system.materials.find(material).unwrap();
        let key = material.technique(technique).unwrap().pass(pass).unwrap();
        system.materials.passes().get(key).unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let mut system = MaterialSystem::default();
        let mut compiler = ScriptCompiler::default();
        assert!(compiler.compile(WALL, "wall.material", DEFAULT_GROUP, &mut system));
        assert!(compiler.diagnostics().entries().is_empty());

        assert_eq!(system.materials.len(), 1);
        let material = system.materials.find("M").unwrap();
        assert_eq!(material.num_techniques(), 1);
        assert_eq!(material.technique(0).unwrap().num_passes(), 1);

        let pass = pass_of(&system, "M", 0, 0);
        assert_eq!(pass.ambient(), ColourValue::new(0.2, 0.2, 0.2, 1.0));
        assert_eq!(pass.diffuse(), ColourValue::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(pass.num_texture_units(), 1);

        let unit = pass.texture_unit(0).unwrap();
        assert_eq!(unit.texture_name(), "wall.jpg");
        assert_eq!(unit.texture_type(), TextureType::TwoD);
        assert_eq!(unit.num_mipmaps(), None);
    }

    #[test]
    fn test_end_to_end_example_on_one_line() {
        let mut system = MaterialSystem::default();
        let mut compiler = ScriptCompiler::default();
        assert!(compiler.compile(WALL_ONE_LINE, "wall.material", DEFAULT_GROUP, &mut system));
        assert!(compiler.diagnostics().entries().is_empty());

        let material = system.materials.find("M").unwrap();
        assert_eq!(material.num_techniques(), 1);
        assert_eq!(material.technique(0).unwrap().num_passes(), 1);

        let pass = pass_of(&system, "M", 0, 0);
        assert_eq!(pass.ambient(), ColourValue::new(0.2, 0.2, 0.2, 1.0));
        assert_eq!(pass.diffuse(), ColourValue::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(pass.num_texture_units(), 1);
        let unit = pass.texture_unit(0).unwrap();
        assert_eq!(unit.texture_name(), "wall.jpg");
        assert_eq!(unit.texture_type(), TextureType::TwoD);
        assert_eq!(unit.num_mipmaps(), None);
    }

    #[test]
    fn test_duplicate_without_override_keeps_first() {
        let mut system = MaterialSystem::default();
        let mut compiler = ScriptCompiler::default();
        assert!(compiler.compile(WALL, "wall.material", DEFAULT_GROUP, &mut system));

        let again = WALL.replace("0.2 0.2 0.2", "0.9 0.9 0.9");
        assert!(!compiler.compile(&again, "wall.material", DEFAULT_GROUP, &mut system));

        let codes: Vec<_> = compiler.diagnostics().entries().iter().map(|e| e.code).collect();
        assert_eq!(codes, [ErrorCode::ObjectAllocationError]);
        assert_eq!(pass_of(&system, "M", 0, 0).ambient(), ColourValue::new(0.2, 0.2, 0.2, 1.0));
    }

    #[test]
    fn test_duplicate_with_override_replaces_and_warns() {
        let mut system = MaterialSystem::default();
        let mut compiler = ScriptCompiler::new(CompilerConfig::default().with_override(true));
        assert!(compiler.compile(WALL, "wall.material", DEFAULT_GROUP, &mut system));

        let again = WALL.replace("0.2 0.2 0.2", "0.9 0.9 0.9");
        assert!(compiler.compile(&again, "wall.material", DEFAULT_GROUP, &mut system));

        let entries = compiler.diagnostics().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, ErrorCode::DuplicateOverride);
        assert_eq!(entries[0].severity, Severity::Warning);
        assert_eq!(system.materials.len(), 1);
        let material = system.materials.find("M").unwrap();
        assert_eq!(material.num_techniques(), 1);
        assert_eq!(pass_of(&system, "M", 0, 0).ambient(), ColourValue::new(0.9, 0.9, 0.9, 1.0));
    }

    #[test]
    fn test_broken_material_does_not_stop_siblings() {
        let script = format!("material Broken\n{{\n technique\n {{\n  pass\n  {{\n   ambient red\n  }}\n }}\n}}\n{WALL}");
        let mut system = MaterialSystem::default();
        let mut compiler = ScriptCompiler::default();
        assert!(!compiler.compile(&script, "mixed.material", DEFAULT_GROUP, &mut system));
        assert_eq!(compiler.diagnostics().error_count(), 1);
        assert!(system.materials.find("Broken").is_some());
        assert_eq!(pass_of(&system, "M", 0, 0).texture_unit(0).unwrap().texture_name(), "wall.jpg");
    }

    #[test]
    fn test_import_from_disk_with_variables() {
        let dir = std::env::temp_dir().join("material_system_import_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("base.material"),
            "set $tint 0.5 0.25 0\nabstract material Tinted\n{\n technique\n {\n  pass\n  {\n   diffuse $tint\n  }\n }\n}\n",
        )
        .unwrap();

        let mut system = MaterialSystem::default();
        let mut compiler = ScriptCompiler::default();
        compiler.set_loader(FileSystemLoader::new().with_root(&dir));
        let ok = compiler.compile(
            "import Tinted from base.material\nmaterial Crate : Tinted\n{\n}\n",
            "crate.material",
            DEFAULT_GROUP,
            &mut system,
        );
        std::fs::remove_file(dir.join("base.material")).ok();

        assert!(ok, "{:?}", compiler.diagnostics());
        assert!(system.materials.find("Tinted").is_none());
        assert_eq!(pass_of(&system, "Crate", 0, 0).diffuse(), ColourValue::new(0.5, 0.25, 0.0, 1.0));
    }

    #[test]
    fn test_global_variables_from_config() {
        let config = CompilerConfig::default().with_variable("shade", "0 0 0");
        let mut system = MaterialSystem::default();
        let mut compiler = ScriptCompiler::new(config);
        let script = "material Dark\n{\n technique\n {\n  pass\n  {\n   emissive $shade\n   ambient $shade\n  }\n }\n}\n";
        assert!(compiler.compile(script, "dark.material", DEFAULT_GROUP, &mut system));
        assert!(pass_of(&system, "Dark", 0, 0).ambient().is_black());
    }
}
