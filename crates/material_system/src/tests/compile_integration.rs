//! Integration tests for hardware compilation of scripted materials
//!
//! Texture unit splitting, illumination stages and sort hashes observed
//! through the script compiler.

use crate::config::CompilerConfig;
use crate::material::{IlluminationStage, Pass, SceneBlendFactor};
use crate::resources::{RenderCapabilities, DEFAULT_GROUP};
use crate::script::ScriptCompiler;
use crate::system::MaterialSystem;

#[cfg(test)]
mod tests {
    use super::*;

    fn units(names: &[&str]) -> String {
        names
            .iter()
            .map(|name| format!("   texture_unit\n   {{\n    texture {name}\n   }}\n"))
            .collect()
    }

    fn material(name: &str, pass_body: &str) -> String {
        format!("material {name}\n{{\n technique\n {{\n  pass\n  {{\n{pass_body}  }}\n }}\n}}\n")
    }

    fn compile_into(system: &mut MaterialSystem, text: &str) {
        let mut compiler = ScriptCompiler::new(CompilerConfig::default());
        let ok = compiler.compile(text, "test.material", DEFAULT_GROUP, system);
        assert!(ok, "{:?}", compiler.diagnostics());
    }

    fn passes(system: &MaterialSystem, material: &str) -> Vec<Pass> {
        let technique = system.materials.find(material).unwrap().technique(0).unwrap();
        technique
            .passes()
            .iter()
            .map(|key| system.materials.passes().get(*key).unwrap().clone())
            .collect()
    }

    #[test]
    fn test_oversized_pass_is_split_in_order() {
        let mut system = MaterialSystem::new(RenderCapabilities::minimal(2));
        compile_into(&mut system, &material("Layers", &units(&["a.png", "b.png", "c.png", "d.png"])));

        let passes = passes(&system, "Layers");
        assert_eq!(passes.len(), 2);
        let names: Vec<Vec<&str>> = passes
            .iter()
            .map(|pass| pass.texture_units().iter().map(|unit| unit.texture_name()).collect())
            .collect();
        assert_eq!(names, [vec!["a.png", "b.png"], vec!["c.png", "d.png"]]);
        assert_eq!(passes[1].index(), 1);
        assert!(system.materials.find("Layers").unwrap().technique(0).unwrap().is_supported());
    }

    #[test]
    fn test_split_disabled_leaves_technique_unsupported() {
        let mut system = MaterialSystem::new(RenderCapabilities::minimal(1));
        let mut compiler = ScriptCompiler::new(CompilerConfig {
            auto_manage_texture_units: false,
            ..CompilerConfig::default()
        });
        let text = material("Layers", &units(&["a.png", "b.png"]));
        assert!(compiler.compile(&text, "test.material", DEFAULT_GROUP, &mut system));

        let material = system.materials.find("Layers").unwrap();
        assert!(!material.technique(0).unwrap().is_supported());
        assert_eq!(material.num_supported_techniques(), 0);
        assert_eq!(material.technique(0).unwrap().num_passes(), 1);
    }

    #[test]
    fn test_unlit_pass_is_its_own_ambient_stage() {
        let mut system = MaterialSystem::default();
        compile_into(&mut system, &material("Unlit", &format!("   lighting off\n{}", units(&["a.png"]))));

        let technique = system.materials.find("Unlit").unwrap().technique(0).unwrap();
        let stages = technique.illumination_passes();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].stage, IlluminationStage::Ambient);
        assert_eq!(stages[0].pass, technique.passes()[0]);
        assert!(!stages[0].owns_pass);
    }

    #[test]
    fn test_untextured_unlit_pass_is_the_only_stage() {
        let mut system = MaterialSystem::default();
        compile_into(&mut system, &material("Flat", "   lighting off\n   diffuse 1 0 0\n"));

        let technique = system.materials.find("Flat").unwrap().technique(0).unwrap();
        let original = technique.passes()[0];
        let stages = technique.illumination_passes();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].stage, IlluminationStage::Ambient);
        assert_eq!(stages[0].pass, original);
        assert_eq!(stages[0].original, original);
        assert!(!stages[0].owns_pass);
    }

    #[test]
    fn test_black_pass_has_colourless_ambient_stage() {
        let mut system = MaterialSystem::default();
        compile_into(
            &mut system,
            &material("Black", "   ambient 0 0 0\n   diffuse 0 0 0\n   emissive 0 0 0\n"),
        );

        let technique = system.materials.find("Black").unwrap().technique(0).unwrap();
        let stages = technique.illumination_passes();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].stage, IlluminationStage::Ambient);
        assert!(!system.materials.passes().get(stages[0].pass).unwrap().colour_write());
    }

    #[test]
    fn test_transparent_technique_has_no_stages() {
        let mut system = MaterialSystem::default();
        compile_into(&mut system, &material("Glass", &format!("   scene_blend add\n{}", units(&["a.png"]))));

        let technique = system.materials.find("Glass").unwrap().technique(0).unwrap();
        assert!(technique.illumination_passes().is_empty());
        assert_eq!(passes(&system, "Glass")[0].scene_blending(), (SceneBlendFactor::One, SceneBlendFactor::One));
    }

    #[test]
    fn test_hashes_are_fresh_after_compile() {
        let mut system = MaterialSystem::default();
        compile_into(&mut system, &material("Hashed", &units(&["a.png", "b.png"])));

        assert_eq!(system.materials.passes().dirty_count(), 0);
        let pass = &passes(&system, "Hashed")[0];
        let mut expected = pass.clone();
        expected.recalculate_hash();
        assert_eq!(pass.hash(), expected.hash());
        assert_ne!(pass.hash(), 0);
    }

    #[test]
    fn test_hash_ignores_units_past_the_second() {
        let mut first = MaterialSystem::default();
        let mut second = MaterialSystem::default();
        compile_into(&mut first, &material("H", &units(&["a.png", "b.png", "c.png"])));
        compile_into(&mut second, &material("H", &units(&["a.png", "b.png", "z.png"])));
        assert_eq!(passes(&first, "H")[0].hash(), passes(&second, "H")[0].hash());

        let mut third = MaterialSystem::default();
        compile_into(&mut third, &material("H", &units(&["a.png", "y.png", "c.png"])));
        assert_ne!(passes(&first, "H")[0].hash(), passes(&third, "H")[0].hash());
    }

    #[test]
    fn test_compiling_twice_gives_identical_graphs() {
        let text = format!(
            "{}{}",
            material("One", &format!("   ambient 0.1 0.2 0.3\n   scene_blend alpha_blend\n{}", units(&["x.png"]))),
            material("Two", &units(&["a.png", "b.png"]))
        );
        let mut first = MaterialSystem::default();
        let mut second = MaterialSystem::default();
        compile_into(&mut first, &text);
        compile_into(&mut second, &text);

        for name in ["One", "Two"] {
            let (a, b) = (passes(&first, name), passes(&second, name));
            assert_eq!(a.len(), b.len());
            for (a, b) in a.iter().zip(&b) {
                assert_eq!(a.ambient(), b.ambient());
                assert_eq!(a.scene_blending(), b.scene_blending());
                assert_eq!(a.hash(), b.hash());
                let names = |pass: &Pass| -> Vec<String> {
                    pass.texture_units().iter().map(|u| u.texture_name().to_string()).collect()
                };
                assert_eq!(names(a), names(b));
            }
        }
    }

    #[test]
    fn test_recompile_queues_replaced_passes() {
        let mut system = MaterialSystem::default();
        let mut compiler = ScriptCompiler::new(CompilerConfig::default().with_override(true));
        let text = material("Again", &units(&["a.png"]));
        assert!(compiler.compile(&text, "a.material", DEFAULT_GROUP, &mut system));
        let before = system.materials.passes().len();

        assert!(compiler.compile(&text, "a.material", DEFAULT_GROUP, &mut system));
        assert_eq!(system.materials.passes().pending_deletions(), 0);
        assert_eq!(system.materials.passes().len(), before);
    }
}
