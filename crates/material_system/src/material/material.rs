//! Materials: named collections of techniques

use std::collections::BTreeMap;

use crate::foundation::collections::MaterialKey;
use crate::material::pass::PassParent;
use crate::material::pass_store::PassStore;
use crate::material::technique::{CompileOptions, Technique, TechniqueUnsupported};
use crate::resources::Resource;

/// Top-level appearance definition
#[derive(Debug, Clone)]
pub struct Material {
    name: String,
    key: Option<MaterialKey>,
    techniques: Vec<Technique>,
    lod_distances: Vec<f32>,
    receive_shadows: bool,
    transparency_casts_shadows: bool,
    texture_aliases: BTreeMap<String, String>,
    best_techniques: BTreeMap<u16, usize>,
    compiled: bool,
}

impl Resource for Material {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Material {
    /// Create an empty material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            techniques: Vec::new(),
            lod_distances: vec![0.0],
            receive_shadows: true,
            transparency_casts_shadows: false,
            texture_aliases: BTreeMap::new(),
            best_techniques: BTreeMap::new(),
            compiled: false,
        }
    }

    /// Material name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry handle, once registered
    pub fn key(&self) -> Option<MaterialKey> {
        self.key
    }

    pub(crate) fn set_key(&mut self, key: MaterialKey) {
        self.key = Some(key);
    }

    /// Append a technique
    pub fn create_technique(&mut self) -> &mut Technique {
        let index = self.techniques.len();
        self.techniques.push(Technique::with_parent(PassParent {
            material: self.key,
            technique: index,
        }));
        self.compiled = false;
        &mut self.techniques[index]
    }

    /// Techniques in definition order
    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    /// Borrow a technique
    pub fn technique(&self, index: usize) -> Option<&Technique> {
        self.techniques.get(index)
    }

    /// Mutably borrow a technique
    pub fn technique_mut(&mut self, index: usize) -> Option<&mut Technique> {
        self.compiled = false;
        self.techniques.get_mut(index)
    }

    /// Number of techniques
    pub fn num_techniques(&self) -> usize {
        self.techniques.len()
    }

    /// Remove every technique, queueing their passes for deletion
    pub fn remove_all_techniques(&mut self, store: &mut PassStore) {
        for technique in &mut self.techniques {
            technique.remove_all_passes(store);
        }
        self.techniques.clear();
        self.best_techniques.clear();
        self.compiled = false;
    }

    /// Discard all content so a redefinition starts from defaults
    pub fn reset(&mut self, store: &mut PassStore) {
        self.remove_all_techniques(store);
        let key = self.key;
        *self = Self::new(std::mem::take(&mut self.name));
        self.key = key;
    }

    /// Distances at which each level of detail starts; the first is always zero
    pub fn lod_distances(&self) -> &[f32] {
        &self.lod_distances
    }

    /// Set level of detail distances, excluding the implicit zero
    pub fn set_lod_distances(&mut self, distances: impl IntoIterator<Item = f32>) {
        self.lod_distances = std::iter::once(0.0).chain(distances).collect();
    }

    /// Whether objects using this material receive shadows
    pub fn receive_shadows(&self) -> bool {
        self.receive_shadows
    }

    /// Enable shadow receiving
    pub fn set_receive_shadows(&mut self, enabled: bool) {
        self.receive_shadows = enabled;
    }

    /// Whether transparent objects still cast shadows
    pub fn transparency_casts_shadows(&self) -> bool {
        self.transparency_casts_shadows
    }

    /// Let transparent objects cast shadows
    pub fn set_transparency_casts_shadows(&mut self, enabled: bool) {
        self.transparency_casts_shadows = enabled;
    }

    /// Alias to texture name mapping set by the script
    pub fn texture_aliases(&self) -> &BTreeMap<String, String> {
        &self.texture_aliases
    }

    /// Record a texture alias
    pub fn set_texture_alias(&mut self, alias: impl Into<String>, texture: impl Into<String>) {
        self.texture_aliases.insert(alias.into(), texture.into());
    }

    /// Rebind texture units whose alias is mapped; returns true when any matched
    pub fn apply_texture_aliases(&self, store: &mut PassStore, aliases: &BTreeMap<String, String>, apply: bool) -> bool {
        let mut matched = false;
        for technique in &self.techniques {
            for &key in technique.passes() {
                if let Some(pass) = store.get_mut(key) {
                    for unit in pass.texture_units_mut() {
                        matched |= unit.apply_texture_aliases(aliases, apply);
                    }
                }
            }
        }
        matched
    }

    /// Compile every technique and index the supported ones by level of detail
    ///
    /// Returns the failures of unsupported techniques.
    pub fn compile(&mut self, store: &mut PassStore, options: CompileOptions<'_>) -> Vec<(usize, TechniqueUnsupported)> {
        let mut failures = Vec::new();
        self.best_techniques.clear();

        for (index, technique) in self.techniques.iter_mut().enumerate() {
            match technique.compile(store, options) {
                Ok(()) => {
                    self.best_techniques.entry(technique.lod_index()).or_insert(index);
                }
                Err(reason) => {
                    log::info!("Material '{}' technique {} is not supported: {}", self.name, index, reason);
                    failures.push((index, reason));
                }
            }
        }

        if self.best_techniques.is_empty() && !self.techniques.is_empty() {
            log::warn!("Material '{}' has no supportable techniques", self.name);
        }
        self.compiled = true;
        failures
    }

    /// True once compiled and not modified since
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Number of techniques that passed compilation
    pub fn num_supported_techniques(&self) -> usize {
        self.techniques.iter().filter(|t| t.is_supported()).count()
    }

    /// Best supported technique for a level of detail
    ///
    /// Falls back to the nearest lower level, then to the lowest available.
    pub fn best_technique(&self, lod_index: u16) -> Option<&Technique> {
        let index = self
            .best_techniques
            .range(..=lod_index)
            .next_back()
            .or_else(|| self.best_techniques.iter().next())
            .map(|(_, &index)| index)?;
        self.techniques.get(index)
    }

    /// True when any technique blends with the destination
    pub fn is_transparent(&self, store: &PassStore) -> bool {
        self.techniques.iter().any(|t| t.is_transparent(store))
    }
}
