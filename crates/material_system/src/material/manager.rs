//! Material manager
//!
//! Owns every material together with the pass arena their techniques point into.

use crate::foundation::collections::MaterialKey;
use crate::material::material::Material;
use crate::material::pass_store::PassStore;
use crate::material::technique::{CompileOptions, TechniqueUnsupported};
use crate::resources::{ResourceError, ResourceRegistry};

/// Registry of materials and owner of their passes
#[derive(Debug, Clone)]
pub struct MaterialManager {
    registry: ResourceRegistry<MaterialKey, Material>,
    passes: PassStore,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            registry: ResourceRegistry::new("material"),
            passes: PassStore::new(),
        }
    }

    /// Create a material, failing if the name is taken
    pub fn create(&mut self, name: &str, group: &str) -> Result<MaterialKey, ResourceError> {
        let key = self.registry.create(group, Material::new(name))?;
        if let Some(material) = self.registry.get_mut(key) {
            material.set_key(key);
        }
        Ok(key)
    }

    /// Look up by name
    pub fn get_by_name(&self, name: &str) -> Option<MaterialKey> {
        self.registry.get_by_name(name)
    }

    /// Borrow a material by name
    pub fn find(&self, name: &str) -> Option<&Material> {
        self.get_by_name(name).and_then(|key| self.registry.get(key))
    }

    /// Borrow a material
    pub fn get(&self, key: MaterialKey) -> Option<&Material> {
        self.registry.get(key)
    }

    /// Mutably borrow a material
    pub fn get_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.registry.get_mut(key)
    }

    /// Mutably borrow a material together with the pass arena
    pub fn get_with_passes_mut(&mut self, key: MaterialKey) -> Option<(&mut Material, &mut PassStore)> {
        let material = self.registry.get_mut(key)?;
        Some((material, &mut self.passes))
    }

    /// Group that defined a material
    pub fn group(&self, key: MaterialKey) -> Option<&str> {
        self.registry.group(key)
    }

    /// Discard a material's content and move it to another group, keeping its handle
    pub fn reset(&mut self, key: MaterialKey, group: &str) {
        if let Some(material) = self.registry.get_mut(key) {
            material.reset(&mut self.passes);
            log::debug!("Reset material '{}' for redefinition", material.name());
        }
        self.registry.set_group(key, group);
    }

    /// Remove a material and queue its passes for deletion
    pub fn remove(&mut self, key: MaterialKey) -> Option<Material> {
        let mut material = self.registry.remove(key)?;
        material.remove_all_techniques(&mut self.passes);
        Some(material)
    }

    /// Compile a material's techniques
    pub fn compile(&mut self, key: MaterialKey, options: CompileOptions<'_>) -> Vec<(usize, TechniqueUnsupported)> {
        match self.registry.get_mut(key) {
            Some(material) => material.compile(&mut self.passes, options),
            None => Vec::new(),
        }
    }

    /// Pass arena
    pub fn passes(&self) -> &PassStore {
        &self.passes
    }

    /// Mutable pass arena
    pub fn passes_mut(&mut self) -> &mut PassStore {
        &mut self.passes
    }

    /// Batch point: destroy queued passes and refresh stale hashes
    pub fn process_pending_updates(&mut self) {
        self.passes.process_pending_updates();
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True when no materials exist
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Iterate over materials
    pub fn iter(&self) -> impl Iterator<Item = (MaterialKey, &Material)> {
        self.registry.iter()
    }
}
