//! Named resource registry
//!
//! Resources are stored in a slot map and indexed by name. Names are unique
//! across groups; the group that created an entry is remembered so override
//! diagnostics can report where the original came from.

use std::collections::HashMap;

use slotmap::{Key, SlotMap};

/// Anything stored in a [`ResourceRegistry`]
pub trait Resource {
    /// Unique resource name
    fn name(&self) -> &str;
}

/// Registry errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A resource with this name is already registered
    #[error("{kind} '{name}' already exists in group '{group}'")]
    AlreadyExists {
        /// Resource kind, e.g. "material"
        kind: &'static str,
        /// Conflicting name
        name: String,
        /// Group holding the existing definition
        group: String,
    },

    /// No resource has this name
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// Resource kind
        kind: &'static str,
        /// Requested name
        name: String,
    },
}

#[derive(Debug, Clone)]
struct RegistryEntry<T> {
    group: String,
    resource: T,
}

/// Slot map backed registry with name lookup
#[derive(Debug, Clone)]
pub struct ResourceRegistry<K: Key, T> {
    kind: &'static str,
    entries: SlotMap<K, RegistryEntry<T>>,
    by_name: HashMap<String, K>,
}

impl<K: Key, T: Resource> ResourceRegistry<K, T> {
    /// Create an empty registry for resources of the given kind
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: SlotMap::with_key(),
            by_name: HashMap::new(),
        }
    }

    /// Register a resource, failing if its name is taken
    pub fn create(&mut self, group: &str, resource: T) -> Result<K, ResourceError> {
        if let Some(&existing) = self.by_name.get(resource.name()) {
            let group = self.entries[existing].group.clone();
            return Err(ResourceError::AlreadyExists {
                kind: self.kind,
                name: resource.name().to_string(),
                group,
            });
        }

        let name = resource.name().to_string();
        let key = self.entries.insert(RegistryEntry {
            group: group.to_string(),
            resource,
        });
        self.by_name.insert(name, key);
        log::debug!("Registered {} '{}' in group '{}'", self.kind, self.entries[key].resource.name(), group);
        Ok(key)
    }

    /// Look up a handle by name
    pub fn get_by_name(&self, name: &str) -> Option<K> {
        self.by_name.get(name).copied()
    }

    /// Look up a handle by name, reporting a typed error when absent
    pub fn require(&self, name: &str) -> Result<K, ResourceError> {
        self.get_by_name(name).ok_or_else(|| ResourceError::NotFound {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    /// Borrow a resource
    pub fn get(&self, key: K) -> Option<&T> {
        self.entries.get(key).map(|entry| &entry.resource)
    }

    /// Mutably borrow a resource
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.entries.get_mut(key).map(|entry| &mut entry.resource)
    }

    /// Group that registered a resource
    pub fn group(&self, key: K) -> Option<&str> {
        self.entries.get(key).map(|entry| entry.group.as_str())
    }

    /// Move an existing resource into another group, used when a script overrides it
    pub fn set_group(&mut self, key: K, group: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.group = group.to_string();
        }
    }

    /// Remove a resource
    pub fn remove(&mut self, key: K) -> Option<T> {
        let entry = self.entries.remove(key)?;
        self.by_name.remove(entry.resource.name());
        Some(entry.resource)
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over handles and resources
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.entries.iter().map(|(key, entry)| (key, &entry.resource))
    }
}
