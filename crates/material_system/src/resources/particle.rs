//! Particle system templates
//!
//! Templates are parameter dictionaries validated against tables of known
//! system, emitter and affector parameters. Simulation is out of scope; the
//! template is what a particle runtime would instantiate from.

use std::collections::BTreeMap;

use crate::foundation::collections::ParticleSystemKey;
use crate::resources::registry::{Resource, ResourceError, ResourceRegistry};

/// Errors raised while configuring a template
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParticleError {
    /// No emitter factory has this type name
    #[error("unknown emitter type '{0}'")]
    UnknownEmitterType(String),

    /// No affector factory has this type name
    #[error("unknown affector type '{0}'")]
    UnknownAffectorType(String),

    /// The parameter is not accepted by the target
    #[error("{owner} has no parameter '{name}'")]
    UnknownParameter {
        /// Target description
        owner: String,
        /// Rejected parameter
        name: String,
    },
}

const SYSTEM_PARAMETERS: &[&str] = &[
    "quota",
    "emit_emitter_quota",
    "material",
    "particle_width",
    "particle_height",
    "cull_each",
    "sorted",
    "local_space",
    "iteration_interval",
    "nonvisible_update_timeout",
];

const BILLBOARD_RENDERER_PARAMETERS: &[&str] = &[
    "billboard_type",
    "billboard_origin",
    "billboard_rotation_type",
    "common_direction",
    "common_up_vector",
    "point_rendering",
    "accurate_facing",
];

const COMMON_EMITTER_PARAMETERS: &[&str] = &[
    "angle",
    "colour",
    "colour_range_start",
    "colour_range_end",
    "direction",
    "emission_rate",
    "position",
    "velocity",
    "velocity_min",
    "velocity_max",
    "time_to_live",
    "time_to_live_min",
    "time_to_live_max",
    "duration",
    "duration_min",
    "duration_max",
    "repeat_delay",
    "repeat_delay_min",
    "repeat_delay_max",
    "name",
    "emit_emitter",
];

const AREA_EMITTER_PARAMETERS: &[&str] = &["width", "height", "depth"];

/// Parameter tables for emitter and affector types
#[derive(Debug, Clone)]
pub struct ParticleFactories {
    emitters: BTreeMap<String, Vec<String>>,
    affectors: BTreeMap<String, Vec<String>>,
    renderers: BTreeMap<String, Vec<String>>,
}

impl Default for ParticleFactories {
    fn default() -> Self {
        let mut factories = Self {
            emitters: BTreeMap::new(),
            affectors: BTreeMap::new(),
            renderers: BTreeMap::new(),
        };

        factories.register_emitter("Point", &[]);
        for area in ["Box", "Cylinder", "Ellipsoid"] {
            factories.register_emitter(area, AREA_EMITTER_PARAMETERS);
        }
        factories.register_emitter(
            "HollowEllipsoid",
            &["width", "height", "depth", "inner_width", "inner_height", "inner_depth"],
        );
        factories.register_emitter("Ring", &["width", "height", "depth", "inner_width", "inner_height"]);

        factories.register_affector("LinearForce", &["force_vector", "force_application"]);
        factories.register_affector("ColourFader", &["red", "green", "blue", "alpha"]);
        factories.register_affector(
            "ColourFader2",
            &["red1", "green1", "blue1", "alpha1", "red2", "green2", "blue2", "alpha2", "state_change"],
        );
        factories.register_affector("Scaler", &["rate"]);
        factories.register_affector(
            "Rotator",
            &[
                "rotation_speed_range_start",
                "rotation_speed_range_end",
                "rotation_range_start",
                "rotation_range_end",
            ],
        );
        let interpolator: Vec<String> = (0..6)
            .flat_map(|i| [format!("colour{i}"), format!("time{i}")])
            .collect();
        factories.affectors.insert("ColourInterpolator".to_string(), interpolator);
        factories.register_affector("ColourImage", &["image"]);
        factories.register_affector("DeflectorPlane", &["plane_point", "plane_normal", "bounce"]);
        factories.register_affector("DirectionRandomiser", &["randomness", "scope", "keep_velocity"]);

        factories.register_renderer("billboard", BILLBOARD_RENDERER_PARAMETERS);
        factories
    }
}

impl ParticleFactories {
    /// Declare an emitter type; common emitter parameters are always accepted
    pub fn register_emitter(&mut self, type_name: &str, parameters: &[&str]) {
        self.emitters.insert(type_name.to_string(), to_owned(parameters));
    }

    /// Declare an affector type
    pub fn register_affector(&mut self, type_name: &str, parameters: &[&str]) {
        self.affectors.insert(type_name.to_string(), to_owned(parameters));
    }

    /// Declare a renderer type
    pub fn register_renderer(&mut self, type_name: &str, parameters: &[&str]) {
        self.renderers.insert(type_name.to_string(), to_owned(parameters));
    }

    /// Create an emitter of a known type
    pub fn create_emitter(&self, type_name: &str) -> Result<ParticleEmitter, ParticleError> {
        let parameters = self
            .emitters
            .get(type_name)
            .ok_or_else(|| ParticleError::UnknownEmitterType(type_name.to_string()))?;
        let mut accepted: Vec<String> = to_owned(COMMON_EMITTER_PARAMETERS);
        accepted.extend(parameters.iter().cloned());
        Ok(ParticleEmitter {
            emitter_type: type_name.to_string(),
            parameters: ParamDictionary::new(format!("emitter '{type_name}'"), accepted),
        })
    }

    /// Create an affector of a known type
    pub fn create_affector(&self, type_name: &str) -> Result<ParticleAffector, ParticleError> {
        let parameters = self
            .affectors
            .get(type_name)
            .ok_or_else(|| ParticleError::UnknownAffectorType(type_name.to_string()))?;
        Ok(ParticleAffector {
            affector_type: type_name.to_string(),
            parameters: ParamDictionary::new(format!("affector '{type_name}'"), parameters.clone()),
        })
    }

    /// True when a renderer type is registered
    pub fn has_renderer(&self, renderer: &str) -> bool {
        self.renderers.contains_key(renderer)
    }

    fn renderer_parameters(&self, renderer: &str) -> &[String] {
        self.renderers.get(renderer).map_or(&[], Vec::as_slice)
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

/// String parameters restricted to a known set of names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDictionary {
    owner: String,
    accepted: Vec<String>,
    values: BTreeMap<String, String>,
}

impl ParamDictionary {
    fn new(owner: String, accepted: Vec<String>) -> Self {
        Self {
            owner,
            accepted,
            values: BTreeMap::new(),
        }
    }

    /// True when the name is accepted
    pub fn accepts(&self, name: &str) -> bool {
        self.accepted.iter().any(|accepted| accepted == name)
    }

    /// Set a parameter
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), ParticleError> {
        if !self.accepts(name) {
            return Err(ParticleError::UnknownParameter {
                owner: self.owner.clone(),
                name: name.to_string(),
            });
        }
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Parameter value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of parameters set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Emitter description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticleEmitter {
    emitter_type: String,
    /// Emitter parameters
    pub parameters: ParamDictionary,
}

impl ParticleEmitter {
    /// Factory type name
    pub fn emitter_type(&self) -> &str {
        &self.emitter_type
    }
}

/// Affector description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticleAffector {
    affector_type: String,
    /// Affector parameters
    pub parameters: ParamDictionary,
}

impl ParticleAffector {
    /// Factory type name
    pub fn affector_type(&self) -> &str {
        &self.affector_type
    }
}

/// Particle system template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticleSystemTemplate {
    name: String,
    renderer: String,
    parameters: ParamDictionary,
    emitters: Vec<ParticleEmitter>,
    affectors: Vec<ParticleAffector>,
}

impl Resource for ParticleSystemTemplate {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ParticleSystemTemplate {
    /// Create a template using the billboard renderer
    pub fn new(name: impl Into<String>, factories: &ParticleFactories) -> Self {
        let mut template = Self {
            name: name.into(),
            renderer: String::new(),
            parameters: ParamDictionary::new(String::new(), Vec::new()),
            emitters: Vec::new(),
            affectors: Vec::new(),
        };
        template.set_renderer("billboard", factories);
        template
    }

    /// Template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renderer type
    pub fn renderer(&self) -> &str {
        &self.renderer
    }

    /// Switch renderer; parameters only the old renderer accepted are dropped
    pub fn set_renderer(&mut self, renderer: &str, factories: &ParticleFactories) {
        let mut accepted = to_owned(SYSTEM_PARAMETERS);
        accepted.extend(factories.renderer_parameters(renderer).iter().cloned());
        let mut parameters = ParamDictionary::new(format!("particle system '{}'", self.name), accepted);
        for (name, value) in &self.parameters.values {
            if parameters.accepts(name) {
                parameters.values.insert(name.clone(), value.clone());
            }
        }
        self.renderer = renderer.to_string();
        self.parameters = parameters;
    }

    /// System and renderer parameters
    pub fn parameters(&self) -> &ParamDictionary {
        &self.parameters
    }

    /// Set a system or renderer parameter
    pub fn set_parameter(&mut self, name: &str, value: impl Into<String>) -> Result<(), ParticleError> {
        self.parameters.set(name, value)
    }

    /// Material used to render particles
    pub fn material_name(&self) -> Option<&str> {
        self.parameters.get("material")
    }

    /// Maximum live particles
    pub fn quota(&self) -> u32 {
        self.parameters.get("quota").and_then(|q| q.parse().ok()).unwrap_or(10)
    }

    /// Append an emitter, returning its index
    pub fn add_emitter(&mut self, emitter: ParticleEmitter) -> usize {
        self.emitters.push(emitter);
        self.emitters.len() - 1
    }

    /// Emitters in order
    pub fn emitters(&self) -> &[ParticleEmitter] {
        &self.emitters
    }

    /// Mutable emitter
    pub fn emitter_mut(&mut self, index: usize) -> Option<&mut ParticleEmitter> {
        self.emitters.get_mut(index)
    }

    /// Append an affector, returning its index
    pub fn add_affector(&mut self, affector: ParticleAffector) -> usize {
        self.affectors.push(affector);
        self.affectors.len() - 1
    }

    /// Affectors in order
    pub fn affectors(&self) -> &[ParticleAffector] {
        &self.affectors
    }

    /// Mutable affector
    pub fn affector_mut(&mut self, index: usize) -> Option<&mut ParticleAffector> {
        self.affectors.get_mut(index)
    }

    /// Discard all content, keeping the name
    pub fn reset(&mut self, factories: &ParticleFactories) {
        *self = Self::new(std::mem::take(&mut self.name), factories);
    }
}

/// Registry of particle system templates
#[derive(Debug, Clone)]
pub struct ParticleSystemManager {
    registry: ResourceRegistry<ParticleSystemKey, ParticleSystemTemplate>,
    factories: ParticleFactories,
}

impl Default for ParticleSystemManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystemManager {
    /// Create a manager with the built-in factory tables
    pub fn new() -> Self {
        Self {
            registry: ResourceRegistry::new("particle system"),
            factories: ParticleFactories::default(),
        }
    }

    /// Factory tables
    pub fn factories(&self) -> &ParticleFactories {
        &self.factories
    }

    /// Mutable factory tables, for registering custom types
    pub fn factories_mut(&mut self) -> &mut ParticleFactories {
        &mut self.factories
    }

    /// Create a template, failing if the name is taken
    pub fn create(&mut self, name: &str, group: &str) -> Result<ParticleSystemKey, ResourceError> {
        let template = ParticleSystemTemplate::new(name, &self.factories);
        self.registry.create(group, template)
    }

    /// Look up by name
    pub fn get_by_name(&self, name: &str) -> Option<ParticleSystemKey> {
        self.registry.get_by_name(name)
    }

    /// Borrow a template by name
    pub fn find(&self, name: &str) -> Option<&ParticleSystemTemplate> {
        self.get_by_name(name).and_then(|key| self.registry.get(key))
    }

    /// Borrow a template
    pub fn get(&self, key: ParticleSystemKey) -> Option<&ParticleSystemTemplate> {
        self.registry.get(key)
    }

    /// Mutably borrow a template together with the factory tables
    pub fn get_mut(&mut self, key: ParticleSystemKey) -> Option<(&mut ParticleSystemTemplate, &ParticleFactories)> {
        let template = self.registry.get_mut(key)?;
        Some((template, &self.factories))
    }

    /// Group that defined a template
    pub fn group(&self, key: ParticleSystemKey) -> Option<&str> {
        self.registry.group(key)
    }

    /// Discard a template's content and move it to another group
    pub fn reset(&mut self, key: ParticleSystemKey, group: &str) {
        if let Some(template) = self.registry.get_mut(key) {
            template.reset(&self.factories);
        }
        self.registry.set_group(key, group);
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True when no templates exist
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Iterate over templates
    pub fn iter(&self) -> impl Iterator<Item = (ParticleSystemKey, &ParticleSystemTemplate)> {
        self.registry.iter()
    }
}
