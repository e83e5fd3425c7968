//! GPU program definitions and constant parameter sets
//!
//! Programs are declared by scripts and looked up by name from pass program
//! references. Parameter sets are reference counted so that a pass can share a
//! program's defaults until it writes its own overrides.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::foundation::collections::GpuProgramKey;
use crate::resources::registry::{Resource, ResourceError, ResourceRegistry};
use crate::resources::RenderCapabilities;
use crate::resources::capabilities::Capabilities;

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuProgramType {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
    /// Geometry stage
    Geometry,
}

impl GpuProgramType {
    fn required_capability(self) -> Capabilities {
        match self {
            GpuProgramType::Vertex => Capabilities::VERTEX_PROGRAM,
            GpuProgramType::Fragment => Capabilities::FRAGMENT_PROGRAM,
            GpuProgramType::Geometry => Capabilities::GEOMETRY_PROGRAM,
        }
    }
}

/// Kind of extra data an auto constant takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoExtraKind {
    /// No extra data
    None,
    /// Integer index, e.g. a light index
    Int,
    /// Real factor, e.g. a time scale
    Real,
}

macro_rules! auto_constants {
    ($($variant:ident => $name:literal, $extra:ident;)*) => {
        /// Values the renderer fills in automatically
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum AutoConstantType {
            $(
                #[allow(missing_docs)]
                $variant,
            )*
        }

        impl AutoConstantType {
            /// Script name of the constant
            pub fn name(self) -> &'static str {
                match self {
                    $(AutoConstantType::$variant => $name,)*
                }
            }

            /// Extra data expected after the name
            pub fn extra_kind(self) -> AutoExtraKind {
                match self {
                    $(AutoConstantType::$variant => AutoExtraKind::$extra,)*
                }
            }

            /// Resolve a script name
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(AutoConstantType::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

auto_constants! {
    WorldMatrix => "world_matrix", None;
    InverseWorldMatrix => "inverse_world_matrix", None;
    InverseTransposeWorldMatrix => "inverse_transpose_world_matrix", None;
    WorldMatrixArray3x4 => "world_matrix_array_3x4", None;
    WorldMatrixArray => "world_matrix_array", None;
    ViewMatrix => "view_matrix", None;
    InverseViewMatrix => "inverse_view_matrix", None;
    ProjectionMatrix => "projection_matrix", None;
    ViewProjMatrix => "viewproj_matrix", None;
    WorldViewMatrix => "worldview_matrix", None;
    InverseWorldViewMatrix => "inverse_worldview_matrix", None;
    InverseTransposeWorldViewMatrix => "inverse_transpose_worldview_matrix", None;
    WorldViewProjMatrix => "worldviewproj_matrix", None;
    LightDiffuseColour => "light_diffuse_colour", Int;
    LightSpecularColour => "light_specular_colour", Int;
    LightAttenuation => "light_attenuation", Int;
    LightPosition => "light_position", Int;
    LightDirection => "light_direction", Int;
    LightPositionObjectSpace => "light_position_object_space", Int;
    LightDirectionObjectSpace => "light_direction_object_space", Int;
    LightDistanceObjectSpace => "light_distance_object_space", Int;
    LightCount => "light_count", None;
    ShadowExtrusionDistance => "shadow_extrusion_distance", Int;
    CameraPosition => "camera_position", None;
    CameraPositionObjectSpace => "camera_position_object_space", None;
    AmbientLightColour => "ambient_light_colour", None;
    SurfaceAmbientColour => "surface_ambient_colour", None;
    SurfaceDiffuseColour => "surface_diffuse_colour", None;
    SurfaceSpecularColour => "surface_specular_colour", None;
    SurfaceEmissiveColour => "surface_emissive_colour", None;
    SurfaceShininess => "surface_shininess", None;
    FogColour => "fog_colour", None;
    FogParams => "fog_params", None;
    TextureViewProjMatrix => "texture_viewproj_matrix", Int;
    TextureSize => "texture_size", Int;
    PassNumber => "pass_number", None;
    Time => "time", Real;
    Time0X => "time_0_x", Real;
    CosTime0X => "costime_0_x", Real;
    SinTime0X => "sintime_0_x", Real;
    Custom => "custom", Int;
}

/// Extra data attached to an auto constant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoConstantExtra {
    /// No extra data
    None,
    /// Integer index
    Int(u32),
    /// Real factor
    Real(f32),
}

/// A single program constant
#[derive(Debug, Clone, PartialEq)]
pub enum GpuConstant {
    /// Floating point values
    Float(Vec<f32>),
    /// Integer values
    Int(Vec<i32>),
    /// Renderer-supplied value
    Auto {
        /// Which value to supply
        kind: AutoConstantType,
        /// Extra data for the value
        extra: AutoConstantExtra,
    },
}

/// Named and indexed constants bound to a program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpuProgramParameters {
    named: BTreeMap<String, GpuConstant>,
    indexed: BTreeMap<usize, GpuConstant>,
}

impl GpuProgramParameters {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a constant by name
    pub fn set_named(&mut self, name: impl Into<String>, value: GpuConstant) {
        self.named.insert(name.into(), value);
    }

    /// Set a constant by register index
    pub fn set_indexed(&mut self, index: usize, value: GpuConstant) {
        self.indexed.insert(index, value);
    }

    /// Constant by name
    pub fn named(&self, name: &str) -> Option<&GpuConstant> {
        self.named.get(name)
    }

    /// Constant by register index
    pub fn indexed(&self, index: usize) -> Option<&GpuConstant> {
        self.indexed.get(&index)
    }

    /// Copy every constant of `other` over this set
    pub fn merge_from(&mut self, other: &Self) {
        self.named.extend(other.named.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.indexed.extend(other.indexed.iter().map(|(k, v)| (*k, v.clone())));
    }

    /// Total number of constants
    pub fn len(&self) -> usize {
        self.named.len() + self.indexed.len()
    }

    /// True when no constants are set
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.indexed.is_empty()
    }
}

/// A vertex, fragment or geometry program declared by a script
#[derive(Debug, Clone)]
pub struct GpuProgram {
    name: String,
    program_type: GpuProgramType,
    language: String,
    /// Source file name
    pub source: String,
    /// Low level syntax code for `asm` programs
    pub syntax: String,
    /// Entry point function
    pub entry_point: String,
    /// Profiles for high level programs, any one of which must be supported
    pub profiles: Vec<String>,
    /// Program performs skeletal animation
    pub skeletal_animation: bool,
    /// Program performs morph animation
    pub morph_animation: bool,
    /// Number of simultaneous poses supported
    pub pose_animation: u16,
    /// Program samples textures in the vertex stage
    pub vertex_texture_fetch: bool,
    /// Program consumes adjacency information
    pub adjacency_information: bool,
    /// Language specific settings not interpreted here
    pub custom_parameters: BTreeMap<String, String>,
    default_params: Arc<GpuProgramParameters>,
}

impl Resource for GpuProgram {
    fn name(&self) -> &str {
        &self.name
    }
}

impl GpuProgram {
    /// Create a program declaration
    pub fn new(name: impl Into<String>, program_type: GpuProgramType, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program_type,
            language: language.into(),
            source: String::new(),
            syntax: String::new(),
            entry_point: "main".to_string(),
            profiles: Vec::new(),
            skeletal_animation: false,
            morph_animation: false,
            pose_animation: 0,
            vertex_texture_fetch: false,
            adjacency_information: false,
            custom_parameters: BTreeMap::new(),
            default_params: Arc::new(GpuProgramParameters::new()),
        }
    }

    /// Program stage
    pub fn program_type(&self) -> GpuProgramType {
        self.program_type
    }

    /// Program language, `asm` for low level programs
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Whether the program can run on the given hardware
    pub fn is_supported(&self, caps: &RenderCapabilities) -> bool {
        if !caps.has_capability(self.program_type.required_capability()) {
            return false;
        }
        if !self.syntax.is_empty() {
            return caps.is_syntax_supported(&self.syntax);
        }
        if !self.profiles.is_empty() {
            return self.profiles.iter().any(|profile| caps.is_syntax_supported(profile));
        }
        caps.is_syntax_supported(&self.language)
    }

    /// Shared default parameters
    pub fn default_parameters(&self) -> &Arc<GpuProgramParameters> {
        &self.default_params
    }

    /// Mutable default parameters; usages already sharing them keep their snapshot
    pub fn default_parameters_mut(&mut self) -> &mut GpuProgramParameters {
        Arc::make_mut(&mut self.default_params)
    }

    /// Drop everything a previous definition set, keeping name and type
    pub fn reset(&mut self, program_type: GpuProgramType, language: impl Into<String>) {
        *self = Self::new(std::mem::take(&mut self.name), program_type, language);
    }
}

/// Registry of GPU programs
#[derive(Debug, Clone)]
pub struct GpuProgramManager {
    registry: ResourceRegistry<GpuProgramKey, GpuProgram>,
}

impl Default for GpuProgramManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuProgramManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            registry: ResourceRegistry::new("gpu program"),
        }
    }

    /// Declare a program
    pub fn create(&mut self, group: &str, program: GpuProgram) -> Result<GpuProgramKey, ResourceError> {
        self.registry.create(group, program)
    }

    /// Look up by name
    pub fn get_by_name(&self, name: &str) -> Option<GpuProgramKey> {
        self.registry.get_by_name(name)
    }

    /// Borrow a program by name
    pub fn find(&self, name: &str) -> Option<&GpuProgram> {
        self.get_by_name(name).and_then(|key| self.registry.get(key))
    }

    /// Borrow a program
    pub fn get(&self, key: GpuProgramKey) -> Option<&GpuProgram> {
        self.registry.get(key)
    }

    /// Mutably borrow a program
    pub fn get_mut(&mut self, key: GpuProgramKey) -> Option<&mut GpuProgram> {
        self.registry.get_mut(key)
    }

    /// Group that declared a program
    pub fn group(&self, key: GpuProgramKey) -> Option<&str> {
        self.registry.group(key)
    }

    /// Reassign a program to another group
    pub fn set_group(&mut self, key: GpuProgramKey, group: &str) {
        self.registry.set_group(key, group);
    }

    /// Number of programs
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True when no programs are declared
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Iterate over programs
    pub fn iter(&self) -> impl Iterator<Item = (GpuProgramKey, &GpuProgram)> {
        self.registry.iter()
    }
}
