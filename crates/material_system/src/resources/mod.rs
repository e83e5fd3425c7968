//! Resource collaborators of the material system
//!
//! Named registries with duplicate detection, GPU program definitions, hardware
//! capability profiles, pixel format names, compositor and particle templates
//! and script loading.

pub mod capabilities;
pub mod compositor;
pub mod gpu_program;
pub mod loader;
pub mod particle;
pub mod pixel_format;
pub mod registry;

pub use capabilities::{Capabilities, RenderCapabilities};
pub use compositor::{
    CompositionPass, CompositionPassType, CompositionTargetPass, CompositionTechnique, Compositor, CompositorManager,
    FrameBuffers, PassInput, StencilOperation, StencilState, TargetInputMode, TextureDefinition,
};
pub use gpu_program::{
    AutoConstantExtra, AutoConstantType, AutoExtraKind, GpuConstant, GpuProgram, GpuProgramManager,
    GpuProgramParameters, GpuProgramType,
};
pub use loader::{FileSystemLoader, LoadError, MemoryLoader, ScriptLoader};
pub use particle::{
    ParamDictionary, ParticleAffector, ParticleEmitter, ParticleError, ParticleFactories, ParticleSystemManager,
    ParticleSystemTemplate,
};
pub use pixel_format::PixelFormat;
pub use registry::{Resource, ResourceError, ResourceRegistry};

/// Group used when a caller does not name one
pub const DEFAULT_GROUP: &str = "General";
