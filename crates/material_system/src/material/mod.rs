//! Material object model
//!
//! Materials own techniques, techniques reference passes held in a
//! [`PassStore`], and passes own their texture units and program bindings.

#[allow(clippy::module_inception)]
pub mod material;
pub mod manager;
pub mod pass;
pub mod pass_store;
pub mod program_usage;
pub mod technique;
pub mod texture_unit;
pub mod types;

pub use manager::MaterialManager;
pub use material::Material;
pub use pass::{DepthBias, FogSettings, LightIteration, Pass, PassParent, PointSettings, ProgramSlot};
pub use pass_store::PassStore;
pub use program_usage::{GpuProgramUsage, ProgramUsageError};
pub use technique::{CompileOptions, IlluminationPass, Technique, TechniqueUnsupported};
pub use texture_unit::{LayerBlendModeEx, TextureEffect, TextureUnitState, CUBE_FACE_SUFFIXES};
pub use types::*;
