//! Handle types for arena-owned resources
//!
//! Every long-lived object in the material system lives in a slot map and is
//! referenced by a small copyable key. Keys stay valid across removals of other
//! entries, which matters for passes that are cloned and destroyed during
//! technique compilation.

pub use slotmap::{Key, SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Handle to a [`crate::material::Material`]
    pub struct MaterialKey;
    /// Handle to a [`crate::material::Pass`] stored in a [`crate::material::PassStore`]
    pub struct PassKey;
    /// Handle to a [`crate::resources::GpuProgram`]
    pub struct GpuProgramKey;
    /// Handle to a [`crate::resources::Compositor`]
    pub struct CompositorKey;
    /// Handle to a [`crate::resources::ParticleSystemTemplate`]
    pub struct ParticleSystemKey;
}
