//! Hardware capability profile
//!
//! Technique compilation consults this profile to decide whether a technique can
//! run and how many texture units a fixed-function pass may use.

use std::collections::BTreeSet;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Optional hardware features
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u32 {
        /// Automatic mipmap generation
        const AUTOMIPMAP = 1 << 0;
        /// Texture blending
        const BLENDING = 1 << 1;
        /// Anisotropic filtering
        const ANISOTROPY = 1 << 2;
        /// Dot3 texture blending
        const DOT3 = 1 << 3;
        /// Cube map textures
        const CUBEMAPPING = 1 << 4;
        /// Hardware stencil buffer
        const HWSTENCIL = 1 << 5;
        /// Programmable vertex stage
        const VERTEX_PROGRAM = 1 << 6;
        /// Programmable fragment stage
        const FRAGMENT_PROGRAM = 1 << 7;
        /// Programmable geometry stage
        const GEOMETRY_PROGRAM = 1 << 8;
        /// Scissor test
        const SCISSOR_TEST = 1 << 9;
        /// User clip planes
        const USER_CLIP_PLANES = 1 << 10;
        /// Three dimensional textures
        const TEXTURE_3D = 1 << 11;
        /// Point sprites
        const POINT_SPRITES = 1 << 12;
        /// Point size attenuation
        const POINT_EXTENDED_PARAMETERS = 1 << 13;
        /// Texture sampling in vertex programs
        const VERTEX_TEXTURE_FETCH = 1 << 14;
        /// Mipmap level of detail bias
        const MIPMAP_LOD_BIAS = 1 << 15;
        /// Alpha to coverage
        const ALPHA_TO_COVERAGE = 1 << 16;
        /// Separate alpha scene blending
        const SEPARATE_SCENE_BLEND = 1 << 17;
    }
}

/// Description of what the target hardware supports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderCapabilities {
    /// Number of fixed-function texture units
    pub num_texture_units: u16,
    /// Feature flags
    pub capabilities: Capabilities,
    /// Shader syntax codes and profiles accepted by the hardware
    pub supported_syntax: BTreeSet<String>,
}

impl Default for RenderCapabilities {
    fn default() -> Self {
        let syntax = [
            "arbvp1", "arbfp1", "vs_1_1", "vs_2_0", "vs_3_0", "ps_2_0", "ps_3_0", "glsl", "hlsl", "cg",
        ];
        Self {
            num_texture_units: 8,
            capabilities: Capabilities::all(),
            supported_syntax: syntax.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl RenderCapabilities {
    /// Profile of a device with no optional features and the given unit count
    pub fn minimal(num_texture_units: u16) -> Self {
        Self {
            num_texture_units,
            capabilities: Capabilities::empty(),
            supported_syntax: BTreeSet::new(),
        }
    }

    /// Set the texture unit count
    pub fn with_texture_units(mut self, count: u16) -> Self {
        self.num_texture_units = count;
        self
    }

    /// Add capability flags
    pub fn with_capabilities(mut self, caps: Capabilities) -> Self {
        self.capabilities |= caps;
        self
    }

    /// Remove capability flags
    pub fn without_capabilities(mut self, caps: Capabilities) -> Self {
        self.capabilities.remove(caps);
        self
    }

    /// Declare a supported syntax code
    pub fn with_syntax(mut self, syntax: impl Into<String>) -> Self {
        self.supported_syntax.insert(syntax.into());
        self
    }

    /// Check a feature flag
    pub fn has_capability(&self, cap: Capabilities) -> bool {
        self.capabilities.contains(cap)
    }

    /// Number of fixed-function texture units
    pub fn num_texture_units(&self) -> usize {
        usize::from(self.num_texture_units)
    }

    /// Check whether a program syntax code can run
    pub fn is_syntax_supported(&self, syntax: &str) -> bool {
        self.supported_syntax.contains(syntax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile() {
        let caps = RenderCapabilities::minimal(2).with_capabilities(Capabilities::DOT3);
        assert_eq!(caps.num_texture_units(), 2);
        assert!(caps.has_capability(Capabilities::DOT3));
        assert!(!caps.has_capability(Capabilities::CUBEMAPPING));
        assert!(!caps.is_syntax_supported("arbfp1"));
    }

    #[test]
    fn test_default_profile_is_capable() {
        let caps = RenderCapabilities::default().without_capabilities(Capabilities::GEOMETRY_PROGRAM);
        assert!(caps.has_capability(Capabilities::FRAGMENT_PROGRAM));
        assert!(!caps.has_capability(Capabilities::GEOMETRY_PROGRAM));
        assert!(caps.is_syntax_supported("ps_2_0"));
    }
}
