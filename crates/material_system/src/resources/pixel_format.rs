//! Pixel format names used by compositor texture definitions

macro_rules! pixel_formats {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Texture pixel formats known to the compositor translator
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum PixelFormat {
            /// Unrecognised format
            Unknown,
            $(
                #[allow(missing_docs)]
                $variant,
            )*
        }

        impl PixelFormat {
            const NAMED: &'static [(PixelFormat, &'static str)] = &[$((PixelFormat::$variant, $name)),*];

            /// Canonical name, e.g. `PF_A8R8G8B8`
            pub fn name(self) -> &'static str {
                match self {
                    PixelFormat::Unknown => "PF_UNKNOWN",
                    $(PixelFormat::$variant => $name,)*
                }
            }
        }
    };
}

pixel_formats! {
    L8 => "PF_L8",
    L16 => "PF_L16",
    A8 => "PF_A8",
    A4L4 => "PF_A4L4",
    ByteLa => "PF_BYTE_LA",
    R5G6B5 => "PF_R5G6B5",
    B5G6R5 => "PF_B5G6R5",
    A4R4G4B4 => "PF_A4R4G4B4",
    A1R5G5B5 => "PF_A1R5G5B5",
    R8G8B8 => "PF_R8G8B8",
    B8G8R8 => "PF_B8G8R8",
    A8R8G8B8 => "PF_A8R8G8B8",
    A8B8G8R8 => "PF_A8B8G8R8",
    B8G8R8A8 => "PF_B8G8R8A8",
    R8G8B8A8 => "PF_R8G8B8A8",
    X8R8G8B8 => "PF_X8R8G8B8",
    X8B8G8R8 => "PF_X8B8G8R8",
    A2R10G10B10 => "PF_A2R10G10B10",
    A2B10G10R10 => "PF_A2B10G10R10",
    Dxt1 => "PF_DXT1",
    Dxt3 => "PF_DXT3",
    Dxt5 => "PF_DXT5",
    Float16R => "PF_FLOAT16_R",
    Float16Gr => "PF_FLOAT16_GR",
    Float16Rgb => "PF_FLOAT16_RGB",
    Float16Rgba => "PF_FLOAT16_RGBA",
    Float32R => "PF_FLOAT32_R",
    Float32Gr => "PF_FLOAT32_GR",
    Float32Rgb => "PF_FLOAT32_RGB",
    Float32Rgba => "PF_FLOAT32_RGBA",
    ShortGr => "PF_SHORT_GR",
    ShortRgb => "PF_SHORT_RGB",
    ShortRgba => "PF_SHORT_RGBA",
    Depth => "PF_DEPTH",
}

impl PixelFormat {
    /// Resolve a format name; the `PF_` prefix and letter case are optional
    pub fn from_name(name: &str) -> Self {
        let upper = name.to_ascii_uppercase();
        let wanted = if upper.starts_with("PF_") { upper } else { format!("PF_{upper}") };
        Self::NAMED
            .iter()
            .find(|(_, known)| *known == wanted)
            .map_or(Self::Unknown, |(format, _)| *format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_with_and_without_prefix() {
        assert_eq!(PixelFormat::from_name("PF_A8R8G8B8"), PixelFormat::A8R8G8B8);
        assert_eq!(PixelFormat::from_name("float16_rgba"), PixelFormat::Float16Rgba);
        assert_eq!(PixelFormat::from_name("PF_NOPE"), PixelFormat::Unknown);
        assert_eq!(PixelFormat::R8G8B8.name(), "PF_R8G8B8");
    }
}
