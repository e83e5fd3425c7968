//! Keyword table
//!
//! Class names, property names and enumerated values are interned into
//! [`Keyword`] ids when the AST is built. Words outside the table map to
//! [`Keyword::Unknown`] and are treated as plain strings.

macro_rules! keywords {
    ($($variant:ident => $word:literal,)*) => {
        /// Interned script word
        #[allow(missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[repr(u32)]
        pub enum Keyword {
            #[default]
            Unknown = 0,
            $($variant,)*
        }

        impl Keyword {
            /// Look up a word; unmapped words give [`Keyword::Unknown`]
            pub fn from_word(word: &str) -> Self {
                match word {
                    $($word => Self::$variant,)*
                    _ => Self::Unknown,
                }
            }

            /// Script spelling, empty for [`Keyword::Unknown`]
            pub fn word(self) -> &'static str {
                match self {
                    Self::Unknown => "",
                    $(Self::$variant => $word,)*
                }
            }

            /// Numeric id
            pub fn id(self) -> u32 {
                self as u32
            }
        }
    };
}

keywords! {
    // statements
    Abstract => "abstract",
    Import => "import",
    From => "from",
    Set => "set",

    // truth values
    On => "on",
    Off => "off",
    True => "true",
    False => "false",
    Yes => "yes",
    No => "no",

    // material
    Material => "material",
    LodDistances => "lod_distances",
    ReceiveShadows => "receive_shadows",
    TransparencyCastsShadows => "transparency_casts_shadows",
    SetTextureAlias => "set_texture_alias",

    // technique
    Technique => "technique",
    Scheme => "scheme",
    LodIndex => "lod_index",
    ShadowCasterMaterial => "shadow_caster_material",
    ShadowReceiverMaterial => "shadow_receiver_material",

    // pass
    Pass => "pass",
    Ambient => "ambient",
    Diffuse => "diffuse",
    Specular => "specular",
    Emissive => "emissive",
    VertexColour => "vertexcolour",
    SceneBlend => "scene_blend",
    SeparateSceneBlend => "separate_scene_blend",
    SceneBlendOp => "scene_blend_op",
    SeparateSceneBlendOp => "separate_scene_blend_op",
    DepthCheck => "depth_check",
    DepthWrite => "depth_write",
    DepthBias => "depth_bias",
    IterationDepthBias => "iteration_depth_bias",
    DepthFunc => "depth_func",
    AlphaRejection => "alpha_rejection",
    AlphaToCoverage => "alpha_to_coverage",
    LightScissor => "light_scissor",
    LightClipPlanes => "light_clip_planes",
    TransparentSorting => "transparent_sorting",
    IlluminationStage => "illumination_stage",
    CullHardware => "cull_hardware",
    CullSoftware => "cull_software",
    NormaliseNormals => "normalise_normals",
    Lighting => "lighting",
    Shading => "shading",
    PolygonMode => "polygon_mode",
    PolygonModeOverrideable => "polygon_mode_overrideable",
    FogOverride => "fog_override",
    ColourWrite => "colour_write",
    MaxLights => "max_lights",
    StartLight => "start_light",
    Iteration => "iteration",
    PointSize => "point_size",
    PointSprites => "point_sprites",
    PointSizeAttenuation => "point_size_attenuation",
    PointSizeMin => "point_size_min",
    PointSizeMax => "point_size_max",

    // blend factors and types
    Add => "add",
    Modulate => "modulate",
    ColourBlend => "colour_blend",
    AlphaBlend => "alpha_blend",
    Replace => "replace",
    One => "one",
    Zero => "zero",
    DestColour => "dest_colour",
    SrcColour => "src_colour",
    OneMinusDestColour => "one_minus_dest_colour",
    OneMinusSrcColour => "one_minus_src_colour",
    DestAlpha => "dest_alpha",
    SrcAlpha => "src_alpha",
    OneMinusDestAlpha => "one_minus_dest_alpha",
    OneMinusSrcAlpha => "one_minus_src_alpha",
    Subtract => "subtract",
    ReverseSubtract => "reverse_subtract",
    Min => "min",
    Max => "max",

    // compare functions
    AlwaysFail => "always_fail",
    AlwaysPass => "always_pass",
    Less => "less",
    LessEqual => "less_equal",
    Equal => "equal",
    NotEqual => "not_equal",
    GreaterEqual => "greater_equal",
    Greater => "greater",

    // culling, shading, polygon and fog modes
    Clockwise => "clockwise",
    Anticlockwise => "anticlockwise",
    None => "none",
    Back => "back",
    Front => "front",
    Flat => "flat",
    Gouraud => "gouraud",
    Phong => "phong",
    Points => "points",
    Wireframe => "wireframe",
    Solid => "solid",
    Exp => "exp",
    Exp2 => "exp2",
    Linear => "linear",

    // iteration and light types
    Once => "once",
    OncePerLight => "once_per_light",
    PerLight => "per_light",
    PerNLights => "per_n_lights",
    Point => "point",
    Directional => "directional",
    Spot => "spot",
    Decal => "decal",

    // texture unit
    TextureUnit => "texture_unit",
    TextureAlias => "texture_alias",
    Texture => "texture",
    Tex1D => "1d",
    Tex2D => "2d",
    Tex3D => "3d",
    Cubic => "cubic",
    Unlimited => "unlimited",
    Alpha => "alpha",
    AnimTexture => "anim_texture",
    CubicTexture => "cubic_texture",
    SeparateUv => "separateUV",
    CombinedUvw => "combinedUVW",
    TexCoordSet => "tex_coord_set",
    TexAddressMode => "tex_address_mode",
    Wrap => "wrap",
    Clamp => "clamp",
    Mirror => "mirror",
    Border => "border",
    TexBorderColour => "tex_border_colour",
    Filtering => "filtering",
    Bilinear => "bilinear",
    Trilinear => "trilinear",
    Anisotropic => "anisotropic",
    MaxAnisotropy => "max_anisotropy",
    MipmapBias => "mipmap_bias",
    ColourOp => "colour_op",
    ColourOpEx => "colour_op_ex",
    ColourOpMultipassFallback => "colour_op_multipass_fallback",
    AlphaOpEx => "alpha_op_ex",
    Source1 => "source1",
    Source2 => "source2",
    ModulateX2 => "modulate_x2",
    ModulateX4 => "modulate_x4",
    AddSigned => "add_signed",
    AddSmooth => "add_smooth",
    BlendDiffuseAlpha => "blend_diffuse_alpha",
    BlendTextureAlpha => "blend_texture_alpha",
    BlendCurrentAlpha => "blend_current_alpha",
    BlendManual => "blend_manual",
    DotProduct => "dotproduct",
    BlendDiffuseColour => "blend_diffuse_colour",
    SrcCurrent => "src_current",
    SrcTexture => "src_texture",
    SrcDiffuse => "src_diffuse",
    SrcSpecular => "src_specular",
    SrcManual => "src_manual",
    EnvMap => "env_map",
    Spherical => "spherical",
    Planar => "planar",
    CubicReflection => "cubic_reflection",
    CubicNormal => "cubic_normal",
    Scroll => "scroll",
    ScrollAnim => "scroll_anim",
    Rotate => "rotate",
    RotateAnim => "rotate_anim",
    Scale => "scale",
    WaveXform => "wave_xform",
    ScrollX => "scroll_x",
    ScrollY => "scroll_y",
    ScaleX => "scale_x",
    ScaleY => "scale_y",
    Sine => "sine",
    Triangle => "triangle",
    Square => "square",
    Sawtooth => "sawtooth",
    InverseSawtooth => "inverse_sawtooth",
    Pwm => "pwm",
    Transform => "transform",
    BindingType => "binding_type",
    Vertex => "vertex",
    Fragment => "fragment",
    ContentType => "content_type",
    Named => "named",
    Shadow => "shadow",

    // gpu programs
    VertexProgram => "vertex_program",
    GeometryProgram => "geometry_program",
    FragmentProgram => "fragment_program",
    VertexProgramRef => "vertex_program_ref",
    GeometryProgramRef => "geometry_program_ref",
    FragmentProgramRef => "fragment_program_ref",
    ShadowCasterVertexProgramRef => "shadow_caster_vertex_program_ref",
    ShadowReceiverVertexProgramRef => "shadow_receiver_vertex_program_ref",
    ShadowReceiverFragmentProgramRef => "shadow_receiver_fragment_program_ref",
    DefaultParams => "default_params",
    Source => "source",
    Syntax => "syntax",
    EntryPoint => "entry_point",
    Profiles => "profiles",
    Target => "target",
    IncludesSkeletalAnimation => "includes_skeletal_animation",
    IncludesMorphAnimation => "includes_morph_animation",
    IncludesPoseAnimation => "includes_pose_animation",
    UsesVertexTextureFetch => "uses_vertex_texture_fetch",
    UsesAdjacencyInformation => "uses_adjacency_information",
    ParamIndexed => "param_indexed",
    ParamNamed => "param_named",
    ParamIndexedAuto => "param_indexed_auto",
    ParamNamedAuto => "param_named_auto",

    // particle systems
    ParticleSystem => "particle_system",
    Emitter => "emitter",
    Affector => "affector",
    Renderer => "renderer",

    // compositors
    Compositor => "compositor",
    TargetOutput => "target_output",
    Input => "input",
    Previous => "previous",
    OnlyInitial => "only_initial",
    VisibilityMask => "visibility_mask",
    LodBias => "lod_bias",
    MaterialScheme => "material_scheme",
    Shadows => "shadows",
    CompositorLogic => "compositor_logic",
    Clear => "clear",
    Stencil => "stencil",
    RenderScene => "render_scene",
    RenderQuad => "render_quad",
    Identifier => "identifier",
    FirstRenderQueue => "first_render_queue",
    LastRenderQueue => "last_render_queue",
    Buffers => "buffers",
    Colour => "colour",
    Depth => "depth",
    ColourValue => "colour_value",
    DepthValue => "depth_value",
    StencilValue => "stencil_value",
    Check => "check",
    CompFunc => "comp_func",
    RefValue => "ref_value",
    Mask => "mask",
    FailOp => "fail_op",
    DepthFailOp => "depth_fail_op",
    PassOp => "pass_op",
    TwoSided => "two_sided",
    Keep => "keep",
    Increment => "increment",
    Decrement => "decrement",
    IncrementWrap => "increment_wrap",
    DecrementWrap => "decrement_wrap",
    Invert => "invert",
    TargetWidth => "target_width",
    TargetHeight => "target_height",
    TargetWidthScaled => "target_width_scaled",
    TargetHeightScaled => "target_height_scaled",
    Pooled => "pooled",
    Gamma => "gamma",
    NoFsaa => "no_fsaa",
}
