//! Concrete syntax tree
//!
//! The parser groups tokens into statements. A statement's first token becomes
//! the node and the remaining tokens up to its end become children. A `{`
//! child owns the nested statements of its block and is always followed by a
//! `}` child, so object headers can be recognised by their last two children.
//!
//! A statement ends at a newline, at `}`, after its own block, or at a word
//! that opens a statement in the enclosing block. The last rule lets a whole
//! material sit on one line. The word right after a statement's head is
//! always a value, so `illumination_stage ambient` keeps its argument.

use std::sync::Arc;

use super::error::ScriptError;
use super::keywords::Keyword;
use super::lexer::{ScriptToken, TokenKind};

/// Concrete node categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcreteNodeKind {
    /// Bare word
    Word,
    /// Quoted phrase
    Quote,
    /// `$name` reference
    Variable,
    /// `set $name ...` or `$name = ...`; children hold the variable and its values
    VariableAssign,
    /// `import target [from] source`; children hold the operands
    Import,
    /// `:`
    Colon,
    /// `{`; children hold the block statements
    LeftBrace,
    /// `}`
    RightBrace,
}

/// Node of the concrete syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteNode {
    /// Token text
    pub token: String,
    /// Category
    pub kind: ConcreteNodeKind,
    /// Source name
    pub file: Arc<str>,
    /// 1-based line
    pub line: u32,
    /// Owned children
    pub children: Vec<ConcreteNode>,
}

impl ConcreteNode {
    /// True when the node ends in a `{ }` pair
    pub fn is_object(&self) -> bool {
        let n = self.children.len();
        n >= 2
            && self.children[n - 2].kind == ConcreteNodeKind::LeftBrace
            && self.children[n - 1].kind == ConcreteNodeKind::RightBrace
    }
}

/// Kind of block a statement sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Root,
    Material,
    Technique,
    Pass,
    TextureUnit,
    Program,
    Parameters,
    Compositor,
    CompositorTechnique,
    Target,
    CompositorPass,
    /// Free-form blocks such as particle emitters; only newlines split them
    Opaque,
}

impl Block {
    /// Block opened by an object of class `class` inside `self`
    fn child(self, class: &str) -> Self {
        use Keyword as K;
        match (self, Keyword::from_word(class)) {
            (Self::Root, K::Material) => Self::Material,
            (Self::Root | Self::Material, K::Technique) => Self::Technique,
            (Self::Root | Self::Technique, K::Pass) => Self::Pass,
            (Self::Root | Self::Pass, K::TextureUnit) => Self::TextureUnit,
            (Self::Root, K::VertexProgram | K::FragmentProgram | K::GeometryProgram) => Self::Program,
            (Self::Program, K::DefaultParams) => Self::Parameters,
            (
                Self::Root | Self::Pass,
                K::VertexProgramRef
                | K::FragmentProgramRef
                | K::GeometryProgramRef
                | K::ShadowCasterVertexProgramRef
                | K::ShadowReceiverVertexProgramRef
                | K::ShadowReceiverFragmentProgramRef,
            ) => Self::Parameters,
            (Self::Root, K::Compositor) => Self::Compositor,
            (Self::Compositor, K::Technique) => Self::CompositorTechnique,
            (Self::CompositorTechnique, K::Target | K::TargetOutput) => Self::Target,
            (Self::Target, K::Pass) => Self::CompositorPass,
            _ => Self::Opaque,
        }
    }

    /// True when `word` opens a statement in this block
    fn starts_statement(self, word: &str) -> bool {
        use Keyword as K;
        let keyword = Keyword::from_word(word);
        if keyword == K::Set {
            return self != Self::Opaque;
        }
        match self {
            Self::Root => matches!(
                keyword,
                K::Abstract
                    | K::Import
                    | K::Material
                    | K::VertexProgram
                    | K::FragmentProgram
                    | K::GeometryProgram
                    | K::Compositor
                    | K::ParticleSystem
            ),
            Self::Material => matches!(
                keyword,
                K::Technique | K::LodDistances | K::ReceiveShadows | K::TransparencyCastsShadows | K::SetTextureAlias
            ),
            Self::Technique => matches!(
                keyword,
                K::Pass | K::Scheme | K::LodIndex | K::ShadowCasterMaterial | K::ShadowReceiverMaterial
            ),
            Self::Pass => matches!(
                keyword,
                K::Ambient
                    | K::Diffuse
                    | K::Specular
                    | K::Emissive
                    | K::SceneBlend
                    | K::SeparateSceneBlend
                    | K::SceneBlendOp
                    | K::SeparateSceneBlendOp
                    | K::DepthCheck
                    | K::DepthWrite
                    | K::DepthBias
                    | K::IterationDepthBias
                    | K::DepthFunc
                    | K::AlphaRejection
                    | K::AlphaToCoverage
                    | K::LightScissor
                    | K::LightClipPlanes
                    | K::TransparentSorting
                    | K::IlluminationStage
                    | K::CullHardware
                    | K::CullSoftware
                    | K::NormaliseNormals
                    | K::Lighting
                    | K::Shading
                    | K::PolygonMode
                    | K::PolygonModeOverrideable
                    | K::FogOverride
                    | K::ColourWrite
                    | K::MaxLights
                    | K::StartLight
                    | K::Iteration
                    | K::PointSize
                    | K::PointSprites
                    | K::PointSizeAttenuation
                    | K::PointSizeMin
                    | K::PointSizeMax
                    | K::TextureUnit
                    | K::VertexProgramRef
                    | K::FragmentProgramRef
                    | K::GeometryProgramRef
                    | K::ShadowCasterVertexProgramRef
                    | K::ShadowReceiverVertexProgramRef
                    | K::ShadowReceiverFragmentProgramRef
            ),
            Self::TextureUnit => matches!(
                keyword,
                K::TextureAlias
                    | K::Texture
                    | K::AnimTexture
                    | K::CubicTexture
                    | K::TexCoordSet
                    | K::TexAddressMode
                    | K::TexBorderColour
                    | K::Filtering
                    | K::MaxAnisotropy
                    | K::MipmapBias
                    | K::ColourOp
                    | K::ColourOpEx
                    | K::ColourOpMultipassFallback
                    | K::AlphaOpEx
                    | K::EnvMap
                    | K::Scroll
                    | K::ScrollAnim
                    | K::Rotate
                    | K::RotateAnim
                    | K::Scale
                    | K::WaveXform
                    | K::Transform
                    | K::BindingType
                    | K::ContentType
            ),
            Self::Program => matches!(
                keyword,
                K::Source
                    | K::Syntax
                    | K::EntryPoint
                    | K::Profiles
                    | K::Target
                    | K::IncludesSkeletalAnimation
                    | K::IncludesMorphAnimation
                    | K::IncludesPoseAnimation
                    | K::UsesVertexTextureFetch
                    | K::UsesAdjacencyInformation
                    | K::DefaultParams
            ),
            Self::Parameters => matches!(
                keyword,
                K::ParamIndexed | K::ParamNamed | K::ParamIndexedAuto | K::ParamNamedAuto
            ),
            Self::Compositor => keyword == K::Technique,
            Self::CompositorTechnique => matches!(
                keyword,
                K::Texture | K::Scheme | K::CompositorLogic | K::Target | K::TargetOutput
            ),
            Self::Target => matches!(
                keyword,
                K::Input | K::OnlyInitial | K::VisibilityMask | K::LodBias | K::MaterialScheme | K::Shadows | K::Pass
            ),
            Self::CompositorPass => matches!(
                keyword,
                K::Material
                    | K::Input
                    | K::Identifier
                    | K::FirstRenderQueue
                    | K::LastRenderQueue
                    | K::Buffers
                    | K::ColourValue
                    | K::DepthValue
                    | K::StencilValue
                    | K::Check
                    | K::CompFunc
                    | K::RefValue
                    | K::Mask
                    | K::FailOp
                    | K::DepthFailOp
                    | K::PassOp
                    | K::TwoSided
            ),
            Self::Opaque => false,
        }
    }
}

struct Parser<'a> {
    tokens: &'a [ScriptToken],
    pos: usize,
    file: Arc<str>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a ScriptToken> {
        let tokens = self.tokens;
        tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn skip_newlines(&mut self) {
        while self.peek_kind() == Some(TokenKind::Newline) {
            self.pos += 1;
        }
    }

    fn node(&self, token: &ScriptToken, kind: ConcreteNodeKind) -> ConcreteNode {
        ConcreteNode {
            token: token.lexeme.clone(),
            kind,
            file: Arc::clone(&self.file),
            line: token.line,
            children: Vec::new(),
        }
    }

    fn leaf(&self, token: &ScriptToken) -> ConcreteNode {
        let kind = match token.kind {
            TokenKind::Word => ConcreteNodeKind::Word,
            TokenKind::Quote => ConcreteNodeKind::Quote,
            TokenKind::Variable => ConcreteNodeKind::Variable,
            TokenKind::Colon => ConcreteNodeKind::Colon,
            TokenKind::LeftBrace => ConcreteNodeKind::LeftBrace,
            TokenKind::RightBrace => ConcreteNodeKind::RightBrace,
            TokenKind::Newline => ConcreteNodeKind::Word,
        };
        self.node(token, kind)
    }

    fn unexpected(&self, token: &ScriptToken) -> ScriptError {
        ScriptError::UnexpectedToken {
            file: self.file.to_string(),
            line: token.line,
            token: token.lexeme.clone(),
        }
    }

    /// Statements up to the end of input, or up to the `}` closing `opener`
    fn parse_block(&mut self, opener: Option<&ScriptToken>, block: Block) -> Result<Vec<ConcreteNode>, ScriptError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_newlines();
            let Some(token) = self.peek() else {
                return match opener {
                    Some(open) => Err(ScriptError::CloseBraceExpected {
                        file: self.file.to_string(),
                        line: open.line,
                    }),
                    None => Ok(nodes),
                };
            };

            match token.kind {
                TokenKind::RightBrace if opener.is_some() => return Ok(nodes),
                TokenKind::RightBrace | TokenKind::LeftBrace | TokenKind::Colon => {
                    return Err(self.unexpected(token));
                }
                _ => nodes.push(self.parse_statement(block)?),
            }
        }
    }

    fn parse_statement(&mut self, block: Block) -> Result<ConcreteNode, ScriptError> {
        let tokens = self.tokens;
        let head = &tokens[self.pos];
        self.pos += 1;

        let is_assignment = (head.kind == TokenKind::Word && head.lexeme == "set")
            || (head.kind == TokenKind::Variable
                && self.peek().is_some_and(|t| t.kind == TokenKind::Word && t.lexeme == "="));
        let mut node = if head.kind == TokenKind::Word && head.lexeme == "import" {
            self.node(head, ConcreteNodeKind::Import)
        } else if is_assignment {
            let mut assign = self.node(head, ConcreteNodeKind::VariableAssign);
            if head.kind == TokenKind::Variable {
                assign.children.push(self.leaf(head));
                self.pos += 1;
            }
            assign
        } else {
            self.leaf(head)
        };
        let accepts_block = matches!(node.kind, ConcreteNodeKind::Word | ConcreteNodeKind::Quote);

        loop {
            let Some(token) = self.peek() else { break };
            match token.kind {
                TokenKind::Newline => {
                    // A block may open on the line after its header
                    let mut ahead = self.pos;
                    while tokens.get(ahead).is_some_and(|t| t.kind == TokenKind::Newline) {
                        ahead += 1;
                    }
                    if accepts_block && tokens.get(ahead).is_some_and(|t| t.kind == TokenKind::LeftBrace) {
                        self.pos = ahead;
                        continue;
                    }
                    self.pos += 1;
                    break;
                }
                TokenKind::RightBrace => break,
                TokenKind::LeftBrace => {
                    if !accepts_block {
                        return Err(self.unexpected(token));
                    }
                    self.pos += 1;
                    let class = match node.token.as_str() {
                        "abstract" => node.children.first().map_or("", |c| c.token.as_str()),
                        head => head,
                    };
                    let inner = block.child(class);
                    let mut open = self.leaf(token);
                    open.children = self.parse_block(Some(token), inner)?;
                    let close = &tokens[self.pos];
                    self.pos += 1;
                    node.children.push(open);
                    node.children.push(self.leaf(close));
                    break;
                }
                TokenKind::Word if !node.children.is_empty() && block.starts_statement(&token.lexeme) => break,
                _ => {
                    node.children.push(self.leaf(token));
                    self.pos += 1;
                }
            }
        }

        Ok(node)
    }
}

/// Build the concrete tree of a token list
pub fn parse(tokens: &[ScriptToken], file: &str) -> Result<Vec<ConcreteNode>, ScriptError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        file: Arc::from(file),
    };
    parser.parse_block(None, Block::Root)
}

/// Parse a flat value list, as used for variable values
pub fn parse_chunk(tokens: &[ScriptToken], file: &str, line: u32) -> Result<Vec<ConcreteNode>, ScriptError> {
    let file: Arc<str> = Arc::from(file);
    let mut nodes = Vec::with_capacity(tokens.len());
    for token in tokens {
        let kind = match token.kind {
            TokenKind::Newline => continue,
            TokenKind::Word => ConcreteNodeKind::Word,
            TokenKind::Quote => ConcreteNodeKind::Quote,
            TokenKind::Variable => ConcreteNodeKind::Variable,
            TokenKind::Colon | TokenKind::LeftBrace | TokenKind::RightBrace => {
                return Err(ScriptError::UnexpectedToken {
                    file: file.to_string(),
                    line,
                    token: token.lexeme.clone(),
                });
            }
        };
        nodes.push(ConcreteNode {
            token: token.lexeme.clone(),
            kind,
            file: Arc::clone(&file),
            line,
            children: Vec::new(),
        });
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::lexer::tokenize;

    fn parse_text(text: &str) -> Vec<ConcreteNode> {
        parse(&tokenize(text, "t").unwrap(), "t").unwrap()
    }

    #[test]
    fn test_object_with_base() {
        let nodes = parse_text("material Derived : Base\n{\n  lighting off\n}");
        assert_eq!(nodes.len(), 1);
        let material = &nodes[0];
        assert!(material.is_object());
        let tokens: Vec<&str> = material.children.iter().map(|c| c.token.as_str()).collect();
        assert_eq!(tokens, vec!["Derived", ":", "Base", "{", "}"]);

        let body = &material.children[3].children;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].token, "lighting");
        assert_eq!(body[0].children[0].token, "off");
    }

    #[test]
    fn test_properties_end_at_newline_or_brace() {
        let nodes = parse_text("pass { ambient 1 1 1 }\npass\n{\ndiffuse 0 0 0\n}");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].children[0].children[0].children.len(), 3);
        assert!(nodes[1].is_object());
    }

    #[test]
    fn test_statement_words_split_a_single_line() {
        let nodes = parse_text(
            "material M { technique { pass { ambient 0.2 0.2 0.2 diffuse 1 1 1 1 texture_unit { texture wall.jpg } } } }",
        );
        assert_eq!(nodes.len(), 1);
        let technique = &nodes[0].children[1].children[0];
        let pass = &technique.children[0].children[0];
        let heads: Vec<&str> = pass.children[0].children.iter().map(|c| c.token.as_str()).collect();
        assert_eq!(heads, vec!["ambient", "diffuse", "texture_unit"]);

        let body = &pass.children[0].children;
        assert_eq!(body[0].children.len(), 3);
        assert_eq!(body[1].children.len(), 4);
        assert!(body[2].is_object());
        assert_eq!(body[2].children[0].children[0].children[0].token, "wall.jpg");
    }

    #[test]
    fn test_first_value_never_splits() {
        let nodes = parse_text("pass { illumination_stage ambient lighting off }");
        let body = &nodes[0].children[0].children;
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].children[0].token, "ambient");
        assert_eq!(body[1].token, "lighting");
    }

    #[test]
    fn test_unknown_blocks_split_only_at_newlines() {
        let nodes = parse_text("particle_system P { emitter Point { ambient 1 colour 1 } }");
        let emitter = &nodes[0].children[1].children[0];
        let body = &emitter.children[1].children;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].children.len(), 3);
    }

    #[test]
    fn test_import_and_assignment_forms() {
        let nodes = parse_text("import * from \"base.material\"\nset $c 1 0 0\n$d = 0 1 0");
        assert_eq!(nodes[0].kind, ConcreteNodeKind::Import);
        assert_eq!(nodes[0].children.len(), 3);
        assert_eq!(nodes[0].children[2].kind, ConcreteNodeKind::Quote);

        assert_eq!(nodes[1].kind, ConcreteNodeKind::VariableAssign);
        assert_eq!(nodes[1].children[0].token, "$c");
        assert_eq!(nodes[1].children.len(), 4);

        assert_eq!(nodes[2].kind, ConcreteNodeKind::VariableAssign);
        assert_eq!(nodes[2].children[0].token, "$d");
        assert_eq!(nodes[2].children.len(), 4);
    }

    #[test]
    fn test_unbalanced_braces() {
        let tokens = tokenize("material M {\n pass {\n}", "t").unwrap();
        assert!(matches!(parse(&tokens, "t"), Err(ScriptError::CloseBraceExpected { line: 1, .. })));

        let tokens = tokenize("}", "t").unwrap();
        assert!(matches!(parse(&tokens, "t"), Err(ScriptError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_chunk_is_flat() {
        let tokens = tokenize("1 0\n0 \"x y\"", "t").unwrap();
        let nodes = parse_chunk(&tokens, "t", 4).unwrap();
        assert_eq!(nodes.len(), 4);
        assert!(nodes.iter().all(|n| n.line == 4));
        assert!(parse_chunk(&tokenize("{", "t").unwrap(), "t", 1).is_err());
    }
}
