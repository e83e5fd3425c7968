//! Script tokenizer
//!
//! Splits text on whitespace into words, quoted phrases, `$variables`, braces
//! and colons. Newlines are kept as tokens because they terminate properties;
//! runs of blank lines collapse into one.

use super::error::ScriptError;

/// Token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word or number
    Word,
    /// Quoted phrase; the lexeme holds the unquoted text
    Quote,
    /// `$name`; the lexeme holds the name with its `$`
    Variable,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `:`
    Colon,
    /// End of a line
    Newline,
}

/// A lexeme with its category and line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptToken {
    /// Token text
    pub lexeme: String,
    /// Category
    pub kind: TokenKind,
    /// 1-based line
    pub line: u32,
}

impl ScriptToken {
    fn new(lexeme: impl Into<String>, kind: TokenKind, line: u32) -> Self {
        Self {
            lexeme: lexeme.into(),
            kind,
            line,
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '{' | '}' | ':')
}

/// Tokenize script text; `file` is only used for error reporting
pub fn tokenize(text: &str, file: &str) -> Result<Vec<ScriptToken>, ScriptError> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut tokens: Vec<ScriptToken> = Vec::new();
    let mut line = 1u32;
    let mut i = 0;

    while i < len {
        let c = chars[i];

        if c == '\n' {
            if tokens.last().is_some_and(|t| t.kind != TokenKind::Newline) {
                tokens.push(ScriptToken::new("\n", TokenKind::Newline, line));
            }
            line += 1;
            i += 1;
            continue;
        }

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Line comment
        if c == '/' && i + 1 < len && chars[i + 1] == '/' {
            while i < len && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        // Block comment; newlines inside still end the current statement
        if c == '/' && i + 1 < len && chars[i + 1] == '*' {
            let start_line = line;
            let mut saw_newline = false;
            i += 2;
            loop {
                if i + 1 >= len {
                    return Err(ScriptError::UnterminatedComment {
                        file: file.to_string(),
                        line: start_line,
                    });
                }
                if chars[i] == '*' && chars[i + 1] == '/' {
                    i += 2;
                    break;
                }
                if chars[i] == '\n' {
                    line += 1;
                    saw_newline = true;
                }
                i += 1;
            }
            if saw_newline && tokens.last().is_some_and(|t| t.kind != TokenKind::Newline) {
                tokens.push(ScriptToken::new("\n", TokenKind::Newline, line));
            }
            continue;
        }

        match c {
            '{' => tokens.push(ScriptToken::new("{", TokenKind::LeftBrace, line)),
            '}' => tokens.push(ScriptToken::new("}", TokenKind::RightBrace, line)),
            ':' => tokens.push(ScriptToken::new(":", TokenKind::Colon, line)),
            '"' | '\'' => {
                let start_line = line;
                let mut lexeme = String::new();
                i += 1;
                loop {
                    let Some(&next) = chars.get(i) else {
                        return Err(ScriptError::UnterminatedQuote {
                            file: file.to_string(),
                            line: start_line,
                        });
                    };
                    if next == '\\' {
                        match chars.get(i + 1) {
                            Some(&escaped) if escaped == c || escaped == '\\' => lexeme.push(escaped),
                            Some(&other) => {
                                lexeme.push('\\');
                                lexeme.push(other);
                            }
                            None => {
                                return Err(ScriptError::UnterminatedQuote {
                                    file: file.to_string(),
                                    line: start_line,
                                })
                            }
                        }
                        i += 2;
                        continue;
                    }
                    if next == c {
                        break;
                    }
                    if next == '\n' {
                        line += 1;
                    }
                    lexeme.push(next);
                    i += 1;
                }
                tokens.push(ScriptToken::new(lexeme, TokenKind::Quote, start_line));
            }
            _ => {
                let start = i;
                while i < len && !is_delimiter(chars[i]) {
                    i += 1;
                }
                let lexeme: String = chars[start..i].iter().collect();
                let kind = if lexeme.len() > 1 && lexeme.starts_with('$') {
                    TokenKind::Variable
                } else {
                    TokenKind::Word
                };
                tokens.push(ScriptToken::new(lexeme, kind, line));
                continue;
            }
        }
        i += 1;
    }

    Ok(tokens)
}
