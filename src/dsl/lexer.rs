//! Lexer (tokenizer) for the topology DSL.

use std::fmt;

use crate::error::{MidoriError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text (string literals are already unquoted and unescaped)
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl Token {
    /// True if this token is the bare word `word`.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Name && self.text == word
    }
}

/// Token types in the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier (keyword, node name, link class, ...)
    Name,
    /// A quoted string literal
    String,
    /// A decimal integer
    Number,
    /// Open bracket '['
    LBracket,
    /// Close bracket ']'
    RBracket,
    /// Open brace '{'
    LBrace,
    /// Close brace '}'
    RBrace,
    /// Comma ','
    Comma,
    /// Colon ':'
    Colon,
    /// Intent arrow '->'
    Arrow,
    /// End of file
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::String => "string",
            Self::Number => "number",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::Arrow => "'->'",
            Self::Eof => "end of input",
        };
        f.write_str(s)
    }
}

/// Lexer for tokenizing topology DSL input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input, including the trailing [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => return Ok(token(TokenKind::Eof, String::new())),
        };

        let punct = match ch {
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            _ => None,
        };
        if let Some(kind) = punct {
            self.advance();
            return Ok(token(kind, ch.to_string()));
        }

        match ch {
            '-' => {
                self.advance();
                if self.chars.peek() == Some(&'>') {
                    self.advance();
                    Ok(token(TokenKind::Arrow, "->".to_string()))
                } else {
                    Err(MidoriError::lexer(line, column, "expected '>' after '-'"))
                }
            }
            '"' | '\'' => {
                let text = self.read_string(ch, line, column)?;
                Ok(token(TokenKind::String, text))
            }
            '0'..='9' => {
                let text = self.read_number();
                if self.chars.peek().is_some_and(|c| is_name_char(*c)) {
                    return Err(MidoriError::lexer(
                        line,
                        column,
                        format!("malformed number '{}'", text),
                    ));
                }
                Ok(token(TokenKind::Number, text))
            }
            _ if ch.is_ascii_alphabetic() || ch == '_' => {
                let text = self.read_identifier();
                Ok(token(TokenKind::Name, text))
            }
            _ => Err(MidoriError::lexer(
                line,
                column,
                format!("unexpected character '{}'", ch),
            )),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                // Skip comment until end of line
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if is_name_char(ch) {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_string(&mut self, quote: char, line: usize, column: usize) -> Result<String> {
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.advance() {
                Some(ch) if ch == quote => return Ok(text),
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(c @ ('\\' | '"' | '\'')) => c,
                        Some(c) => {
                            return Err(MidoriError::lexer(
                                self.line,
                                self.column - 1,
                                format!("unknown escape sequence '\\{}'", c),
                            ))
                        }
                        None => break,
                    };
                    text.push(escaped);
                }
                Some('\n') => {
                    return Err(MidoriError::lexer(
                        line,
                        column,
                        "string literal is not closed before end of line",
                    ))
                }
                Some(ch) => text.push(ch),
                None => break,
            }
        }
        Err(MidoriError::lexer(line, column, "unterminated string literal"))
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
