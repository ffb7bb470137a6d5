//! Error types for the Midori compiler.
//!
//! This module provides a unified error type [`MidoriError`] that covers
//! all error conditions that can occur during lexing, parsing, address
//! defaulting, and output rendering.

use thiserror::Error;

/// Result type alias using [`MidoriError`].
pub type Result<T> = std::result::Result<T, MidoriError>;

/// Unified error type for all Midori operations.
#[derive(Error, Debug)]
pub enum MidoriError {
    // ============ Syntax Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    // ============ Defaulting Errors ============
    /// An address generator ran past the end of its range
    #[error("{pool} address pool exhausted: {message}")]
    AddressPoolExhausted { pool: &'static str, message: String },

    // ============ Projection Errors ============
    /// The AST could not be projected into calls
    #[error("Projection error: {message}")]
    Projection { message: String },

    /// Error writing the generated program
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ I/O and Configuration Errors ============
    /// Error reading a source or configuration file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl MidoriError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an address pool exhaustion error
    pub fn exhausted(pool: &'static str, message: impl Into<String>) -> Self {
        Self::AddressPoolExhausted {
            pool,
            message: message.into(),
        }
    }

    /// Create a projection error
    pub fn projection(message: impl Into<String>) -> Self {
        Self::Projection {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// True for errors raised while tokenizing or parsing source text.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Self::LexerError { .. } | Self::ParseError { .. })
    }

    /// Source position of a syntax error, if this is one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::LexerError { line, column, .. } | Self::ParseError { line, column, .. } => {
                Some((*line, *column))
            }
            _ => None,
        }
    }
}
