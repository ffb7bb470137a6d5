//! # Midori Core
//!
//! A compiler for the Midori network topology language.
//!
//! This library provides:
//! - A keyword-led DSL for describing controllers, container hosts,
//!   switches, links, intents and test actions
//! - A defaulting pass that assigns sequential IP and MAC addresses to hosts
//!   that do not declare them
//! - Projection of the result into an ordered call plan for an external
//!   network runtime, printed as a Python module or as JSON
//!
//! ## Architecture
//!
//! - [`dsl`] - Lexer, parser and AST builder
//! - [`topology`] - Address generators and the defaulting pass
//! - [`codegen`] - Call plan projection and output serializers
//! - [`compiler`] - The end-to-end pipeline
//! - [`config`] - YAML and environment configuration
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! midori net.midori              # writes net.py
//! midori net.midori --stdout     # prints the generated module
//! midori net.midori --dry-run    # checks the source, writes nothing
//! ```
//!
//! ### Library
//!
//! ```
//! use midori_core::Compiler;
//!
//! let compiler = Compiler::default();
//! let python = compiler
//!     .compile("host d1 image \"ubuntu:trusty\"\nswitch s1\nlink l1 src d1 dst s1")
//!     .unwrap();
//! assert!(python.contains("mac=\"00:00:00:00:00:01\""));
//! ```
//!
//! ## Pipeline
//!
//! Each compile runs to completion on the calling thread:
//!
//! 1. Tokenize and parse the source into a parse tree
//! 2. Build the typed AST
//! 3. Assign missing host addresses from fresh generators
//! 4. Project statements into calls and serialize them
//!
//! Any failure aborts the compile; no partial output is produced.

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod dsl;
pub mod error;
pub mod topology;

#[cfg(feature = "cli")]
pub mod logging;

// Re-export main types for convenience
pub use codegen::OutputFormat;
pub use compiler::{Compiler, Output};
pub use config::CompilerConfig;
pub use error::{MidoriError, Result};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCompiler;

/// Conventional extension of topology source files
pub const SOURCE_EXTENSION: &str = "midori";
