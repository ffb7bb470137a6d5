//! Code generation: projects a defaulted AST into output text.
//!
//! Generation happens in two steps:
//!
//! 1. [`Plan::from_program`] walks the statements in order and records the
//!    execution-context calls they stand for.
//! 2. A serializer prints the plan, either as a Python module for the
//!    network runtime ([`python`]) or as JSON ([`json`]).
//!
//! Output is always rendered completely in memory first; [`emit_to_path`]
//! writes the same bytes [`emit`] returns.

pub mod json;
pub mod plan;
pub mod python;

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

pub use plan::{Call, Literal, Plan};

use crate::dsl::Program;
use crate::error::{MidoriError, Result};

/// Output language of the generated artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Python module defining `run_network(context)`
    #[default]
    Python,
    /// JSON call list
    Json,
}

impl OutputFormat {
    /// File extension used for derived output paths.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Python => "python",
            Self::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = MidoriError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "json" => Ok(Self::Json),
            other => Err(MidoriError::config(format!("unknown output format '{}'", other))),
        }
    }
}

/// Render an already-built plan.
pub fn render(plan: &Plan, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Python => python::render(plan),
        OutputFormat::Json => json::render(plan),
    }
}

/// Project a defaulted program and render it to a string.
pub fn emit(program: &Program, format: OutputFormat) -> Result<String> {
    let plan = Plan::from_program(program)?;
    render(&plan, format)
}

/// Project a defaulted program and write it to `path`.
pub fn emit_to_path(program: &Program, format: OutputFormat, path: &Path) -> Result<()> {
    let text = emit(program, format)?;
    write_output(path, &text)
}

/// Write generated text to `path`.
///
/// The text goes to a temporary file next to `path` first and is renamed
/// into place, so a failed write never leaves a truncated artifact.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    let write_error = |source: std::io::Error| MidoriError::OutputWriteError {
        path: path.display().to_string(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(text.as_bytes()).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    info!(path = %path.display(), bytes = text.len(), "wrote generated program");
    Ok(())
}
