//! The compile pipeline: parse, apply defaults, project, serialize.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codegen::{self, OutputFormat, Plan};
use crate::config::CompilerConfig;
use crate::dsl::{self, Program};
use crate::error::Result;
use crate::topology::apply_defaults_with;

/// Where [`Compiler::compile_file`] sends its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Write to this path
    Path(PathBuf),
    /// Write next to the source, with the format's extension
    Derived,
    /// Return the text to the caller
    Stdout,
}

/// Topology compiler.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of compiles, including concurrent ones. Every compile builds its own AST
/// and address generators.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Parse `source` and apply address defaults.
    pub fn parse(&self, source: &str) -> Result<Program> {
        let program = dsl::parse(source)?;
        debug!(statements = program.statements.len(), "parsed program");
        apply_defaults_with(program, self.config.ip_pool)
    }

    /// Parse, default and project `source` into a call plan.
    pub fn plan(&self, source: &str) -> Result<Plan> {
        Plan::from_program(&self.parse(source)?)
    }

    /// Compile `source` to text in the configured format.
    pub fn compile(&self, source: &str) -> Result<String> {
        let program = self.parse(source)?;
        let text = codegen::emit(&program, self.config.format)?;
        info!(
            statements = program.statements.len(),
            format = %self.config.format,
            "compiled program"
        );
        Ok(text)
    }

    /// Compile `source` and write the result to `path`.
    ///
    /// Nothing is written unless compilation succeeds.
    pub fn compile_to_path(&self, source: &str, path: &Path) -> Result<()> {
        let text = self.compile(source)?;
        codegen::write_output(path, &text)
    }

    /// Compile the file at `path`.
    ///
    /// Returns the generated text for [`Output::Stdout`], `None` otherwise.
    pub fn compile_file(&self, path: &Path, output: &Output) -> Result<Option<String>> {
        let source = dsl::read_source(path)?;
        match output {
            Output::Stdout => self.compile(&source).map(Some),
            Output::Path(target) => self.compile_to_path(&source, target).map(|_| None),
            Output::Derived => {
                let target = self.derived_output_path(path);
                self.compile_to_path(&source, &target).map(|_| None)
            }
        }
    }

    /// `net.midori` becomes `net.py` (or `net.json`).
    pub fn derived_output_path(&self, source: &Path) -> PathBuf {
        source.with_extension(self.config.format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_is_deterministic() {
        let compiler = Compiler::default();
        let source = "host a image \"x\"\nhost b image \"x\"\nping a b";
        assert_eq!(compiler.compile(source).unwrap(), compiler.compile(source).unwrap());
    }

    #[test]
    fn test_derived_output_path() {
        let compiler = Compiler::default();
        assert_eq!(
            compiler.derived_output_path(Path::new("nets/net.midori")),
            PathBuf::from("nets/net.py")
        );
        let json = Compiler::new(CompilerConfig {
            format: OutputFormat::Json,
            ..CompilerConfig::default()
        });
        assert_eq!(
            json.derived_output_path(Path::new("net.midori")),
            PathBuf::from("net.json")
        );
    }

    #[test]
    fn test_configured_pool_is_used() {
        let compiler = Compiler::new(CompilerConfig {
            ip_pool: "192.168.1.0/24".parse().unwrap(),
            ..CompilerConfig::default()
        });
        let program = compiler.parse("host a image \"x\"").unwrap();
        assert_eq!(program.hosts().next().unwrap().ip_addr.as_deref(), Some("192.168.1.1"));
    }

    #[test]
    fn test_compiler_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Compiler>();
    }
}
