//! Midori - Network Topology Compiler
//!
//! Compiles a topology description into a program for the network runtime.
//!
//! # Usage
//!
//! ```bash
//! midori net.midori                      # writes net.py
//! midori net.midori -o build/net.py
//! midori net.midori --format json --stdout
//! midori net.midori --dry-run
//! ```

use std::path::PathBuf;

use clap::Parser;
use midori_core::{
    config::CompilerConfig,
    error::{MidoriError, Result},
    logging, Compiler, Output, OutputFormat, SOURCE_EXTENSION,
};
use tracing::{info, warn};

/// Network topology compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology source file (.midori)
    #[arg(value_name = "SOURCE_FILE")]
    source: PathBuf,

    /// Output path (default: the source path with the format's extension)
    #[arg(short, long, value_name = "PATH", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the generated program to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Compile and report errors, but don't write any output
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// YAML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration: file, then environment, then flags
    let config = match &args.config {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::default(),
    };
    let mut config = config.apply_env()?;
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    logging::init(&config.log_level)?;

    if args.source.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
        warn!(source = %args.source.display(), "source file does not have a .{} extension", SOURCE_EXTENSION);
    }

    let compiler = Compiler::new(config);

    if args.dry_run {
        compiler.compile_file(&args.source, &Output::Stdout)?;
        info!(source = %args.source.display(), "dry run succeeded, no output written");
        return Ok(());
    }

    let output = if args.stdout {
        Output::Stdout
    } else if let Some(path) = args.output {
        Output::Path(path)
    } else {
        let derived = compiler.derived_output_path(&args.source);
        if derived == args.source {
            return Err(MidoriError::config(format!(
                "derived output path '{}' would overwrite the source; pass --output",
                derived.display()
            )));
        }
        Output::Derived
    };

    if let Some(text) = compiler.compile_file(&args.source, &output)? {
        print!("{}", text);
    }

    Ok(())
}
