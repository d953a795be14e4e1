//! Command-line interface definitions for `jsoncfg-gen`.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Parsed CLI arguments for `jsoncfg-gen`.
#[derive(Debug, Parser)]
#[command(name = "jsoncfg-gen")]
#[command(about = "Generate JSON marshal/unmarshal code for configuration objects")]
#[command(version)]
pub struct Args {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render sources for a schema.
    Generate(GenerateArgs),
    /// Validate a schema against a backend without writing anything.
    Check(CheckArgs),
    /// Read a JSON document through a schema and print the populated result.
    Fill(FillArgs),
}

#[derive(Debug, ClapArgs)]
pub struct GenerateArgs {
    /// TOML schema describing the entity.
    #[arg(long, value_name = "path")]
    pub schema: PathBuf,
    /// Generator config file; flags below override it.
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,
    /// Target backend (`arduinojson` or `serde_json`).
    #[arg(long)]
    pub backend: Option<String>,
    /// Output directory for generated files.
    #[arg(long, value_name = "path")]
    pub out_dir: Option<PathBuf>,
    /// Directory of templates overriding the built-in ones.
    #[arg(long, value_name = "path")]
    pub template_dir: Option<PathBuf>,
    /// Buffer size, in bytes, of the generated text serializer.
    #[arg(long)]
    pub text_ceiling: Option<usize>,
    /// Also emit the C++ header declaring the entity.
    #[arg(long = "emit-header")]
    pub should_emit_header: bool,
    /// Print generated files to stdout instead of writing them.
    #[arg(long = "stdout")]
    pub to_stdout: bool,
}

#[derive(Debug, ClapArgs)]
pub struct CheckArgs {
    #[arg(long, value_name = "path")]
    pub schema: PathBuf,
    #[arg(long, default_value = "arduinojson")]
    pub backend: String,
}

#[derive(Debug, ClapArgs)]
pub struct FillArgs {
    #[arg(long, value_name = "path")]
    pub schema: PathBuf,
    /// JSON document to read; fields it lacks take their defaults.
    #[arg(value_name = "document")]
    pub document: PathBuf,
    /// Fail on missing required keys instead of substituting zero values.
    #[arg(long = "strict")]
    pub is_strict: bool,
    /// Fail when the output exceeds this many bytes.
    #[arg(long)]
    pub ceiling: Option<usize>,
}
