mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use jsoncfg_gen::{
    BackendKind, Codec, Generator, GeneratorConfig, MissingKeyPolicy, SchemaSource, TomlSchemaFile,
};
use std::io::Write;
use tracing::{error, info, Level};

use crate::cli::{Args, CheckArgs, Command, FillArgs, GenerateArgs};

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {info}");
        if let Some(loc) = info.location() {
            eprintln!("at: {}:{}", loc.file(), loc.line());
        }
    }));
}

fn main() {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // Keep stdout clean for generated output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
    install_panic_hook();

    if let Err(e) = run(args.command) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate(args) => generate(args),
        Command::Check(args) => check(&args),
        Command::Fill(args) => fill(&args),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(out_dir) = args.out_dir {
        config.output_dir = out_dir;
    }
    if let Some(dir) = args.template_dir {
        config.template_dir = Some(dir);
    }
    if let Some(ceiling) = args.text_ceiling {
        config.text_ceiling = ceiling;
    }
    config.emit_header |= args.should_emit_header;

    let schema = TomlSchemaFile { path: &args.schema }.extract()?;
    let backend = config.backend_kind()?.build();
    let generator = match &config.template_dir {
        Some(dir) => Generator::with_template_dir(backend, config.options(), dir),
        None => Generator::new(backend, config.options()),
    }
    .context("Failed to prepare templates")?;

    let artifact = generator
        .generate(&schema)
        .with_context(|| format!("Failed to generate code for {}", args.schema.display()))?;

    if args.to_stdout {
        let mut stdout = std::io::stdout().lock();
        for file in &artifact.files {
            writeln!(stdout, "// FILE: {}", file.path)?;
            stdout.write_all(file.content.as_bytes())?;
        }
        return Ok(());
    }
    let written = artifact.write_to(&config.output_dir)?;
    info!("Total generated files: {}", written.len());
    Ok(())
}

fn check(args: &CheckArgs) -> Result<()> {
    let schema = TomlSchemaFile { path: &args.schema }.extract()?;
    let kind: BackendKind = args.backend.parse()?;
    let generator = Generator::new(kind.build(), Default::default())?;
    generator
        .generate(&schema)
        .with_context(|| format!("Schema {} is invalid", args.schema.display()))?;
    info!(
        "Schema {} is valid for {} ({} fields)",
        schema.entity,
        kind.as_str(),
        schema.fields.len()
    );
    Ok(())
}

fn fill(args: &FillArgs) -> Result<()> {
    let schema = TomlSchemaFile { path: &args.schema }.extract()?;
    let policy = if args.is_strict {
        MissingKeyPolicy::Fail
    } else {
        MissingKeyPolicy::ZeroValue
    };
    let codec = Codec::new(&schema, policy)?;

    let text = std::fs::read_to_string(&args.document)
        .with_context(|| format!("Failed to read {}", args.document.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", args.document.display()))?;
    let Some(obj) = value.as_object() else {
        bail!("{} does not hold a JSON object", args.document.display());
    };
    let entity = codec.construct(obj)?;

    let mut stdout = std::io::stdout().lock();
    match args.ceiling {
        Some(ceiling) => stdout.write_all(entity.to_text(ceiling)?.as_bytes())?,
        None => entity.print_to(&mut stdout)?,
    }
    writeln!(stdout)?;
    Ok(())
}
