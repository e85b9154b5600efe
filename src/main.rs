use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use class_inspect::config::{Config, DEFAULT_CONFIG_FILE};
use class_inspect::render::render_text;
use class_inspect::{ClassInspector, SourceRegistry};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Parser)]
#[command(name = "class-inspect")]
#[command(about = "Describe TypeScript classes: inheritance, members and classification flags")]
#[command(version)]
struct Cli {
    /// Classes to describe (qualified names, e.g. Zoo.Animal)
    #[arg(required = true)]
    classes: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source file or directory, replaces the configured sources
    #[arg(short, long = "source")]
    sources: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("class_inspect={}", default_level)))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Sources from `-s` if given, else from the config file.
fn load_config(cli: &Cli) -> Result<(Config, PathBuf)> {
    if !cli.sources.is_empty() {
        return Ok((Config::from_paths(&cli.sources), PathBuf::from(".")));
    }

    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config =
        Config::load(&path).with_context(|| format!("Failed to load config from {:?}", path))?;
    if config.sources.is_empty() {
        anyhow::bail!("No sources configured in {:?}", path);
    }
    let root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((config, root))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let (config, root) = load_config(&cli)?;

    let start = Instant::now();
    let files = config.collect_files(&root)?;
    let registry = SourceRegistry::load(&files);
    debug!(
        "Loaded {} declarations from {} files in {:?}",
        registry.len(),
        files.len(),
        start.elapsed()
    );

    let inspector = ClassInspector::new(registry);
    let mut failures = 0;

    for class_name in &cli.classes {
        let mut output = None;
        inspector.info(class_name, |err, info| {
            if let Some(err) = err {
                eprintln!("Error: {}", err);
                failures += 1;
            }
            if let Some(info) = info {
                output = Some(match cli.format {
                    Format::Json => serde_json::to_string_pretty(&*info),
                    Format::Text => Ok(render_text(&info)),
                });
            }
        });

        if let Some(rendered) = output {
            println!("{}", rendered?);
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
