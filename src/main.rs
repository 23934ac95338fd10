//! CLI entry point for treedoc

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;
use log::{debug, error, info};
use treedoc::{
    BackendConfig, BackendKind, DIR_SUMMARY_FILE, DiscoveryMode, FileStore, GeneratorConfig,
    SummaryGenerator, WalkerConfig, build_backend,
};

/// Output directory used when `--output` is not given.
const DEFAULT_OUTPUT_DIR: &str = ".treedoc";

#[derive(Parser, Debug)]
#[command(name = "treedoc")]
#[command(about = "Summarize a source tree bottom-up with an LLM")]
#[command(version)]
struct Args {
    /// Project directory (or a single file) to summarize
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Directory where summaries are written
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// File name for directory summaries inside the output tree
    #[arg(long = "dir-file-name", default_value = DIR_SUMMARY_FILE)]
    dir_file_name: String,

    /// Text-generation backend
    #[arg(short, long, value_enum, default_value = "llamafile")]
    backend: BackendKind,

    /// Model name (Anthropic backend; falls back to TREEDOC_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Backend base URL (falls back to LLAMAFILE_URL for llamafile)
    #[arg(long)]
    url: Option<String>,

    /// Maximum tokens generated per summary
    #[arg(long = "max-tokens", default_value = "1024")]
    max_tokens: u32,

    /// Ignore files matching pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<String>,

    /// How files are discovered
    #[arg(long, value_enum, default_value = "auto")]
    discovery: DiscoveryMode,

    /// Do not apply .gitignore files beyond what discovery already does
    #[arg(long = "no-exclusion-files")]
    no_exclusion_files: bool,

    /// Reuse file summaries already present in the output directory
    #[arg(long)]
    reuse: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn init_logger(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let env = env_logger::Env::default().filter_or("TREEDOC_LOG", level);
    env_logger::Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .init();
}

/// Keep the output directory out of the summarized tree when it lives inside it.
fn output_ignore_pattern(project: &Path, output: &Path) -> Option<String> {
    let project = project.canonicalize().ok()?;
    let output = output.canonicalize().ok()?;
    let relative = output.strip_prefix(&project).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(format!(
        "/{}/",
        glob::Pattern::escape(&relative.to_string_lossy())
    ))
}

fn run(args: &Args) -> anyhow::Result<()> {
    let backend = build_backend(&BackendConfig {
        kind: args.backend,
        url: args.url.clone(),
        model: args.model.clone(),
        max_tokens: args.max_tokens,
        ..Default::default()
    })
    .context("failed to set up text-generation backend")?;

    let store = FileStore::new(&args.output)
        .with_context(|| format!("cannot use output directory {}", args.output.display()))?
        .with_dir_file_name(&args.dir_file_name);

    let mut ignore_patterns = args.ignore.clone();
    if let Some(pattern) = output_ignore_pattern(&args.path, store.root()) {
        debug!("excluding output directory with pattern {}", pattern);
        ignore_patterns.push(pattern);
    }

    let config = GeneratorConfig {
        walker: WalkerConfig {
            ignore_patterns,
            discovery: args.discovery,
            exclusion_files: !args.no_exclusion_files,
        },
        reuse_existing: args.reuse,
    };

    let mut generator = SummaryGenerator::new(backend, store, config);
    debug!("generating documentation for {}", args.path.display());
    let summary = generator
        .generate(&args.path)
        .with_context(|| format!("failed to summarize {}", args.path.display()))?;
    debug!("top-level summary:\n{}", summary);
    info!("summaries written to {}", args.output.display());
    Ok(())
}

fn main() {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    init_logger(args.debug);

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        process::exit(1);
    }
}
