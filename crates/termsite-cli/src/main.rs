//! `termsite-cli` command-line entry point.

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{LevelFilter, info, warn};
use termsite::config::default_manifest;
use termsite::{ContentLoader, ShellConfig, ShellSession, VirtualFs};
use termsite_cli::{DirTransport, FileStore, TerminalSink, manifest, repl};

#[derive(Debug, Parser)]
#[command(name = "termsite-cli", version, about = "Terminal-style personal site")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse a site interactively.
    Shell {
        /// Site root that content refs resolve against.
        #[arg(long, value_name = "DIR", default_value = ".")]
        content: PathBuf,

        /// Manifest JSON (built-in tree when omitted).
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Shell settings TOML.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// State file holding the last-login time.
        #[arg(long, value_name = "FILE")]
        state: Option<PathBuf>,
    },
    /// Generate a manifest from a content directory.
    Manifest {
        /// Directory to scan.
        dir: PathBuf,

        /// Write here instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Prefix of generated content refs.
        #[arg(long)]
        prefix: Option<String>,

        /// Shell settings TOML supplying the default prefix.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

fn load_config(path: Option<&Path>) -> Result<ShellConfig> {
    let Some(path) = path else {
        return Ok(ShellConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    ShellConfig::from_toml_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn load_fs(path: Option<&Path>) -> Result<VirtualFs> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read manifest {}", path.display()))?;
            VirtualFs::from_json(&json).with_context(|| format!("invalid manifest {}", path.display()))
        }
        None => VirtualFs::from_manifest(&default_manifest()).context("invalid built-in manifest"),
    }
}

fn run_shell(
    content: PathBuf,
    manifest: Option<PathBuf>,
    config: Option<PathBuf>,
    state: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let fs = load_fs(manifest.as_deref())?;
    let store = FileStore::new(state.unwrap_or_else(FileStore::default_path));
    info!("serving {} (state in {})", content.display(), store.path().display());

    let loader = ContentLoader::new(DirTransport::new(content));
    let mut session = ShellSession::new(Rc::new(fs), loader, config);
    if let Err(err) = repl::install_interrupt_handler(session.interrupter()) {
        warn!("{:#}", err);
    }

    let stdin = io::stdin();
    let mut sink = TerminalSink::new(io::stdout(), !stdin.is_terminal());
    session.start(&store, chrono::Local::now(), &mut sink);
    repl::run(&mut session, stdin.lock(), &mut sink)
}

fn run_manifest(
    dir: PathBuf,
    output: Option<PathBuf>,
    prefix: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let prefix = match prefix {
        Some(prefix) => prefix,
        None => load_config(config.as_deref())?.content_prefix,
    };
    let scanned = manifest::scan(&dir, &prefix)?;
    info!("{} files under {}", scanned.files.len(), dir.display());

    match output {
        Some(out) => manifest::write(&scanned, &out),
        None => {
            let json = serde_json::to_string_pretty(&scanned).context("failed to encode manifest")?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Shell {
            content,
            manifest,
            config,
            state,
        } => run_shell(content, manifest, config, state),
        Commands::Manifest {
            dir,
            output,
            prefix,
            config,
        } => run_manifest(dir, output, prefix, config),
    }
}
