use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use kinlog::commands;
use kinlog::config::Config;
use kinlog::utils::LocalDirStore;
use kinlog::KeyStrategy;

#[derive(Parser)]
#[command(name = "kinlog", about = "Kinesis log record parsing and PutRecords encoding")]
struct Cli {
    /// Log at debug level to stderr, ignoring RUST_LOG.
    #[arg(long, global = true)]
    debug: bool,

    /// Config file. Defaults to ~/.config/kinlog/config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the log messages carried by a Kinesis event, one per line.
    Parse {
        /// Event JSON file; stdin when omitted or `-`.
        event: Option<PathBuf>,
        /// Skip records whose data cannot be decoded.
        #[arg(long)]
        skip_invalid: bool,
    },
    /// Encode lines as PutRecords request batches (one JSON batch per line).
    Encode {
        /// Input file; stdin when omitted or `-`.
        input: Option<PathBuf>,
        /// Entries per batch (1-500).
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long, value_enum)]
        partition_key: Option<KeyArg>,
    },
    /// Parse a Kinesis event and store its messages under a local directory.
    Archive {
        /// Event JSON file; stdin when omitted or `-`.
        event: Option<PathBuf>,
        /// Directory standing in for the object store.
        #[arg(long)]
        root: PathBuf,
        #[arg(long)]
        bucket: String,
        #[arg(long)]
        key: String,
        /// Store the object uncompressed.
        #[arg(long)]
        no_gzip: bool,
        #[arg(long)]
        skip_invalid: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KeyArg {
    Random,
    Hash,
}

impl From<KeyArg> for KeyStrategy {
    fn from(arg: KeyArg) -> Self {
        match arg {
            KeyArg::Random => KeyStrategy::Random,
            KeyArg::Hash => KeyStrategy::Hash,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Parse {
            event,
            skip_invalid,
        } => {
            let event = commands::read_event(event.as_deref())?;
            commands::parse(&event, skip_invalid || config.parse.skip_invalid, &mut out)?;
        }
        Command::Encode {
            input,
            batch_size,
            partition_key,
        } => {
            if let Some(size) = batch_size {
                config.encoder.batch_size = size;
            }
            if let Some(keys) = partition_key {
                config.encoder.partition_key = keys.into();
            }
            config.validate()?;
            let batch_size = NonZeroUsize::new(config.encoder.batch_size)
                .context("batch size must be non-zero")?;

            match input.filter(|p| p.as_os_str() != "-") {
                Some(path) => {
                    let file = std::fs::File::open(&path)
                        .with_context(|| format!("opening {}", path.display()))?;
                    commands::encode(
                        std::io::BufReader::new(file),
                        config.encoder.partition_key,
                        batch_size,
                        &mut out,
                    )?;
                }
                None => {
                    commands::encode(
                        std::io::stdin().lock(),
                        config.encoder.partition_key,
                        batch_size,
                        &mut out,
                    )?;
                }
            }
        }
        Command::Archive {
            event,
            root,
            bucket,
            key,
            no_gzip,
            skip_invalid,
        } => {
            let event = commands::read_event(event.as_deref())?;
            let store = LocalDirStore::new(root);
            let stats = commands::archive(
                &event,
                skip_invalid || config.parse.skip_invalid,
                &store,
                &bucket,
                &key,
                config.upload.gzip && !no_gzip,
            )?;
            writeln!(out, "{} messages from {} records", stats.messages, stats.records)?;
        }
    }

    out.flush()?;
    Ok(())
}
