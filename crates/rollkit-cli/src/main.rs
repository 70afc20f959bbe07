//! rollkit CLI.
//!
//! - `rollkit roll [NOTATION]` - roll dice notation such as `4d6kh3`
//! - `rollkit pick --weights 1,2,3` - weighted index draws
//! - `rollkit stream` - raw generator output
//! - `rollkit state save|inspect` - persist and examine generator state

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use rollkit::core::{GeneratorState, XorShift1024Star};
use rollkit::dice::{DiceSpec, RollOutcome};
use rollkit::select::WeightedIndexGenerator;

use config::{CliConfig, OutputFormat, Seed};

#[derive(Parser)]
#[command(name = "rollkit")]
#[command(about = "Deterministic dice, weighted picks and xorshift1024* output", version)]
struct Cli {
    /// Seed, as an integer or any text (default: config seed, then OS entropy)
    #[arg(short, long, global = true)]
    seed: Option<Seed>,

    /// Config file (default: ./rollkit.yaml, then the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll dice notation
    Roll {
        /// e.g. 4d6kh3, 2d20kl1, d%+5 (default: config notation)
        notation: Option<String>,

        /// Number of rolls
        #[arg(short, long)]
        times: Option<usize>,
    },

    /// Draw weighted indices
    Pick {
        /// Comma separated non-negative weights
        #[arg(short, long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        weights: Vec<f64>,

        /// Number of draws
        #[arg(short, long)]
        times: Option<usize>,
    },

    /// Print raw generator output
    Stream {
        /// Number of values
        #[arg(short = 'n', long, default_value_t = 8)]
        count: usize,

        /// Jump ahead 2^512 steps this many times first
        #[arg(long, default_value_t = 0)]
        skip_ahead: usize,

        /// Output width in bits
        #[arg(long, value_enum, default_value_t = Width::W64)]
        width: Width,
    },

    /// Generator state files
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
}

#[derive(Subcommand)]
enum StateCommands {
    /// Seed a generator and write its state
    Save {
        file: PathBuf,

        /// Draw this many values before saving
        #[arg(long, default_value_t = 0)]
        advance: u64,
    },

    /// Print the contents of a state file
    Inspect { file: PathBuf },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Width {
    #[value(name = "32")]
    W32,
    #[value(name = "64")]
    W64,
}

#[derive(Serialize)]
struct RollReport<'a> {
    notation: String,
    rolls: &'a [RollOutcome],
}

#[derive(Serialize)]
struct PickReport<'a> {
    weights: &'a [f64],
    picks: &'a [usize],
}

#[derive(Serialize)]
struct StateReport<'a> {
    file: &'a Path,
    #[serde(flatten)]
    state: GeneratorState,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let config = CliConfig::discover(cli.config.as_deref(), &cwd)?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.format
    };
    let seed = cli.seed.or_else(|| config.seed.clone());

    match cli.command {
        Commands::Roll { notation, times } => {
            let notation = notation.unwrap_or_else(|| config.notation.clone());
            roll(seed.as_ref(), &notation, times.unwrap_or(config.times), format)
        }
        Commands::Pick { weights, times } => {
            pick(seed.as_ref(), &weights, times.unwrap_or(config.times), format)
        }
        Commands::Stream {
            count,
            skip_ahead,
            width,
        } => stream(seed.as_ref(), count, skip_ahead, width, format),
        Commands::State { command } => match command {
            StateCommands::Save { file, advance } => save_state(seed.as_ref(), &file, advance),
            StateCommands::Inspect { file } => inspect_state(&file, format),
        },
    }
}

fn generator(seed: Option<&Seed>) -> Result<XorShift1024Star> {
    let rng = match seed {
        Some(Seed::Number(n)) => XorShift1024Star::seed_from_u64(*n),
        Some(Seed::Text(text)) => XorShift1024Star::from_seed_str(text)
            .with_context(|| format!("Failed to seed from {text:?}"))?,
        None => XorShift1024Star::from_entropy().context("Failed to seed from entropy")?,
    };
    match seed {
        Some(seed) => tracing::debug!(%seed, "Seeded generator"),
        None => tracing::debug!("Seeded generator from entropy"),
    }
    Ok(rng)
}

fn roll(seed: Option<&Seed>, notation: &str, times: usize, format: OutputFormat) -> Result<()> {
    let spec: DiceSpec = notation
        .parse()
        .with_context(|| format!("Cannot roll {notation:?}"))?;
    let mut rng = generator(seed)?;
    let rolls = (0..times)
        .map(|_| spec.roll(&mut rng))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to roll {spec}"))?;

    match format {
        OutputFormat::Json => print_json(&RollReport {
            notation: spec.to_string(),
            rolls: &rolls,
        }),
        OutputFormat::Text => {
            for outcome in &rolls {
                println!("{}", describe(&spec, outcome));
            }
            Ok(())
        }
    }
}

fn describe(spec: &DiceSpec, outcome: &RollOutcome) -> String {
    let mut line = format!("{spec}: {} = {:?}", outcome.total, outcome.kept);
    if !outcome.discarded.is_empty() {
        line.push_str(&format!(" discarded {:?}", outcome.discarded));
    }
    line
}

fn pick(seed: Option<&Seed>, weights: &[f64], times: usize, format: OutputFormat) -> Result<()> {
    let picker = WeightedIndexGenerator::from_slice(weights)
        .with_context(|| format!("Cannot pick from weights {weights:?}"))?;
    let mut rng = generator(seed)?;
    let picks: Vec<usize> = (0..times).map(|_| picker.next(&mut rng)).collect();

    match format {
        OutputFormat::Json => print_json(&PickReport {
            weights,
            picks: &picks,
        }),
        OutputFormat::Text => {
            for index in picks {
                println!("{index}");
            }
            Ok(())
        }
    }
}

fn stream(
    seed: Option<&Seed>,
    count: usize,
    skip_ahead: usize,
    width: Width,
    format: OutputFormat,
) -> Result<()> {
    let mut rng = generator(seed)?;
    for _ in 0..skip_ahead {
        rng.skip_ahead();
    }
    let values: Vec<u64> = (0..count)
        .map(|_| match width {
            Width::W32 => u64::from(rng.next_u32()),
            Width::W64 => rng.next_u64(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&values),
        OutputFormat::Text => {
            for value in values {
                match width {
                    Width::W32 => println!("{value:#010x}"),
                    Width::W64 => println!("{value:#018x}"),
                }
            }
            Ok(())
        }
    }
}

fn save_state(seed: Option<&Seed>, file: &Path, advance: u64) -> Result<()> {
    let mut rng = generator(seed)?;
    for _ in 0..advance {
        rng.next_u64();
    }
    std::fs::write(file, rng.save_state())
        .with_context(|| format!("Failed to write state to {}", file.display()))?;
    tracing::info!(file = %file.display(), offset = rng.offset(), "Saved generator state");
    Ok(())
}

fn inspect_state(file: &Path, format: OutputFormat) -> Result<()> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read state from {}", file.display()))?;
    let rng = XorShift1024Star::from_state_bytes(&bytes)
        .with_context(|| format!("{} is not a valid state file", file.display()))?;

    match format {
        OutputFormat::Json => print_json(&StateReport {
            file,
            state: rng.state(),
        }),
        OutputFormat::Text => {
            println!("offset: {}", rng.offset());
            for (i, word) in rng.words().iter().enumerate() {
                println!("word {i:>2}: {word:#018x}");
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode JSON")?;
    println!("{json}");
    Ok(())
}
