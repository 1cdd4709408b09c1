//! Sortscope command-line interface.
//!
//! Provides the `sortscope` binary:
//!
//! - `synth` turns a sorting snippet into an operation trace.
//! - `generate` produces the canonical trace of a named algorithm.
//! - `replay` validates a trace and prints the array state it leads to.
//!
//! Traces are written to stdout as JSON in the same envelopes the renderer
//! transport consumes. Diagnostics and logs go to stderr.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use serde::Deserialize;
use tracing::Level;

use sortscope_core::{Algorithm, Trace, TraceMessage};
use sortscope_engine::{IndexPolicy, SynthConfig, SynthError, Synthesizer};

/// Static trace synthesis for sorting snippets.
#[derive(Parser)]
#[command(name = "sortscope", about = "Static trace synthesis for sorting snippets")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Synthesize a trace from source code.
    Synth {
        /// Source file (default: read stdin).
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Emit a comment event on loop entry.
        #[arg(long)]
        comments: bool,

        /// Treat comparisons with non-literal indices as unrecognized.
        #[arg(long)]
        strict_indices: bool,

        /// Maximum replayed loop iterations.
        #[arg(long, env = "SORTSCOPE_MAX_STEPS", default_value_t = SynthConfig::DEFAULT_MAX_STEPS)]
        max_steps: usize,

        /// Print one `operation` message per line instead of one `operations` message.
        #[arg(long)]
        stream: bool,
    },

    /// Generate the canonical trace of a named algorithm.
    Generate {
        /// bubbleSort, selectionSort or insertionSort (short forms accepted).
        algorithm: String,

        /// Comma-separated input values, e.g. 5,3,8,1.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "random")]
        values: Vec<i64>,

        /// Use N random values instead of --values.
        #[arg(long, value_name = "N")]
        random: Option<usize>,

        /// Seed for --random.
        #[arg(long, default_value_t = 0, requires = "random")]
        seed: u64,

        /// Print one `operation` message per line instead of one `operations` message.
        #[arg(long)]
        stream: bool,
    },

    /// Validate a trace and print the array state it produces.
    Replay {
        /// Trace file: a bare operation array or an `operations` message (default: stdin).
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print the state after this step instead of the final state.
        #[arg(long)]
        step: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Synth {
            file,
            comments,
            strict_indices,
            max_steps,
            stream,
        } => {
            let config = SynthConfig {
                index_policy: if strict_indices {
                    IndexPolicy::Strict
                } else {
                    IndexPolicy::Placeholder
                },
                loop_comments: comments,
                max_steps,
            };
            run_synth(file, config, stream)
        }
        Commands::Generate {
            algorithm,
            values,
            random,
            seed,
            stream,
        } => run_generate(&algorithm, values, random, seed, stream),
        Commands::Replay { file, step } => run_replay(file, step),
    };
    process::exit(exit_code);
}

/// Installs the stderr log subscriber at the requested verbosity.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Execute the synth subcommand.
///
/// Returns exit code: 0 = success, 1 = synthesis failure,
/// 2 = syntax error, 3 = I/O error.
fn run_synth(file: Option<PathBuf>, config: SynthConfig, stream: bool) -> i32 {
    let source = match read_input(file.as_ref()) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match Synthesizer::new(config).synthesize(&source) {
        Ok(trace) => print_trace(trace, stream),
        Err(SynthError::Syntax(e)) => {
            eprintln!("Syntax error: {}", e);
            2
        }
        Err(e) => {
            eprintln!("Synthesis failed: {}", e);
            1
        }
    }
}

/// Execute the generate subcommand.
///
/// Returns exit code: 0 = success, 1 = unknown algorithm, 3 = I/O error.
fn run_generate(
    algorithm: &str,
    values: Vec<i64>,
    random: Option<usize>,
    seed: u64,
    stream: bool,
) -> i32 {
    let algorithm: Algorithm = match algorithm.parse() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let values = match random {
        Some(len) => sortscope_engine::random_values(len, seed),
        None => values,
    };
    tracing::debug!(%algorithm, ?values, "generating");
    print_trace(sortscope_engine::generate(algorithm, &values), stream)
}

/// Accepted replay inputs.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReplayInput {
    Bare(Trace),
    Message(TraceMessage),
}

/// Execute the replay subcommand.
///
/// Returns exit code: 0 = success, 1 = invalid trace, 3 = I/O or JSON error.
fn run_replay(file: Option<PathBuf>, step: Option<usize>) -> i32 {
    let text = match read_input(file.as_ref()) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let trace = match serde_json::from_str::<ReplayInput>(&text) {
        Ok(ReplayInput::Bare(trace)) => trace,
        Ok(ReplayInput::Message(TraceMessage::Operations { operations })) => operations,
        Ok(ReplayInput::Message(TraceMessage::Operation { .. })) => {
            eprintln!("Error: expected a whole trace, found a single operation");
            return 1;
        }
        Err(e) => {
            eprintln!("Error: invalid trace JSON: {}", e);
            return 3;
        }
    };

    let state = match step {
        Some(k) => trace.state_at(k),
        None => trace.replay(),
    };
    match state {
        Ok(values) => match serde_json::to_string(&values) {
            Ok(json) => {
                println!("{}", json);
                0
            }
            Err(e) => {
                eprintln!("Error: failed to serialize state: {}", e);
                3
            }
        },
        Err(e) => {
            eprintln!("Replay failed: {}", e);
            1
        }
    }
}

/// Reads `file`, or stdin when absent. On failure reports and returns exit code 3.
fn read_input(file: Option<&PathBuf>) -> Result<String, i32> {
    let result = match file {
        Some(path) => fs::read_to_string(path).map_err(|e| (path.display().to_string(), e)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map(|_| buf)
                .map_err(|e| ("<stdin>".to_string(), e))
        }
    };
    result.map_err(|(name, e)| {
        eprintln!("Error: failed to read '{}': {}", name, e);
        3
    })
}

/// Writes `trace` to stdout as one `operations` message, or as one
/// `operation` message per line when streaming.
fn print_trace(trace: Trace, stream: bool) -> i32 {
    let lines: Result<Vec<String>, serde_json::Error> = if stream {
        TraceMessage::stream(&trace)
            .map(|msg| serde_json::to_string(&msg))
            .collect()
    } else {
        serde_json::to_string_pretty(&TraceMessage::from(trace)).map(|json| vec![json])
    };

    match lines {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: failed to serialize trace: {}", e);
            3
        }
    }
}
