//! Coefficient form calculator: command line front end.
//! Feeds raw field values to the library and prints the verdicts.
//!
//! Examples:
//!   coeff-form 1.85/1.95 1.50/1.99
//!   coeff-form --form form.toml --json
//!   coeff-form --cache state/fields.json 1.85/1.95   (saves the fields)
//!   coeff-form --cache state/fields.json --finalize  (restores them)

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use coeff_form_analyzer::form::{load_form_file, parse_pairs};
use coeff_form_analyzer::{
    CalcConfig, ComputationResult, FieldCache, FieldId, FormSession, InputError, JsonFileCache,
    MemoryCache, Phase, Player, RoundInput,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Round pairs as `P1/P2` (e.g. `1.85/1.95`); either side may be empty
    #[arg(value_name = "PAIR")]
    pairs: Vec<String>,

    /// Read the rounds from a TOML or JSON form file instead
    #[arg(long, conflicts_with = "pairs")]
    form: Option<PathBuf>,

    /// Path to calculator config TOML (defaults: $COEFF_CONFIG_PATH, config/calculator.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file mirroring the raw field values between runs
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Clear the form (and the cache) before applying any pairs
    #[arg(long, default_value_t = false)]
    clear: bool,

    /// Show the prediction even when not every round is filled
    #[arg(long, default_value_t = false)]
    finalize: bool,

    /// Strip anything but digits and one dot from the values first
    #[arg(long, default_value_t = false)]
    sanitize: bool,

    /// Print the full result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Logs go to stderr so `--json` output stays clean.
/// `COEFF_LOG_JSON=1` switches to JSON log lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("coeff_form_analyzer=info,coeff_form=info,warn"));
    let json_logs = std::env::var("COEFF_LOG_JSON").ok().is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a ComputationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError<'a>>,
}

#[derive(Serialize)]
struct JsonError<'a> {
    message: String,
    #[serde(flatten)]
    detail: &'a InputError,
}

fn load_config(args: &Args) -> Result<CalcConfig> {
    match &args.config {
        Some(path) => CalcConfig::load_from_file(path),
        None => CalcConfig::load_default(),
    }
}

fn input_rounds(args: &Args) -> Result<Option<Vec<RoundInput>>> {
    if let Some(path) = &args.form {
        return load_form_file(path).map(Some);
    }
    if args.pairs.is_empty() {
        return Ok(None);
    }
    parse_pairs(&args.pairs).map(Some)
}

fn run<C: FieldCache>(mut session: FormSession<C>, args: &Args) -> Result<ExitCode> {
    if args.clear {
        session.clear();
        info!("form cleared");
    }

    if let Some(rounds) = input_rounds(args)? {
        let total = session.config().rounds;
        if rounds.len() > total {
            warn!(given = rounds.len(), total, "extra rounds ignored");
        }
        for round in 0..total {
            let input = rounds.get(round).cloned().unwrap_or_default();
            for player in Player::BOTH {
                let field = FieldId::new(round, player);
                let raw = input.get(player).unwrap_or("");
                if args.sanitize {
                    session.paste(field, raw)?;
                } else {
                    session.set_field(field, raw)?;
                }
            }
        }
    }

    if args.finalize {
        if let Err(e) = session.finalize() {
            warn!("{e}");
        }
    }

    let phase = session.phase();
    let outcome = session.outcome();

    if args.json {
        let out = JsonOutput {
            phase,
            result: outcome.as_ref().ok(),
            error: outcome.as_ref().err().map(|e| JsonError {
                message: e.to_string(),
                detail: e,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&out).context("serializing result")?);
    } else {
        match outcome {
            Ok(result) => {
                for line in result.report_lines() {
                    // The prediction line only shows once the form is finalized/complete.
                    if line.starts_with("Prediction:") && phase != Phase::ShowingPrediction {
                        continue;
                    }
                    println!("{line}");
                }
                if phase != Phase::ShowingPrediction {
                    println!("(fill every round or pass --finalize to see the prediction)");
                }
            }
            Err(e) => println!("Error: {e}"),
        }
    }

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn main() -> ExitCode {
    // Load .env when present; no-op otherwise.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("config error: {e:#}");
            return ExitCode::from(2);
        }
    };
    info!(strategy = ?config.strategy, rounds = config.rounds, "calculator config loaded");

    let result = match &args.cache {
        Some(path) => match JsonFileCache::open(path) {
            Ok(cache) => {
                let session = if args.pairs.is_empty() && args.form.is_none() {
                    FormSession::restore(config, cache)
                } else {
                    FormSession::new(config, cache)
                };
                run(session, &args)
            }
            Err(e) => Err(e),
        },
        None => run(FormSession::new(config, MemoryCache::new()), &args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
