//! bikeshare-sim entry point: CLI wiring, configuration, and output.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bikeshare_sim::config::AppConfig;
use bikeshare_sim::io::flow_csv::{export_flow_csv, write_flow_csv};
use bikeshare_sim::runner::{GenerationRequest, generate, simulate};
use bikeshare_sim::scenario::ScenarioStore;
use bikeshare_sim::sim::rng::build_rng;
use bikeshare_sim::{Error, Result};

use cli::Args;

/// Loads the config file if one was given, then validates it.
fn load_config(args: &Args) -> Result<AppConfig> {
    let config = match &args.config {
        Some(path) => AppConfig::from_toml_file(path).map_err(|e| Error::Config(vec![e]))?,
        None => AppConfig::default(),
    };
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(Error::Config(errors));
    }
    Ok(config)
}

/// Logs go to stderr so stdout carries only the CSV or JSON payload.
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    init_tracing(&config.logging.filter);

    let dir = args
        .scenarios_dir
        .clone()
        .unwrap_or_else(|| config.scenarios.dir.clone());
    let store = ScenarioStore::new(dir);
    let rng = build_rng(args.seed.or(config.simulation.seed));
    let max_days = config.simulation.max_days;
    let request = GenerationRequest::new(&args.scenario, args.days);

    if args.json {
        let report = generate(&store, &request, max_days, Utc::now(), rng)?;
        let mut out = io::BufWriter::new(io::stdout().lock());
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        out.flush()?;
        return Ok(());
    }

    request.validate(max_days)?;
    let model = store.load(&request.scenario)?;
    let records = simulate(&model, request.days, Utc::now(), rng)?;

    // Everything is computed before the first byte is written.
    match &args.output {
        Some(path) => {
            export_flow_csv(&records, path)?;
            info!(path = %path.display(), records = records.len(), "wrote flow csv");
        }
        None => {
            let mut out = io::BufWriter::new(io::stdout().lock());
            write_flow_csv(&records, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
