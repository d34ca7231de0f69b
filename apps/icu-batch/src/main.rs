//! `icu-batch`: run every parameter set of a batch file for a number of
//! simulated days and write the event streams of each run as CSV.
//!
//! Output layout:
//!
//! ```text
//! <out>/run<N>/params<i>/{opnames,geweigerd,costs,capacity,amount,replanning}.csv
//! ```
//!
//! `N` is the next free run index under `<out>`; `i` is the position of the
//! parameter set in the batch file.  Parameter sets run in parallel.
//!
//! Run with:
//!   RUST_LOG=info cargo run -p icu-batch --release -- --time 365

mod args;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use log::info;
use rayon::prelude::*;

use icu_core::ModelConfig;
use icu_output::{CsvWriter, SimOutputObserver};
use icu_schedule::{Calibration, HistoricalCalibration, load_history_csv, load_surge_csv};
use icu_sim::ModelBuilder;

use args::Args;

// ── Run summary ───────────────────────────────────────────────────────────────

struct RunSummary {
    index:      usize,
    steps:      u64,
    admissions: usize,
    refused:    usize,
    replanning: usize,
    free_beds:  u32,
    secs:       f64,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_configs(path: &Path) -> Result<Vec<ModelConfig>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let configs: Vec<ModelConfig> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    if configs.is_empty() {
        bail!("{} contains no parameter sets", path.display());
    }
    Ok(configs)
}

fn load_calibration(args: &Args, needs_surge: bool) -> Result<HistoricalCalibration> {
    let history = load_history_csv(&args.history)
        .with_context(|| format!("loading history {}", args.history.display()))?;
    info!("loaded {} historical admissions from {}", history.len(), args.history.display());
    let mut calibration = HistoricalCalibration::from_records(&history);

    if needs_surge {
        let surge = load_surge_csv(&args.surge)
            .with_context(|| format!("loading surge series {}", args.surge.display()))?;
        info!("loaded {} surge days from {}", surge.len(), args.surge.display());
        calibration = calibration.with_surge_admissions(&surge);
    }
    Ok(calibration)
}

/// First `run<N>` directory under `out` that does not exist yet.
fn next_run_dir(out: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    let mut n = fs::read_dir(out)?.count();
    loop {
        let dir = out.join(format!("run{n}"));
        if !dir.exists() {
            return Ok(dir);
        }
        n += 1;
    }
}

fn run_one(
    index:       usize,
    config:      &ModelConfig,
    calibration: Arc<dyn Calibration>,
    days:        u64,
    dir:         &Path,
) -> Result<RunSummary> {
    let started = Instant::now();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut model = ModelBuilder::new(config.clone(), calibration)
        .build()
        .with_context(|| format!("parameter set {index}"))?;
    let writer = CsvWriter::new(dir, model.events().department_labels())?;
    let mut observer = SimOutputObserver::new(writer);

    model.run_days(days, &mut observer).with_context(|| format!("parameter set {index}"))?;
    if let Some(e) = observer.take_error() {
        return Err(e).with_context(|| format!("writing {}", dir.display()));
    }

    let events = model.events();
    Ok(RunSummary {
        index,
        steps:      model.step_count(),
        admissions: events.admissions().len(),
        refused:    events.refused().len(),
        replanning: events.replanning().len(),
        free_beds:  model.free_capacity(),
        secs:       started.elapsed().as_secs_f64(),
    })
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse(std::env::args().skip(1))?;
    let configs = load_configs(&args.config)?;
    let needs_surge = configs.iter().any(|c| c.use_surge);
    let calibration: Arc<dyn Calibration> = Arc::new(load_calibration(&args, needs_surge)?);

    let run_dir = next_run_dir(&args.out)?;
    info!(
        "{} parameter sets × {} days → {}",
        configs.len(),
        args.days,
        run_dir.display()
    );

    let t_total = Instant::now();
    let results: Vec<Result<RunSummary>> = configs
        .par_iter()
        .enumerate()
        .map(|(i, config)| {
            let dir = run_dir.join(format!("params{i}"));
            run_one(i, config, Arc::clone(&calibration), args.days, &dir)
        })
        .collect();

    let mut failed = 0;
    for result in results {
        match result {
            Ok(s) => println!(
                "params{:<3} {:>8} steps  {:>6} admissions  {:>5} refused  {:>5} rescheduled  {:>3} free beds  {:.2}s",
                s.index, s.steps, s.admissions, s.refused, s.replanning, s.free_beds, s.secs
            ),
            Err(e) => {
                failed += 1;
                eprintln!("error: {e:#}");
            }
        }
    }
    println!("Total: {:.2}s", t_total.elapsed().as_secs_f64());

    if failed > 0 {
        bail!("{failed} of {} parameter sets failed", configs.len());
    }
    Ok(())
}
