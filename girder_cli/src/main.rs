//! # Girder CLI
//!
//! Command-line front end for girder_core: create study files, analyze a
//! bridge, sweep the train across it and search for better sections.
//!
//! ```text
//! girder init bridge.girder --title "Design 1"
//! girder analyze bridge.girder
//! girder sweep bridge.girder --load 400
//! girder envelope bridge.girder --resolution 50
//! girder optimize bridge.girder --save
//! ```
//!
//! Logging goes to stderr through `env_logger`; set `RUST_LOG` or pass
//! `-v` (progress), `-vv` (debug) or `-vvv` (trace).

mod errors;
mod file_io;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use girder_core::study::Study;

use errors::{CliError, CliResult};
use file_io::{load_study, save_study};
use report::{Analysis, Sweep};

#[derive(Parser)]
#[command(name = "girder")]
#[command(about = "Beam bridge analysis and cross-section search")]
#[command(version)]
struct Cli {
    /// More log output: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new study with the default box girder
    Init {
        /// Study file to create
        path: PathBuf,

        #[arg(short, long, default_value = "")]
        author: String,

        #[arg(short, long, default_value = "Untitled bridge")]
        title: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Section properties, maximum load and dead zones
    Analyze {
        path: PathBuf,
    },

    /// Safety factors at every train position
    Sweep {
        path: PathBuf,

        /// Total train load (N); defaults to the study's train
        #[arg(short, long)]
        load: Option<f64>,
    },

    /// Largest shear and moment along the span over the whole sweep
    Envelope {
        path: PathBuf,

        /// Spacing of span positions (mm)
        #[arg(short, long, default_value = "10")]
        resolution: f64,
    },

    /// Run the study's parameter search
    Optimize {
        path: PathBuf,

        /// Candidates between progress reports
        #[arg(short, long, default_value = "200")]
        budget: usize,

        /// Write the best parameters back into the study's section
        #[arg(long)]
        save: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("Command failed with {}", err.error_code());
            eprintln!("Error: {}", err);
            if cli.json {
                if let Ok(json) = serde_json::to_string_pretty(&err) {
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Default log filter for the number of `-v` flags
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8) {
    let level = log_level(verbose);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Init {
            path,
            author,
            title,
            force,
        } => init(path, author, title, *force),
        Commands::Analyze { path } => analyze(path, cli.json),
        Commands::Sweep { path, load } => sweep(path, *load, cli.json),
        Commands::Envelope { path, resolution } => envelope(path, *resolution, cli.json),
        Commands::Optimize { path, budget, save } => optimize(path, *budget, *save, cli.json),
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(girder_core::CalcError::from)?;
    println!("{}", json);
    Ok(())
}

fn init(path: &Path, author: &str, title: &str, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::file_error(
            "init",
            path.display().to_string(),
            "File exists (use --force to overwrite)",
        ));
    }
    save_study(&Study::new(author, title), path)?;
    println!("Created {}", path.display());
    Ok(())
}

fn analyze(path: &Path, json: bool) -> CliResult<()> {
    let study = load_study(path)?;
    let evaluator = study.evaluator()?;
    let series = evaluator.pass_the_train()?;

    let analysis = Analysis {
        title: study.meta.title.clone(),
        section: *evaluator.bridge().profile().properties(),
        train_load_n: study.bridge.train.total_load(),
        maximum_load: evaluator.maximum_load()?,
        dead_zones: evaluator.dead_zones(&series),
    };

    if json {
        print_json(&analysis)
    } else {
        report::print_analysis(&analysis);
        Ok(())
    }
}

fn sweep(path: &Path, load: Option<f64>, json: bool) -> CliResult<()> {
    let mut study = load_study(path)?;
    if let Some(load_n) = load {
        study.bridge.train = study.bridge.train.with_total_load(load_n)?;
    }
    let evaluator = study.evaluator()?;
    let series = evaluator.pass_the_train()?;

    let sweep = Sweep {
        train_load_n: study.bridge.train.total_load(),
        threshold: evaluator.threshold(),
        dead_zones: evaluator.dead_zones(&series),
        series,
    };

    if json {
        print_json(&sweep)
    } else {
        report::print_sweep(&sweep);
        Ok(())
    }
}

fn envelope(path: &Path, resolution_mm: f64, json: bool) -> CliResult<()> {
    let study = load_study(path)?;
    let envelope = study.evaluator()?.force_envelope(resolution_mm)?;
    if json {
        print_json(&envelope)
    } else {
        report::print_envelope(&envelope);
        Ok(())
    }
}

fn optimize(path: &Path, budget: usize, save: bool, json: bool) -> CliResult<()> {
    let mut study = load_study(path)?;
    let mut search = study.search()?;

    while !search.advance(budget.max(1)) {
        let stats = search.stats();
        let best = search.best().map_or(f64::NAN, |b| b.score);
        log::info!(
            "{} candidates, {} evaluations, best {:.2} N",
            stats.candidates,
            stats.evaluations,
            best
        );
    }
    let result = search.result();

    if json {
        print_json(&result)?;
    } else {
        report::print_search(&result);
    }

    if save {
        match &result.best {
            Some(best) => {
                study.bridge.section = study.bridge.section.with_parameters(&best.assignment)?;
                study.touch();
                save_study(&study, path)?;
                log::info!("Saved best section to {}", path.display());
            }
            None => log::warn!("Nothing to save: no feasible candidate"),
        }
    }
    Ok(())
}
