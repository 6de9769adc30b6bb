use bd_app::{AppResult, SimulationService, query};
use bd_controls::ActuatorKind;
use bd_project::Scenario;
use bd_results::RunOutput;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bd-cli")]
#[command(about = "Biodigestor closed-loop simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one environment and emit its JSON run output
    Run {
        /// Scenario file (YAML or JSON); flags below override it
        #[arg(short, long)]
        scenario: Option<PathBuf>,
        /// Minutes per tick
        #[arg(long)]
        time_step: Option<i64>,
        /// Elapsed seconds after which the run ends
        #[arg(long)]
        horizon: Option<i64>,
        /// Starting temperature in °C
        #[arg(long)]
        temperature: Option<f64>,
        /// Starting pH
        #[arg(long)]
        ph: Option<f64>,
        /// Stop after this many elapsed seconds instead of the horizon
        #[arg(long)]
        until: Option<u64>,
        /// Output JSON file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a scenario file
    Validate {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
    /// Show the summary of a saved run output
    Summary {
        /// Path to the run output JSON file
        output_path: PathBuf,
    },
    /// Export one variable of a saved run as CSV
    Series {
        /// Path to the run output JSON file
        output_path: PathBuf,
        /// Variable name (temperature, ph, pump, acid_valve, base_valve, agitator)
        variable: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            time_step,
            horizon,
            temperature,
            ph,
            until,
            output,
        } => {
            let mut scenario = match scenario {
                Some(path) => {
                    let scenario = bd_project::load_scenario(&path)?;
                    info!(path = %path.display(), name = %scenario.name, "scenario loaded");
                    scenario
                }
                None => Scenario::default(),
            };
            let env = &mut scenario.environment;
            if let Some(step) = time_step {
                env.time_step_min = step;
            }
            if let Some(horizon) = horizon {
                env.horizon_s = horizon;
            }
            if let Some(temperature) = temperature {
                env.initial_temperature_c = temperature;
            }
            if let Some(ph) = ph {
                env.initial_ph = ph;
            }
            cmd_run(&scenario, until, output.as_deref())
        }
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Summary { output_path } => cmd_summary(&output_path),
        Commands::Series {
            output_path,
            variable,
            output,
        } => cmd_series(&output_path, &variable, output.as_deref()),
    }
}

fn cmd_run(scenario: &Scenario, until: Option<u64>, output: Option<&Path>) -> AppResult<()> {
    let service = SimulationService::new();
    let id = service.create(scenario.environment_config())?;

    eprintln!("Running '{}' as environment {}", scenario.name, id);
    let start = Instant::now();
    let result = service.spawn_run(&id, until)?.join()?;
    let elapsed = start.elapsed();

    match output {
        Some(path) => {
            query::save_output(path, &result)?;
            eprintln!("✓ Run output written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            bd_results::write_run_output(&mut stdout, &result)?;
            writeln!(stdout)?;
        }
    }

    eprintln!("✓ Simulation completed in {:.3} s", elapsed.as_secs_f64());
    print_summary(&result, &mut io::stderr().lock())?;
    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    let scenario = bd_project::load_scenario(scenario_path)?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    println!(
        "  Step: {} min, horizon: {} s",
        scenario.environment.time_step_min, scenario.environment.horizon_s
    );
    println!(
        "  Start: {:.2} °C, pH {:.2}",
        scenario.environment.initial_temperature_c, scenario.environment.initial_ph
    );
    Ok(())
}

fn cmd_summary(output_path: &Path) -> AppResult<()> {
    let result = query::load_output(output_path)?;
    print_summary(&result, &mut io::stdout().lock())
}

fn cmd_series(output_path: &Path, variable: &str, output: Option<&Path>) -> AppResult<()> {
    let result = query::load_output(output_path)?;
    let series = query::extract_series(&result.time_series, variable)?;

    let mut csv = format!("elapsed_s,{}\n", variable);
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t, val));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} points to {}", series.len(), path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn print_summary(result: &RunOutput, out: &mut impl Write) -> AppResult<()> {
    let stats = query::get_run_summary(result)?;
    writeln!(out, "Ticks: {}", stats.tick_count)?;
    writeln!(
        out,
        "Elapsed: {} s to {} s",
        stats.elapsed_range.0, stats.elapsed_range.1
    )?;
    writeln!(
        out,
        "Temperature: {:.2} to {:.2} °C",
        stats.temperature_range.0, stats.temperature_range.1
    )?;
    writeln!(out, "pH: {:.2} to {:.2}", stats.ph_range.0, stats.ph_range.1)?;
    match stats.time_to_target_temperature {
        Some(t) => writeln!(out, "Time to target temperature: {} s", t)?,
        None => writeln!(out, "Time to target temperature: not reached")?,
    }
    writeln!(out, "Activations:")?;
    for kind in ActuatorKind::ALL {
        let duty = query::duty_fraction(&result.time_series, kind)?;
        writeln!(
            out,
            "  {:<11} {:>4}  (on {:.1}% of ticks)",
            kind.as_str(),
            stats.activations.get(kind),
            duty * 100.0
        )?;
    }
    Ok(())
}
