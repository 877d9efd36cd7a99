use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;
use wt_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, SettingsOverrides, query,
    run_service, scenario_service,
};

#[derive(Parser)]
#[command(name = "wt-cli")]
#[command(about = "wtsim CLI - Water-treatment network attack simulator", long_about = None)]
struct Cli {
    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and structure
    Validate {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
    },
    /// Summarize a scenario's components, pipes and schedules
    Describe {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
    },
    /// Run a simulation
    Run {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
        /// Simulated span in seconds
        #[arg(long)]
        duration: Option<f64>,
        /// Step in seconds
        #[arg(long)]
        time_step: Option<f64>,
        /// Ambient temperature in °C
        #[arg(long)]
        ambient_temp: Option<f64>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs for a scenario
    Runs {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export one component field from a run as CSV
    ExportSeries {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Component ID
        component_id: String,
        /// Field name (e.g., waterLevel, ph, power)
        field: String,
        /// Export the observed values, poisoned readings included
        #[arg(long)]
        reported: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export every recorded value of a run as CSV
    ExportCsv {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Describe { scenario_path } => cmd_describe(&scenario_path),
        Commands::Run {
            scenario_path,
            duration,
            time_step,
            ambient_temp,
            no_cache,
        } => cmd_run(
            &scenario_path,
            SettingsOverrides {
                duration,
                time_step,
                ambient_temp,
            },
            !no_cache,
        ),
        Commands::Runs { scenario_path } => cmd_runs(&scenario_path),
        Commands::ShowRun {
            scenario_path,
            run_id,
        } => cmd_show_run(&scenario_path, &run_id),
        Commands::ExportSeries {
            scenario_path,
            run_id,
            component_id,
            field,
            reported,
            output,
        } => cmd_export_series(
            &scenario_path,
            &run_id,
            &component_id,
            &field,
            reported,
            output.as_deref(),
        ),
        Commands::ExportCsv {
            scenario_path,
            run_id,
            output,
        } => cmd_export_csv(&scenario_path, &run_id, output.as_deref()),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = scenario_service::load_scenario(scenario_path)?;
    scenario_service::validate_scenario(&scenario)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_describe(scenario_path: &Path) -> AppResult<()> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let summary = scenario_service::describe_scenario(&scenario);

    println!("Scenario: {} (version {})", summary.name, summary.version);
    println!("\nComponents:");
    for (kind, ids) in &summary.components_by_kind {
        println!("  {:<9} {}", kind, ids.join(", "));
    }
    print!("\nPipes: {}", summary.pipe_count);
    if summary.dangling_pipe_count > 0 {
        print!(" ({} dangling)", summary.dangling_pipe_count);
    }
    println!();
    println!("Control actions: {}", summary.control_action_count);
    println!("Conditional actions: {}", summary.conditional_action_count);
    println!("Attacks: {}", summary.attack_count);
    println!(
        "Settings: duration={}s  timeStep={}s  ambientTemp={}°C",
        summary.settings.duration, summary.settings.time_step, summary.settings.ambient_temp
    );
    Ok(())
}

fn cmd_run(scenario_path: &Path, overrides: SettingsOverrides, use_cache: bool) -> AppResult<()> {
    println!("Running scenario: {}", scenario_path.display());

    let request = RunRequest {
        scenario_path,
        options: RunOptions {
            use_cache,
            overrides,
            ..Default::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let emit_now =
                last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
    }
    print_timing_summary(&response.timing);

    let (manifest, rows) = run_service::load_run(scenario_path, &response.run_id)?;
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let summary = query::get_run_summary(&rows, &scenario.network)?;
    println!("  Ticks: {}", manifest.tick_count);
    println!("  Components recorded: {}", summary.component_ids.len());
    println!("  Ticks with attacks: {}", summary.attack_row_count);

    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    if let (RunStage::Simulating, Some(p), Some(fraction)) =
        (event.stage, event.sim, event.fraction_complete())
    {
        let width = 28usize;
        let filled = ((fraction * width as f64).round() as usize).min(width);
        print!(
            "\r[{}{}] {:>6.2}%  t={}s  tick={}/{}  elapsed={:.1}s",
            "#".repeat(filled),
            "-".repeat(width.saturating_sub(filled)),
            fraction * 100.0,
            p.time,
            p.tick,
            p.total_ticks,
            event.elapsed_wall_s
        );
    } else {
        let spinner = ['|', '/', '-', '\\'];
        let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
        let mut line = format!(
            "\r{} {}  elapsed={:.2}s",
            spinner[spin_idx],
            event.stage.label(),
            event.elapsed_wall_s
        );
        if let Some(msg) = &event.message {
            line.push_str(&format!("  {}", msg));
        }
        print!("{}", line);
    }
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &wt_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);

    println!("\nTiming summary:");
    println!("  Load:     {:.3}s", timing.load_time_s);
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    } else {
        println!(
            "  Simulate: {:.3}s ({:.1}%)",
            timing.simulate_time_s,
            100.0 * timing.simulate_time_s / total
        );
        println!(
            "  Save:     {:.3}s ({:.1}%)",
            timing.save_time_s,
            100.0 * timing.save_time_s / total
        );
    }
    println!("  Total:    {:.3}s", timing.total_time_s);
}

fn cmd_runs(scenario_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(scenario_path)?;

    if runs.is_empty() {
        println!("No cached runs found for: {}", scenario_path.display());
    } else {
        println!("Cached runs for '{}':", runs[0].scenario_name);
        for manifest in runs {
            println!(
                "  {} ({}, {} ticks, step {}s)",
                manifest.run_id, manifest.timestamp, manifest.tick_count, manifest.settings.time_step
            );
        }
    }
    Ok(())
}

fn cmd_show_run(scenario_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, rows) = run_service::load_run(scenario_path, run_id)?;
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let summary = query::get_run_summary(&rows, &scenario.network)?;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario_name);
    println!("  Created: {}", manifest.timestamp);
    println!("  Engine: {}", manifest.engine_version);
    println!("  Ticks: {}", summary.row_count);
    println!(
        "  Time range: {:.3} - {:.3} s",
        summary.time_range.0, summary.time_range.1
    );

    println!("\nComponents:");
    for id in &summary.component_ids {
        println!("  {}", id);
    }

    let events = query::attack_events(&rows);
    if !events.is_empty() {
        println!("\nAttacks:");
        for (t, label) in events {
            println!("  t={}s  {}", t, label);
        }
    }

    Ok(())
}

fn write_or_print(csv: String, output: Option<&Path>, what: &str) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} to {}", what, path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn cmd_export_series(
    scenario_path: &Path,
    run_id: &str,
    component_id: &str,
    field: &str,
    reported: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, rows) = run_service::load_run(scenario_path, run_id)?;
    let series = query::extract_series(&rows, component_id, field, reported)?;

    let column = format!("{component_id}_{field}");
    let csv = wt_results::series_to_csv(&column, &series);
    write_or_print(csv, output, &format!("{} data points", series.len()))
}

fn cmd_export_csv(scenario_path: &Path, run_id: &str, output: Option<&Path>) -> AppResult<()> {
    let (_manifest, rows) = run_service::load_run(scenario_path, run_id)?;
    let csv = wt_results::rows_to_csv(&rows);
    write_or_print(csv, output, &format!("{} rows", rows.len()))
}
