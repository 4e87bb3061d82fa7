//! Remuneration projection CLI
//!
//! Projects every scenario of a simulation file, prints a summary table
//! per scenario and optionally writes the full breakdown to CSV.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use remuneration_projection::assumptions::loader::DEFAULT_TABLES_PATH;
use remuneration_projection::parameters::{load_simulation, save_simulation, Simulation};
use remuneration_projection::projection::ProjectionResult;
use remuneration_projection::{Assumptions, ProjectionConfig, ScenarioRunner, YearMonth};

#[derive(Parser)]
#[command(version, about)]
/// Remuneration projection for SEF/MG tax auditor careers.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project every scenario of a simulation file.
    Project {
        /// Simulation JSON (global parameters and scenarios).
        simulation: PathBuf,

        /// Directory holding the career, bracket and ADE tables.
        #[arg(long)]
        tables: Option<PathBuf>,

        /// First projected month as YYYY-MM; defaults to the current month.
        #[arg(long)]
        start: Option<YearMonth>,

        /// Write every period to `<DIR>/<scenario id>.csv`.
        #[arg(long, value_name = "DIR")]
        csv: Option<PathBuf>,

        /// Express all amounts in money of the first projected month.
        #[arg(long)]
        present_value: bool,
    },
    /// Rewrite a simulation file in the current schema.
    Migrate {
        /// Simulation JSON, any schema version.
        input: PathBuf,

        /// Destination of the migrated file.
        output: PathBuf,
    },
    /// Report the jumps between brackets of the deduction tables.
    Tables {
        /// Directory holding the tables; defaults to the built-in ones.
        #[arg(long)]
        tables: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Commands::Project {
            simulation,
            tables,
            start,
            csv,
            present_value,
        } => handle_project_command(&simulation, tables.as_deref(), start, csv.as_deref(), present_value),
        Commands::Migrate { input, output } => handle_migrate_command(&input, &output),
        Commands::Tables { tables } => handle_tables_command(tables.as_deref()),
    }
}

fn load_assumptions(tables: Option<&Path>) -> Result<Assumptions> {
    let path = tables.unwrap_or_else(|| Path::new(DEFAULT_TABLES_PATH));
    if tables.is_none() && !path.exists() {
        info!("No tables directory at {}, using built-in tables", path.display());
        return Ok(Assumptions::sef_mg());
    }
    Assumptions::from_csv_path(path).with_context(|| format!("Failed to load tables from {}", path.display()))
}

fn handle_project_command(
    simulation_path: &Path,
    tables: Option<&Path>,
    start: Option<YearMonth>,
    csv_path: Option<&Path>,
    present_value: bool,
) -> Result<()> {
    let assumptions = load_assumptions(tables)?;
    let simulation = load_simulation(simulation_path, &assumptions.career)
        .with_context(|| format!("Failed to load simulation {}", simulation_path.display()))?;

    let config = match start {
        Some(start) => ProjectionConfig::starting_at(start),
        None => ProjectionConfig::default(),
    };
    let runner = ScenarioRunner::with_assumptions(assumptions, config);

    let mut results = runner
        .run_all(&simulation.global, &simulation.scenarios)
        .context("Projection failed")?;
    if present_value {
        results = results.iter().map(ProjectionResult::in_present_value).collect();
    }

    println!("Remuneration Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("=============================\n");

    for (scenario, result) in simulation.scenarios.iter().zip(&results) {
        print_result(&scenario.name, result);
    }

    if let Some(last) = results.first().and_then(|r| r.records.last()) {
        let label = last.label(results[0].monthly);
        if let Some(best) = ScenarioRunner::best_scenario_at(&results, &label) {
            println!("Highest net pay at {}: {}", label, best);
        }
    }

    if let Some(path) = csv_path {
        write_csv(path, &results)?;
        println!("Full results written to: {}", path.display());
    }

    Ok(())
}

fn print_result(name: &str, result: &ProjectionResult) {
    println!("Scenario: {} ({} periods)", name, result.records.len());
    println!(
        "{:>8} {:>6} {:>3} {:>12} {:>12} {:>10} {:>12} {:>12} {:>12} {:>12}",
        "Period", "Pos", "Yrs", "Base", "GEPI", "ADE", "Gross", "Pension", "IRRF", "Net"
    );
    println!("{}", "-".repeat(110));

    for record in &result.records {
        println!(
            "{:>8} {:>6} {:>3} {:>12.2} {:>12.2} {:>10.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            record.label(result.monthly),
            record.position.to_string(),
            record.service_years,
            record.base_salary,
            record.gepi_paid,
            record.ade,
            record.gross_pay,
            record.rpps + record.prevcom,
            record.irrf,
            record.net_pay,
        );
    }

    let summary = result.summary();
    println!();
    println!("  Total gross:       {:>16.2}", summary.total_gross);
    println!("  Total deductions:  {:>16.2}", summary.total_deductions);
    println!("  Total claw-backs:  {:>16.2}", summary.total_clawbacks);
    println!("  Total net:         {:>16.2}", summary.total_net);
    if let Some(position) = summary.final_position {
        println!(
            "  Final position:    {:>16} ({} promotions, {} progressions)",
            position.to_string(),
            summary.promotions,
            summary.progressions
        );
    }
    println!();
}

/// One CSV file per scenario, named after its id
fn write_csv(dir: &Path, results: &[ProjectionResult]) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Unable to create {}", dir.display()))?;

    for result in results {
        let path = dir.join(format!("{}.csv", result.scenario_id));
        let file = File::create(&path).with_context(|| format!("Unable to create {}", path.display()))?;
        let mut writer = csv::Writer::from_writer(file);
        for record in &result.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        info!("Wrote {} rows to {}", result.records.len(), path.display());
    }
    Ok(())
}

fn handle_migrate_command(input: &Path, output: &Path) -> Result<()> {
    let career = Assumptions::sef_mg().career;
    let simulation: Simulation =
        load_simulation(input, &career).with_context(|| format!("Failed to load simulation {}", input.display()))?;
    save_simulation(output, &simulation).with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Migrated {} scenarios from {} to {}",
        simulation.scenarios.len(),
        input.display(),
        output.display()
    );
    Ok(())
}

fn handle_tables_command(tables: Option<&Path>) -> Result<()> {
    let assumptions = load_assumptions(tables)?;
    for (name, table) in [("RPPS", &assumptions.rpps), ("IRRF", &assumptions.irrf)] {
        println!("{}", name);
        let jumps = table.continuity_report();
        if jumps.is_empty() {
            println!("  continuous");
        }
        for d in jumps {
            println!(
                "  at {:>10.2}: {:>10.4} below, {:>10.4} above (jump {:+.4})",
                d.bound,
                d.below,
                d.above,
                d.jump()
            );
        }
    }
    Ok(())
}
