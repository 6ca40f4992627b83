use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ps_app::{
    AppResult, ChillerOutcome, QuickSizeRequest, SegmentOutcome, StudyOutcome, StudyReport,
    default_concentration, project_service, quick_study, run_study, select_chillers,
};
use ps_chiller::{ChillerCandidate, Redundancy, Strategy, tons_to_mw};
use ps_core::imperial::gpm;
use ps_fluids::{FluidKind, fluid_table, lookup};
use ps_hydraulics::{FlowSpec, HydraulicSizer, PipeCatalog, SizingLimits, SizingResult};
use ps_layout::parse_layout;
use ps_project::{ChillerDef, FluidDef, FluidKindDef, LoadingBandDef, RedundancyDef, StrategyDef};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plantsizer")]
#[command(about = "Data-center chilled-water pipe sizing and chiller selection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size the main pipe for a building load and recommend chillers
    Size {
        /// IT load in MW
        #[arg(long)]
        mw: f64,
        /// Loop temperature difference, °F
        #[arg(long, default_value_t = 15.0)]
        delta_t: f64,
        /// Maximum velocity, ft/s
        #[arg(long, default_value_t = 12.0)]
        velocity: f64,
        /// Maximum pressure drop, psi per 100 ft
        #[arg(long, default_value_t = 20.0)]
        max_dp: f64,
        /// water, ethylene_glycol or propylene_glycol
        #[arg(long, default_value = "water")]
        fluid: FluidKind,
        /// Glycol concentration, percent
        #[arg(long)]
        concentration: Option<u32>,
        /// Fan heat added to the IT load, percent
        #[arg(long, default_value_t = 0.0)]
        fan_heat: f64,
        /// Also size this many equal risers
        #[arg(long)]
        risers: Option<u32>,
        /// Main pipe run length for the total pressure drop, ft
        #[arg(long, default_value_t = 150.0)]
        run_length: f64,
        /// N+1, N+2 or N+<pct>%
        #[arg(long, default_value = "N+1")]
        redundancy: Redundancy,
        #[arg(long, default_value = "balanced")]
        strategy: Strategy,
        #[arg(long, default_value_t = 20)]
        max_units: u32,
    },
    /// Run a study file
    Study {
        /// Path to the study YAML or JSON file
        study_path: PathBuf,
        /// Write the report as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Validate study file syntax and structure
    Validate {
        /// Path to the study YAML or JSON file
        study_path: PathBuf,
    },
    /// Recommend chiller plant configurations
    Chillers {
        /// Cooling load in MW
        #[arg(long, required_unless_present = "tons", conflicts_with = "tons")]
        mw: Option<f64>,
        /// Cooling load in refrigeration tons
        #[arg(long)]
        tons: Option<f64>,
        #[arg(long, default_value = "N+1")]
        redundancy: Redundancy,
        #[arg(long, default_value = "balanced")]
        strategy: Strategy,
        #[arg(long, default_value_t = 20)]
        max_units: u32,
        /// Electricity rate, $/kWh
        #[arg(long, default_value_t = 0.12)]
        rate: f64,
        /// Operating hours per year
        #[arg(long, default_value_t = 8760.0)]
        hours: f64,
        /// Lowest acceptable loading of the operating units, percent
        #[arg(long, requires = "band_max")]
        band_min: Option<f64>,
        /// Highest acceptable loading of the operating units, percent
        #[arg(long, requires = "band_min")]
        band_max: Option<f64>,
    },
    /// Show hall names and statistics for a CxRxF layout
    Layout {
        /// Layout such as 4x3x2
        spec: String,
        /// Suffix hall names with the floor (A1-F1)
        #[arg(long)]
        floors: bool,
    },
    /// List Schedule 40 pipe sizes, optionally evaluated for a flow
    Catalog {
        /// Flow to evaluate every size against, gpm
        #[arg(long)]
        flow_gpm: Option<f64>,
        #[arg(long, default_value = "water")]
        fluid: FluidKind,
        #[arg(long)]
        concentration: Option<u32>,
        #[arg(long, default_value_t = 12.0)]
        velocity: f64,
        #[arg(long, default_value_t = 20.0)]
        max_dp: f64,
    },
    /// List the fluid property table
    Fluids {
        /// Only entries whose id or name contains this text
        query: Option<String>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli.command);
    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
    }
    result
}

fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Size {
            mw,
            delta_t,
            velocity,
            max_dp,
            fluid,
            concentration,
            fan_heat,
            risers,
            run_length,
            redundancy,
            strategy,
            max_units,
        } => {
            tracing::debug!(mw, delta_t, ?fluid, "size");
            let request = QuickSizeRequest {
                it_load_mw: mw,
                delta_t_f: delta_t,
                max_velocity_fps: velocity,
                max_dp_psi_per_100ft: max_dp,
                fluid: fluid_def(fluid, concentration),
                fan_heat_pct: fan_heat,
                risers,
                run_length_ft: Some(run_length),
                chillers: ChillerDef {
                    redundancy: redundancy_def(redundancy),
                    strategy: strategy_def(strategy),
                    max_units,
                    ..ChillerDef::default()
                },
            };
            cmd_size(&request)
        }
        Commands::Study { study_path, json } => {
            tracing::debug!(path = %study_path.display(), "study");
            cmd_study(&study_path, json.as_deref())
        }
        Commands::Validate { study_path } => {
            tracing::debug!(path = %study_path.display(), "validate");
            cmd_validate(&study_path)
        }
        Commands::Chillers {
            mw,
            tons,
            redundancy,
            strategy,
            max_units,
            rate,
            hours,
            band_min,
            band_max,
        } => {
            let load_mw = match (mw, tons) {
                (Some(mw), _) => mw,
                (None, Some(t)) => tons_to_mw(t),
                (None, None) => 0.0,
            };
            let def = ChillerDef {
                redundancy: redundancy_def(redundancy),
                strategy: strategy_def(strategy),
                max_units,
                electricity_rate_per_kwh: rate,
                annual_hours: hours,
                loading_band: band_min
                    .zip(band_max)
                    .map(|(min_pct, max_pct)| LoadingBandDef { min_pct, max_pct }),
            };
            tracing::debug!(load_mw, max_units, "chillers");
            cmd_chillers(load_mw, &def)
        }
        Commands::Layout { spec, floors } => cmd_layout(&spec, floors),
        Commands::Catalog {
            flow_gpm,
            fluid,
            concentration,
            velocity,
            max_dp,
        } => cmd_catalog(flow_gpm, fluid_def(fluid, concentration), velocity, max_dp),
        Commands::Fluids { query } => cmd_fluids(query.as_deref()),
    }
}

fn fluid_def(kind: FluidKind, concentration: Option<u32>) -> FluidDef {
    let kind = match kind {
        FluidKind::Water => FluidKindDef::Water,
        FluidKind::EthyleneGlycol => FluidKindDef::EthyleneGlycol,
        FluidKind::PropyleneGlycol => FluidKindDef::PropyleneGlycol,
    };
    FluidDef {
        kind,
        concentration_pct: concentration.unwrap_or_else(|| default_concentration(kind)),
    }
}

fn redundancy_def(redundancy: Redundancy) -> RedundancyDef {
    match redundancy {
        Redundancy::NPlusOne => RedundancyDef::NPlusOne,
        Redundancy::NPlusTwo => RedundancyDef::NPlusTwo,
        Redundancy::NPlusPercent(percent) => RedundancyDef::NPlusPercent { percent },
    }
}

fn strategy_def(strategy: Strategy) -> StrategyDef {
    match strategy {
        Strategy::Balanced => StrategyDef::Balanced,
        Strategy::Modular => StrategyDef::Modular,
        Strategy::Central => StrategyDef::Central,
        Strategy::LifecycleCost => StrategyDef::LifecycleCost,
    }
}

fn cmd_size(request: &QuickSizeRequest) -> AppResult<()> {
    let outcome = run_study(&quick_study(request))?;
    print_outcome(&outcome);
    Ok(())
}

fn cmd_study(study_path: &Path, json: Option<&Path>) -> AppResult<()> {
    println!("Running study: {}", study_path.display());
    let study = project_service::load_study(study_path)?;
    let outcome = run_study(&study)?;
    print_outcome(&outcome);

    if let Some(out) = json {
        StudyReport::from_outcome(&outcome).write_json(out)?;
        println!("✓ Report written: {}", out.display());
    }
    Ok(())
}

fn cmd_validate(study_path: &Path) -> AppResult<()> {
    println!("Validating study: {}", study_path.display());
    let study = project_service::load_study(study_path)?;
    let summary = project_service::validate_study(&study)?;

    println!("✓ Study is valid");
    println!("  Name: {} (version {})", summary.name, summary.version);
    println!("  Fluid: {}, ΔT {:.1} °F", summary.fluid, summary.delta_t_f);
    match &summary.layout {
        Some(layout) => println!(
            "  Layout: {} ({} halls, {} risers)",
            layout.spec, layout.stats.total_halls, layout.riser_mode
        ),
        None => println!("  Layout: none (main pipe only)"),
    }
    println!("  Total IT load: {:.2} MW", summary.total_it_load_mw);
    Ok(())
}

fn cmd_chillers(load_mw: f64, def: &ChillerDef) -> AppResult<()> {
    let top = select_chillers(load_mw, def)?;
    println!(
        "Chiller options for {:.2} MW ({:.0} tons):",
        load_mw,
        ps_chiller::mw_to_tons(load_mw)
    );
    print_chillers(&top);
    Ok(())
}

fn cmd_layout(spec: &str, floors: bool) -> AppResult<()> {
    let layout = parse_layout(spec)?;
    let stats = layout.stats();
    let names = layout.hall_names(floors)?;

    println!("Layout {}:", layout);
    println!(
        "  {} columns × {} rows × {} floors = {} halls ({} per floor)",
        stats.columns, stats.rows, stats.floors, stats.total_halls, stats.halls_per_floor
    );
    for chunk in names.chunks(12) {
        println!("  {}", chunk.join(" "));
    }
    Ok(())
}

fn cmd_catalog(
    flow_gpm: Option<f64>,
    fluid: FluidDef,
    velocity: f64,
    max_dp: f64,
) -> AppResult<()> {
    let catalog = PipeCatalog::schedule_40();

    let Some(flow_gpm) = flow_gpm else {
        println!("Pipe catalog ({} sizes):", catalog.len());
        for entry in &catalog {
            println!(
                "  {:<18} nominal {:>6.2} in   ID {:>7.3} in",
                entry.label,
                entry.nominal_in,
                entry.inside_diameter_in()
            );
        }
        return Ok(());
    };

    let properties = lookup(project_service::fluid_kind(fluid.kind), fluid.concentration_pct)?;
    let limits = SizingLimits::imperial(velocity, max_dp)?;
    let sizer = HydraulicSizer::new(&catalog, properties, limits);
    let evaluations = sizer.evaluate_all(gpm(flow_gpm))?;
    let selected = sizer.size(gpm(flow_gpm))?;

    println!(
        "Pipe catalog at {:.0} gpm ({}, ≤ {:.1} ft/s, ≤ {:.1} psi/100 ft):",
        flow_gpm,
        project_service::fluid_label(&fluid),
        velocity,
        max_dp
    );
    for eval in &evaluations {
        let marker = if eval.entry.label == selected.entry.label {
            "→"
        } else if eval.passes() {
            "✓"
        } else {
            " "
        };
        println!(
            "  {} {:<18} {:>7.2} ft/s {:>9.3} psi/100 ft",
            marker,
            eval.entry.label,
            eval.velocity_fps(),
            eval.dp_psi_per_100ft()
        );
    }
    for warning in &selected.warnings {
        println!("  ⚠ {}", warning);
    }
    Ok(())
}

fn cmd_fluids(query: Option<&str>) -> AppResult<()> {
    let query = query.unwrap_or("");
    let entries: Vec<_> = fluid_table()
        .iter()
        .filter(|entry| entry.matches_query(query))
        .collect();
    if entries.is_empty() {
        println!("No fluids match '{}'", query);
        return Ok(());
    }

    println!("Fluids:");
    for entry in entries {
        println!(
            "  {:<8} {:<28} {:>6.2} lb/ft³ {:>6.2} cP",
            entry.canonical_id, entry.display_name, entry.density_lb_ft3, entry.viscosity_cp
        );
    }
    Ok(())
}

fn print_segment(name: &str, flow: &FlowSpec, sizing: &SizingResult) {
    println!(
        "  {:<14} {:>7.2} MW {:>9.0} gpm  {:<16} {:>6.2} ft/s {:>7.3} psi/100 ft",
        name,
        flow.cooling_load_mw(),
        flow.gpm(),
        sizing.entry.label,
        sizing.velocity_fps(),
        sizing.dp_psi_per_100ft()
    );
    for warning in &sizing.warnings {
        println!("    ⚠ {}", warning);
    }
}

fn print_outcome(outcome: &StudyOutcome) {
    println!("✓ {}", outcome.name);
    println!(
        "  Fluid: {}, ΔT {:.1} °F, {} catalog sizes",
        outcome.fluid, outcome.delta_t_f, outcome.catalog_len
    );
    println!();
    println!("Pipes:");
    print_segment("main", &outcome.main.flow, &outcome.main.sizing);
    if let (Some(ft), Some(dp)) = (outcome.run_length_ft, outcome.main_run_dp_psi()) {
        println!("    {:.0} ft run: {:.2} psi", ft, dp);
    }

    if let Some(risers) = &outcome.risers {
        let SegmentOutcome { flow, sizing } = &risers.riser;
        print_segment(&format!("riser x{}", risers.count), flow, sizing);
    }

    if let Some(layout) = &outcome.layout {
        for riser in &layout.risers {
            print_segment(
                &format!("riser {} ({})", riser.column.column, riser.column.hall_count),
                &riser.flow,
                &riser.sizing,
            );
        }
        for branch in &layout.branches {
            print_segment(&format!("hall {}", branch.name), &branch.flow, &branch.sizing);
        }
    }

    println!();
    println!(
        "Chillers ({}, {}, ≤ {} units):",
        outcome.criteria.redundancy, outcome.criteria.strategy, outcome.criteria.max_units
    );
    match &outcome.chillers {
        ChillerOutcome::Selected(top) => print_chillers(top),
        ChillerOutcome::Infeasible(e) => println!("  ⚠ {}", e),
        ChillerOutcome::Skipped => println!("  No cooling load, selection skipped"),
    }
}

fn print_chillers(top: &[ChillerCandidate]) {
    for (rank, c) in top.iter().enumerate() {
        println!(
            "  {}. {} × {} ({} operating + {} spare), {:.0} tons installed, {:.1}% loaded",
            rank + 1,
            c.total_count,
            c.model.name,
            c.operating_count,
            c.spare_count,
            c.installed_tons(),
            c.loading_pct
        );
        println!(
            "     install ${:.0}, energy ${:.0}/yr, 10-yr TCO ${:.0} (${:.0}/MW)",
            c.costs.installation_cost,
            c.costs.annual_energy_cost,
            c.costs.ten_year_tco,
            c.costs.tco_per_mw
        );
    }
}
