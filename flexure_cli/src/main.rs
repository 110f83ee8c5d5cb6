//! # Flexura CLI
//!
//! Command-line front end for `flexure_core`.
//!
//! ```text
//! flexure demo                     run the reference beams
//! flexure analyze deck.flx --json  analyze every item in a project
//! flexure curve strand270 -n 20    sample a stress-strain curve
//! flexure catalog                  list built-in steel types
//! flexure init deck.flx            write a sample project
//! ```
//!
//! Set `RUST_LOG` (or pass `--verbose`) for solver diagnostics.

use std::path::{Path, PathBuf};
use std::process;

use flexure_core::calculations::{analyze, AnalysisResult, CalculationItem, FlexureInput, LayerInput, SteelLayer};
use flexure_core::errors::{CalcError, CalcResult};
use flexure_core::file_io::{load_project, save_project, FileLock};
use flexure_core::materials::{SteelCatalog, SteelCategory, GRADE_60_ID, STRAND_270_ID};
use flexure_core::project::{AnalysisSettings, Project};
use flexure_core::sections::{Section, SectionGeometry};
use flexure_core::units::{KipFt, KipIn};
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "flexure",
    about = "Flexural strength of reinforced and prestressed concrete sections (ACI 318-19)"
)]
struct Options {
    /// Log solver progress (same as RUST_LOG=debug)
    #[structopt(short, long, global = true)]
    verbose: bool,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Analyze the reference mild-steel and prestressed beams
    Demo,

    /// Analyze every item in a project file
    Analyze {
        #[structopt(parse(from_os_str))]
        file: PathBuf,

        /// Print full results as JSON
        #[structopt(long)]
        json: bool,
    },

    /// Print the stress-strain curve of a catalog steel
    Curve {
        steel_id: String,

        /// Number of sample points (defaults to the project setting)
        #[structopt(short = "n", long)]
        points: Option<usize>,
    },

    /// List the built-in steel types
    Catalog,

    /// Write a sample project file
    Init {
        #[structopt(parse(from_os_str))]
        file: PathBuf,

        /// User recorded in the lock file
        #[structopt(long, default_value = "flexure-cli")]
        user: String,

        /// Replace an existing file
        #[structopt(long)]
        force: bool,
    },
}

fn main() {
    let options = Options::from_args();

    let level = if options.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let outcome = match options.command {
        Command::Demo => run_demo(),
        Command::Analyze { file, json } => run_analyze(&file, json),
        Command::Curve { steel_id, points } => run_curve(&steel_id, points),
        Command::Catalog => run_catalog(),
        Command::Init { file, user, force } => run_init(&file, &user, force),
    };

    if let Err(e) = outcome {
        report_error(&e);
        process::exit(1);
    }
}

fn run_demo() -> CalcResult<()> {
    let catalog = SteelCatalog::builtin();
    let section = Section::new(6.0, SectionGeometry::Rectangular { bw_in: 12.0, h_in: 24.0 });

    let mild = vec![SteelLayer::mild(catalog.get(GRADE_60_ID)?, 1.53, 20.0)];
    print_result("Grade 60 bars, 12x24 rectangle", &analyze(&section, &mild)?);

    let strand = vec![SteelLayer::new(catalog.get(STRAND_270_ID)?, 1.53, 20.0, 170.0)];
    print_result("Grade 270 strand, 12x24 rectangle", &analyze(&section, &strand)?);
    Ok(())
}

fn run_analyze(path: &Path, json: bool) -> CalcResult<()> {
    let project = load_project(path)?;
    log::info!("loaded {} ({} items)", path.display(), project.item_count());

    let mut failures = 0;
    for (_, label, outcome) in project.analyze_all(SteelCatalog::builtin()) {
        match outcome {
            Ok(result) if json => match serde_json::to_string_pretty(&result) {
                Ok(text) => println!("{}", text),
                Err(e) => return Err(CalcError::serialization(e)),
            },
            Ok(result) => print_result(&label, &result),
            Err(e) => {
                failures += 1;
                eprintln!("{}: analysis failed", label);
                report_error(&e);
            }
        }
    }

    if failures > 0 {
        return Err(CalcError::calculation_failed(
            "Flexure",
            format!("{} of {} items failed", failures, project.item_count()),
        ));
    }
    Ok(())
}

fn run_curve(steel_id: &str, points: Option<usize>) -> CalcResult<()> {
    let steel = SteelCatalog::builtin().get(steel_id)?;
    let n = points.unwrap_or_else(|| AnalysisSettings::default().curve_points);

    println!("{} ({})", steel.name, steel.id);
    println!("{:>12}  {:>10}", "strain", "fs (ksi)");
    for p in steel.curve(n) {
        println!("{:>12.6}  {:>10.2}", p.strain, p.stress_ksi);
    }
    Ok(())
}

fn run_catalog() -> CalcResult<()> {
    let catalog = SteelCatalog::builtin();
    for category in [SteelCategory::Mild, SteelCategory::Prestressing] {
        println!("{}:", category.display_name());
        for s in catalog.by_category(category) {
            println!(
                "  {:<10} {:<48} Es = {:>5.0}  fpy = {:>5.1}  fpu = {:>5.1} ksi",
                s.id, s.name, s.es_ksi, s.fpy_ksi, s.fpu_ksi
            );
        }
    }
    Ok(())
}

fn run_init(path: &Path, user: &str, force: bool) -> CalcResult<()> {
    let project = write_sample_project(path, user, force)?;
    println!("Wrote {} ({} items)", path.display(), project.item_count());
    Ok(())
}

/// Save the sample project to `path` under a file lock.
///
/// An existing file is left untouched unless `force` is set.
fn write_sample_project(path: &Path, user: &str, force: bool) -> CalcResult<Project> {
    let lock = FileLock::acquire(path, user)?;
    if path.exists() && !force {
        return Err(CalcError::invalid_input(
            "file",
            path.display().to_string(),
            "File already exists; pass --force to overwrite",
        ));
    }

    let project = sample_project(user);
    save_project(&project, lock.project_path())?;
    Ok(project)
}

fn sample_project(user: &str) -> Project {
    let mut project = Project::new(user, "SAMPLE", "");
    let rect = Section::new(6.0, SectionGeometry::Rectangular { bw_in: 12.0, h_in: 24.0 });
    project.add_item(CalculationItem::Flexure(
        FlexureInput::new("B-1 mild", rect.clone()).with_layer(LayerInput::new(GRADE_60_ID, 1.53, 20.0)),
    ));
    project.add_item(CalculationItem::Flexure(
        FlexureInput::new("B-2 prestressed", rect).with_layer(LayerInput::new(STRAND_270_ID, 1.53, 20.0)),
    ));
    project.add_item(CalculationItem::Flexure(
        FlexureInput::new(
            "DT-1",
            Section::new(
                5.0,
                SectionGeometry::DoubleTee {
                    bf_in: 96.0,
                    hf_in: 2.0,
                    num_stems: 2,
                    stem_width_in: 5.75,
                    h_in: 24.0,
                },
            ),
        )
        .with_layer(LayerInput::new(STRAND_270_ID, 1.224, 21.0).with_fse(165.0)),
    ));
    project
}

fn print_result(label: &str, r: &AnalysisResult) {
    println!("═══════════════════════════════════════");
    println!("  {}", label);
    println!("═══════════════════════════════════════");
    println!("Neutral axis:");
    println!("  c  = {:.3} in   a = {:.3} in   β1 = {:.3}", r.c_in, r.a_in, r.beta1);
    println!("  Cc = {:.2} kips at {:.3} in ({} iterations)", r.cc_kips, r.cc_centroid_in, r.iterations);
    println!();
    println!("Layers:");
    for (i, l) in r.layers.iter().enumerate() {
        println!(
            "  {}: {:<10} d = {:>6.2} in  ε = {:>9.5}  fs = {:>7.2} ksi  F = {:>8.2} kips",
            i + 1,
            l.layer.steel.id,
            l.layer.depth_in,
            l.strain,
            l.stress_ksi,
            l.force_kips
        );
    }
    println!();
    println!("Strength:");
    println!("  Mn  = {:.1} kip-ft", r.mn_kip_ft);
    println!("  φ   = {:.3} ({}, εt = {:.5}, c/dt = {:.3})", r.phi, r.ductility, r.epsilon_t, r.c_over_d);
    println!("  φMn = {:.1} kip-ft", r.phi_mn_kip_ft);
    if let Some(c) = &r.cracking {
        println!(
            "  1.2·Mcr = {:.1} kip-ft  {}",
            KipFt::from(KipIn(c.min_strength_kip_in)).0,
            status_icon(c.passes_min_strength)
        );
    }
    println!("  RESULT: {}", if r.passes() { "PASS" } else { "FAIL" });
    println!();
}

fn report_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
