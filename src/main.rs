use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};
use polarize::{fold_twa, PointOfSail, PolarTable, ReferenceTable, POLAR_TABLE_FILE};

use std::error::Error;

// Command line parsing {{{1
//
#[derive(Parser)]
#[command(version)]
#[command(about = "Sailing polar table generator", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, global = true)]
    #[arg(help = "Show debug logging")]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    Generate {
        #[arg(short, long)]
        #[arg(help = "Filename to save the table to [default: polarTable.json]")]
        to: Option<String>,

        #[arg(short, long)]
        #[arg(help = "Show table report after generating")]
        report: bool,
    },

    Lookup {
        #[arg(long)]
        #[arg(help = "True wind speed (kn)")]
        tws: u32,

        #[arg(long)]
        #[arg(help = "True wind angle (degrees, port angles are folded)")]
        twa: u32,

        #[arg(short, long)]
        #[arg(help = "Saved polar table to read instead of the built-in boat")]
        from: Option<String>,
    },

    Report {
        file: String
    },
}

// Generate and Lookup {{{1
//
/// Build the table from the built-in reference data and save it.
///
fn generate(to: Option<String>, report: bool) -> Result<(), Box<dyn Error>> {
    let to = to.unwrap_or(POLAR_TABLE_FILE.into());

    let table = PolarTable::build(&ReferenceTable::default());
    table.save(&to)?;

    if report { println!("{}\n", table.report()); }
    println!("Polar table generated and saved to {}.", to);

    Ok(())
}

/// Print boat speed and point of sail at one wind speed and angle.
///
fn lookup(tws: u32, twa: u32, from: Option<String>) -> Result<(), Box<dyn Error>> {
    let reference = ReferenceTable::default();

    // Beat and gybe angles come from the closest sampled wind speed
    let (table, beat, gybe) = match from {
        Some(file) => {
            let table = PolarTable::load(file)?;
            let gybe = table.gybe_angle_near(tws);
            (table, None, gybe)
        },
        None => (
            PolarTable::build(&reference),
            reference.beat_angle_near(tws as f64),
            reference.gybe_angle_near(tws as f64),
        ),
    };

    let folded = fold_twa(twa as f64) as u32;
    debug!("twa {} folded to {}", twa, folded);

    match table.speed(tws, folded) {
        Some(speed) => println!("{:.2} kn", speed),
        None => println!("no data"),
    }

    match PointOfSail::classify(twa as f64, beat, gybe) {
        Some(pos) => println!("{}", pos),
        None => println!("head to wind"),
    }

    Ok(())
}

// Main {{{1
//
fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.debug { LevelFilter::Debug } else { LevelFilter::Warn })
        .parse_default_env()
        .init();

    match cli.command {
        Some(Commands::Generate { to, report }) => generate(to, report),

        Some(Commands::Lookup { tws, twa, from }) => lookup(tws, twa, from),

        Some(Commands::Report { file }) => {
            let table = PolarTable::load(file)?;
            println!("{}", table.report());

            Ok(())
        },

        // No subcommand means generate to the default file
        None => generate(None, false),
    }
}

// Testing {{{1
//
#[test]
fn verify_cli() {
    use clap::CommandFactory;

    Cli::command().debug_assert();
}
