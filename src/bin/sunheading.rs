use std::process;

use clap::Parser;

use sunheading::logging;
use sunheading::{find_window, AstronomicalModel, CivilDate, Observer, SearchConfig};

/// Find the days on which the Sun rises or sets along a compass heading.
#[derive(Parser)]
#[command(name = "sunheading", version, about = "Sunrise/sunset heading finder")]
struct Cli {
    /// Target azimuth, degrees clockwise from north.
    #[arg(allow_negative_numbers = true)]
    heading: f64,

    /// First day to search (YYYY-MM-DD).
    begin: CivilDate,

    /// Last day to search, inclusive (YYYY-MM-DD).
    end: CivilDate,

    /// Observer latitude in degrees, north positive.
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Observer longitude in degrees, east positive.
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Search sunrises instead of sunsets.
    #[arg(long)]
    rise: bool,

    /// Accepted heading error in degrees.
    #[arg(long, default_value_t = 0.5)]
    tolerance: f64,

    /// Samples per half-day window.
    #[arg(long, default_value_t = 100)]
    samples: usize,

    /// Print the events as a JSON array.
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    logging::init_with_verbosity(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let model = AstronomicalModel::new()?;
    let observer = Observer {
        latitude_deg: cli.lat,
        longitude_deg: cli.lon,
    };
    let config = SearchConfig {
        rise: cli.rise,
        tolerance_deg: cli.tolerance,
        sample_count: cli.samples,
    };

    let events = find_window(&model, cli.heading, &cli.begin, &cli.end, &observer, &config)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        for event in &events {
            println!("{event}");
        }
    }
    Ok(())
}
