use std::path::PathBuf;

use clap::Parser;

/// Generate synthetic hourly bike-share station history.
///
/// Writes one CSV row per station and hour to stdout
/// (`station_id,station_name,timestamp,entries,exits`).
#[derive(Parser, Debug)]
#[command(name = "bikeshare-sim", version, about, long_about = None)]
pub struct Args {
    /// Scenario identifier (`<scenarios-dir>/<scenario>.json`)
    pub scenario: String,

    /// Whole days of history to generate, ending with the current UTC day
    #[arg(value_parser = parse_days)]
    pub days: u32,

    /// Random seed for reproducible output. When omitted, every run differs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding scenario documents
    #[arg(long, value_name = "DIR")]
    pub scenarios_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the aggregated per-station report as JSON instead of CSV
    #[arg(long)]
    pub json: bool,

    /// Write the CSV to this file instead of stdout
    #[arg(long, short, value_name = "PATH", conflicts_with = "json")]
    pub output: Option<PathBuf>,
}

fn parse_days(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<i64>() {
        Ok(days) if days >= 1 => {
            u32::try_from(days).map_err(|_| format!("days value {days} is too large"))
        }
        Ok(_) => Err("days must be a positive integer".to_string()),
        Err(_) => Err(format!("days must be a positive integer, got \"{raw}\"")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("bikeshare-sim").chain(args.iter().copied()))
    }

    #[test]
    fn positional_scenario_and_days() {
        let args = parse(&["centro", "7"]).expect("parse should succeed");
        assert_eq!(args.scenario, "centro");
        assert_eq!(args.days, 7);
        assert!(args.seed.is_none());
        assert!(!args.json);
    }

    #[test]
    fn optional_flags() {
        let args = parse(&["centro", "2", "--seed", "9", "--json", "--scenarios-dir", "/tmp/s"])
            .expect("parse should succeed");
        assert_eq!(args.seed, Some(9));
        assert!(args.json);
        assert_eq!(args.scenarios_dir, Some(PathBuf::from("/tmp/s")));
    }

    #[test]
    fn output_file_conflicts_with_json() {
        let args = parse(&["centro", "2", "-o", "flows.csv"]).expect("parse should succeed");
        assert_eq!(args.output, Some(PathBuf::from("flows.csv")));
        assert!(parse(&["centro", "2", "--json", "--output", "flows.csv"]).is_err());
    }

    #[test]
    fn missing_days_rejected() {
        assert!(parse(&["centro"]).is_err());
    }

    #[test]
    fn non_positive_days_rejected() {
        assert!(parse(&["centro", "0"]).is_err());
        assert!(parse(&["centro", "-3"]).is_err());
        assert!(parse(&["centro", "1.5"]).is_err());
        assert!(parse(&["centro", "abc"]).is_err());
    }
}
