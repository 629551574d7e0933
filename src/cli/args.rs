use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "comuna-temps")]
#[command(about = "Reconstructs daily mean temperature series for every comuna of a region")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only print warnings and errors")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assign comunas to stations, materialize their series and fill the gaps
    Reconstruct {
        #[arg(long, help = "Observation CSV export")]
        observations: PathBuf,

        #[arg(long, help = "Comuna geometry JSON")]
        comunas: PathBuf,

        #[arg(
            short,
            long,
            help = "Output series file, .csv or .parquet [default: output/temperaturas-comunas-{YYMMDD}.csv]"
        )]
        output: Option<PathBuf>,

        #[arg(long, help = "Also write the comuna to station assignment table")]
        assignments_output: Option<PathBuf>,

        #[arg(short, long, help = "Reconstruction method: linear, seasonal or knn")]
        method: Option<String>,

        #[arg(long, help = "First year to include")]
        start_year: Option<i32>,

        #[arg(long, help = "Year at which the range stops (exclusive)")]
        end_year: Option<i32>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, help = "TOML configuration file")]
        config: Option<PathBuf>,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Write the nearest station of every comuna
    Assign {
        #[arg(long, help = "Station directory CSV")]
        stations: PathBuf,

        #[arg(long, help = "Comuna geometry JSON")]
        comunas: PathBuf,

        #[arg(
            short,
            long,
            help = "Output CSV [default: output/asignaciones-{YYMMDD}.csv]"
        )]
        output: Option<PathBuf>,

        #[arg(long, help = "TOML configuration file")]
        config: Option<PathBuf>,
    },

    /// Report the gaps of the materialized series without filling them
    Gaps {
        #[arg(long, help = "Observation CSV export")]
        observations: PathBuf,

        #[arg(long, help = "Comuna geometry JSON")]
        comunas: PathBuf,

        #[arg(long)]
        start_year: Option<i32>,

        #[arg(long)]
        end_year: Option<i32>,

        #[arg(long, default_value = "10", help = "Number of longest gaps to list")]
        top: usize,

        #[arg(long, help = "TOML configuration file")]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reconstruct() {
        let cli = Cli::parse_from([
            "comuna-temps",
            "--verbose",
            "reconstruct",
            "--observations",
            "obs.csv",
            "--comunas",
            "comunas.json",
            "--method",
            "seasonal",
            "--start-year",
            "2020",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Reconstruct {
                method, start_year, end_year, compression, ..
            } => {
                assert_eq!(method.as_deref(), Some("seasonal"));
                assert_eq!(start_year, Some(2020));
                assert_eq!(end_year, None);
                assert_eq!(compression, "snappy");
            }
            _ => panic!("expected reconstruct"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "comuna-temps",
            "assign",
            "--stations",
            "s.csv",
            "--comunas",
            "c.json",
            "--quiet",
        ]);

        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Assign { .. }));
    }
}
