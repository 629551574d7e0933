use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::{GapAnalyzer, Pipeline, StationAssigner};
use crate::readers::ConcurrentReader;
use crate::utils::progress::ProgressReporter;
use crate::utils::{generate_default_assignments_filename, generate_default_series_filename};
use crate::writers::{self, CsvWriter, ParquetWriter};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const NO_OUTPUT: &str = "no output produced";

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Reconstruct {
            observations,
            comunas,
            output,
            assignments_output,
            method,
            start_year,
            end_year,
            compression,
            config,
            max_workers,
        } => {
            let config = PipelineConfig::load(config.as_deref())?
                .with_years(start_year, end_year)
                .with_method(method);
            config.validate_all()?;

            report(quiet, &format!("Observations: {}", observations.display()));
            report(quiet, &format!("Comunas: {}", comunas.display()));
            report(
                quiet,
                &format!(
                    "Region {}, years {}..{}, method {}",
                    config.region_code,
                    config.start_year,
                    config.end_year,
                    config.reconstruction_method()
                ),
            );

            let progress = ProgressReporter::new_spinner("Loading inputs...", quiet);
            let inputs = ConcurrentReader::new(config.region_code)
                .read_inputs(&observations, &comunas, &config)
                .await?;

            let Some(dataset) = inputs.dataset else {
                progress.finish_with_message("No observations in range");
                report(quiet, NO_OUTPUT);
                return Ok(());
            };

            let pipeline = Pipeline::new(config).with_max_workers(max_workers);
            let Some(result) = pipeline.run(&dataset, &inputs.comunas, Some(&progress))? else {
                report(quiet, NO_OUTPUT);
                return Ok(());
            };

            let analyzer = GapAnalyzer::new();
            report(quiet, &format!("\n{}", analyzer.generate_summary(&result.report)));
            report(quiet, &analyzer.summarize_comparison(&result.comparison));

            let output = output.unwrap_or_else(generate_default_series_filename);
            create_parent_dir(&output)?;
            report(
                quiet,
                &format!(
                    "Writing {} rows to {}",
                    result.series.len(),
                    output.display()
                ),
            );
            writers::write_series(result.series.records(), &output, &compression)?;

            if writers::is_parquet_path(&output) {
                let file_info = ParquetWriter::new().get_file_info(&output)?;
                report(quiet, &format!("\n{}", file_info.summary()));
            }

            if let Some(path) = assignments_output {
                create_parent_dir(&path)?;
                CsvWriter::new().write_assignments(&result.assignments, &path)?;
                report(
                    quiet,
                    &format!("Wrote {} assignments to {}", result.assignments.len(), path.display()),
                );
            }

            info!("Reconstruction complete");
        }

        Commands::Assign {
            stations,
            comunas,
            output,
            config,
        } => {
            let config = PipelineConfig::load(config.as_deref())?;

            let inputs = ConcurrentReader::new(config.region_code)
                .read_assignment_inputs(&stations, &comunas)
                .await?;

            if inputs.comunas.is_empty() {
                report(quiet, NO_OUTPUT);
                return Ok(());
            }

            let assignments =
                StationAssigner::from_config(&config)?.assign(&inputs.comunas, &inputs.stations)?;

            let output = output.unwrap_or_else(generate_default_assignments_filename);
            create_parent_dir(&output)?;
            CsvWriter::new().write_assignments(&assignments, &output)?;

            for assignment in &assignments {
                report(
                    quiet,
                    &format!(
                        "{:<24} {:<32} {:>8.2} km",
                        assignment.comuna, assignment.station_name, assignment.distance_km
                    ),
                );
            }
            report(
                quiet,
                &format!("Wrote {} assignments to {}", assignments.len(), output.display()),
            );
        }

        Commands::Gaps {
            observations,
            comunas,
            start_year,
            end_year,
            top,
            config,
        } => {
            let config = PipelineConfig::load(config.as_deref())?.with_years(start_year, end_year);
            config.validate_all()?;

            let inputs = ConcurrentReader::new(config.region_code)
                .read_inputs(&observations, &comunas, &config)
                .await?;

            let Some(dataset) = inputs.dataset else {
                report(quiet, NO_OUTPUT);
                return Ok(());
            };

            let progress = ProgressReporter::new_spinner("Materializing series...", quiet);
            let prepared = Pipeline::new(config).prepare(&dataset, &inputs.comunas, Some(&progress))?;
            progress.finish_with_message("Materialization complete");

            match prepared {
                Some(prepared) => {
                    let analyzer = GapAnalyzer::new().with_max_listed_gaps(top);
                    let gap_report = analyzer.analyze(&prepared.series);
                    println!("{}", analyzer.generate_summary(&gap_report));
                }
                None => report(quiet, NO_OUTPUT),
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let result = match log_file {
        Some(path) => {
            create_parent_dir(path)?;
            let file = File::create(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_target(false)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    result.map_err(|e| ProcessingError::Config(format!("Failed to initialize logging: {}", e)))
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn report(quiet: bool, message: &str) {
    if !quiet {
        println!("{}", message);
    }
}

