use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tb_cli::commands::{advise, check, solve};
use tb_cli::{Cli, Commands, Config, dataset};
use tb_llm::ConflictKind;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match &cli.command {
        Some(Commands::Solve {
            input,
            json,
            parallel,
            locks,
        }) => {
            let courses = dataset::load_courses(input).context("failed to load course dataset")?;
            solve::run(&courses, locks, *parallel || config.parallel, *json)?;
        }
        Some(Commands::Check { input }) => {
            let courses = dataset::load_courses(input).context("failed to load course dataset")?;
            check::run(&courses)?;
        }
        Some(Commands::Advise {
            input,
            exam_period,
            model,
        }) => {
            let courses = dataset::load_courses(input).context("failed to load course dataset")?;
            let kind = if *exam_period {
                ConflictKind::ExamPeriod
            } else {
                ConflictKind::Time
            };
            let model = model.as_deref().unwrap_or(&config.model);
            advise::run(&courses, kind, model)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
