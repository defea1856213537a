mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command, SettingsAction};
use resume_matcher_lib::core::errors::CoreError;
use resume_matcher_lib::core::models::MatcherSettings;
use resume_matcher_lib::core::service::MatchService;
use resume_matcher_lib::core::settings_store::SettingsStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            let user_error = err
                .downcast_ref::<CoreError>()
                .is_some_and(CoreError::is_user_error);
            if user_error {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "resume_matcher={default_level},resume_matcher_lib={default_level}"
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let store = match &cli.settings {
        Some(path) => SettingsStore::at(path),
        None => SettingsStore::new(),
    };

    match cli.command {
        Command::Match(args) => {
            let settings = args.apply(store.load().await?);
            let service = MatchService::new(settings).await?;
            let report = service
                .process_resume_file(&args.resume, &args.keywords)
                .await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", cli::render_report(&report));
            }

            // Only an unsupported document produces a report with errors.
            if report.errors.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(2))
            }
        }
        Command::Extract(args) => {
            let settings = args.apply(store.load().await?);
            let service = MatchService::new(settings).await?;
            let fields = service.extract_file(&args.resume).await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&fields)?);
            } else {
                print!("{}", cli::render_fields(&fields));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Settings { action } => {
            match action {
                SettingsAction::Show => {
                    let settings = store.load().await?;
                    println!("# {}", store.path().display());
                    println!("{}", serde_json::to_string_pretty(&settings)?);
                }
                SettingsAction::Init { force } => {
                    let exists = tokio::fs::try_exists(store.path()).await.unwrap_or(false);
                    if exists && !force {
                        anyhow::bail!(
                            "settings file {} already exists (use --force to overwrite)",
                            store.path().display()
                        );
                    }
                    store
                        .save(&MatcherSettings::default())
                        .await
                        .context("failed to write default settings")?;
                    println!("{}", store.path().display());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
