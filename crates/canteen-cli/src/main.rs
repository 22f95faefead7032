// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result};
use canteen_app::{AdminApi, AppState, Dashboard};
use canteen_testkit::FakeService;
use config::Config;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;

const DEMO_SEED: u64 = 2026;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `canteen --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let api: Arc<dyn AdminApi> = if options.demo {
        Arc::new(FakeService::demo(
            DEMO_SEED,
            OffsetDateTime::now_utc().date(),
        ))
    } else {
        let client = canteen_api::Client::new(config.base_url(), config.timeout()?)
            .with_context(|| {
                format!(
                    "invalid [api] config in {}; fix base_url/timeout values",
                    options.config_path.display()
                )
            })?
            .with_session_token(config.session_token());
        Arc::new(client)
    };
    if options.check_only {
        return Ok(());
    }

    logging::init(&config.log_file()?, config.log_level())?;
    info!(
        demo = options.demo,
        base_url = config.base_url(),
        "starting dashboard"
    );

    let mut state = AppState {
        active_tab: config.start_tab(),
        ..AppState::default()
    };
    let mut dashboard = Dashboard::new(config.analytics_period());
    canteen_tui::run_app(&mut state, &mut dashboard, api)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("canteen - menu rating admin dashboard");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch against seeded in-memory demo data");
    println!("  --check                  Validate config and API settings, then exit");
    println!("  --help                   Show this help");
}
