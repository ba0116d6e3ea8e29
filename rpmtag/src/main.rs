// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::HttpServer;
use actix_web::rt::System;
use log::{LevelFilter, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use rpmtag::api::TokenSource;
use rpmtag::api::auth::API_TOKEN_ENV;
use rpmtag::app_state::{APP_NAME, AppState};
use rpmtag::catalog::RepoCatalog;
use rpmtag::config::{CONFIG_PATH_ENV, Config, resolve_config_path};
use rpmtag::routes::{self, RouteContext};
use rpmtag::tags::{CommandGenerator, MetadataGenerator};
use rpmtag::util::log_level_changer::{default_rules, init_logger};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -c <config> to choose the configuration file.");
            return 1;
        }
    };

    if parsed_args.help {
        print!("{}", help_text());
        return 0;
    }

    let config_path = resolve_config_path(parsed_args.config_path);
    let config = match Config::load_and_validate(&config_path) {
        Ok(config) => config,
        Err(error) => {
            eprintln!(
                "❌ Failed to load configuration from {}: {}",
                config_path.display(),
                error
            );
            return 1;
        }
    };

    if let Err(error) = init_logging(&config) {
        eprintln!("❌ Failed to initialize logger: {}", error);
        return 1;
    }
    info!("Configuration loaded from {}", config_path.display());

    match System::new().block_on(run_server(config)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

fn init_logging(config: &Config) -> Result<(), log::SetLoggerError> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    let logger = env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build();

    init_logger(default_rules(), logger)
}

async fn run_server(config: Config) -> std::io::Result<()> {
    let catalog = Arc::new(RepoCatalog::from_config(&config));
    let generator: Arc<dyn MetadataGenerator> =
        Arc::new(CommandGenerator::from_config(&config.metadata));
    let tokens = TokenSource::Environment;

    log_startup_info(&config, &catalog, &tokens);

    let context = RouteContext {
        state: Arc::new(AppState::new(catalog, generator)),
        tokens,
        assets_dir: PathBuf::from(&config.assets_dir),
    };
    let request_timeout_seconds = config.server.request_timeout_seconds;

    HttpServer::new(move || routes::build_app(context.clone(), request_timeout_seconds))
        .workers(config.server.workers)
        .bind(config.server.address_tuple())?
        .run()
        .await
}

fn log_startup_info(config: &Config, catalog: &RepoCatalog, tokens: &TokenSource) {
    info!("Starting {}", APP_NAME);
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on {}:{} (request timeout {}s)",
        config.server.host, config.server.port, config.server.request_timeout_seconds
    );

    for repo in catalog.repositories() {
        let sources: Vec<String> = repo
            .source_dirs
            .iter()
            .map(|dir| dir.display().to_string())
            .collect();
        info!(
            "Repository '{}': tags in {}, sources [{}]",
            repo.id,
            repo.tags_dir.display(),
            sources.join(", ")
        );
    }

    info!("Metadata command: {} {}", config.metadata.command, config.metadata.args.join(" "));
    info!("Assets directory: {}", config.assets_dir);

    if tokens.uses_default() {
        warn!(
            "{} is not set; create-tag accepts the default token",
            API_TOKEN_ENV
        );
    }

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {}", current_dir.display());
    }
}

fn help_text() -> String {
    format!(
        "Usage: rpmtag [-c <config>] [-h|--help]\n\n\
         Options:\n  \
         -c, --config <path>  Configuration file (default: ${} or repo_config.yaml)\n  \
         -h, --help           Show this help\n\n\
         Environment:\n  \
         {}  Bearer token required by POST /api/create-tag\n  \
         RUST_LOG       Additional log filter directives\n",
        CONFIG_PATH_ENV, API_TOKEN_ENV
    )
}

#[derive(Debug)]
struct ParsedArgs {
    config_path: Option<PathBuf>,
    help: bool,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            config_path: None,
            help: true,
        });
    }

    let mut args = args.into_iter();
    let mut config_path = None;

    while let Some(arg) = args.next() {
        if arg == "--" {
            continue;
        } else if arg == "-c" || arg == "--config" {
            let value = args
                .next()
                .ok_or_else(|| format!("Missing value for {}", arg))?;
            config_path = Some(PathBuf::from(value));
        } else {
            return Err(format!("Unexpected argument '{}'", arg));
        }
    }

    Ok(ParsedArgs {
        config_path,
        help: false,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

#[cfg(test)]
mod tests {
    use super::{help_text, parse_args_from};
    use std::path::PathBuf;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parse_args_defaults_to_environment_config() {
        let parsed = parse_args_from(Vec::new()).expect("parse args");
        assert!(!parsed.help);
        assert!(parsed.config_path.is_none());
    }

    #[test]
    fn parse_args_accepts_config_flag() {
        let parsed = parse_args_from(args(&["-c", "/etc/rpmtag.yaml"])).expect("parse args");
        assert_eq!(parsed.config_path, Some(PathBuf::from("/etc/rpmtag.yaml")));

        let parsed = parse_args_from(args(&["--config", "local.yaml"])).expect("parse args");
        assert_eq!(parsed.config_path, Some(PathBuf::from("local.yaml")));
    }

    #[test]
    fn parse_args_requires_config_value() {
        let error = parse_args_from(args(&["-c"])).unwrap_err();
        assert!(error.contains("Missing value"));
    }

    #[test]
    fn parse_args_rejects_unknown_arguments() {
        assert!(parse_args_from(args(&["serve"])).is_err());
    }

    #[test]
    fn parse_args_accepts_help_flag() {
        let parsed = parse_args_from(args(&["-c", "x.yaml", "--help"])).expect("parse args");
        assert!(parsed.help);
    }

    #[test]
    fn help_mentions_token_variable() {
        assert!(help_text().contains("RPM_API_TOKEN"));
    }
}
