//! CLI tool for checking routing configuration requests.
//!
//! Provides commands for:
//! - Analyzing a parsed request (JSON) into a directive
//! - Resolving an endpoint address the way the analyzer does

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use routeconf_core::config::AnalyzerConfig;
use routeconf_core::{Analyzer, RequestSyntax};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the routeconf tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Analyzer configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a request and print the resulting directive as JSON
    Check {
        /// Request file in JSON form
        request: PathBuf,
    },
    /// Resolve a host:port endpoint without DNS
    Resolve {
        /// Address such as 10.0.0.5:5432 or [::1]:postgresql
        hostport: String,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AnalyzerConfig> {
    let mut config = match path {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    config.apply_env_overrides()?;
    Ok(config)
}

fn check(analyzer: &Analyzer, request: &Path) -> anyhow::Result<ExitCode> {
    let text = std::fs::read_to_string(request)
        .with_context(|| format!("read request file {}", request.display()))?;
    let req = RequestSyntax::from_json(&text)
        .with_context(|| format!("parse request file {}", request.display()))?;

    match analyzer.analyze(&req) {
        Ok(directive) => {
            println!("{}", serde_json::to_string_pretty(&directive)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}:{}", request.display(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(args.config.as_deref())?;
    tracing::debug!("Using analyzer config: {:?}", config);

    match args.command {
        Command::Check { request } => check(&Analyzer::new(&config), &request),
        Command::Resolve { hostport } => match config.build_resolver().resolve(&hostport) {
            Ok(addr) => {
                println!("{}", addr);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("{}", e);
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
