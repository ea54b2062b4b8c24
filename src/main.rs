mod app;
mod catalog;
mod error;
mod metadata;
mod model;
mod resolver;
mod upstream;

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::CliCommand;
use crate::upstream::HttpUpstreamClient;

const REPO_ROOT_ENV: &str = "SPRING_DEPS_CLI_REPO_ROOT";

#[derive(Parser)]
#[command(name = "spring-deps-cli")]
#[command(about = "CLI для просмотра каталога Spring-зависимостей и версий Maven-артефактов")]
struct Cli {
    /// Корень локального Maven-репозитория для fallback-поиска версий.
    #[arg(long, global = true)]
    repo_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Показывает полный каталог зависимостей в формате JSON.
    Catalog,

    /// Фильтрует каталог по подстроке artifactId или описания (без учёта регистра).
    Search { query: String },

    /// Показывает известные версии артефакта, новые первыми.
    Versions {
        group_id: String,
        artifact_id: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run_main() {
        eprintln!("Ошибка: {error:#}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<()> {
    let cli = Cli::parse();
    let upstream = HttpUpstreamClient::new()?;
    let repo_root = match cli.repo_root {
        Some(path) => path,
        None => default_repo_root()?,
    };

    let command = match cli.command {
        Commands::Catalog => CliCommand::Catalog,
        Commands::Search { query } => CliCommand::Search { query },
        Commands::Versions {
            group_id,
            artifact_id,
        } => CliCommand::Versions {
            group_id,
            artifact_id,
        },
    };

    app::run(&upstream, &repo_root, command)
}

fn default_repo_root() -> Result<PathBuf> {
    if let Ok(override_root) = env::var(REPO_ROOT_ENV) {
        if !override_root.trim().is_empty() {
            return Ok(PathBuf::from(override_root));
        }
    }

    let home = env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| anyhow!("Не удалось определить HOME для локального Maven-репозитория"))?;
    Ok(home.join(".m2").join("repository"))
}
