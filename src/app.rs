use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::catalog::CatalogCache;
use crate::resolver::VersionResolver;
use crate::upstream::UpstreamClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Catalog,
    Search {
        query: String,
    },
    Versions {
        group_id: String,
        artifact_id: String,
    },
}

pub fn run(
    upstream: &dyn UpstreamClient,
    local_repo_root: &Path,
    command: CliCommand,
) -> Result<()> {
    match command {
        CliCommand::Catalog => {
            let cache = CatalogCache::new(upstream);
            let snapshot = cache
                .catalog()
                .context("Не удалось получить каталог зависимостей")?;
            print_json(snapshot.as_slice())?;
        }
        CliCommand::Search { query } => {
            let cache = CatalogCache::new(upstream);
            let matches = cache
                .search(&query)
                .with_context(|| format!("Не удалось выполнить поиск по каталогу: '{query}'"))?;
            print_json(&matches)?;
        }
        CliCommand::Versions {
            group_id,
            artifact_id,
        } => {
            let resolver = VersionResolver::new(upstream, local_repo_root.to_path_buf());
            for version in resolver.resolve_versions(&group_id, &artifact_id) {
                println!("{version}");
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(value).context("Не удалось сериализовать результат в JSON")?;
    println!("{rendered}");
    Ok(())
}
