use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::metadata;
use crate::upstream::UpstreamClient;

pub const METADATA_FILE: &str = "maven-metadata.xml";

/// Итог одного яруса. `Found` окончателен даже с пустым списком;
/// `Unavailable` передаёт управление следующему ярусу.
enum Resolution {
    Found(Vec<String>),
    Unavailable,
}

/// Разрешает версии артефакта по упорядоченной цепочке ярусов: сначала
/// Maven Central, затем локальный Maven-репозиторий.
pub struct VersionResolver<'a> {
    upstream: &'a dyn UpstreamClient,
    local_repo_root: PathBuf,
}

impl<'a> VersionResolver<'a> {
    pub fn new(upstream: &'a dyn UpstreamClient, local_repo_root: PathBuf) -> Self {
        Self {
            upstream,
            local_repo_root,
        }
    }

    /// Поиск по принципу best-effort: никогда не возвращает ошибку. Сбои
    /// ярусов логируются и гасятся; если недоступны оба яруса, результат
    /// пуст и неотличим от артефакта без известных версий. Списки версий
    /// всегда упорядочены от новых к старым.
    pub fn resolve_versions(&self, group_id: &str, artifact_id: &str) -> Vec<String> {
        let tiers: [fn(&Self, &str, &str) -> Resolution; 2] =
            [Self::registry_versions, Self::local_versions];

        for tier in tiers {
            if let Resolution::Found(versions) = tier(self, group_id, artifact_id) {
                return versions;
            }
        }

        Vec::new()
    }

    fn registry_versions(&self, group_id: &str, artifact_id: &str) -> Resolution {
        let response = match self.upstream.search_versions(group_id, artifact_id) {
            Ok(response) => response,
            Err(err) => {
                warn!(group_id, artifact_id, "поиск версий в Maven Central не удался: {err}");
                return Resolution::Unavailable;
            }
        };

        let status = response.response_header.status;
        if status != 0 {
            warn!(group_id, artifact_id, status, "Maven Central вернул неуспешный статус");
            return Resolution::Unavailable;
        }

        // Реестр отдаёт строки от старых к новым; пустой список строк — тоже
        // окончательный ответ и не ведёт к локальному ярусу.
        let mut versions: Vec<String> =
            response.response.docs.into_iter().map(|doc| doc.v).collect();
        versions.reverse();
        Resolution::Found(versions)
    }

    fn local_versions(&self, group_id: &str, artifact_id: &str) -> Resolution {
        let metadata_path = self.metadata_path(group_id, artifact_id);
        if !metadata_path.exists() {
            return Resolution::Found(Vec::new());
        }

        let document = match fs::read_to_string(&metadata_path) {
            Ok(document) => document,
            Err(err) => {
                warn!(
                    path = %metadata_path.display(),
                    "не удалось прочитать локальные метаданные: {err}"
                );
                return Resolution::Unavailable;
            }
        };

        let mut versions = match metadata::extract_versions(&document) {
            Ok(versions) => versions,
            Err(err) => {
                warn!(
                    path = %metadata_path.display(),
                    "не удалось разобрать локальные метаданные: {err:#}"
                );
                return Resolution::Unavailable;
            }
        };

        versions.reverse();
        Resolution::Found(versions)
    }

    fn metadata_path(&self, group_id: &str, artifact_id: &str) -> PathBuf {
        let mut path = self.local_repo_root.clone();
        for segment in group_id.split('.') {
            path.push(segment);
        }
        path.push(artifact_id);
        path.push(METADATA_FILE);
        path
    }
}
