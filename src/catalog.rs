use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::UpstreamError;
use crate::model::{CatalogSnapshot, DependencyRecord};
use crate::upstream::{CatalogResponse, UpstreamClient};

const CATALOG_KEY: &str = "dependencies";

/// Кэш каталога зависимостей. Слот ключа заполняется только успешной
/// загрузкой, поэтому неудачный запрос повторяется при следующем обращении.
/// Мьютекс слота допускает не более одной загрузки на ключ одновременно.
pub struct CatalogCache<'a> {
    upstream: &'a dyn UpstreamClient,
    slots: Mutex<HashMap<String, Arc<Mutex<Option<CatalogSnapshot>>>>>,
}

impl<'a> CatalogCache<'a> {
    pub fn new(upstream: &'a dyn UpstreamClient) -> Self {
        Self {
            upstream,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> Result<CatalogSnapshot, UpstreamError> {
        self.entry(CATALOG_KEY)
    }

    /// Фильтрует каталог по подстроке artifactId или описания без учёта
    /// регистра. Пустой запрос возвращает весь каталог; порядок среза
    /// сохраняется, ранжирования нет.
    pub fn search(&self, query: &str) -> Result<Vec<DependencyRecord>, UpstreamError> {
        let snapshot = self.catalog()?;
        let needle = query.to_lowercase();

        let matches = snapshot
            .iter()
            .filter(|record| {
                record.artifact_id.to_lowercase().contains(&needle)
                    || record
                        .description
                        .as_deref()
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();

        Ok(matches)
    }

    fn entry(&self, key: &str) -> Result<CatalogSnapshot, UpstreamError> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|err| err.into_inner());
            Arc::clone(slots.entry(key.to_string()).or_default())
        };

        let mut cached = slot.lock().unwrap_or_else(|err| err.into_inner());
        if let Some(snapshot) = cached.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        debug!(key, "каталог ещё не закэширован, загружаем из источника");
        let response = self.upstream.fetch_catalog()?;
        let snapshot: CatalogSnapshot = Arc::new(project_catalog(response));
        *cached = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}

fn project_catalog(response: CatalogResponse) -> Vec<DependencyRecord> {
    response
        .dependencies
        .into_values()
        .map(|entry| DependencyRecord {
            group_id: entry.group_id,
            artifact_id: entry.artifact_id,
            version: entry.version,
            description: entry.description,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::CatalogCache;
    use crate::error::UpstreamError;
    use crate::upstream::{CatalogEntry, CatalogResponse, UpstreamClient, VersionSearchResponse};

    struct ScriptedUpstream {
        responses: Mutex<VecDeque<Result<CatalogResponse, UpstreamError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedUpstream {
        fn new(responses: Vec<Result<CatalogResponse, UpstreamError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl UpstreamClient for ScriptedUpstream {
        fn fetch_catalog(&self) -> Result<CatalogResponse, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("неожиданный запрос каталога")
        }

        fn search_versions(
            &self,
            _group_id: &str,
            _artifact_id: &str,
        ) -> Result<VersionSearchResponse, UpstreamError> {
            Err(UpstreamError::Unavailable("не задан в сценарии".to_string()))
        }
    }

    fn entry(
        key: &str,
        group_id: &str,
        artifact_id: &str,
        description: Option<&str>,
    ) -> (String, CatalogEntry) {
        (
            key.to_string(),
            CatalogEntry {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
                version: None,
                description: description.map(str::to_string),
            },
        )
    }

    fn sample_catalog() -> CatalogResponse {
        let dependencies: BTreeMap<_, _> = [
            entry(
                "a-spring-boot",
                "org.springframework.boot",
                "spring-boot",
                Some("Core spring framework"),
            ),
            entry("b-redis", "io.redis", "redis", None),
            entry(
                "c-jackson",
                "com.fasterxml.jackson.core",
                "jackson-databind",
                Some("JSON for the Spring ecosystem"),
            ),
        ]
        .into_iter()
        .collect();

        CatalogResponse { dependencies }
    }

    #[test]
    fn second_read_reuses_the_cached_snapshot() {
        let upstream = ScriptedUpstream::new(vec![Ok(sample_catalog())]);
        let cache = CatalogCache::new(&upstream);

        let first = cache.catalog().expect("первая загрузка должна пройти");
        let second = cache.catalog().expect("чтение из кэша должно пройти");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(upstream.call_count(), 1);
    }

    #[test]
    fn failed_fetch_is_not_cached_and_is_retried() {
        let upstream = ScriptedUpstream::new(vec![
            Err(UpstreamError::Unavailable("connection refused".to_string())),
            Ok(sample_catalog()),
        ]);
        let cache = CatalogCache::new(&upstream);

        let error = cache
            .catalog()
            .expect_err("первая загрузка должна завершиться ошибкой");
        assert!(matches!(error, UpstreamError::Unavailable(_)));

        let snapshot = cache.catalog().expect("повторная загрузка должна пройти");
        assert_eq!(snapshot.len(), 3);
        assert_eq!(upstream.call_count(), 2);
    }

    #[test]
    fn empty_query_returns_the_full_catalog_in_order() {
        let upstream = ScriptedUpstream::new(vec![Ok(sample_catalog())]);
        let cache = CatalogCache::new(&upstream);

        let results = cache.search("").expect("поиск должен пройти");

        let artifacts: Vec<&str> = results.iter().map(|r| r.artifact_id.as_str()).collect();
        assert_eq!(artifacts, vec!["spring-boot", "redis", "jackson-databind"]);
    }

    #[test]
    fn search_matches_artifact_id_or_description_case_insensitively() {
        let upstream = ScriptedUpstream::new(vec![Ok(sample_catalog())]);
        let cache = CatalogCache::new(&upstream);

        let results = cache.search("Spring").expect("поиск должен пройти");

        let artifacts: Vec<&str> = results.iter().map(|r| r.artifact_id.as_str()).collect();
        assert_eq!(artifacts, vec!["spring-boot", "jackson-databind"]);
    }

    #[test]
    fn records_without_description_never_match_on_description() {
        let upstream = ScriptedUpstream::new(vec![Ok(sample_catalog())]);
        let cache = CatalogCache::new(&upstream);

        let results = cache.search("framework").expect("поиск должен пройти");

        let artifacts: Vec<&str> = results.iter().map(|r| r.artifact_id.as_str()).collect();
        assert_eq!(artifacts, vec!["spring-boot"]);
    }

    #[test]
    fn search_reuses_the_snapshot_fetched_by_catalog() {
        let upstream = ScriptedUpstream::new(vec![Ok(sample_catalog())]);
        let cache = CatalogCache::new(&upstream);

        cache.catalog().expect("загрузка должна пройти");
        cache.search("redis").expect("поиск должен пройти");

        assert_eq!(upstream.call_count(), 1);
    }
}
