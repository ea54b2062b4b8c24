use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::UpstreamError;

const CATALOG_URL: &str = "https://start.spring.io/dependencies";
const REGISTRY_SEARCH_URL: &str = "https://search.maven.org/solrsearch/select";
const USER_AGENT: &str = "spring-deps-cli/0.1 (+https://start.spring.io)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const REGISTRY_ROWS: &str = "100";

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    pub dependencies: BTreeMap<String, CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Ответ поиска Maven Central (Solr-конверт).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSearchResponse {
    pub response_header: ResponseHeader,
    pub response: SearchBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseHeader {
    pub status: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchBody {
    pub docs: Vec<VersionDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionDoc {
    pub v: String,
}

pub trait UpstreamClient {
    fn fetch_catalog(&self) -> Result<CatalogResponse, UpstreamError>;

    fn search_versions(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<VersionSearchResponse, UpstreamError>;
}

pub struct HttpUpstreamClient {
    client: Client,
    catalog_url: Url,
    registry_url: Url,
}

impl HttpUpstreamClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Не удалось инициализировать HTTP-клиент")?;

        Ok(Self {
            client,
            catalog_url: Url::parse(CATALOG_URL).context("Не удалось подготовить URL каталога")?,
            registry_url: Url::parse(REGISTRY_SEARCH_URL)
                .context("Не удалось подготовить URL поиска Maven Central")?,
        })
    }

    fn version_search_url(&self, group_id: &str, artifact_id: &str) -> Url {
        let mut url = self.registry_url.clone();
        url.query_pairs_mut()
            .append_pair("q", &format!("g:{group_id} AND a:{artifact_id}"))
            .append_pair("core", "gav")
            .append_pair("rows", REGISTRY_ROWS)
            .append_pair("wt", "json");
        url
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        let response = self.client.get(url.clone()).send().map_err(|err| {
            UpstreamError::Unavailable(format!("Не удалось запросить {url}: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Unavailable(format!(
                "{url} вернул HTTP {}",
                status.as_u16()
            )));
        }

        let body = response.text().map_err(|err| {
            UpstreamError::Unavailable(format!("Не удалось прочитать ответ {url}: {err}"))
        })?;

        decode_payload(&body, &url)
    }
}

fn decode_payload<T: DeserializeOwned>(body: &str, origin: &Url) -> Result<T, UpstreamError> {
    serde_json::from_str(body)
        .map_err(|err| UpstreamError::Malformed(format!("Некорректный ответ {origin}: {err}")))
}

impl UpstreamClient for HttpUpstreamClient {
    fn fetch_catalog(&self) -> Result<CatalogResponse, UpstreamError> {
        self.get_json(self.catalog_url.clone())
    }

    fn search_versions(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<VersionSearchResponse, UpstreamError> {
        self.get_json(self.version_search_url(group_id, artifact_id))
    }
}
