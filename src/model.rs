use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRecord {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// Неизменяемый срез каталога: после создания не модифицируется и раздаётся
/// из кэша по ссылке.
pub type CatalogSnapshot = Arc<Vec<DependencyRecord>>;
