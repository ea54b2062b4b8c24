use anyhow::{Context, Result};
use regex::Regex;

/// Извлекает текст каждого элемента `<version>` в порядке документа. Прочие
/// элементы метаданных (`<latest>`, `<release>`) не учитываются.
pub fn extract_versions(document: &str) -> Result<Vec<String>> {
    let version_re = Regex::new(r"<version>\s*([^<]*?)\s*</version>")
        .context("Не удалось подготовить regex для элементов version")?;

    let versions = version_re
        .captures_iter(document)
        .filter_map(|caps| {
            let text = caps[1].trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect();

    Ok(versions)
}
