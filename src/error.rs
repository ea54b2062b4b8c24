use thiserror::Error;

/// Ошибки внешних источников метаданных. Путь каталога отдаёт их вызывающему,
/// путь разрешения версий гасит их и переходит к следующему ярусу.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Сетевая ошибка, таймаут или неуспешный HTTP-статус.
    #[error("источник недоступен: {0}")]
    Unavailable(String),

    /// Ответ получен, но не соответствует ожидаемой структуре.
    #[error("некорректный ответ источника: {0}")]
    Malformed(String),
}
