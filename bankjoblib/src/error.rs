//! Единый тип ошибок публичного API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BankjobError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Сумма или баланс не разбираются как десятичное число.
    #[error("malformed amount {raw:?}: {reason}")]
    MalformedAmount { raw: String, reason: String },

    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Хвост объединения не совпал со второй выпиской: между выписками
    /// пропуск, либо область перекрытия испорчена.
    #[error(
        "cannot merge statements for account {account_number}: the last {expected_tail} \
         merged transactions do not match the later statement; a statement may be missing \
         between the two scrapes"
    )]
    NonContiguousMerge {
        account_number: String,
        expected_tail: usize,
    },

    #[error("unknown output formatter {name:?} (no {key} registered)")]
    UnknownFormatter { name: String, key: String },

    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, BankjobError>;
