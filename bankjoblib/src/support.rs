//! Вспомогательные чистые функции: разбор сумм с учётом локали, приведение
//! дат, нормализация описаний.

use crate::error::{BankjobError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Десятичный разделитель, которым пользуется сайт банка.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecimalSeparator {
    /// `1.000.030,99`
    #[serde(rename = ",")]
    Comma,
    /// `1,000,030.99`
    #[default]
    #[serde(rename = ".")]
    Period,
}

impl DecimalSeparator {
    pub fn as_char(self) -> char {
        match self {
            DecimalSeparator::Comma => ',',
            DecimalSeparator::Period => '.',
        }
    }
}

impl TryFrom<char> for DecimalSeparator {
    type Error = BankjobError;

    fn try_from(c: char) -> Result<Self> {
        match c {
            ',' => Ok(DecimalSeparator::Comma),
            '.' => Ok(DecimalSeparator::Period),
            other => Err(BankjobError::InvalidField {
                field: "decimal separator",
                reason: format!("expected ',' or '.', got {other:?}"),
            }),
        }
    }
}

impl fmt::Display for DecimalSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Значение, которое можно привести к точному десятичному числу.
///
/// Строки разбираются по правилам [`string_to_decimal`], уже готовый
/// [`Decimal`] возвращается как есть.
pub trait ToDecimal {
    fn to_decimal(&self, decimal: DecimalSeparator) -> Result<Decimal>;
}

impl ToDecimal for str {
    fn to_decimal(&self, decimal: DecimalSeparator) -> Result<Decimal> {
        string_to_decimal(self, decimal)
    }
}

impl ToDecimal for String {
    fn to_decimal(&self, decimal: DecimalSeparator) -> Result<Decimal> {
        string_to_decimal(self, decimal)
    }
}

impl ToDecimal for Decimal {
    fn to_decimal(&self, _decimal: DecimalSeparator) -> Result<Decimal> {
        Ok(*self)
    }
}

/// Переводит строку вида `"1.000.030,99"` или `"1,234.56"` в [`Decimal`].
///
/// Пробельные символы (включая неразрывный пробел) удаляются, разделитель
/// тысяч выбрасывается, десятичный разделитель приводится к точке.
pub fn string_to_decimal(raw: &str, decimal: DecimalSeparator) -> Result<Decimal> {
    let mut amt: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    match decimal {
        DecimalSeparator::Comma => {
            amt.retain(|c| c != '.');
            amt = amt.replace(',', ".");
        }
        DecimalSeparator::Period => amt.retain(|c| c != ','),
    }

    if amt.is_empty() {
        return Err(BankjobError::MalformedAmount {
            raw: raw.to_string(),
            reason: "no digits".into(),
        });
    }

    Decimal::from_str_exact(&amt)
        .or_else(|_| amt.parse::<Decimal>())
        .map_err(|e| BankjobError::MalformedAmount {
            raw: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Целая часть суммы в том виде, как её отдал сайт: знак и ведущие цифры.
/// Используется в хэше транзакции, поэтому не зависит от разделителя.
pub(crate) fn integer_prefix(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let mut value: i64 = 0;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        value = value.saturating_mul(10).saturating_add(i64::from(d));
    }
    sign * value
}

/// Вход для полей-дат транзакции и выписки.
pub trait DateTimeInput {
    /// `Ok(None)` для пустого значения (пустой строки).
    fn into_date_time(self) -> Result<Option<NaiveDateTime>>;
}

impl DateTimeInput for NaiveDateTime {
    fn into_date_time(self) -> Result<Option<NaiveDateTime>> {
        Ok(Some(self))
    }
}

impl DateTimeInput for NaiveDate {
    fn into_date_time(self) -> Result<Option<NaiveDateTime>> {
        Ok(Some(self.and_time(NaiveTime::MIN)))
    }
}

impl DateTimeInput for &str {
    fn into_date_time(self) -> Result<Option<NaiveDateTime>> {
        create_date_time(self)
    }
}

impl DateTimeInput for String {
    fn into_date_time(self) -> Result<Option<NaiveDateTime>> {
        create_date_time(&self)
    }
}

impl DateTimeInput for &String {
    fn into_date_time(self) -> Result<Option<NaiveDateTime>> {
        create_date_time(self)
    }
}

impl<T: DateTimeInput> DateTimeInput for Option<T> {
    fn into_date_time(self) -> Result<Option<NaiveDateTime>> {
        match self {
            Some(v) => v.into_date_time(),
            None => Ok(None),
        }
    }
}

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y%m%d%H%M%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y", "%Y%m%d"];

/// Разбирает дату (с временем или без) из строки, как её отдаёт сайт банка.
/// Пустая строка даёт `None`.
pub fn create_date_time(raw: &str) -> Result<Option<NaiveDateTime>> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.naive_local()));
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Some(dt));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Some(d.and_time(NaiveTime::MIN)));
        }
    }

    Err(BankjobError::InvalidDate(format!("unrecognised date {raw:?}")))
}

/// `"CARD PAYMENT TO tesco"` -> `"Card Payment To Tesco"`.
pub fn capitalize_words(message: &str) -> Result<String> {
    static WORD_START: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    let re = WORD_START
        .get_or_init(|| Regex::new(r"\b\w"))
        .as_ref()
        .map_err(|e| BankjobError::Pattern(e.clone()))?;
    let lower = message.to_lowercase();
    Ok(re
        .replace_all(&lower, |caps: &Captures<'_>| caps[0].to_uppercase())
        .into_owned())
}
