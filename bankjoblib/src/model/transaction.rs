//! Одна проводка по счёту в том виде, как её собрал скрейпер.

use crate::{
    error::Result,
    model::payee::Payee,
    support::{integer_prefix, DateTimeInput, DecimalSeparator, ToDecimal},
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Тип транзакции (элемент OFX `TRNTYPE`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Credit,
    Debit,
    /// Проценты; знак суммы определяет направление.
    Int,
    Div,
    Fee,
    SrvChg,
    Dep,
    Atm,
    Pos,
    Xfer,
    Check,
    Payment,
    Cash,
    DirectDep,
    DirectDebit,
    /// Регулярный платёж / постоянное поручение.
    RepeatPmt,
    #[default]
    Other,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
            TransactionType::Int => "INT",
            TransactionType::Div => "DIV",
            TransactionType::Fee => "FEE",
            TransactionType::SrvChg => "SRVCHG",
            TransactionType::Dep => "DEP",
            TransactionType::Atm => "ATM",
            TransactionType::Pos => "POS",
            TransactionType::Xfer => "XFER",
            TransactionType::Check => "CHECK",
            TransactionType::Payment => "PAYMENT",
            TransactionType::Cash => "CASH",
            TransactionType::DirectDep => "DIRECTDEP",
            TransactionType::DirectDebit => "DIRECTDEBIT",
            TransactionType::RepeatPmt => "REPEATPMT",
            TransactionType::Other => "OTHER",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Формат даты, по которому сравниваются транзакции и считается `ofx_id`.
const CANONICAL_DATE: &str = "%Y-%m-%d %H:%M:%S";

/// Транзакция выписки.
///
/// Суммы хранятся строками ровно так, как их показал сайт банка; числовые
/// значения получаются через [`Transaction::real_amount`] и
/// [`Transaction::real_new_balance`] с разделителем, заданным при создании.
///
/// Равенство и хэш учитывают только дату (с точностью до секунды), исходное
/// описание, тип, сумму и баланс: именно по ним выписки из соседних
/// выгрузок склеиваются в [`Statement::merge`](crate::model::Statement::merge).
#[derive(Debug, Clone)]
pub struct Transaction {
    pub kind: TransactionType,
    pub date: Option<NaiveDateTime>,
    pub value_date: Option<NaiveDateTime>,
    pub raw_description: String,
    /// Сумма со знаком (отрицательная для списаний), как на сайте.
    pub amount: String,
    /// Баланс счёта после проводки, как на сайте.
    pub new_balance: String,
    pub check_number: Option<String>,
    pub payee: Payee,
    description: Option<String>,
    ofx_id: OnceLock<String>,
    decimal: DecimalSeparator,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::with_decimal(DecimalSeparator::default())
    }
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decimal(decimal: DecimalSeparator) -> Self {
        Self {
            kind: TransactionType::Other,
            date: None,
            value_date: None,
            raw_description: String::new(),
            amount: "0".into(),
            new_balance: "0".into(),
            check_number: None,
            payee: Payee::default(),
            description: None,
            ofx_id: OnceLock::new(),
            decimal,
        }
    }

    pub fn decimal(&self) -> DecimalSeparator {
        self.decimal
    }

    pub fn set_date(&mut self, date: impl DateTimeInput) -> Result<()> {
        self.date = date.into_date_time()?;
        Ok(())
    }

    pub fn set_value_date(&mut self, date: impl DateTimeInput) -> Result<()> {
        self.value_date = date.into_date_time()?;
        Ok(())
    }

    /// Описание для пользователя; пока оно не задано явно, совпадает с
    /// `raw_description`.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.raw_description)
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn has_explicit_description(&self) -> bool {
        self.description.is_some()
    }

    /// Идентификатор `FITID`. Вычисляется при первом обращении и дальше не
    /// меняется, даже если поля транзакции поменялись.
    pub fn ofx_id(&self) -> &str {
        self.ofx_id.get_or_init(|| {
            derive_ofx_id(
                self.date.as_ref(),
                &self.raw_description,
                self.kind,
                &self.amount,
                &self.new_balance,
            )
        })
    }

    pub fn set_ofx_id(&mut self, id: impl Into<String>) {
        self.ofx_id = OnceLock::from(id.into());
    }

    pub fn real_amount(&self) -> Result<Decimal> {
        self.amount.to_decimal(self.decimal)
    }

    pub fn real_new_balance(&self) -> Result<Decimal> {
        self.new_balance.to_decimal(self.decimal)
    }

    /// Дата, усечённая до секунд.
    fn date_key(&self) -> Option<i64> {
        self.date.map(|d| d.and_utc().timestamp())
    }
}

/// MD5 от даты, исходного описания, типа, суммы и баланса: одинаковые
/// проводки из разных выгрузок получают одинаковый id.
pub fn derive_ofx_id(
    date: Option<&NaiveDateTime>,
    raw_description: &str,
    kind: TransactionType,
    amount: &str,
    new_balance: &str,
) -> String {
    let date = date
        .map(|d| d.format(CANONICAL_DATE).to_string())
        .unwrap_or_default();
    let text = format!("{date}:{raw_description}:{kind}:{amount}:{new_balance}");
    format!("{:x}", md5::compute(text.as_bytes()))
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        // value_date не сравниваем: банк может сдвинуть её между выгрузками
        self.date_key() == other.date_key()
            && self.raw_description == other.raw_description
            && self.amount == other.amount
            && self.kind == other.kind
            && self.new_balance == other.new_balance
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        integer_prefix(&self.amount).hash(state);
        integer_prefix(&self.new_balance).hash(state);
        self.date_key().hash(state);
        self.raw_description.hash(state);
        self.kind.hash(state);
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self
            .date
            .map(|d| d.format(CANONICAL_DATE).to_string())
            .unwrap_or_default();
        write!(
            f,
            "Transaction - ofx_id: {}, date: {}, raw description: {}, type: {}, amount: {}, new balance: {}",
            self.ofx_id.get().map(String::as_str).unwrap_or(""),
            date,
            self.raw_description,
            self.kind,
            self.amount,
            self.new_balance
        )
    }
}
