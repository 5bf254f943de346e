//! Выписка по счёту: упорядоченный список транзакций плюс метаданные счёта.

use crate::{
    error::{BankjobError, Result},
    model::transaction::Transaction,
    support::DateTimeInput,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Тип счёта (элемент OFX `ACCTTYPE`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    MoneyMrkt,
    CreditLine,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Checking => "CHECKING",
            AccountType::Savings => "SAVINGS",
            AccountType::MoneyMrkt => "MONEYMRKT",
            AccountType::CreditLine => "CREDITLINE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const ONE_MINUTE: i64 = 60;
pub const ELEVEN_59_PM: i64 = 23 * 60 * 60 + 59 * 60;
pub const MIDDAY: i64 = 12 * 60 * 60;
pub const TWO_AM: i64 = 2 * 60 * 60;

pub const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Clone)]
pub struct Statement {
    account_number: String,
    bank_id: Option<String>,
    currency: String,
    pub account_type: AccountType,
    pub closing_balance: Option<Decimal>,
    /// Доступные средства после последней транзакции (обычно равны
    /// `closing_balance`).
    pub closing_available: Option<Decimal>,
    from_date: Option<NaiveDateTime>,
    to_date: Option<NaiveDateTime>,
    /// В порядке выгрузки, не обязательно хронологическом.
    pub transactions: Vec<Transaction>,
}

impl Statement {
    /// Пустая выписка. Номер счёта — 1..=22 символов, валюта — трёхбуквенный
    /// код.
    pub fn new(account_number: impl Into<String>, currency: impl Into<String>) -> Result<Self> {
        let account_number = account_number.into();
        validate_account_number(&account_number)?;
        let currency = currency.into();
        validate_currency(&currency)?;

        Ok(Self {
            account_number,
            bank_id: None,
            currency,
            account_type: AccountType::Checking,
            closing_balance: None,
            closing_available: None,
            from_date: None,
            to_date: None,
            transactions: Vec::new(),
        })
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn bank_id(&self) -> Option<&str> {
        self.bank_id.as_deref()
    }

    pub fn set_bank_id(&mut self, bank_id: Option<String>) -> Result<()> {
        if let Some(id) = &bank_id {
            let len = id.chars().count();
            if !(1..=9).contains(&len) {
                return Err(BankjobError::InvalidField {
                    field: "bank id",
                    reason: format!("{id:?} must be 1 to 9 characters"),
                });
            }
        }
        self.bank_id = bank_id;
        Ok(())
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Начало периода: заданное явно либо самая ранняя дата транзакции.
    pub fn from_date(&self) -> Option<NaiveDateTime> {
        self.from_date
            .or_else(|| self.transactions.iter().filter_map(|tx| tx.date).min())
    }

    /// Конец периода: заданный явно либо самая поздняя дата транзакции.
    pub fn to_date(&self) -> Option<NaiveDateTime> {
        self.to_date
            .or_else(|| self.transactions.iter().filter_map(|tx| tx.date).max())
    }

    pub fn set_from_date(&mut self, date: impl DateTimeInput) -> Result<()> {
        self.from_date = date.into_date_time()?;
        Ok(())
    }

    pub fn set_to_date(&mut self, date: impl DateTimeInput) -> Result<()> {
        self.to_date = date.into_date_time()?;
        Ok(())
    }

    /// Транзакции по возрастанию даты; порядок внутри одной даты сохраняется.
    pub fn transactions_by_date(&self) -> Vec<&Transaction> {
        let mut txs: Vec<&Transaction> = self.transactions.iter().collect();
        txs.sort_by_key(|tx| tx.date);
        txs
    }

    /// Шесть строк «метка — значение», с которых начинаются CSV, QIF и
    /// консольный вывод.
    pub fn summary(&self) -> [(&'static str, String); 6] {
        let dec = |d: Option<Decimal>| d.map(|v| v.to_string()).unwrap_or_default();
        [
            ("Account Number", self.account_number.clone()),
            ("Bank ID", self.bank_id.clone().unwrap_or_default()),
            ("Account Type", self.account_type.to_string()),
            ("Closing balance", dec(self.closing_balance)),
            ("Available funds", dec(self.closing_available)),
            ("Currency", self.currency.clone()),
        ]
    }

    /* ------------------------------ MERGE ----------------------------------- */

    /// Объединяет транзакции `self` и `other` без дублей (в порядке первого
    /// появления) и проверяет, что хвост объединения длиной
    /// `other.transactions.len()` поэлементно совпадает с `other`.
    pub fn merge_transactions(&self, other: &Statement) -> Result<Vec<Transaction>> {
        let mut seen: HashSet<&Transaction> =
            HashSet::with_capacity(self.transactions.len() + other.transactions.len());
        let union: Vec<Transaction> = self
            .transactions
            .iter()
            .chain(other.transactions.iter())
            .filter(|tx| seen.insert(*tx))
            .cloned()
            .collect();

        let tail = other.transactions.len();
        let contiguous =
            union.len() >= tail && union[union.len() - tail..] == other.transactions[..];
        if !contiguous {
            tracing::warn!(
                account = %self.account_number,
                ours = self.transactions.len(),
                theirs = tail,
                merged = union.len(),
                "statements do not overlap contiguously"
            );
            return Err(BankjobError::NonContiguousMerge {
                account_number: self.account_number.clone(),
                expected_tail: tail,
            });
        }

        tracing::debug!(
            account = %self.account_number,
            ours = self.transactions.len(),
            theirs = tail,
            merged = union.len(),
            "merged statements"
        );
        Ok(union)
    }

    /// Новая выписка с объединёнными транзакциями; ни `self`, ни `other` не
    /// меняются. Балансы и границы периода сбрасываются — их заново
    /// выставит [`Statement::finish`] или вызывающий код.
    pub fn merge(&self, other: &Statement) -> Result<Statement> {
        let union = self.merge_transactions(other)?;
        let mut merged = self.clone();
        merged.install_merged(union);
        Ok(merged)
    }

    /// То же, что [`Statement::merge`], но на месте. При ошибке выписка не
    /// меняется.
    pub fn merge_in_place(&mut self, other: &Statement) -> Result<()> {
        let union = self.merge_transactions(other)?;
        self.install_merged(union);
        Ok(())
    }

    fn install_merged(&mut self, union: Vec<Transaction>) {
        self.closing_balance = None;
        self.closing_available = None;
        self.from_date = None;
        self.to_date = None;
        self.transactions = union;
    }

    /* ------------------------------ FINISH ---------------------------------- */

    /// Завершает выписку после выгрузки.
    ///
    /// 1. Незаданные `closing_balance`, `closing_available`, `to_date` и
    ///    `from_date` берутся из крайних транзакций: при `most_recent_first`
    ///    самая свежая — первая, иначе — последняя.
    /// 2. При `fake_times`, если сайт не дал времени (конец периода ровно в
    ///    полночь), транзакциям приписывается время, сохраняющее порядок
    ///    выгрузки. В пределах дня время убывает с шагом в минуту; новый
    ///    день начинается с 23:59, а самый первый — с `(n + 1)` минут после
    ///    полуночи (или с полудня, если вся выписка за один день). Так две
    ///    соседние выписки за один день почти не пересекаются по времени.
    ///
    /// Эвристика держится на двух допущениях: транзакций за день намного
    /// меньше 1440, и один календарный день попадает не более чем в три
    /// выписки подряд.
    ///
    /// На пустой выписке ничего не делает.
    pub fn finish(&mut self, most_recent_first: bool, fake_times: bool) -> Result<()> {
        let (Some(first), Some(last)) = (self.transactions.first(), self.transactions.last())
        else {
            tracing::debug!(account = %self.account_number, "finish on empty statement");
            return Ok(());
        };
        let (newest, oldest) = if most_recent_first {
            (first, last)
        } else {
            (last, first)
        };

        let closing = match (self.closing_balance, self.closing_available) {
            (Some(_), Some(_)) => None,
            _ => Some(newest.real_new_balance()?),
        };
        let newest_date = newest.date;
        let oldest_date = oldest.date;

        // всё проверяем до первого изменения выписки
        let fake = if fake_times {
            let to_date = self
                .to_date
                .or(newest_date)
                .or_else(|| self.to_date())
                .ok_or(BankjobError::MissingRequiredField("statement to date"))?;
            to_date.time() == NaiveTime::MIN
        } else {
            false
        };
        if fake {
            self.ensure_dated()?;
        }

        if let Some(balance) = closing {
            self.closing_balance.get_or_insert(balance);
            self.closing_available.get_or_insert(balance);
        }
        if self.to_date.is_none() {
            self.to_date = newest_date;
        }
        if self.from_date.is_none() {
            self.from_date = oldest_date;
        }
        if fake {
            self.assign_fake_times(most_recent_first);
        }

        tracing::debug!(
            account = %self.account_number,
            transactions = self.transactions.len(),
            most_recent_first,
            fake_times,
            "statement finished"
        );
        Ok(())
    }

    fn ensure_dated(&self) -> Result<()> {
        if self.transactions.iter().any(|tx| tx.date.is_none()) {
            return Err(BankjobError::MissingRequiredField("transaction date"));
        }
        Ok(())
    }

    /// Транзакции без даты пропускаются; вызывать после [`Self::ensure_dated`].
    fn assign_fake_times(&mut self, most_recent_first: bool) {
        let mut seconds = if self.from_date() == self.to_date() {
            MIDDAY
        } else {
            (self.transactions.len() as i64 + 1) * ONE_MINUTE
        };

        let mut walk: Vec<&mut Transaction> = self.transactions.iter_mut().collect();
        if !most_recent_first {
            walk.reverse();
        }

        let mut current_day: Option<u32> = None;
        for tx in walk {
            let Some(date) = tx.date else { continue };
            let day = date.ordinal();
            match current_day {
                Some(d) if d == day => {}
                Some(_) => {
                    // новый день: отсчёт снова от 23:59 вниз
                    current_day = Some(day);
                    seconds = ELEVEN_59_PM;
                }
                None => current_day = Some(day),
            }
            if date.time() == NaiveTime::MIN {
                if seconds < 0 {
                    tracing::warn!(%date, seconds, "too many transactions in one day for synthetic times");
                }
                tx.date = Some(date + TimeDelta::seconds(seconds));
            }
            seconds -= ONE_MINUTE;
        }
    }

    /// Упрощённый вариант [`Statement::finish`] для сайтов, где транзакции
    /// уже идут по возрастанию даты.
    ///
    /// При `fake_times` транзакции группируются по календарной дате, и в
    /// каждой группе время идёт от 02:00 с шагом в минуту. Пересечения с
    /// соседней выпиской за тот же день здесь не отслеживаются.
    pub fn finish_with_most_recent_last(&mut self, fake_times: bool) -> Result<()> {
        let (Some(first), Some(last)) = (self.transactions.first(), self.transactions.last())
        else {
            tracing::debug!(account = %self.account_number, "finish on empty statement");
            return Ok(());
        };

        let closing = match (self.closing_balance, self.closing_available) {
            (Some(_), Some(_)) => None,
            _ => Some(last.real_new_balance()?),
        };
        let (newest_date, oldest_date) = (last.date, first.date);
        if fake_times {
            self.ensure_dated()?;
        }

        if let Some(balance) = closing {
            self.closing_balance.get_or_insert(balance);
            self.closing_available.get_or_insert(balance);
        }
        if self.to_date.is_none() {
            self.to_date = newest_date;
        }
        if self.from_date.is_none() {
            self.from_date = oldest_date;
        }

        if fake_times {
            let mut per_day: HashMap<NaiveDate, i64> = HashMap::new();
            for tx in &mut self.transactions {
                let Some(date) = tx.date else { continue };
                let day = date.date();
                let index = per_day.entry(day).or_insert(0);
                tx.date = Some(
                    day.and_time(NaiveTime::MIN) + TimeDelta::seconds(TWO_AM + *index * ONE_MINUTE),
                );
                *index += 1;
            }
        }

        tracing::debug!(
            account = %self.account_number,
            transactions = self.transactions.len(),
            fake_times,
            "statement finished (most recent last)"
        );
        Ok(())
    }
}

fn validate_account_number(account_number: &str) -> Result<()> {
    let len = account_number.chars().count();
    if len == 0 {
        return Err(BankjobError::MissingRequiredField("account number"));
    }
    if len > 22 {
        return Err(BankjobError::InvalidField {
            field: "account number",
            reason: format!("{account_number:?} is longer than 22 characters"),
        });
    }
    Ok(())
}

fn validate_currency(currency: &str) -> Result<()> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(BankjobError::InvalidField {
            field: "currency",
            reason: format!("{currency:?} is not a three-letter code"),
        })
    }
}

impl PartialEq for Statement {
    fn eq(&self, other: &Self) -> bool {
        self.from_date() == other.from_date()
            && self.to_date() == other.to_date()
            && self.closing_balance == other.closing_balance
            && self.closing_available == other.closing_available
            && self.transactions == other.transactions
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dec = |d: Option<Decimal>| d.map(|v| v.to_string()).unwrap_or_default();
        write!(
            f,
            "Statement: close_bal = {}, avail = {}, curr = {}, transactions:",
            dec(self.closing_balance),
            dec(self.closing_available),
            self.currency
        )?;
        for tx in &self.transactions {
            write!(f, "\n\t\t{tx}")?;
        }
        write!(f, "\n---")
    }
}
