//! JSON-документ, которым скрейпер передаёт выписку:
//! `{"account_number": ..., "decimal": ",", "transactions": [...]}`.
//!
//! Суммы транзакций остаются строками в формате сайта; разделитель задаётся
//! один на всю выписку.

use crate::{
    error::{BankjobError, Result},
    model::{AccountType, Payee, Statement, Transaction, TransactionType, DEFAULT_CURRENCY},
    support::DecimalSeparator,
    traits::{ReadFormat, WriteFormat},
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

const JSON_DATE: &str = "%Y-%m-%dT%H:%M:%S";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Serialize, Deserialize, Debug)]
struct JsonStatement {
    account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bank_id: Option<String>,
    #[serde(default)]
    account_type: AccountType,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default)]
    decimal: DecimalSeparator,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    closing_balance: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    closing_available: Option<Decimal>,
    #[serde(default)]
    from_date: Option<String>,
    #[serde(default)]
    to_date: Option<String>,
    #[serde(default)]
    transactions: Vec<JsonTransaction>,
}

#[derive(Serialize, Deserialize, Debug)]
struct JsonTransaction {
    #[serde(rename = "type", default)]
    kind: TransactionType,
    date: Option<String>,
    #[serde(default)]
    value_date: Option<String>,
    #[serde(default)]
    raw_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default = "zero")]
    amount: String,
    #[serde(default = "zero")]
    new_balance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ofx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    check_number: Option<String>,
    #[serde(default)]
    payee: Payee,
}

fn zero() -> String {
    "0".into()
}

fn json_date(d: Option<NaiveDateTime>) -> Option<String> {
    d.map(|d| d.format(JSON_DATE).to_string())
}

pub struct Json;

impl ReadFormat for Json {
    fn read<R: BufRead>(r: R) -> Result<Statement> {
        let x: JsonStatement = serde_json::from_reader(r)?;

        let mut st = Statement::new(x.account_number, x.currency)?;
        st.set_bank_id(x.bank_id)?;
        st.account_type = x.account_type;
        st.closing_balance = x.closing_balance;
        st.closing_available = x.closing_available;
        st.set_from_date(x.from_date)?;
        st.set_to_date(x.to_date)?;

        for t in x.transactions {
            let mut tx = Transaction::with_decimal(x.decimal);
            tx.kind = t.kind;
            tx.set_date(t.date)?;
            tx.set_value_date(t.value_date)?;
            tx.raw_description = t.raw_description;
            if let Some(d) = t.description {
                tx.set_description(d);
            }
            tx.amount = t.amount;
            tx.new_balance = t.new_balance;
            if let Some(id) = t.ofx_id {
                tx.set_ofx_id(id);
            }
            tx.check_number = t.check_number;
            tx.payee = t.payee;
            st.add_transaction(tx);
        }

        tracing::debug!(
            account = %st.account_number(),
            transactions = st.transactions.len(),
            "read statement"
        );
        Ok(st)
    }
}

impl WriteFormat for Json {
    fn write<W: Write>(mut w: W, st: &Statement) -> Result<()> {
        // разделитель в документе один на всю выписку
        let decimal = st
            .transactions
            .first()
            .map(Transaction::decimal)
            .unwrap_or_default();
        if let Some(tx) = st.transactions.iter().find(|tx| tx.decimal() != decimal) {
            return Err(BankjobError::InvalidField {
                field: "decimal separator",
                reason: format!(
                    "transaction {:?} uses {:?}, statement uses {:?}",
                    tx.raw_description,
                    tx.decimal().as_char(),
                    decimal.as_char()
                ),
            });
        }

        let transactions = st
            .transactions
            .iter()
            .map(|tx| JsonTransaction {
                kind: tx.kind,
                date: json_date(tx.date),
                value_date: json_date(tx.value_date),
                raw_description: tx.raw_description.clone(),
                description: tx
                    .has_explicit_description()
                    .then(|| tx.description().to_string()),
                amount: tx.amount.clone(),
                new_balance: tx.new_balance.clone(),
                ofx_id: Some(tx.ofx_id().to_string()),
                check_number: tx.check_number.clone(),
                payee: tx.payee.clone(),
            })
            .collect();

        let x = JsonStatement {
            account_number: st.account_number().to_string(),
            bank_id: st.bank_id().map(str::to_string),
            account_type: st.account_type,
            currency: st.currency().to_string(),
            decimal,
            closing_balance: st.closing_balance,
            closing_available: st.closing_available,
            from_date: json_date(st.from_date()),
            to_date: json_date(st.to_date()),
            transactions,
        };

        serde_json::to_writer_pretty(&mut w, &x)?;
        w.write_all(b"\n")?;
        Ok(())
    }
}
