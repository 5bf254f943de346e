//! OFX 2.0 (XML): выписка по банковскому счёту `BANKMSGSRSV1/STMTTRNRS/STMTRS`.
//!
//! Порядок элементов и атрибутов заголовка фиксирован: часть клиентов не
//! разбирает файл, если он отличается.

use crate::{
    error::{BankjobError, Result},
    model::{Statement, Transaction},
    traits::WriteFormat,
};
use chrono::NaiveDateTime;
use quick_xml::{
    events::{BytesStart, BytesText, Event},
    Writer,
};
use std::io::Write;

pub const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub const OFX_HEADER: &str =
    r#"<?OFX OFXHEADER="200" SECURITY="NONE" OLDFILEUID="NONE" NEWFILEUID="NONE" VERSION="200"?>"#;

const OFX_DATE: &str = "%Y%m%d%H%M%S";

pub struct Ofx;

impl WriteFormat for Ofx {
    fn write<W: Write>(mut w: W, st: &Statement) -> Result<()> {
        let from_date = st
            .from_date()
            .ok_or(BankjobError::MissingRequiredField("statement from date"))?;
        let to_date = st
            .to_date()
            .ok_or(BankjobError::MissingRequiredField("statement to date"))?;
        if st.transactions.iter().any(|tx| tx.date.is_none()) {
            return Err(BankjobError::MissingRequiredField("transaction date"));
        }

        // заголовки пишем как есть: атрибуты должны идти именно в этом порядке
        w.write_all(XML_DECL.as_bytes())?;
        w.write_all(b"\n")?;
        w.write_all(OFX_HEADER.as_bytes())?;
        w.write_all(b"\n")?;

        let mut wr = Writer::new_with_indent(&mut w, b' ', 2);
        start(&mut wr, "OFX")?;
        start(&mut wr, "BANKMSGSRSV1")?;
        start(&mut wr, "STMTTRNRS")?;
        start(&mut wr, "STMTRS")?;

        elem(&mut wr, "CURDEF", st.currency())?;

        start(&mut wr, "BANKACCTFROM")?;
        opt_elem(&mut wr, "BANKID", st.bank_id())?;
        elem(&mut wr, "ACCTID", st.account_number())?;
        elem(&mut wr, "ACCTTYPE", st.account_type.as_str())?;
        end(&mut wr, "BANKACCTFROM")?;

        start(&mut wr, "BANKTRANLIST")?;
        elem(&mut wr, "DTSTART", &ofx_date(&from_date))?;
        elem(&mut wr, "DTEND", &ofx_date(&to_date))?;
        for tx in st.transactions_by_date() {
            write_transaction(&mut wr, tx)?;
        }
        end(&mut wr, "BANKTRANLIST")?;

        let closing = st.closing_balance.map(|b| b.to_string());
        let available = st.closing_available.map(|b| b.to_string());
        write_balance(&mut wr, "LEDGERBAL", closing.as_deref(), &to_date)?;
        write_balance(&mut wr, "AVAILBAL", available.as_deref(), &to_date)?;

        end(&mut wr, "STMTRS")?;
        end(&mut wr, "STMTTRNRS")?;
        end(&mut wr, "BANKMSGSRSV1")?;
        end(&mut wr, "OFX")?;

        wr.into_inner().write_all(b"\n")?;
        Ok(())
    }
}

fn write_transaction<W: Write>(wr: &mut Writer<W>, tx: &Transaction) -> Result<()> {
    let posted = tx
        .date
        .ok_or(BankjobError::MissingRequiredField("transaction date"))?;

    start(wr, "STMTTRN")?;
    elem(wr, "TRNTYPE", tx.kind.as_str())?;
    elem(wr, "DTPOSTED", &ofx_date(&posted))?;
    elem(wr, "TRNAMT", &tx.amount)?;
    elem(wr, "FITID", tx.ofx_id())?;
    if let Some(n) = &tx.check_number {
        elem(wr, "CHECKNUM", n)?;
    }

    let p = &tx.payee;
    start(wr, "PAYEE")?;
    opt_elem(wr, "NAME", p.name.as_deref())?;
    opt_elem(wr, "ADDR1", p.address.as_deref())?;
    opt_elem(wr, "CITY", p.city.as_deref())?;
    opt_elem(wr, "STATE", p.state.as_deref())?;
    opt_elem(wr, "POSTALCODE", p.postal_code.as_deref())?;
    // COUNTRY необязателен по схеме, без значения не выводим
    if let Some(c) = &p.country {
        elem(wr, "COUNTRY", c)?;
    }
    opt_elem(wr, "PHONE", p.phone.as_deref())?;
    end(wr, "PAYEE")?;

    elem(wr, "MEMO", tx.description())?;
    end(wr, "STMTTRN")
}

fn write_balance<W: Write>(
    wr: &mut Writer<W>,
    tag: &str,
    amount: Option<&str>,
    as_of: &NaiveDateTime,
) -> Result<()> {
    start(wr, tag)?;
    opt_elem(wr, "BALAMT", amount)?;
    elem(wr, "DTASOF", &ofx_date(as_of))?;
    end(wr, tag)
}

fn start<W: Write>(wr: &mut Writer<W>, tag: &str) -> Result<()> {
    wr.write_event(Event::Start(BytesStart::new(tag)))
        .map_err(xml)
}

fn end<W: Write>(wr: &mut Writer<W>, tag: &str) -> Result<()> {
    wr.write_event(Event::End(BytesStart::new(tag).to_end()))
        .map_err(xml)
}

fn elem<W: Write>(wr: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    start(wr, tag)?;
    wr.write_event(Event::Text(BytesText::new(text)))
        .map_err(xml)?;
    end(wr, tag)
}

/// Пустое значение — пустой элемент `<TAG/>`.
fn opt_elem<W: Write>(wr: &mut Writer<W>, tag: &str, text: Option<&str>) -> Result<()> {
    match text {
        Some(t) => elem(wr, tag, t),
        None => wr
            .write_event(Event::Empty(BytesStart::new(tag)))
            .map_err(xml),
    }
}

fn ofx_date(d: &NaiveDateTime) -> String {
    d.format(OFX_DATE).to_string()
}

fn xml<E: std::fmt::Display>(e: E) -> BankjobError {
    BankjobError::Xml(e.to_string())
}
