//! Текстовый отчёт для терминала: сводка по счёту и таблица транзакций
//! фиксированной ширины.

use crate::{
    error::{BankjobError, Result},
    model::Statement,
    traits::WriteFormat,
};
use std::io::Write;

pub struct Console;

impl WriteFormat for Console {
    fn write<W: Write>(mut w: W, st: &Statement) -> Result<()> {
        write_summary(&mut w, st)?;
        writeln!(w)?;
        for tx in st.transactions_by_date() {
            let date = tx
                .date
                .ok_or(BankjobError::MissingRequiredField("transaction date"))?;
            // дата 10, тип 8, описание 49 (обрезается), сумма 10 вправо
            writeln!(
                w,
                "{:<10.10} {:<8.8} {:<49.49} {:>10.10}",
                date.format("%Y-%m-%d").to_string(),
                tx.kind.as_str(),
                tx.description(),
                tx.amount
            )?;
        }
        w.flush()?;
        Ok(())
    }
}

/// `Account Number : 12345678` и ещё пять строк сводки.
pub(crate) fn write_summary<W: Write>(w: &mut W, st: &Statement) -> Result<()> {
    for (label, value) in st.summary() {
        writeln!(w, "{label:<15}: {value}")?;
    }
    Ok(())
}
