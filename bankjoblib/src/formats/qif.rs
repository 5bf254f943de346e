//! QIF (`!Type:Bank`): по три строки на транзакцию (`D` дата, `T` сумма,
//! `P` описание) и разделитель `^`.

use crate::{
    error::{BankjobError, Result},
    formats::console::write_summary,
    model::Statement,
    traits::WriteFormat,
};
use std::io::Write;

pub struct Qif;

impl WriteFormat for Qif {
    fn write<W: Write>(mut w: W, st: &Statement) -> Result<()> {
        write_summary(&mut w, st)?;
        writeln!(w)?;
        writeln!(w, "!Type:Bank")?;
        for tx in st.transactions_by_date() {
            let date = tx
                .date
                .ok_or(BankjobError::MissingRequiredField("transaction date"))?;
            writeln!(w, "D{}", date.format("%m/%d/%Y"))?;
            writeln!(w, "T{}", tx.real_amount()?)?;
            writeln!(w, "P{}", tx.description())?;
            writeln!(w, "^")?;
        }
        w.flush()?;
        Ok(())
    }
}
