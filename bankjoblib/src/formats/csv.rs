//! CSV: блок из шести строк «метка,значение», пустая строка, затем по строке
//! на транзакцию: `date,type,description,amount` (дата `YYYY-MM-DD`, сумма
//! числом).

use crate::{
    error::{BankjobError, Result},
    model::Statement,
    traits::WriteFormat,
};
use csv::WriterBuilder;
use std::io::Write;

pub struct Csv;

impl WriteFormat for Csv {
    fn write<W: Write>(mut w: W, st: &Statement) -> Result<()> {
        let mut wrt = WriterBuilder::new().flexible(true).from_writer(&mut w);
        for (label, value) in st.summary() {
            wrt.write_record([label, value.as_str()])?;
        }
        // пустую строку пишем мимо csv-писателя, чтобы она не превратилась в `""`
        let out = wrt
            .into_inner()
            .map_err(|e| BankjobError::Io(e.into_error()))?;
        out.write_all(b"\n")?;

        let mut wrt = WriterBuilder::new().flexible(true).from_writer(out);
        for tx in st.transactions_by_date() {
            let date = tx
                .date
                .ok_or(BankjobError::MissingRequiredField("transaction date"))?;
            wrt.write_record([
                date.format("%Y-%m-%d").to_string(),
                tx.kind.to_string(),
                tx.description().to_string(),
                tx.real_amount()?.to_string(),
            ])?;
        }
        wrt.flush()?;
        Ok(())
    }
}
