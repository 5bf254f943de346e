//! Унифицированные трэйты чтения/записи на основе std::io::{BufRead, Write}.

use crate::{error::Result, model::Statement};
use std::io::{BufRead, Write};

pub trait ReadFormat {
    fn read<R: BufRead>(r: R) -> Result<Statement>;
}

/// Сериализатор готовой (завершённой) выписки. Пишет за один проход и
/// выписку не меняет.
pub trait WriteFormat {
    fn write<W: Write>(w: W, st: &Statement) -> Result<()>;
}
