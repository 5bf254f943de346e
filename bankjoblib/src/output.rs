//! Выбор формата вывода по строке конфигурации `name[:arguments]`.
//!
//! Имя приводится к ключу `<Name>Formatter` (`ofx` -> `OfxFormatter`) и
//! ищется в статической таблице. Аргументы — путь к файлу назначения; без
//! них вывод идёт в stdout.

use crate::{
    error::{BankjobError, Result},
    formats::{console::Console, csv::Csv, json::Json, ofx::Ofx, qif::Qif},
    model::Statement,
    traits::WriteFormat,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Ofx,
    Csv,
    Qif,
    Stdout,
    Json,
}

/// Ключ -> формат.
const FORMATTERS: &[(&str, FormatKind)] = &[
    ("OfxFormatter", FormatKind::Ofx),
    ("CsvFormatter", FormatKind::Csv),
    ("QifFormatter", FormatKind::Qif),
    ("StdoutFormatter", FormatKind::Stdout),
    ("JsonFormatter", FormatKind::Json),
];

const FORMATTER_SUFFIX: &str = "Formatter";

/// Куда писать результат.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Path(PathBuf),
}

impl Destination {
    /// Пустые аргументы означают stdout.
    pub fn from_arguments(arguments: Option<&str>) -> Self {
        match arguments.map(str::trim) {
            Some(path) if !path.is_empty() => Destination::Path(PathBuf::from(path)),
            _ => Destination::Stdout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormatter {
    configuration: String,
    kind: FormatKind,
    destination: Destination,
}

impl OutputFormatter {
    pub fn from_config(configuration: &str) -> Result<Self> {
        let (name, arguments) = match configuration.split_once(':') {
            Some((name, args)) => (name, Some(args)),
            None => (configuration, None),
        };

        let key = formatter_key(name);
        let kind = FORMATTERS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| BankjobError::UnknownFormatter {
                name: name.to_string(),
                key: key.clone(),
            })?;

        Ok(Self {
            configuration: configuration.to_string(),
            kind,
            destination: Destination::from_arguments(arguments),
        })
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Пишет выписку в назначение. В файл попадает только полностью
    /// сформированный вывод: при ошибке формата файл не создаётся.
    pub fn output(&self, st: &Statement) -> Result<()> {
        tracing::debug!(formatter = %self.configuration, "writing statement");
        match &self.destination {
            Destination::Stdout => {
                let stdout = io::stdout();
                self.write_to(stdout.lock(), st)
            }
            Destination::Path(path) => {
                let mut buf = Vec::new();
                self.write_to(&mut buf, st)?;
                let mut file = BufWriter::new(File::create(path)?);
                file.write_all(&buf)?;
                file.flush()?;
                Ok(())
            }
        }
    }

    /// Пишет выписку в уже открытый поток.
    pub fn write_to<W: Write>(&self, w: W, st: &Statement) -> Result<()> {
        match self.kind {
            FormatKind::Ofx => Ofx::write(w, st),
            FormatKind::Csv => Csv::write(w, st),
            FormatKind::Qif => Qif::write(w, st),
            FormatKind::Stdout => Console::write(w, st),
            FormatKind::Json => Json::write(w, st),
        }
    }
}

/// Прогоняет выписку через все форматтеры. Ошибка одного не мешает
/// остальным; возвращается первая из ошибок.
pub fn output_all(formatters: &[OutputFormatter], st: &Statement) -> Result<()> {
    let mut first_error = None;
    for formatter in formatters {
        if let Err(e) = formatter.output(st) {
            tracing::error!(formatter = %formatter.configuration, error = %e, "output failed");
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

impl FromStr for OutputFormatter {
    type Err = BankjobError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_config(s)
    }
}

/// `ofx` -> `OfxFormatter`: заглавной становится только первая буква.
pub fn formatter_key(name: &str) -> String {
    let mut chars = name.chars();
    let mut key = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    key.push_str(FORMATTER_SUFFIX);
    key
}
