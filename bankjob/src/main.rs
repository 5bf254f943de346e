use bankjoblib::{
    error::{BankjobError, Result},
    formats::json::Json,
    model::Statement,
    output::{output_all, OutputFormatter},
    traits::ReadFormat,
};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Order {
    /// Сайт показывает самые свежие транзакции первыми
    MostRecentFirst,
    /// Транзакции уже идут по возрастанию даты
    MostRecentLast,
}

#[derive(Parser, Debug)]
#[command(name = "bankjob", version, about = "Склейка, завершение и вывод выписок, собранных скрейпером")]
struct Cli {
    /// Выписки в JSON, от ранней к поздней; без них читается stdin
    #[arg(short = 'i', long = "input")]
    inputs: Vec<PathBuf>,

    /// Порядок транзакций в выгрузке
    #[arg(long, value_enum, default_value = "most-recent-first")]
    order: Order,

    /// Придумать время транзакциям, у которых есть только дата
    #[arg(long)]
    fake_times: bool,

    /// Формат вывода `name[:path]`: ofx, csv, qif, stdout, json (можно несколько)
    #[arg(long = "out", value_name = "FORMATTER", value_parser = OutputFormatter::from_config)]
    outputs: Vec<OutputFormatter>,

    /// Уровень логов (перекрывается RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    // форматтеры разбираются здесь же, до чтения выписок
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut statements = Vec::new();
    if cli.inputs.is_empty() {
        statements.push(Json::read(BufReader::new(io::stdin()))?);
    }
    for path in &cli.inputs {
        tracing::debug!(path = %path.display(), "reading statement");
        statements.push(Json::read(BufReader::new(File::open(path)?))?);
    }

    // склейка ждёт, что вторая выписка продолжает первую в порядке хранения
    if let Order::MostRecentFirst = cli.order {
        statements.reverse();
    }
    let mut statements = statements.into_iter();
    let mut st: Statement = statements
        .next()
        .ok_or(BankjobError::MissingRequiredField("statement"))?;
    for next in statements {
        st.merge_in_place(&next)?;
    }

    match cli.order {
        Order::MostRecentFirst => st.finish(true, cli.fake_times)?,
        Order::MostRecentLast => st.finish_with_most_recent_last(cli.fake_times)?,
    }

    let outputs = if cli.outputs.is_empty() {
        vec![OutputFormatter::from_config("stdout")?]
    } else {
        cli.outputs
    };
    output_all(&outputs, &st)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
