//! bankjoblib — каноническая модель банковской выписки, собранной скрейпером:
//! идентификация транзакций, склейка соседних выписок, синтетическое время
//! внутри дня и вывод в OFX, CSV, QIF, JSON и консоль.

pub mod error;
pub mod output;
pub mod support;
pub mod traits;

pub mod model {
    pub mod payee;
    pub mod statement;
    pub mod transaction;

    pub use payee::Payee;
    pub use statement::{AccountType, Statement, DEFAULT_CURRENCY};
    pub use transaction::{Transaction, TransactionType};
}

pub mod formats {
    pub mod console;
    pub mod csv;
    pub mod json;
    pub mod ofx;
    pub mod qif;
}
