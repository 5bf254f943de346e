use bankjoblib::{
    error::BankjobError,
    formats::json::Json,
    model::{AccountType, Statement, Transaction, TransactionType},
    support::DecimalSeparator,
    traits::{ReadFormat, WriteFormat},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

const SCRAPE: &str = r#"{
  "account_number": "12345678",
  "bank_id": "900017",
  "account_type": "SAVINGS",
  "decimal": ",",
  "transactions": [
    {
      "type": "CREDIT",
      "date": "2009-03-02",
      "raw_description": "SALARY",
      "amount": "1.500,00",
      "new_balance": "2.487,70"
    },
    {
      "type": "DEBIT",
      "date": "01/03/2009",
      "value_date": "2009-03-03",
      "raw_description": "CARD PAYMENT",
      "description": "Tesco",
      "amount": "-12,30",
      "new_balance": "987,70",
      "check_number": "000123",
      "payee": { "name": "Tesco", "city": "Dublin" }
    }
  ]
}"#;

#[test]
fn scraper_document_is_read() {
    let st = Json::read(SCRAPE.as_bytes()).expect("read");
    assert_eq!(st.account_number(), "12345678");
    assert_eq!(st.bank_id(), Some("900017"));
    assert_eq!(st.account_type, AccountType::Savings);
    assert_eq!(st.currency(), "EUR");
    assert_eq!(st.closing_balance, None);
    assert_eq!(st.transactions.len(), 2);

    let salary = &st.transactions[0];
    assert_eq!(salary.kind, TransactionType::Credit);
    assert_eq!(salary.decimal(), DecimalSeparator::Comma);
    assert_eq!(salary.real_amount().unwrap(), Decimal::new(150000, 2));
    assert_eq!(salary.description(), "SALARY");

    let card = &st.transactions[1];
    let day = NaiveDate::from_ymd_opt(2009, 3, 1).unwrap();
    assert_eq!(card.date, day.and_hms_opt(0, 0, 0));
    assert_eq!(card.description(), "Tesco");
    assert_eq!(card.check_number.as_deref(), Some("000123"));
    assert_eq!(card.payee.city.as_deref(), Some("Dublin"));
    assert_eq!(card.payee.phone, None);
}

#[test]
fn written_document_reads_back_equal() {
    let mut st = Json::read(SCRAPE.as_bytes()).unwrap();
    st.finish(true, true).unwrap();

    let mut buf = Vec::new();
    Json::write(&mut buf, &st).unwrap();
    let text = String::from_utf8(buf.clone()).unwrap();
    assert!(text.ends_with("}\n"));
    assert!(text.contains("\"closing_balance\": \"2487.70\""), "{text}");

    let back = Json::read(buf.as_slice()).unwrap();
    assert_eq!(back, st);
    assert_eq!(back.transactions[0].ofx_id(), st.transactions[0].ofx_id());
    assert_eq!(back.transactions[1].description(), "Tesco");
    assert_eq!(back.bank_id(), Some("900017"));
}

#[test]
fn bad_documents_are_rejected() {
    assert!(matches!(
        Json::read("{ not json".as_bytes()),
        Err(BankjobError::Json(_))
    ));
    assert!(matches!(
        Json::read(r#"{"account_number": ""}"#.as_bytes()),
        Err(BankjobError::MissingRequiredField(_))
    ));
    assert!(matches!(
        Json::read(r#"{"account_number": "1", "transactions": [{"date": "soon"}]}"#.as_bytes()),
        Err(BankjobError::InvalidDate(_))
    ));
}

#[test]
fn mixed_separators_are_not_written() {
    let mut st = Statement::new("12345678", "EUR").unwrap();
    st.add_transaction(Transaction::with_decimal(DecimalSeparator::Comma));
    st.add_transaction(Transaction::with_decimal(DecimalSeparator::Period));

    let mut buf = Vec::new();
    assert!(matches!(
        Json::write(&mut buf, &st),
        Err(BankjobError::InvalidField { field: "decimal separator", .. })
    ));
    assert!(buf.is_empty());
}
