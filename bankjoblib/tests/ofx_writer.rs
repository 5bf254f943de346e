use bankjoblib::{
    error::BankjobError,
    formats::ofx::Ofx,
    model::{Payee, Statement, Transaction, TransactionType},
    support::DecimalSeparator,
    traits::WriteFormat,
};

fn card_payment() -> Transaction {
    let mut t = Transaction::with_decimal(DecimalSeparator::Comma);
    t.set_date("2009-03-01").unwrap();
    t.kind = TransactionType::Debit;
    t.raw_description = "CARD PAYMENT".into();
    t.amount = "-12,30".into();
    t.new_balance = "1.000,00".into();
    t
}

fn minimal() -> Statement {
    let mut st = Statement::new("12345678", "EUR").unwrap();
    st.add_transaction(card_payment());
    st.finish(true, false).unwrap();
    st
}

fn render(st: &Statement) -> String {
    let mut buf = Vec::new();
    Ofx::write(&mut buf, st).expect("write ofx");
    String::from_utf8(buf).expect("utf-8")
}

#[test]
fn minimal_statement_matches_golden_file() {
    let expected = include_str!("data/minimal.ofx");
    assert_eq!(render(&minimal()), expected);
}

#[test]
fn writing_twice_gives_identical_output() {
    let st = minimal();
    assert_eq!(render(&st), render(&st));
}

#[test]
fn optional_elements_appear_when_present() {
    let mut t = card_payment();
    t.check_number = Some("000123".into());
    t.payee = Payee::named("Tesco");
    t.payee.country = Some("IRL".into());
    t.set_description("Groceries & milk");

    let mut st = Statement::new("12345678", "EUR").unwrap();
    st.set_bank_id(Some("900017".into())).unwrap();
    st.add_transaction(t);
    st.finish(true, false).unwrap();

    let out = render(&st);
    assert!(out.contains("<BANKID>900017</BANKID>"), "{out}");
    assert!(out.contains("<CHECKNUM>000123</CHECKNUM>"), "{out}");
    assert!(out.contains("<NAME>Tesco</NAME>"), "{out}");
    assert!(out.contains("<COUNTRY>IRL</COUNTRY>"), "{out}");
    assert!(out.contains("<MEMO>Groceries &amp; milk</MEMO>"), "{out}");
    assert!(!out.contains("<BANKID/>"));
}

#[test]
fn transactions_are_written_oldest_first() {
    let mut newer = card_payment();
    newer.set_date("2009-03-02").unwrap();
    newer.raw_description = "LATER".into();

    let mut st = Statement::new("12345678", "EUR").unwrap();
    st.add_transaction(newer);
    st.add_transaction(card_payment());
    st.finish(true, false).unwrap();

    let out = render(&st);
    let earlier = out.find("<MEMO>CARD PAYMENT</MEMO>").expect("earlier");
    let later = out.find("<MEMO>LATER</MEMO>").expect("later");
    assert!(earlier < later);
    assert!(out.contains("<DTSTART>20090301000000</DTSTART>"));
    assert!(out.contains("<DTEND>20090302000000</DTEND>"));
}

#[test]
fn missing_period_is_an_error() {
    let st = Statement::new("12345678", "EUR").unwrap();
    let mut buf = Vec::new();
    assert!(matches!(
        Ofx::write(&mut buf, &st),
        Err(BankjobError::MissingRequiredField(_))
    ));
}

#[test]
fn unset_balances_become_empty_elements() {
    let mut st = Statement::new("12345678", "EUR").unwrap();
    st.add_transaction(card_payment());
    st.set_from_date("2009-03-01").unwrap();
    st.set_to_date("2009-03-01").unwrap();

    let out = render(&st);
    assert_eq!(out.matches("<BALAMT/>").count(), 2, "{out}");
}

#[test]
fn undated_transaction_fails_before_any_output() {
    let mut undated = card_payment();
    undated.date = None;
    let mut st = minimal();
    st.add_transaction(undated);

    let mut buf = Vec::new();
    assert!(matches!(
        Ofx::write(&mut buf, &st),
        Err(BankjobError::MissingRequiredField(_))
    ));
    assert!(buf.is_empty());
}
