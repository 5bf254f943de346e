use bankjoblib::{
    formats::{console::Console, csv::Csv, qif::Qif},
    model::{Statement, Transaction, TransactionType},
    support::DecimalSeparator,
    traits::WriteFormat,
};

fn tx(date: &str, kind: TransactionType, desc: &str, amount: &str, balance: &str) -> Transaction {
    let mut t = Transaction::with_decimal(DecimalSeparator::Comma);
    t.set_date(date).unwrap();
    t.kind = kind;
    t.raw_description = desc.into();
    t.amount = amount.into();
    t.new_balance = balance.into();
    t
}

/// Две транзакции в порядке сайта (свежая первой).
fn sample() -> Statement {
    let mut st = Statement::new("12345678", "EUR").unwrap();
    st.set_bank_id(Some("1234".into())).unwrap();
    st.add_transaction(tx(
        "2009-03-02",
        TransactionType::Credit,
        "SALARY",
        "1.500,00",
        "2.487,70",
    ));
    st.add_transaction(tx(
        "2009-03-01",
        TransactionType::Debit,
        "CARD PAYMENT TO A VERY LONG MERCHANT NAME THAT GOES ON AND ON",
        "-12,30",
        "987,70",
    ));
    st.finish(true, false).unwrap();
    st
}

fn render<F: WriteFormat>(st: &Statement) -> String {
    let mut buf = Vec::new();
    F::write(&mut buf, st).expect("write");
    String::from_utf8(buf).expect("utf-8")
}

const SUMMARY: &str = "\
Account Number : 12345678
Bank ID        : 1234
Account Type   : CHECKING
Closing balance: 2487.70
Available funds: 2487.70
Currency       : EUR
";

#[test]
fn csv_layout() {
    let expected = "\
Account Number,12345678
Bank ID,1234
Account Type,CHECKING
Closing balance,2487.70
Available funds,2487.70
Currency,EUR

2009-03-01,DEBIT,CARD PAYMENT TO A VERY LONG MERCHANT NAME THAT GOES ON AND ON,-12.30
2009-03-02,CREDIT,SALARY,1500.00
";
    assert_eq!(render::<Csv>(&sample()), expected);
}

#[test]
fn csv_quotes_descriptions_with_commas() {
    let mut st = Statement::new("12345678", "EUR").unwrap();
    st.add_transaction(tx("2009-03-01", TransactionType::Pos, "SHOP, DUBLIN", "-1,00", "9,00"));
    st.finish(true, false).unwrap();
    let out = render::<Csv>(&st);
    assert!(out.ends_with("2009-03-01,POS,\"SHOP, DUBLIN\",-1.00\n"), "{out}");
}

#[test]
fn qif_layout() {
    let expected = format!(
        "{SUMMARY}
!Type:Bank
D03/01/2009
T-12.30
PCARD PAYMENT TO A VERY LONG MERCHANT NAME THAT GOES ON AND ON
^
D03/02/2009
T1500.00
PSALARY
^
"
    );
    assert_eq!(render::<Qif>(&sample()), expected);
}

#[test]
fn console_layout() {
    let expected = format!(
        "{SUMMARY}
2009-03-01 DEBIT    CARD PAYMENT TO A VERY LONG MERCHANT NAME THAT GO     -12,30
2009-03-02 CREDIT   SALARY                                              1.500,00
"
    );
    assert_eq!(render::<Console>(&sample()), expected);
}

#[test]
fn writers_use_the_cleaned_description() {
    let mut st = sample();
    st.transactions[0].set_description("Salary March");
    assert!(render::<Qif>(&st).contains("PSalary March\n"));
    assert!(render::<Csv>(&st).contains(",Salary March,"));
    assert!(render::<Console>(&st).contains(" Salary March "));
}

#[test]
fn writers_leave_the_statement_alone() {
    let st = sample();
    let before = st.clone();
    render::<Csv>(&st);
    render::<Qif>(&st);
    render::<Console>(&st);
    assert_eq!(st, before);
    assert_eq!(st.transactions[0].raw_description, "SALARY");
}
