use bankjoblib::{
    error::BankjobError,
    support::{capitalize_words, create_date_time, string_to_decimal, DecimalSeparator, ToDecimal},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[test]
fn comma_decimal_with_dot_thousands() {
    let d = string_to_decimal("1.000.030,99", DecimalSeparator::Comma).expect("parse");
    assert_eq!(d, Decimal::new(100003099, 2));
}

#[test]
fn period_decimal_with_comma_thousands() {
    let d = string_to_decimal("1,234.56", DecimalSeparator::Period).expect("parse");
    assert_eq!(d, Decimal::new(123456, 2));
}

#[test]
fn whitespace_is_stripped() {
    // неразрывный пробел как разделитель тысяч
    let d = string_to_decimal(" -1\u{a0}234,5 ", DecimalSeparator::Comma).expect("parse");
    assert_eq!(d, Decimal::new(-12345, 1));
}

#[test]
fn decimals_pass_through_unchanged() {
    let v = Decimal::new(-1230, 2);
    assert_eq!(v.to_decimal(DecimalSeparator::Comma).unwrap(), v);
    assert_eq!(v.to_decimal(DecimalSeparator::Period).unwrap(), v);
}

#[test]
fn garbage_is_malformed() {
    for raw in ["", "   ", "abc", "12..5,0"] {
        let err = string_to_decimal(raw, DecimalSeparator::Period).unwrap_err();
        assert!(matches!(err, BankjobError::MalformedAmount { .. }), "{raw:?}");
    }
}

#[test]
fn separator_from_char() {
    assert_eq!(DecimalSeparator::try_from(',').unwrap(), DecimalSeparator::Comma);
    assert_eq!(DecimalSeparator::try_from('.').unwrap(), DecimalSeparator::Period);
    assert!(DecimalSeparator::try_from(';').is_err());
}

#[test]
fn date_forms() {
    let day = NaiveDate::from_ymd_opt(2009, 3, 1).unwrap();
    for raw in ["2009-03-01", "01/03/2009", "01.03.2009", "20090301"] {
        let d = create_date_time(raw).unwrap().expect(raw);
        assert_eq!(d, day.and_hms_opt(0, 0, 0).unwrap(), "{raw}");
    }
    for raw in ["2009-03-01 14:05:09", "2009-03-01T14:05:09", "20090301140509"] {
        let d = create_date_time(raw).unwrap().expect(raw);
        assert_eq!(d, day.and_hms_opt(14, 5, 9).unwrap(), "{raw}");
    }
    assert_eq!(create_date_time("  ").unwrap(), None);
    assert!(matches!(
        create_date_time("next tuesday"),
        Err(BankjobError::InvalidDate(_))
    ));
}

#[test]
fn capitalize() {
    assert_eq!(capitalize_words("CARD PAYMENT TO tesco").unwrap(), "Card Payment To Tesco");
    assert_eq!(capitalize_words("o'neill-smith").unwrap(), "O'Neill-Smith");
    assert_eq!(capitalize_words("POS 24/7 shop_ONE").unwrap(), "Pos 24/7 Shop_one");
    assert_eq!(capitalize_words("").unwrap(), "");
}
