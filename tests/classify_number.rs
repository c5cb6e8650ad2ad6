use jetjson::number::{parse_f64, parse_signed, parse_unsigned, validate_float};
use jetjson::{is_digit, is_structural_stop, is_whitespace, is_whitespace_or_separator, ErrorCode};

#[test]
fn byte_classes() {
    for b in [b' ', b'\t', b'\n', b'\r'] {
        assert!(is_whitespace(b));
        assert!(is_whitespace_or_separator(b));
    }
    assert!(is_whitespace_or_separator(b','));
    assert!(!is_whitespace(b','));
    assert!(!is_whitespace_or_separator(b':'));

    assert!((b'0'..=b'9').all(is_digit));
    assert!(!is_digit(b'/'));
    assert!(!is_digit(b':'));

    for b in [b'.', b']', b'}', b','] {
        assert!(is_structural_stop(b));
    }
    assert!(!is_structural_stop(b'{'));
    assert!(!is_structural_stop(b' '));
}

#[test]
fn converter_checks_each_step() {
    assert_eq!(parse_unsigned(b"255", 0, 255).unwrap(), 255);
    let err = parse_unsigned(b"256", 10, 255).unwrap_err();
    assert_eq!(err.code, ErrorCode::NumberOverflow);
    assert_eq!(err.offset, 10);

    assert_eq!(parse_signed(b"128", 0, 127, true).unwrap(), -128);
    assert!(parse_signed(b"128", 0, 127, false).unwrap_err().is_overflow());
    assert_eq!(parse_signed(b"0", 0, 127, true).unwrap(), 0);
}

#[test]
fn converter_positions_errors_in_input_coordinates() {
    let err = parse_unsigned(b"", 7, u64::MAX).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidNumber);
    assert_eq!(err.offset, 7);

    let err = parse_unsigned(b"1x2", 7, u64::MAX).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedByte);
    assert_eq!(err.offset, 8);
    assert_eq!(err.byte, Some(b'x'));
}

#[test]
fn float_grammar() {
    for ok in [&b"0"[..], b"1.5", b"10e3", b"1E+2", b"2.5e-3"] {
        validate_float(ok, 0).unwrap();
    }
    let err = validate_float(b"1.5.2", 4).unwrap_err();
    assert_eq!(err.offset, 7);
    assert_eq!(err.byte, Some(b'.'));
    let err = validate_float(b".5", 0).unwrap_err();
    assert_eq!(err.offset, 0);
    assert_eq!(parse_f64(b"2.5", 0, true).unwrap(), -2.5);
}
