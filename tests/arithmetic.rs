use tgl::{Interpreter, InterpreterConfig, TglError, TglString};

fn interp() -> Interpreter {
    Interpreter::new(InterpreterConfig::from_env())
}

#[test]
fn addition_and_print_matches_scenario_one() {
    let mut i = interp();
    i.exec_code(&TglString::from("3 4 +")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"7");
}

#[test]
fn division_by_zero_fails_with_documented_message() {
    let mut i = interp();
    let err = i.exec_code(&TglString::from("10 0 /")).unwrap_err();
    assert!(matches!(err, TglError::Semantic(ref m) if m.contains("Division by zero")));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn integer_base_round_trip() {
    for n in [0_i64, 1, 255, 65535, (1_i64 << 31) - 1] {
        let hex = TglString::from_int_radix(n, 16);
        let full_hex = TglString::from("0x").append(&hex);
        assert_eq!(full_hex.parse_int(), Some(n));
    }
}

#[test]
fn comparisons_push_boolean_ints() {
    let mut i = interp();
    i.exec_code(&TglString::from("3 4 <")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"1");
    i.exec_code(&TglString::from("3 4 >")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"0");
}

#[test]
fn stack_underflow_is_reported() {
    let mut i = interp();
    let err = i.exec_code(&TglString::from("+")).unwrap_err();
    assert!(matches!(err, TglError::Underflow));
}
