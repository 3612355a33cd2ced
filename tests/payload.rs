use tgl::{Interpreter, InterpreterConfig, TglString};

fn interp() -> Interpreter {
    Interpreter::new(InterpreterConfig::from_env())
}

#[test]
fn each_iterates_whitespace_items_matches_scenario_five() {
    let mut i = interp();
    i.payload.set_payload(TglString::from("a b c"));
    i.exec_code(&TglString::from("( rp Rx ) ,e")).unwrap();
    assert_eq!(i.registers.peek(b'x').as_bytes(), b"c");
}

#[test]
fn item_count_and_indexed_lookup() {
    let mut i = interp();
    i.payload.set_payload(TglString::from("a b c"));
    i.exec_code(&TglString::from(",I")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"3");

    i.exec_code(&TglString::from("1 ,i")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"b");
}

#[test]
fn key_value_lookup_matches_name_and_age() {
    let mut i = interp();
    i.payload.set_payload(TglString::from("name bob age 9"));
    i.exec_code(&TglString::from("\"age\" ,k")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"9");
}

#[test]
fn bracket_balancing_matches_scenario_ten() {
    let mut i = interp();
    i.payload.set_payload(TglString::from("(a b) c"));
    i.exec_code(&TglString::from(",I")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"2");
    i.exec_code(&TglString::from("0 ,i")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"a b");

    // Disabling paren balancing splits the previously-balanced item on
    // its inner whitespace too.
    i.exec_code(&TglString::from("0 ,/b(")).unwrap();
    i.exec_code(&TglString::from(",I")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"3");
}

#[test]
fn nested_payload_frame_is_restored_after_x() {
    let mut i = interp();
    i.payload.set_payload(TglString::from("outer"));
    i.exec_code(&TglString::from("\"inner payload\" ( ,c Rn ) ,x")).unwrap();
    assert_eq!(i.registers.peek(b'n').as_bytes(), b"inner");
    assert_eq!(i.payload.current_item().as_bytes(), b"outer");
}
