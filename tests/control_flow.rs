use tgl::{Interpreter, InterpreterConfig, TglString};

fn interp() -> Interpreter {
    Interpreter::new(InterpreterConfig::from_env())
}

#[test]
fn counted_for_long_and_short_forms_match_scenario_three() {
    let mut long = interp();
    long.exec_code(&TglString::from("\"n\" 0 5 ( rs \"x\" c Rs ) f rs")).unwrap();
    assert_eq!(long.stack.pop().unwrap().as_bytes(), b"xxxxx");

    let mut short = interp();
    short.exec_code(&TglString::from("5 ( rs \"x\" c Rs ) F rs")).unwrap();
    assert_eq!(short.stack.pop().unwrap().as_bytes(), b"xxxxx");
}

#[test]
fn code_block_and_if_matches_scenario_four() {
    let mut i = interp();
    i.exec_code(&TglString::from("1 ( \"true\" Rx ) ( \"false\" Rx ) i")).unwrap();
    assert_eq!(i.registers.peek(b'x').as_bytes(), b"true");
}

#[test]
fn while_loop_runs_until_condition_false() {
    let mut i = interp();
    i.exec_code(&TglString::from("0Rc ( rc 3 < ) ( rc 1 + Rc ) w")).unwrap();
    assert_eq!(i.registers.peek(b'c').as_bytes(), b"3");
}

#[test]
fn each_iterates_every_byte_of_the_string() {
    let mut i = interp();
    i.exec_code(&TglString::from("\"abc\" ( rx rc c Rx ) e")).unwrap();
    assert_eq!(i.registers.peek(b'x').as_bytes(), b"abc");
}

#[test]
fn failed_command_leaves_the_stack_untouched() {
    let mut i = interp();
    i.stack.push(TglString::from("5"));
    let err = i.exec_code(&TglString::from("+")).unwrap_err();
    assert!(matches!(err, tgl::TglError::Underflow));
    assert_eq!(i.stack.depth(), 1);
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"5");
}
