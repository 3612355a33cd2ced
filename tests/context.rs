use tgl::{Interpreter, InterpreterConfig, TglString};

fn interp_with_context(name: &str) -> Interpreter {
    let mut config = InterpreterConfig::from_env();
    config.initial_context = name.to_string();
    Interpreter::new(config)
}

#[test]
fn glob_gate_matches_scenario_nine() {
    let mut i = interp_with_context("report.txt");
    i.exec_code(&TglString::from("@= *.txt")).unwrap();
    i.exec_code(&TglString::from("@?")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"1");

    i.exec_code(&TglString::from("@= *.md")).unwrap();
    i.exec_code(&TglString::from("@?")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"0");
}

#[test]
fn contextual_defun_installs_only_when_context_is_active() {
    let mut active = interp_with_context("report.txt");
    active.exec_code(&TglString::from("@= *.txt")).unwrap();
    active.exec_code(&TglString::from("( \"hi\" . ) \"g\" D")).unwrap();
    assert!(active.commands.is_bound(b'g'));

    let mut inactive = interp_with_context("report.txt");
    inactive.exec_code(&TglString::from("@= *.md")).unwrap();
    inactive.exec_code(&TglString::from("( \"hi\" . ) \"g\" D")).unwrap();
    assert!(!inactive.commands.is_bound(b'g'));
}

#[test]
fn context_name_and_extension_are_readable() {
    let mut i = interp_with_context("archive.tar.gz");
    i.exec_code(&TglString::from("@s")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"archive.tar.gz");
    i.exec_code(&TglString::from("@e")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"gz");
}

#[test]
fn xor_gate_toggles_off_when_already_matching() {
    let mut i = interp_with_context("foo.txt");
    i.exec_code(&TglString::from("@= *.txt")).unwrap();
    i.exec_code(&TglString::from("@^ *.txt")).unwrap();
    i.exec_code(&TglString::from("@?")).unwrap();
    assert_eq!(i.stack.pop().unwrap().as_bytes(), b"0");
}
