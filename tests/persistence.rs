use tgl::{Interpreter, InterpreterConfig, TglString};

#[test]
fn register_values_round_trip_across_interpreter_instances() {
    let path = tempfile::NamedTempFile::new().unwrap().into_temp_path();

    let mut config = InterpreterConfig::from_env();
    config.register_path = path.to_path_buf();

    let mut writer = Interpreter::new(config.clone());
    writer.exec_code(&TglString::from("\"hello\" Rh")).unwrap();
    tgl::persistence::save(&config.register_path, &writer.registers).unwrap();

    let mut reader = Interpreter::new(config.clone());
    tgl::persistence::load(&config.register_path, &mut reader.registers).unwrap();
    assert_eq!(reader.registers.peek(b'h').as_bytes(), b"hello");

    reader.exec_code(&TglString::from("rh")).unwrap();
    assert_eq!(reader.stack.pop().unwrap().as_bytes(), b"hello");
}

#[test]
fn absent_register_file_leaves_fresh_interpreter_untouched() {
    let mut config = InterpreterConfig::from_env();
    config.register_path = std::path::PathBuf::from("/nonexistent/path/for/tgl/registers/test");

    let mut i = Interpreter::new(config.clone());
    tgl::persistence::load(&config.register_path, &mut i.registers).unwrap();
    assert_eq!(i.registers.peek(b'h').as_bytes(), b"");
}
