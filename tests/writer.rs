mod common;

use std::error::Error;
use std::fs;
use std::process::Command;

use tempfile::tempdir;

use common::writer_bin;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn writes_text_to_file() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("out.txt");

    let status = Command::new(writer_bin()).arg(&path).arg("hello writer").status()?;

    assert!(status.success());
    assert_eq!(fs::read_to_string(&path)?, "hello writer");

    Ok(())
}

#[test]
fn overwrites_existing_file() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("out.txt");
    fs::write(&path, "previous contents, longer than the new ones")?;

    let status = Command::new(writer_bin()).arg(&path).arg("new").status()?;

    assert!(status.success());
    assert_eq!(fs::read_to_string(&path)?, "new");

    Ok(())
}

#[test]
fn wrong_argument_count_exits_with_one() -> TestResult {
    let too_few = Command::new(writer_bin()).arg("only-one").status()?;
    let too_many = Command::new(writer_bin()).args(["a", "b", "c"]).status()?;

    assert_eq!(too_few.code(), Some(1));
    assert_eq!(too_many.code(), Some(1));

    Ok(())
}

#[test]
fn unopenable_destination_exits_with_one() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("missing-dir").join("out.txt");

    let status = Command::new(writer_bin()).arg(&path).arg("text").status()?;

    assert_eq!(status.code(), Some(1));
    assert!(!path.exists());

    Ok(())
}
