use assert_cmd::Command;
use assert_fs::{
    prelude::{FileWriteStr, PathChild},
    NamedTempFile, TempDir,
};
use predicates::prelude::predicate;

const INSTANCE: &str = "node(a, transmit_4).\nnode(b).\nedge(a,b).\ninitial(a).\nfinal(b).\n";

#[test]
fn test_encode_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("network.tn")?;
    file.write_str(INSTANCE)?;
    let mut cmd = Command::cargo_bin("tunnelsat")?;
    cmd.arg("encode-to-sat")
        .arg("-f")
        .arg(file.path())
        .arg("-l")
        .arg("1");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("c 2 occupied(0,0,0)\n"))
        .stdout(predicate::str::is_match(r"(?m)^p cnf \d+ \d+$")?);
    file.close()?;
    Ok(())
}

#[test]
fn test_encode_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("network.tn")?;
    file.write_str(INSTANCE)?;
    let dir = TempDir::new()?;
    let output = dir.child("encoding.cnf");
    let mut cmd = Command::cargo_bin("tunnelsat")?;
    cmd.arg("encode-to-sat")
        .arg("-f")
        .arg(file.path())
        .arg("-l")
        .arg("1")
        .arg("-o")
        .arg(output.path());
    cmd.assert().success().stdout(predicate::str::is_empty());
    let content = std::fs::read_to_string(output.path())?;
    assert!(content.lines().any(|l| l.starts_with("p cnf ")));
    file.close()?;
    dir.close()?;
    Ok(())
}
