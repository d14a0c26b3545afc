use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn ctutor() -> Command {
    Command::cargo_bin("ctutor").unwrap()
}

#[test]
fn test_plain_sample_run() {
    ctutor()
        .args(["--plain", "--sample", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Hello, Mars Rover!\n\n编译成功！"))
        .stdout(predicate::str::contains("内存使用: 0.1MB"));
}

#[test]
fn test_plain_file_with_stdin() {
    ctutor()
        .args(["--plain", "demos/input.c", "--stdin", "7, 1.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[输入]: 7, 1.5\n"))
        .stdout(predicate::str::contains("您输入的整数是：7\n"))
        .stdout(predicate::str::contains("价格的两倍是：3.00\n"));
}

#[test]
fn test_limit_flag_aborts_with_status_one() {
    let dir = std::env::temp_dir().join("ctutor-cli-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("spin.c");
    std::fs::write(&path, "int main() {\n    while (1) { }\n    return 0;\n}\n").unwrap();

    ctutor()
        .arg("--plain")
        .arg(&path)
        .args(["--max-iterations", "3"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("循环次数超过 3 次"));
}

#[test]
fn test_syntax_error_report() {
    let dir = std::env::temp_dir().join("ctutor-cli-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("broken.c");
    std::fs::write(&path, "int main() {\n    printf(\"hi\");\n").unwrap();

    ctutor()
        .arg("--plain")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("语法错误："));
}

#[test]
fn test_list_samples() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("ctutor")?;

    cmd.arg("--list-samples");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fibonacci"))
        .stdout(predicate::str::contains("loop-test"));

    Ok(())
}

#[test]
fn test_unknown_sample() {
    ctutor()
        .args(["--plain", "--sample", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_missing_file() {
    ctutor()
        .args(["--plain", "does/not/exist.c"])
        .assert()
        .failure();
}
