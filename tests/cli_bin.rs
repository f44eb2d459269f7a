use std::process::Command;

fn bgpship() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bgpship"))
}

#[test]
fn self_test_passes_on_default_board() {
    let output = bgpship().arg("self-test").output().expect("failed to run bgpship");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    assert!(stdout.contains("codec ok for 10x10 board"));
}

#[test]
fn out_of_range_announce_is_refused_before_touching_bird() {
    let dir = tempfile::tempdir().unwrap();
    let output = bgpship()
        .args(["announce", "--counter", "1", "--x", "16", "--y", "0"])
        .arg("--sock-file")
        .arg(dir.path().join("bird.ctl"))
        .arg("--template-file")
        .arg(dir.path().join("conf.orig"))
        .arg("--conf-file")
        .arg(dir.path().join("bird.conf"))
        .output()
        .expect("failed to run bgpship");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("non utf8 output");
    assert!(stderr.contains("does not fit"));
    assert!(!dir.path().join("bird.conf").exists());
}

#[test]
fn read_without_daemon_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let output = bgpship()
        .arg("read")
        .arg("--sock-file")
        .arg(dir.path().join("bird.ctl"))
        .output()
        .expect("failed to run bgpship");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("non utf8 output");
    assert!(stderr.contains("transport error"));
}
