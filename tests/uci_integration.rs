use std::io::Write;
use std::process::{Command, Stdio};

#[test]
fn uci_smoke_test_returns_legal_move() {
    let exe = env!("CARGO_BIN_EXE_harrier");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    let input = b"uci\nisready\nposition startpos moves e2e4\ngo movetime 100\nquit\n";
    child.stdin.as_mut().unwrap().write_all(input).unwrap();

    let output = child.wait_with_output().expect("failed to read output");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("uciok"));
    assert!(stdout.contains("readyok"));

    let bestmove_line = stdout
        .lines()
        .filter(|line| line.starts_with("bestmove"))
        .last()
        .expect("no bestmove found");
    let parts: Vec<&str> = bestmove_line.split_whitespace().collect();
    assert!(parts.len() >= 2, "bestmove missing a move: {bestmove_line}");
    assert_ne!(parts[1], "0000", "engine returned the null move");
}

#[test]
fn uci_reports_id_and_options() {
    let exe = env!("CARGO_BIN_EXE_harrier");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    child.stdin.as_mut().unwrap().write_all(b"uci\nquit\n").unwrap();
    let output = child.wait_with_output().expect("failed to read output");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("id name harrier"));
    assert!(stdout.contains("option name Hash"));
}

#[test]
fn perft_command_reports_node_count() {
    let exe = env!("CARGO_BIN_EXE_harrier");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    child.stdin.as_mut().unwrap().write_all(b"perft 3\nquit\n").unwrap();
    let output = child.wait_with_output().expect("failed to read output");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("8902"), "expected perft 3 node count in output: {stdout}");
}
