use assert_cmd::Command;

fn whitelist_dapp() -> Command {
    let mut cmd = Command::cargo_bin("whitelist-dapp").unwrap();
    for var in [
        "WHITELIST_CONFIG",
        "WHITELIST_RPC_URL",
        "WHITELIST_CONTRACT_ADDRESS",
        "WHITELIST_CHAIN_ID",
        "WHITELIST_PRIVATE_KEY",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = whitelist_dapp().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["status", "connect", "count", "join"] {
        assert!(stdout.contains(sub), "missing {} in help: {}", sub, stdout);
    }
}

#[test]
fn unknown_subcommand_fails() {
    whitelist_dapp().arg("transfer").assert().failure();
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let output = whitelist_dapp().arg("--config").arg(&missing).arg("status").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load configuration"), "stderr: {}", stderr);
}

#[test]
fn missing_contract_address_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = whitelist_dapp().current_dir(dir.path()).arg("status").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("contract_address is not set"), "stderr: {}", stderr);
}

const CONTRACT: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

fn run_without_wallet(subcommand: &str) -> std::process::Output {
    let dir = tempfile::tempdir().unwrap();
    whitelist_dapp()
        .current_dir(dir.path())
        .env("WHITELIST_CONTRACT_ADDRESS", CONTRACT)
        .arg(subcommand)
        .output()
        .unwrap()
}

#[test]
fn without_wallet_page_offers_connect() {
    let output = run_without_wallet("status");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Connect your wallet"), "stdout: {}", stdout);
    assert!(stdout.contains("0 have already joined the Whitelist"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("alert: No wallet found"), "stderr: {}", stderr);
}

#[test]
fn connect_without_wallet_fails() {
    let output = run_without_wallet("connect");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Connect your wallet"), "stdout: {}", stdout);
    assert!(stderr.contains("wallet is not connected"), "stderr: {}", stderr);
}

#[test]
fn count_without_wallet_fails() {
    let output = run_without_wallet("count");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stdout.contains("have already joined"), "stdout: {}", stdout);
    assert!(stderr.contains("wallet is not connected"), "stderr: {}", stderr);
}

#[test]
fn join_without_wallet_renders_page_without_sending() {
    let output = run_without_wallet("join");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Connect your wallet"), "stdout: {}", stdout);
    assert!(!stderr.contains("Join transaction pending"), "stderr: {}", stderr);
    assert!(!stderr.contains("Joined the whitelist"), "stderr: {}", stderr);
}
