use serial_test::serial;
use std::io::Write;
use whitelist_dapp::core::config::{
    DappConfig, CHAIN_ID_ENV, CONFIG_PATH_ENV, CONTRACT_ADDRESS_ENV, PRIVATE_KEY_ENV, RPC_URL_ENV,
};
use whitelist_dapp::core::errors::DappError;

const CONTRACT: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

fn clear_env() {
    for var in [CONFIG_PATH_ENV, RPC_URL_ENV, CONTRACT_ADDRESS_ENV, CHAIN_ID_ENV, PRIVATE_KEY_ENV] {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn load_reads_explicit_file() {
    clear_env();
    let file = write_config(&format!(
        r#"
        contract_address = "{CONTRACT}"
        [network]
        name = "devnet"
        rpc_url = "http://10.1.1.1:8545"
        chain_id = 31337
        "#
    ));

    let config = DappConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.network.name, "devnet");
    assert_eq!(config.network.chain_id, 31337);
    assert_eq!(config.network.rpc_url, "http://10.1.1.1:8545");
    assert!(config.contract_address().is_ok());
}

#[test]
#[serial]
fn env_overrides_file_values() {
    clear_env();
    let file = write_config("[network]\nchain_id = 1\n");
    std::env::set_var(CONFIG_PATH_ENV, file.path());
    std::env::set_var(CHAIN_ID_ENV, "4");
    std::env::set_var(CONTRACT_ADDRESS_ENV, CONTRACT);
    std::env::set_var(RPC_URL_ENV, " http://127.0.0.1:9545 ");

    let config = DappConfig::load(None).unwrap();
    clear_env();

    assert_eq!(config.network.chain_id, 4);
    assert_eq!(config.network.rpc_url, "http://127.0.0.1:9545");
    assert_eq!(config.contract_address.as_deref(), Some(CONTRACT));
}

#[test]
#[serial]
fn non_numeric_chain_id_is_rejected() {
    clear_env();
    let file = write_config("");
    std::env::set_var(CHAIN_ID_ENV, "rinkeby");

    let res = DappConfig::load(Some(file.path()));
    clear_env();

    assert!(matches!(res, Err(DappError::Config(_))));
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(DappConfig::load(Some(&missing)), Err(DappError::Config(_))));
}

#[test]
#[serial]
fn signing_key_is_optional() {
    clear_env();
    assert!(DappConfig::signing_key_from_env().unwrap().is_none());

    std::env::set_var(PRIVATE_KEY_ENV, format!("0x{}", "22".repeat(32)));
    let key = DappConfig::signing_key_from_env();
    clear_env();
    assert!(key.unwrap().is_some());
}

#[test]
#[serial]
fn malformed_signing_key_is_an_error() {
    clear_env();
    std::env::set_var(PRIVATE_KEY_ENV, "0x1234");
    let key = DappConfig::signing_key_from_env();
    clear_env();
    assert!(matches!(key, Err(DappError::InvalidKey(_))));
}

#[test]
#[serial]
fn padded_signing_key_is_accepted() {
    clear_env();
    std::env::set_var(PRIVATE_KEY_ENV, format!("  0x{}\n", "33".repeat(32)));
    let key = DappConfig::signing_key_from_env();
    clear_env();
    let key = key.unwrap().expect("key should be present");
    assert!(key.with_secret(|k| k.iter().all(|&b| b == 0x33)));
}

#[test]
#[serial]
fn blank_signing_key_means_no_wallet() {
    clear_env();
    std::env::set_var(PRIVATE_KEY_ENV, "   ");
    let key = DappConfig::signing_key_from_env();
    clear_env();
    assert!(key.unwrap().is_none());
}
