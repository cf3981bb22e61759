use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("sporecart");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env_remove("SPORECART_LOG");
    (command, temp_home)
}

#[allow(dead_code)]
pub fn write_config(home: &Path, extra: &str) {
    let config_dir = home.join(".config").join("sporecart");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(
        config_dir.join("config.toml"),
        format!(
            r#"
version = 1

[api]
base_url = "https://shop.example.test/api"
{extra}"#
        ),
    )
    .expect("write config");
}

#[allow(dead_code)]
pub fn write_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("fixture.json");
    fs::write(
        &path,
        r#"{
  "rates": [
    {"id": "a", "provider": "USPS", "service": "Priority", "amount": "5.00"},
    {"id": "b", "provider": "UPS", "service": "Ground", "amount": "3.50"},
    {"id": "c", "provider": "FedEx", "service": "Freight", "amount": "quote"}
  ],
  "returns": [
    {"id": "ret-1", "order_id": "o-1", "status": "pending", "updated_at": "2026-01-05T10:00:00Z"},
    {"id": "ret-2", "order_id": "o-2", "status": "completed", "updated_at": "2026-02-05T10:00:00Z"}
  ],
  "cart": [
    {"product_id": "blue-oyster", "name": "Blue Oyster grow kit", "unit_price": "20.00", "quantity": 2},
    {"product_id": "agar", "name": "Agar plates", "unit_price": "12.50", "quantity": 1}
  ]
}"#,
    )
    .expect("write fixture");
    path
}
