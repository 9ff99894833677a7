use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/card_checkout.csv")
        .args(["--latency-ms", "0", "--today", "2025-10-01"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "screen,method,subtotal,fee,total,email,receipt_id",
        ))
        // 25 * 2.9% + 0.30 = 1.025, rounded half away from zero
        .stdout(predicate::str::contains(
            "receipt,card,25.00,1.03,26.03,alex.morgan@example.com,RCP-",
        ));

    Ok(())
}

#[test]
fn test_manual_card_entry() {
    let mut rows = common::card_rows();
    rows.push(["submit", "", ""]);
    let script = common::write_script(&rows).unwrap();

    let mut cmd = Command::new(cargo_bin!("checkout-engine"));
    cmd.arg(script.path())
        .args(["--latency-ms", "0", "--today", "2025-10-01"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "success,card,10.00,0.59,10.59,payer@example.com,",
        ));
}

#[test]
fn test_bank_and_express_fees() {
    let bank = common::write_script(&[
        ["pick_amount", "50", ""],
        ["select_method", "bank", ""],
        ["bank_type", "euro", ""],
        ["set_field", "routing", "deutdeff"],
        ["set_field", "account", "DE89370400440532013000"],
        ["submit", "", ""],
    ])
    .unwrap();

    Command::new(cargo_bin!("checkout-engine"))
        .arg(bank.path())
        .args(["--latency-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("success,bank,50.00,0.50,50.50,,"));

    let express = common::write_script(&[
        ["open_express", "google", ""],
        ["submit", "", ""],
        ["view_receipt", "", ""],
    ])
    .unwrap();

    Command::new(cargo_bin!("checkout-engine"))
        .arg(express.path())
        .args(["--latency-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "receipt,express_google,10.00,0.59,10.59,,RCP-",
        ));
}

#[test]
fn test_json_summary() {
    let script = common::write_script(&[["select_method", "crypto", ""]]).unwrap();

    Command::new(cargo_bin!("checkout-engine"))
        .arg(script.path())
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"screen\": \"crypto_form\""))
        .stdout(predicate::str::contains("\"total\": \"10.05\""));
}

#[test]
fn test_missing_script_fails() {
    Command::new(cargo_bin!("checkout-engine"))
        .arg("tests/fixtures/does_not_exist.csv")
        .assert()
        .failure();
}
