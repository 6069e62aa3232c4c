mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

#[test]
fn test_cli_merchants() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("push-provisioning"));
    cmd.arg("merchants");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"totalCount\": 7"))
        .stdout(predicate::str::contains("Myntra"))
        .stdout(predicate::str::contains("VISA_MERCHANT_007"));

    Ok(())
}

#[test]
fn test_cli_provision_single_merchant() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("push-provisioning"));
    cmd.args(["provision", "--merchant-app-ids", "1", "--card-identifier", "x"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"merchantName\": \"Myntra\""))
        .stdout(predicate::str::contains("\"outcome\": \"SUCCESS\""))
        .stdout(predicate::str::contains("TKN_"));

    Ok(())
}

#[test]
fn test_cli_provision_unknown_merchant_fails() {
    let mut cmd = Command::new(cargo_bin!("push-provisioning"));
    cmd.args(["provision", "--merchant-app-ids", "999"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid merchant app IDs: [999]"));
}

#[test]
fn test_cli_catalog_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut catalog = tempfile::NamedTempFile::new()?;
    write!(
        catalog,
        r#"{{
            "merchants": [
                {{"id": 21, "name": "Cafe Coffee Day", "externalMerchantId": "EXT_CCD", "category": "Food"}}
            ],
            "card": {{
                "cardNumber": "4111111111111111",
                "cardHolderName": "A N OTHER",
                "expiryDate": "01/30",
                "cvv": "999",
                "cardType": "visa",
                "issuerBankId": "TEST_BANK",
                "availableLimit": 1000,
                "totalOutstanding": 0,
                "nextStatementDate": "2030-01-01",
                "unspentAmount": 0
            }}
        }}"#
    )?;

    let mut cmd = Command::new(cargo_bin!("push-provisioning"));
    cmd.arg("--catalog")
        .arg(catalog.path())
        .args(["provision", "--merchant-app-ids", "21"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("EXT_CCD"))
        .stdout(predicate::str::contains("Cafe Coffee Day"));

    let mut cmd = Command::new(cargo_bin!("push-provisioning"));
    cmd.arg("--catalog").arg(catalog.path()).arg("merchants");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"totalCount\": 1"))
        .stdout(predicate::str::contains("Myntra").not());

    Ok(())
}

#[test]
fn test_cli_rejects_malformed_transactions_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let good = dir.path().join("transactions.csv");
    common::write_transactions_csv(&good)?;

    let mut cmd = Command::new(cargo_bin!("push-provisioning"));
    cmd.arg("--transactions").arg(&good).arg("merchants");
    cmd.assert().success();

    let bad = dir.path().join("bad.csv");
    std::fs::write(
        &bad,
        "id,merchant,amount,date,type,status,tokenUsed,tokenReferenceId\n\
         TXN_1,Uber,lots,2024-01-01,ride,completed,false,\n",
    )?;

    let mut cmd = Command::new(cargo_bin!("push-provisioning"));
    cmd.arg("--transactions").arg(&bad).arg("merchants");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("CSV error"));

    Ok(())
}
