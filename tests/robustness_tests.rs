mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_malformed_cart_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let catalog = common::write_catalog(dir.path())?;
    let cart = common::write_cart(
        dir.path(),
        &[
            ("2", "1"),
            // Non-numeric product id
            ("abc", "1"),
            // Non-numeric quantity
            ("14", "lots"),
            // Negative quantity
            ("14", "-2"),
            ("2", "2"),
        ],
    )?;

    let mut cmd = Command::new(cargo_bin!("freshcart"));
    cmd.arg("quote")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--cart")
        .arg(&cart);

    let output = cmd
        .assert()
        .success()
        .stderr(predicate::str::contains("Error reading cart line"))
        .stderr(predicate::str::contains("Skipping cart line"))
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output)?;
    // 1 + 2 carrots merged into one line
    assert_eq!(json["lines"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["lines"][0]["quantity"], "3 items");
    assert_eq!(json["grand_total"], "$5.97");
    Ok(())
}

#[test]
fn test_unknown_and_inactive_products_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let catalog = common::write_catalog(dir.path())?;
    let cart = common::write_cart(
        dir.path(),
        &[("999", "1"), ("41", "1"), ("220", "1"), ("14", "1")],
    )?;

    let mut cmd = Command::new(cargo_bin!("freshcart"));
    cmd.arg("quote")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--cart")
        .arg(&cart);

    let output = cmd
        .assert()
        .success()
        .stderr(predicate::str::contains("Product 999 not found"))
        .stderr(predicate::str::contains(
            "Product 41 is not available for purchase",
        ))
        .stderr(predicate::str::contains("Product 220 not found"))
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output)?;
    assert_eq!(json["subtotal"], "$13.99");
    Ok(())
}

#[test]
fn test_quantities_snapped_and_clamped() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let catalog = common::write_catalog(dir.path())?;
    let cart = common::write_cart(
        dir.path(),
        &[
            // 9 kg of tomatoes caps at 5 kg
            ("32", "9"),
            // 0.8 kg of potatoes snaps to 1 kg in 500 g steps
            ("51", "0.8"),
            // zero walnuts raise to the minimum of one 100 g unit
            ("40", "0"),
            // 25 boxes caps at 20
            ("14", "25"),
        ],
    )?;

    let mut cmd = Command::new(cargo_bin!("freshcart"));
    cmd.arg("quote")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--cart")
        .arg(&cart);

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: Value = serde_json::from_slice(&output)?;

    assert_eq!(json["lines"][0]["quantity"], "5kg");
    assert_eq!(json["lines"][0]["total"], "$24.95");
    assert_eq!(json["lines"][1]["quantity"], "1kg");
    assert_eq!(json["lines"][1]["total"], "$3.50");
    assert_eq!(json["lines"][2]["quantity"], "100g");
    assert_eq!(json["lines"][2]["total"], "$2.40");
    assert_eq!(json["lines"][3]["quantity"], "20 items");
    assert_eq!(json["lines"][3]["total"], "$279.80");
    Ok(())
}

#[test]
fn test_oversized_catalog_price_is_diagnostic() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let catalog = dir.path().join("products.json");
    std::fs::write(
        &catalog,
        r#"[{ "id": 1, "name": "Gold leaf", "price": "79228162514264337593543950335", "unit": "each" }]"#,
    )?;
    let cart = common::write_cart(dir.path(), &[("1", "2")])?;

    let mut cmd = Command::new(cargo_bin!("freshcart"));
    cmd.arg("quote")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--cart")
        .arg(&cart);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Price must not exceed"))
        .stderr(predicate::str::contains("panicked").not());
    Ok(())
}

#[test]
fn test_missing_catalog_file() {
    let mut cmd = Command::new(cargo_bin!("freshcart"));
    cmd.arg("quote")
        .args(["--catalog", "does-not-exist.json"])
        .args(["--cart", "does-not-exist.csv"]);

    cmd.assert().failure();
}
