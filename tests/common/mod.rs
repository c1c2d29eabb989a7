#![allow(dead_code)]

use std::fs;
use std::io::Error;
use std::path::{Path, PathBuf};

pub const CATALOG_JSON: &str = r#"[
    { "id": 32, "name": "Gourmet Tomatoes", "category": "vegetables", "price": 4.99, "unit": "kg", "increment": "100g", "active": true },
    { "id": 2, "name": "Carrots", "category": "vegetables", "price": 1.99, "unit": "each", "active": true },
    { "id": 14, "name": "Veggie Box", "category": "boxes", "price": 13.99, "unit": "each", "active": true },
    { "id": 40, "name": "Walnuts", "category": "nuts", "price": 24.00, "unit": "hundredg", "active": true },
    { "id": 51, "name": "Potatoes", "category": "vegetables", "price": 3.50, "unit": "kg", "increment": "500g", "active": true },
    { "id": 41, "name": "Feijoas", "category": "fruit", "price": 3.00, "unit": "punnet", "active": false },
    { "id": 220, "name": "", "category": "nuts", "price": 0, "unit": "hundredg", "active": false }
]"#;

/// Thursday 2026-10-15, one minute before the next-day cutoff.
pub const BEFORE_CUTOFF: &str = "2026-10-15T19:59:00";
/// Saturday 2026-10-17, not a next-day fulfilment day.
pub const SATURDAY: &str = "2026-10-17T10:00:00";

pub fn write_catalog(dir: &Path) -> Result<PathBuf, Error> {
    let path = dir.join("products.json");
    fs::write(&path, CATALOG_JSON)?;
    Ok(path)
}

pub fn write_cart(dir: &Path, rows: &[(&str, &str)]) -> Result<PathBuf, Error> {
    let path = dir.join("cart.csv");
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(["product_id", "quantity"])?;
    for (product_id, quantity) in rows {
        wtr.write_record([*product_id, *quantity])?;
    }
    wtr.flush()?;
    Ok(path)
}

pub fn write_config(dir: &Path, json: &str) -> Result<PathBuf, Error> {
    let path = dir.join("pricing.json");
    fs::write(&path, json)?;
    Ok(path)
}
