use crate::domain::product::ProductRecord;
use crate::error::Result;
use std::io::Read;

/// Reads a JSON array of product records, as served by the products API.
pub fn read_catalog<R: Read>(source: R) -> Result<Vec<ProductRecord>> {
    Ok(serde_json::from_reader(source)?)
}
