use crate::error::{PricingError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One requested cart entry: a product id and an external quantity.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CartLine {
    pub product_id: u32,
    pub quantity: Decimal,
}

/// Cart lines from a CSV source with a `product_id, quantity` header.
///
/// Rows are deserialized one at a time; a bad row yields an `Err` and the stream
/// carries on with the next one.
pub struct CartReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CartReader<R> {
    /// Creates a new `CartReader` over any `Read` source, trimming every field.
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes the remaining rows.
    pub fn lines(self) -> impl Iterator<Item = Result<CartLine>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PricingError::from))
    }
}
