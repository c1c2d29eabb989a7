use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Domain error: {0}")]
    DomainError(String),
    #[error("Product {0} not found")]
    ProductNotFound(u32),
    #[error("Product {0} is not available for purchase")]
    ProductUnavailable(u32),
    #[error("Delivery is not available to postcode '{0}'")]
    DeliveryUnavailable(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PricingError>;
