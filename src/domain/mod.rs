//! Pure pricing rules and value types. Nothing in here performs I/O.

pub mod cart;
pub mod cutoff;
pub mod delivery;
pub mod money;
pub mod ports;
pub mod product;
pub mod unit;
