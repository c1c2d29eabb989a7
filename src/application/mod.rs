//! Application layer orchestrating the pricing rules.
//!
//! `PricingEngine` is the pure pricing core. `CheckoutService` wires it to the
//! catalog, rewards ledger and clock ports and enforces the preview/finalize split.

pub mod checkout;
pub mod engine;
