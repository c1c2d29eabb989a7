use crate::application::checkout::{CheckoutPreview, OrderReceipt};
use crate::application::engine::CartSummary;
use crate::domain::cart::CartLineItem;
use crate::domain::cutoff::CutoffStatus;
use crate::domain::delivery::{DeliveryContext, FulfilmentMethod};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Whether a report describes a preview or a committed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Quote,
    Order,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineReport {
    pub product_id: u32,
    pub name: String,
    pub quantity: String,
    pub unit: &'static str,
    pub unit_price: String,
    pub total: String,
}

impl From<&CartLineItem> for LineReport {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product_id(),
            name: item.name().to_string(),
            quantity: item.quantity_display(),
            unit: item.unit().label(),
            unit_price: item.price().to_string(),
            total: item.total().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutoffReport {
    pub eligible_now: bool,
    pub is_eligible_day: bool,
    pub seconds_to_cutoff: i64,
    pub countdown: String,
    pub earliest_fulfilment: &'static str,
}

impl From<&CutoffStatus> for CutoffReport {
    fn from(status: &CutoffStatus) -> Self {
        Self {
            eligible_now: status.eligible_now,
            is_eligible_day: status.is_eligible_day,
            seconds_to_cutoff: status.seconds_to_cutoff,
            countdown: status.countdown(),
            earliest_fulfilment: status.earliest_fulfilment(),
        }
    }
}

/// Display-ready checkout report. Money is rounded to cents only here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutReport {
    pub kind: ReportKind,
    pub fulfilment: FulfilmentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    pub lines: Vec<LineReport>,
    pub subtotal: String,
    pub delivery_fee: String,
    pub grand_total: String,
    pub free_delivery_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_to_free_delivery: Option<String>,
    pub cutoff: CutoffReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_delivery_credits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_consumed: Option<bool>,
}

impl CheckoutReport {
    fn build<'a>(
        kind: ReportKind,
        lines: impl Iterator<Item = &'a CartLineItem>,
        context: &DeliveryContext,
        summary: &CartSummary,
        cutoff: &CutoffStatus,
    ) -> Self {
        let postcode = match context.method {
            FulfilmentMethod::Delivery => context.postcode.clone(),
            FulfilmentMethod::Pickup => None,
        };
        Self {
            kind,
            fulfilment: context.method,
            postcode,
            lines: lines.map(LineReport::from).collect(),
            subtotal: summary.subtotal.to_string(),
            delivery_fee: summary.delivery_fee.to_string(),
            grand_total: summary.grand_total.to_string(),
            free_delivery_applied: summary.free_delivery_applied,
            amount_to_free_delivery: summary.amount_to_free_delivery.map(|m| m.to_string()),
            cutoff: CutoffReport::from(cutoff),
            free_delivery_credits: None,
            credit_consumed: None,
        }
    }

    pub fn quote(items: &[CartLineItem], preview: &CheckoutPreview) -> Self {
        let mut report = Self::build(
            ReportKind::Quote,
            items.iter(),
            &preview.context,
            &preview.summary,
            &preview.cutoff,
        );
        report.free_delivery_credits = Some(preview.free_delivery_credits);
        report
    }

    pub fn order(receipt: &OrderReceipt, remaining_credits: u32) -> Self {
        let mut report = Self::build(
            ReportKind::Order,
            receipt.lines.iter(),
            &receipt.context,
            &receipt.summary,
            &receipt.cutoff,
        );
        report.free_delivery_credits = Some(remaining_credits);
        report.credit_consumed = Some(receipt.credit_consumed);
        report
    }
}

/// Writes checkout reports as pretty-printed JSON.
pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_report(&mut self, report: &CheckoutReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
