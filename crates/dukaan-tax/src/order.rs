//! # Order-Level Tax Aggregation
//!
//! Taxes every line item of an order after apportioning an order-level
//! discount across lines by value share:
//!
//! ```text
//! subtotal       = Σ unit_price × quantity
//! taxable_value  = round(line_total × (subtotal − discount) / subtotal)
//! rate           = seller rate ▸ HSN table ▸ default 18%
//! split          = split_tax(taxable_value, rate, seller, buyer)
//! ```
//!
//! The apportionment is computed exactly in 128-bit integers and rounded
//! once per line, so `Σ taxable_value` is within one paisa per line of
//! `subtotal − discount`.
//!
//! ## Determinism
//!
//! [`TaxEngine::tax_order`] has no hidden state: identical inputs always
//! produce identical output. Cart pricing, checkout confirmation and
//! invoice generation call the same function, so the invoice matches the
//! amount charged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dukaan_core::{round_half_up_div, Paisa, Percent, StateCode};

use crate::config::{ConfigError, TaxConfig};
use crate::rates::{GstRateTable, RateSource, RateTableError, ResolvedRate};
use crate::split::{is_inter_state, split_tax, GstSplit, SHIPPING_GST_RATE};

// ─── Errors ──────────────────────────────────────────────────────────

/// Input the aggregator refuses to tax.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxError {
    /// A negative order-level discount would inflate taxable value.
    #[error("order discount {0} is negative")]
    NegativeDiscount(Paisa),

    /// The discount is larger than the order subtotal and would produce
    /// negative taxable values.
    #[error("order discount {discount} exceeds subtotal {subtotal}")]
    DiscountExceedsSubtotal {
        /// The requested discount.
        discount: Paisa,
        /// Σ line totals.
        subtotal: Paisa,
    },

    /// A line item has a negative unit price.
    #[error("line item {index} has negative unit price {unit_price}")]
    NegativeUnitPrice {
        /// Position of the line item.
        index: usize,
        /// The offending price.
        unit_price: Paisa,
    },

    /// A negative shipping charge.
    #[error("shipping amount {0} is negative")]
    NegativeShipping(Paisa),

    /// An amount does not fit in 64-bit paisa.
    #[error("amount overflow while computing {0}")]
    Overflow(&'static str),
}

// ─── Inputs and outputs ──────────────────────────────────────────────

/// One line of an order, as priced at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxableLineItem {
    /// Price of one unit before tax.
    pub unit_price: Paisa,
    /// Number of units.
    pub quantity: u32,
    /// HSN code from the product listing. Unknown or malformed codes
    /// resolve to the default rate.
    #[serde(default)]
    pub hsn_code: Option<String>,
    /// Seller-specified rate; takes precedence over the HSN table.
    #[serde(default)]
    pub gst_rate: Option<Percent>,
}

impl TaxableLineItem {
    /// A line with no tax metadata.
    pub fn new(unit_price: Paisa, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
            hsn_code: None,
            gst_rate: None,
        }
    }

    /// Builder: set the HSN code.
    pub fn with_hsn(mut self, hsn_code: impl Into<String>) -> Self {
        self.hsn_code = Some(hsn_code.into());
        self
    }

    /// Builder: set an explicit GST rate.
    pub fn with_rate(mut self, rate: Percent) -> Self {
        self.gst_rate = Some(rate);
        self
    }

    /// `unit_price × quantity`, or `None` on overflow.
    pub fn line_total(&self) -> Option<Paisa> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Tax detail for one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemTax {
    /// HSN code as supplied on the line.
    pub hsn_code: Option<String>,
    /// Units on the line.
    pub quantity: u32,
    /// `unit_price × quantity` before discount.
    pub line_total: Paisa,
    /// Line total less its share of the order discount.
    pub taxable_value: Paisa,
    /// Rate applied.
    pub gst_rate: Percent,
    /// Where the rate came from.
    pub rate_source: RateSource,
    /// Central GST.
    pub cgst: Paisa,
    /// State GST.
    pub sgst: Paisa,
    /// Integrated GST.
    pub igst: Paisa,
    /// Tax on the line.
    pub total_tax: Paisa,
}

/// Order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderTaxTotals {
    /// Σ line totals before discount.
    pub subtotal: Paisa,
    /// Order-level discount apportioned across lines.
    pub discount: Paisa,
    /// Σ taxable values.
    pub taxable_value: Paisa,
    /// Σ CGST.
    pub cgst: Paisa,
    /// Σ SGST.
    pub sgst: Paisa,
    /// Σ IGST.
    pub igst: Paisa,
    /// `cgst + sgst + igst`.
    pub total_tax: Paisa,
}

/// Tax breakdown for an order's line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTaxBreakdown {
    /// Per-line detail, in input order.
    pub line_item_taxes: Vec<LineItemTax>,
    /// Aggregates.
    pub totals: OrderTaxTotals,
    /// Whether seller and buyer are in different states.
    pub is_inter_state: bool,
}

// ─── Engine ──────────────────────────────────────────────────────────

/// The GST computation engine.
///
/// Holds the rate table and the shipping rate. Stateless beyond that and
/// immutable after construction, so one engine serves every request.
#[derive(Debug, Clone)]
pub struct TaxEngine {
    rates: GstRateTable,
    shipping_rate: Percent,
}

impl TaxEngine {
    /// An engine over `rates` with the standard 18% shipping rate.
    pub fn new(rates: GstRateTable) -> Self {
        Self {
            rates,
            shipping_rate: SHIPPING_GST_RATE,
        }
    }

    /// An engine over the bundled standard Indian table.
    pub fn india_standard() -> Result<Self, RateTableError> {
        Ok(Self::new(GstRateTable::india_standard()?))
    }

    /// Build an engine from configuration.
    pub fn from_config(config: &TaxConfig) -> Result<Self, ConfigError> {
        let mut rates = match &config.rate_table {
            Some(path) => GstRateTable::from_path(path)?,
            None => GstRateTable::india_standard()?,
        };
        if let Some(default_rate) = config.default_rate {
            rates = rates.with_default_rate(default_rate);
        }
        Ok(Self {
            rates,
            shipping_rate: config.shipping_rate,
        })
    }

    /// The rate table.
    pub fn rates(&self) -> &GstRateTable {
        &self.rates
    }

    /// The rate applied to shipping charges.
    pub fn shipping_rate(&self) -> Percent {
        self.shipping_rate
    }

    /// Resolve a line item's rate: explicit rate, else HSN lookup, else the
    /// table default.
    pub fn resolve_line_rate(&self, item: &TaxableLineItem) -> ResolvedRate {
        if let Some(rate) = item.gst_rate {
            return ResolvedRate {
                rate,
                source: RateSource::SellerOverride,
            };
        }
        match &item.hsn_code {
            Some(code) => self.rates.resolve(code, item.unit_price),
            None => ResolvedRate {
                rate: self.rates.default_rate(),
                source: RateSource::Default,
            },
        }
    }

    /// Tax a shipping charge at the configured shipping rate.
    pub fn tax_shipping(
        &self,
        shipping_amount: Paisa,
        seller_state: &StateCode,
        buyer_state: &StateCode,
    ) -> Result<GstSplit, TaxError> {
        if shipping_amount.is_negative() {
            return Err(TaxError::NegativeShipping(shipping_amount));
        }
        checked_split(shipping_amount, self.shipping_rate, seller_state, buyer_state)
    }

    /// Tax an order's line items after apportioning `discount`.
    ///
    /// A negative discount, or one larger than the subtotal, is rejected
    /// rather than clamped; the caller is expected to have validated it
    /// (see `dukaan-pricing`).
    pub fn tax_order(
        &self,
        line_items: &[TaxableLineItem],
        seller_state: &StateCode,
        buyer_state: &StateCode,
        discount: Paisa,
    ) -> Result<OrderTaxBreakdown, TaxError> {
        if discount.is_negative() {
            return Err(TaxError::NegativeDiscount(discount));
        }

        let mut line_totals = Vec::with_capacity(line_items.len());
        for (index, item) in line_items.iter().enumerate() {
            if item.unit_price.is_negative() {
                return Err(TaxError::NegativeUnitPrice {
                    index,
                    unit_price: item.unit_price,
                });
            }
            line_totals.push(item.line_total().ok_or(TaxError::Overflow("line total"))?);
        }
        let subtotal = line_totals
            .iter()
            .try_fold(Paisa::ZERO, |acc, line| acc.checked_add(*line))
            .ok_or(TaxError::Overflow("subtotal"))?;
        if discount > subtotal {
            return Err(TaxError::DiscountExceedsSubtotal { discount, subtotal });
        }

        let remaining = i128::from(subtotal.as_paisa()) - i128::from(discount.as_paisa());
        let mut totals = OrderTaxTotals {
            subtotal,
            discount,
            ..OrderTaxTotals::default()
        };
        let mut line_item_taxes = Vec::with_capacity(line_items.len());

        for (item, line_total) in line_items.iter().zip(line_totals) {
            let taxable_value = if subtotal.is_zero() {
                line_total
            } else {
                let share = round_half_up_div(
                    i128::from(line_total.as_paisa()) * remaining,
                    i128::from(subtotal.as_paisa()),
                );
                Paisa::from_i128(share).ok_or(TaxError::Overflow("taxable value"))?
            };

            let resolved = self.resolve_line_rate(item);
            let split = checked_split(taxable_value, resolved.rate, seller_state, buyer_state)?;

            totals.taxable_value = accumulate(totals.taxable_value, taxable_value, "taxable value")?;
            totals.cgst = accumulate(totals.cgst, split.cgst, "tax")?;
            totals.sgst = accumulate(totals.sgst, split.sgst, "tax")?;
            totals.igst = accumulate(totals.igst, split.igst, "tax")?;

            line_item_taxes.push(LineItemTax {
                hsn_code: item.hsn_code.clone(),
                quantity: item.quantity,
                line_total,
                taxable_value,
                gst_rate: resolved.rate,
                rate_source: resolved.source,
                cgst: split.cgst,
                sgst: split.sgst,
                igst: split.igst,
                total_tax: split.total_tax,
            });
        }
        totals.total_tax = totals
            .cgst
            .checked_add(totals.sgst)
            .and_then(|t| t.checked_add(totals.igst))
            .ok_or(TaxError::Overflow("tax"))?;

        tracing::debug!(
            lines = line_item_taxes.len(),
            subtotal = %totals.subtotal,
            discount = %totals.discount,
            total_tax = %totals.total_tax,
            "taxed order"
        );

        Ok(OrderTaxBreakdown {
            line_item_taxes,
            totals,
            is_inter_state: is_inter_state(seller_state, buyer_state),
        })
    }
}

/// [`split_tax`] with the tax amount checked for overflow first, so the
/// split never sees a saturated total.
fn checked_split(
    amount: Paisa,
    rate: Percent,
    seller_state: &StateCode,
    buyer_state: &StateCode,
) -> Result<GstSplit, TaxError> {
    rate.checked_of(amount).ok_or(TaxError::Overflow("tax"))?;
    Ok(split_tax(amount, rate, seller_state, buyer_state))
}

fn accumulate(total: Paisa, amount: Paisa, what: &'static str) -> Result<Paisa, TaxError> {
    total.checked_add(amount).ok_or(TaxError::Overflow(what))
}

// ─── Tests ───────────────────────────────────────────────────────────
