//! # Checkout Quote
//!
//! Assembles the full price of a cart: discount, GST on items, shipping
//! and GST on shipping. Cart pricing, checkout confirmation and invoice
//! generation all call [`CheckoutQuote::compute`], so the invoice total is
//! the amount that was charged.
//!
//! ```text
//! subtotal      Σ unit_price × quantity
//! − discount    validated code, 0 if absent or rejected
//! = taxable     Σ line taxable values
//! + item tax    Σ line GST
//! + shipping
//! + ship tax    shipping × shipping rate
//! = grand total
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dukaan_core::{Paisa, StateCode, Timestamp};
use dukaan_tax::{GstSplit, OrderTaxBreakdown, TaxEngine, TaxError, TaxableLineItem};

use crate::discount::{validate_discount, DiscountRecord, DiscountValidation};

/// Errors that prevent a quote from being produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// The tax engine refused the input.
    #[error(transparent)]
    Tax(#[from] TaxError),

    /// An amount does not fit in 64-bit paisa.
    #[error("amount overflow while computing {0}")]
    Overflow(&'static str),
}

/// What the caller wants priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteRequest {
    /// Seller's GST state.
    pub seller_state: StateCode,
    /// Delivery address state.
    pub buyer_state: StateCode,
    /// Cart lines.
    pub items: Vec<TaxableLineItem>,
    /// Shipping charge before tax.
    #[serde(default)]
    pub shipping: Paisa,
    /// Code entered by the shopper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
}

/// A fully priced cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutQuote {
    /// Σ line totals before discount.
    pub subtotal: Paisa,
    /// Discount applied.
    pub discount: Paisa,
    /// Outcome of validating the entered code, if one was entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_validation: Option<DiscountValidation>,
    /// Σ line taxable values.
    pub taxable_value: Paisa,
    /// Per-line tax detail.
    pub items: OrderTaxBreakdown,
    /// Shipping charge before tax.
    pub shipping: Paisa,
    /// GST on shipping.
    pub shipping_tax: GstSplit,
    /// Item tax plus shipping tax.
    pub total_tax: Paisa,
    /// Amount payable.
    pub grand_total: Paisa,
}

impl CheckoutQuote {
    /// Price `request` using `engine`.
    ///
    /// `discount_record` is the stored record for the entered code, looked
    /// up by the caller. A rejected code prices the cart without a
    /// discount and reports the rejection in `discount_validation`.
    pub fn compute(
        engine: &TaxEngine,
        request: &QuoteRequest,
        discount_record: Option<&DiscountRecord>,
        now: Timestamp,
    ) -> Result<Self, QuoteError> {
        let subtotal = request
            .items
            .iter()
            .try_fold(Paisa::ZERO, |acc, item| acc.checked_add(item.line_total()?))
            .ok_or(QuoteError::Overflow("subtotal"))?;

        let discount_validation = request
            .discount_code
            .as_deref()
            .map(|code| validate_discount(code, subtotal, discount_record, now));
        let discount = discount_validation
            .as_ref()
            .filter(|v| v.valid)
            .map_or(Paisa::ZERO, |v| v.amount);

        let items = engine.tax_order(
            &request.items,
            &request.seller_state,
            &request.buyer_state,
            discount,
        )?;
        let shipping_tax =
            engine.tax_shipping(request.shipping, &request.seller_state, &request.buyer_state)?;

        let total_tax = items
            .totals
            .total_tax
            .checked_add(shipping_tax.total_tax)
            .ok_or(QuoteError::Overflow("total tax"))?;
        let grand_total = items
            .totals
            .taxable_value
            .checked_add(total_tax)
            .and_then(|t| t.checked_add(request.shipping))
            .ok_or(QuoteError::Overflow("grand total"))?;

        tracing::debug!(
            subtotal = %subtotal,
            discount = %discount,
            total_tax = %total_tax,
            grand_total = %grand_total,
            "computed checkout quote"
        );

        Ok(Self {
            subtotal,
            discount,
            discount_validation,
            taxable_value: items.totals.taxable_value,
            items,
            shipping: request.shipping,
            shipping_tax,
            total_tax,
            grand_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::{DiscountRejection, DiscountValue};
    use dukaan_core::Percent;

    fn p(s: &str) -> Paisa {
        Paisa::parse(s).unwrap()
    }

    fn now() -> Timestamp {
        Timestamp::parse("2025-10-20T12:00:00Z").unwrap()
    }

    fn request(code: Option<&str>) -> QuoteRequest {
        QuoteRequest {
            seller_state: StateCode::new("08").unwrap(),
            buyer_state: StateCode::new("08").unwrap(),
            items: vec![
                TaxableLineItem::new(p("800.00"), 2).with_hsn("6211"),
                TaxableLineItem::new(p("400.00"), 1).with_hsn("3304"),
            ],
            shipping: p("50.00"),
            discount_code: code.map(str::to_string),
        }
    }

    fn ten_percent() -> DiscountRecord {
        DiscountRecord::new(
            "TEN",
            DiscountValue::Percentage(Percent::whole(10)),
            Timestamp::parse("2025-01-01T00:00:00Z").unwrap(),
        )
    }

    fn engine() -> TaxEngine {
        TaxEngine::india_standard().unwrap()
    }

    #[test]
    fn quote_without_code() {
        let quote = CheckoutQuote::compute(&engine(), &request(None), None, now()).unwrap();
        // 1600 × 5% = 80, 400 × 18% = 72, shipping 50 × 18% = 9
        assert_eq!(quote.subtotal, p("2000.00"));
        assert_eq!(quote.discount, Paisa::ZERO);
        assert!(quote.discount_validation.is_none());
        assert_eq!(quote.taxable_value, p("2000.00"));
        assert_eq!(quote.shipping_tax.total_tax, p("9.00"));
        assert_eq!(quote.total_tax, p("161.00"));
        assert_eq!(quote.grand_total, p("2211.00"));
    }

    #[test]
    fn accepted_code_reduces_taxable_value() {
        let record = ten_percent();
        let quote =
            CheckoutQuote::compute(&engine(), &request(Some("ten")), Some(&record), now()).unwrap();
        // Taxable 1440 + 360; tax 72 + 64.80 + 9 shipping.
        assert_eq!(quote.discount, p("200.00"));
        assert_eq!(quote.taxable_value, p("1800.00"));
        assert_eq!(quote.total_tax, p("145.80"));
        assert_eq!(quote.grand_total, p("1995.80"));
        assert!(quote.discount_validation.unwrap().valid);
    }

    #[test]
    fn rejected_code_is_reported_and_not_applied() {
        let mut record = ten_percent();
        record.min_order_value = Some(p("5000.00"));
        let quote =
            CheckoutQuote::compute(&engine(), &request(Some("TEN")), Some(&record), now()).unwrap();
        assert_eq!(quote.discount, Paisa::ZERO);
        assert_eq!(quote.grand_total, p("2211.00"));
        let validation = quote.discount_validation.unwrap();
        assert!(!validation.valid);
        assert!(matches!(
            validation.rejection,
            Some(DiscountRejection::BelowMinimumOrder { .. })
        ));
    }

    #[test]
    fn inter_state_quote_uses_igst_throughout() {
        let mut req = request(None);
        req.buyer_state = StateCode::new("27").unwrap();
        let quote = CheckoutQuote::compute(&engine(), &req, None, now()).unwrap();
        assert!(quote.items.is_inter_state);
        assert_eq!(quote.items.totals.cgst, Paisa::ZERO);
        assert_eq!(quote.shipping_tax.igst, p("9.00"));
        assert_eq!(quote.total_tax, p("161.00"));
    }

    #[test]
    fn negative_shipping_is_an_error() {
        let mut req = request(None);
        req.shipping = p("-1.00");
        let err = CheckoutQuote::compute(&engine(), &req, None, now()).unwrap_err();
        assert!(matches!(err, QuoteError::Tax(TaxError::NegativeShipping(_))));
    }

    #[test]
    fn request_parses_from_json() {
        let req: QuoteRequest = serde_json::from_str(
            r#"{
                "seller_state": "08",
                "buyer_state": "27",
                "items": [{"unit_price": "1299.00", "quantity": 1, "hsn_code": "6109"}],
                "shipping": "40.00",
                "discount_code": "TEN"
            }"#,
        )
        .unwrap();
        assert_eq!(req.items.len(), 1);
        assert_eq!(req.shipping, p("40.00"));
        assert_eq!(req.discount_code.as_deref(), Some("TEN"));
    }
}
