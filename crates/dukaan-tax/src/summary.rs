//! # HSN-wise Summary
//!
//! Aggregates an order's line taxes by `(HSN code, rate)` for the HSN
//! summary table printed on a tax invoice. Lines without an HSN code are
//! grouped together under `None`, which sorts first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dukaan_core::{Paisa, Percent};

use crate::order::OrderTaxBreakdown;

/// One row of the HSN summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsnSummaryLine {
    /// HSN code, if the lines carried one.
    pub hsn_code: Option<String>,
    /// Rate shared by every line in the group.
    pub gst_rate: Percent,
    /// Number of line items aggregated.
    pub line_count: usize,
    /// Total units across the group.
    pub quantity: u64,
    /// Σ taxable value.
    pub taxable_value: Paisa,
    /// Σ CGST.
    pub cgst: Paisa,
    /// Σ SGST.
    pub sgst: Paisa,
    /// Σ IGST.
    pub igst: Paisa,
    /// Σ tax.
    pub total_tax: Paisa,
}

/// Group a breakdown's line taxes by HSN code and rate.
///
/// Rows are ordered by HSN code, then rate. The same HSN code appears on
/// two rows when a threshold split its lines across rates.
pub fn hsn_summary(breakdown: &OrderTaxBreakdown) -> Vec<HsnSummaryLine> {
    let mut groups: BTreeMap<(Option<String>, Percent), HsnSummaryLine> = BTreeMap::new();

    for line in &breakdown.line_item_taxes {
        let hsn_code = line.hsn_code.as_ref().map(|c| c.trim().to_string());
        let row = groups
            .entry((hsn_code.clone(), line.gst_rate))
            .or_insert_with(|| HsnSummaryLine {
                hsn_code,
                gst_rate: line.gst_rate,
                line_count: 0,
                quantity: 0,
                taxable_value: Paisa::ZERO,
                cgst: Paisa::ZERO,
                sgst: Paisa::ZERO,
                igst: Paisa::ZERO,
                total_tax: Paisa::ZERO,
            });
        row.line_count += 1;
        row.quantity = row.quantity.saturating_add(u64::from(line.quantity));
        row.taxable_value += line.taxable_value;
        row.cgst += line.cgst;
        row.sgst += line.sgst;
        row.igst += line.igst;
        row.total_tax += line.total_tax;
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{TaxEngine, TaxableLineItem};
    use dukaan_core::StateCode;

    fn breakdown(items: &[TaxableLineItem]) -> OrderTaxBreakdown {
        let s = StateCode::new("08").unwrap();
        TaxEngine::india_standard()
            .unwrap()
            .tax_order(items, &s, &s, Paisa::ZERO)
            .unwrap()
    }

    #[test]
    fn groups_by_code_and_rate() {
        let items = [
            TaxableLineItem::new(Paisa::from_rupees(800), 1).with_hsn("6211"),
            TaxableLineItem::new(Paisa::from_rupees(600), 2).with_hsn("6211"),
            TaxableLineItem::new(Paisa::from_rupees(1500), 1).with_hsn("6211"),
            TaxableLineItem::new(Paisa::from_rupees(200), 1),
        ];
        let rows = hsn_summary(&breakdown(&items));
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].hsn_code, None);
        assert_eq!(rows[0].gst_rate, Percent::whole(18));

        assert_eq!(rows[1].hsn_code.as_deref(), Some("6211"));
        assert_eq!(rows[1].gst_rate, Percent::whole(5));
        assert_eq!(rows[1].line_count, 2);
        assert_eq!(rows[1].quantity, 3);
        assert_eq!(rows[1].taxable_value, Paisa::from_rupees(2000));
        assert_eq!(rows[1].total_tax, Paisa::from_rupees(100));

        assert_eq!(rows[2].gst_rate, Percent::whole(12));
        assert_eq!(rows[2].total_tax, Paisa::from_rupees(180));
    }

    #[test]
    fn summary_totals_match_order_totals() {
        let items = [
            TaxableLineItem::new(Paisa::parse("999.99").unwrap(), 3).with_hsn("6109"),
            TaxableLineItem::new(Paisa::parse("45.50").unwrap(), 7).with_hsn("0902"),
            TaxableLineItem::new(Paisa::parse("45.50").unwrap(), 1).with_hsn(" 0902 "),
        ];
        let b = breakdown(&items);
        let rows = hsn_summary(&b);
        assert_eq!(rows.len(), 2);
        let tax: Paisa = rows.iter().map(|r| r.total_tax).sum();
        let taxable: Paisa = rows.iter().map(|r| r.taxable_value).sum();
        assert_eq!(tax, b.totals.total_tax);
        assert_eq!(taxable, b.totals.taxable_value);
    }

    #[test]
    fn empty_breakdown_has_no_rows() {
        assert!(hsn_summary(&breakdown(&[])).is_empty());
    }
}
