//! # CGST/SGST vs IGST Split
//!
//! Intra-state supplies (seller and buyer in the same GST state) are taxed
//! as CGST + SGST; inter-state supplies as IGST. The split always satisfies
//! `cgst + sgst + igst == total_tax` to the paisa: SGST is the remainder
//! after CGST, not an independent half, so ₹49.95 splits as 24.98 / 24.97.
//!
//! States are compared as [`StateCode`]s, which are upper-cased on
//! construction, so `rj` and `RJ` are the same state. For numeric GSTIN
//! prefixes such as `08` this is plain string equality.

use serde::{Deserialize, Serialize};

use dukaan_core::{round_half_up_div, Paisa, Percent, StateCode};

/// Shipping and logistics services are taxed at 18% regardless of the
/// goods shipped.
pub const SHIPPING_GST_RATE: Percent = Percent::whole(18);

/// Tax computed on one taxable amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstSplit {
    /// Central GST (intra-state only).
    pub cgst: Paisa,
    /// State GST (intra-state only).
    pub sgst: Paisa,
    /// Integrated GST (inter-state only).
    pub igst: Paisa,
    /// `cgst + sgst + igst`.
    pub total_tax: Paisa,
    /// Whether seller and buyer are in different states.
    pub is_inter_state: bool,
}

impl GstSplit {
    /// No tax.
    pub const fn zero(is_inter_state: bool) -> Self {
        Self {
            cgst: Paisa::ZERO,
            sgst: Paisa::ZERO,
            igst: Paisa::ZERO,
            total_tax: Paisa::ZERO,
            is_inter_state,
        }
    }

    /// Sum of the three components. Equals `total_tax` for every split this
    /// module produces.
    pub fn component_sum(&self) -> Paisa {
        self.cgst + self.sgst + self.igst
    }
}

/// Whether a supply between these states is inter-state.
pub fn is_inter_state(seller_state: &StateCode, buyer_state: &StateCode) -> bool {
    seller_state != buyer_state
}

/// Tax `taxable_amount` at `rate` and split it by place of supply.
///
/// Any non-negative rate is accepted so that future rate notifications do
/// not require a code change.
pub fn split_tax(
    taxable_amount: Paisa,
    rate: Percent,
    seller_state: &StateCode,
    buyer_state: &StateCode,
) -> GstSplit {
    let inter_state = is_inter_state(seller_state, buyer_state);
    let total_tax = rate.of(taxable_amount);

    if inter_state {
        return GstSplit {
            cgst: Paisa::ZERO,
            sgst: Paisa::ZERO,
            igst: total_tax,
            total_tax,
            is_inter_state: true,
        };
    }

    let cgst = Paisa::from_i128_saturating(round_half_up_div(
        i128::from(total_tax.as_paisa()),
        2,
    ));
    let sgst = total_tax - cgst;
    GstSplit {
        cgst,
        sgst,
        igst: Paisa::ZERO,
        total_tax,
        is_inter_state: false,
    }
}

/// Tax a shipping charge at [`SHIPPING_GST_RATE`].
pub fn shipping_tax(
    shipping_amount: Paisa,
    seller_state: &StateCode,
    buyer_state: &StateCode,
) -> GstSplit {
    split_tax(shipping_amount, SHIPPING_GST_RATE, seller_state, buyer_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(code: &str) -> StateCode {
        StateCode::new(code).unwrap()
    }

    fn rupees(r: i64) -> Paisa {
        Paisa::from_rupees(r)
    }

    #[test]
    fn intra_state_splits_evenly() {
        let split = split_tax(rupees(5000), Percent::whole(12), &state("08"), &state("08"));
        assert_eq!(
            split,
            GstSplit {
                cgst: rupees(300),
                sgst: rupees(300),
                igst: Paisa::ZERO,
                total_tax: rupees(600),
                is_inter_state: false,
            }
        );
    }

    #[test]
    fn inter_state_is_all_igst() {
        let split = split_tax(rupees(5000), Percent::whole(12), &state("08"), &state("27"));
        assert_eq!(
            split,
            GstSplit {
                cgst: Paisa::ZERO,
                sgst: Paisa::ZERO,
                igst: rupees(600),
                total_tax: rupees(600),
                is_inter_state: true,
            }
        );
    }

    #[test]
    fn odd_paisa_total_splits_without_drift() {
        let split = split_tax(rupees(999), Percent::whole(5), &state("08"), &state("08"));
        assert_eq!(split.total_tax, Paisa::parse("49.95").unwrap());
        assert_eq!(split.cgst, Paisa::parse("24.98").unwrap());
        assert_eq!(split.sgst, Paisa::parse("24.97").unwrap());
        assert_eq!(split.cgst + split.sgst, split.total_tax);
    }

    #[test]
    fn total_rounds_half_up() {
        // 0.10 at 5% = 0.005 -> 0.01
        let split = split_tax(Paisa::new(10), Percent::whole(5), &state("08"), &state("27"));
        assert_eq!(split.total_tax, Paisa::new(1));
        // 0.50 at 5% = 0.025 -> 0.03; banker's rounding would give 0.02
        let split = split_tax(Paisa::new(50), Percent::whole(5), &state("08"), &state("27"));
        assert_eq!(split.total_tax, Paisa::new(3));
    }

    #[test]
    fn zero_rate_and_zero_amount() {
        let a = split_tax(rupees(1000), Percent::ZERO, &state("08"), &state("08"));
        let b = split_tax(Paisa::ZERO, Percent::whole(28), &state("08"), &state("27"));
        assert_eq!(a, GstSplit::zero(false));
        assert_eq!(b, GstSplit::zero(true));
    }

    #[test]
    fn off_slab_rate_is_accepted() {
        let split = split_tax(rupees(10_000), Percent::from_bps(25), &state("08"), &state("27"));
        assert_eq!(split.igst, rupees(25));
    }

    #[test]
    fn shipping_uses_eighteen_percent() {
        let split = shipping_tax(rupees(100), &state("08"), &state("08"));
        assert_eq!(split.total_tax, rupees(18));
        assert_eq!(split.cgst, rupees(9));
        assert_eq!(split.sgst, rupees(9));
    }

    #[test]
    fn state_comparison_ignores_case() {
        assert!(!is_inter_state(&state("rj"), &state("RJ")));
        assert!(is_inter_state(&state("08"), &state("27")));
    }
}
