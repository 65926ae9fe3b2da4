//! Margin and advertising-efficiency arithmetic.
//!
//! Everything is computed with [`Decimal`] so currency values match what a
//! seller would compute by hand (no binary floating-point drift).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Parses a display price such as `"R$ 1.234,56"`, `"R$ 200,00"` or `"89.90"`.
///
/// When a comma is present it is the decimal separator and dots are thousands
/// separators (pt-BR); otherwise the dot is the decimal separator. Returns
/// `None` when no number can be read.
#[must_use]
pub fn parse_price(display: &str) -> Option<Decimal> {
    let kept: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.'))
        .collect();
    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let canonical = if kept.contains(',') {
        kept.replace('.', "").replace(',', ".")
    } else if kept.matches('.').count() > 1 {
        kept.replace('.', "")
    } else {
        kept
    };

    canonical.trim_matches('.').parse::<Decimal>().ok()
}

/// Rounds half away from zero, the way prices are displayed.
#[must_use]
pub fn round_display(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Inputs of the unit-economics calculator. Rates are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginInputs {
    pub sale_price: Decimal,
    pub cost_price: Decimal,
    pub tax_rate: Decimal,
    pub platform_fee: Decimal,
    pub shipping_cost: Decimal,
}

/// How healthy a margin is, matching the badge colors of the calculator view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginHealth {
    /// Above 20 %.
    Healthy,
    /// Positive but at most 20 %.
    Thin,
    /// Zero or negative.
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginBreakdown {
    pub sale_price: Decimal,
    pub tax_amount: Decimal,
    pub fee_amount: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
    /// Profit over sale price, in percent. Zero when the sale price is zero.
    pub margin_percent: Decimal,
}

impl MarginBreakdown {
    #[must_use]
    pub fn health(&self) -> MarginHealth {
        if self.margin_percent > Decimal::from(20) {
            MarginHealth::Healthy
        } else if self.margin_percent > Decimal::ZERO {
            MarginHealth::Thin
        } else {
            MarginHealth::Loss
        }
    }

    /// Margin percentage with one decimal, e.g. `"14.0%"`.
    #[must_use]
    pub fn display_margin(&self) -> String {
        format!("{:.1}%", round_display(self.margin_percent, 1))
    }
}

/// Computes tax, commission, total cost, profit and margin for one sale.
///
/// Returns `None` when an intermediate value leaves the `Decimal` range.
#[must_use]
pub fn compute_margin(inputs: &MarginInputs) -> Option<MarginBreakdown> {
    let hundred = Decimal::ONE_HUNDRED;
    let percent_of = |rate: Decimal| inputs.sale_price.checked_mul(rate)?.checked_div(hundred);

    let tax_amount = percent_of(inputs.tax_rate)?;
    let fee_amount = percent_of(inputs.platform_fee)?;
    let total_cost = inputs
        .cost_price
        .checked_add(tax_amount)?
        .checked_add(fee_amount)?
        .checked_add(inputs.shipping_cost)?;
    let profit = inputs.sale_price.checked_sub(total_cost)?;
    let margin_percent = if inputs.sale_price > Decimal::ZERO {
        profit.checked_div(inputs.sale_price)?.checked_mul(hundred)?
    } else {
        Decimal::ZERO
    };

    Some(MarginBreakdown {
        sale_price: inputs.sale_price,
        tax_amount,
        fee_amount,
        total_cost,
        profit,
        margin_percent,
    })
}

/// Cost seeded into the calculator after an extraction: half the sale price.
#[must_use]
pub fn suggested_cost(sale_price: Decimal) -> Decimal {
    round_display(sale_price / Decimal::TWO, 2)
}

/// Return on ad spend and advertising cost of sale for a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdEfficiency {
    /// Revenue over spend, two decimals. `None` when spend is zero or the
    /// ratio is out of range.
    pub roas: Option<Decimal>,
    /// Spend over revenue in percent, one decimal. `None` when revenue is
    /// zero or the ratio is out of range.
    pub acos_percent: Option<Decimal>,
}

#[must_use]
pub fn compute_ad_efficiency(ad_spend: Decimal, revenue: Decimal) -> AdEfficiency {
    let roas = revenue
        .checked_div(ad_spend)
        .map(|ratio| round_display(ratio, 2));
    let acos_percent = ad_spend
        .checked_div(revenue)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| round_display(percent, 1));
    AdEfficiency { roas, acos_percent }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn parse_price_handles_brazilian_format() {
        assert_eq!(parse_price("R$ 200,00"), Some(dec("200.00")));
        assert_eq!(parse_price("R$ 1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_price("89.90"), Some(dec("89.90")));
        assert_eq!(parse_price("1.299.000"), Some(dec("1299000")));
        assert_eq!(parse_price("Sob consulta"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn margin_scenario_matches_hand_calculation() {
        let price = parse_price("R$ 200,00").unwrap();
        let breakdown = compute_margin(&MarginInputs {
            sale_price: price,
            cost_price: dec("100"),
            tax_rate: dec("10"),
            platform_fee: dec("16"),
            shipping_cost: dec("20"),
        })
        .unwrap();
        assert_eq!(round_display(breakdown.tax_amount, 2), dec("20.00"));
        assert_eq!(round_display(breakdown.fee_amount, 2), dec("32.00"));
        assert_eq!(round_display(breakdown.total_cost, 2), dec("172.00"));
        assert_eq!(round_display(breakdown.profit, 2), dec("28.00"));
        assert_eq!(breakdown.display_margin(), "14.0%");
        assert_eq!(breakdown.health(), MarginHealth::Thin);
    }

    #[test]
    fn zero_price_yields_zero_margin() {
        let breakdown = compute_margin(&MarginInputs {
            sale_price: Decimal::ZERO,
            cost_price: dec("10"),
            tax_rate: dec("10"),
            platform_fee: dec("16"),
            shipping_cost: dec("20"),
        })
        .unwrap();
        assert_eq!(breakdown.margin_percent, Decimal::ZERO);
        assert_eq!(breakdown.profit, dec("-30"));
        assert_eq!(breakdown.health(), MarginHealth::Loss);
    }

    #[test]
    fn healthy_margin_above_twenty_percent() {
        let breakdown = compute_margin(&MarginInputs {
            sale_price: dec("100"),
            cost_price: dec("20"),
            tax_rate: Decimal::ZERO,
            platform_fee: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
        })
        .unwrap();
        assert_eq!(breakdown.health(), MarginHealth::Healthy);
    }

    #[test]
    fn ad_efficiency_scenario() {
        let eff = compute_ad_efficiency(dec("500"), dec("1200"));
        assert_eq!(eff.roas.map(|r| format!("{r:.2}")).as_deref(), Some("2.40"));
        assert_eq!(eff.acos_percent, Some(dec("41.7")));
    }

    #[test]
    fn ad_efficiency_handles_zero_divisors() {
        let eff = compute_ad_efficiency(Decimal::ZERO, dec("100"));
        assert_eq!(eff.roas, None);
        assert_eq!(eff.acos_percent, Some(Decimal::ZERO));

        let eff = compute_ad_efficiency(dec("100"), Decimal::ZERO);
        assert_eq!(eff.roas, Some(Decimal::ZERO));
        assert_eq!(eff.acos_percent, None);
    }

    #[test]
    fn margin_out_of_decimal_range_is_none() {
        let inputs = MarginInputs {
            sale_price: Decimal::MAX,
            cost_price: Decimal::ZERO,
            tax_rate: dec("10"),
            platform_fee: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
        };
        assert_eq!(compute_margin(&inputs), None);

        let inputs = MarginInputs {
            sale_price: dec("100"),
            cost_price: Decimal::MAX,
            shipping_cost: Decimal::MAX,
            ..inputs
        };
        assert_eq!(compute_margin(&inputs), None);
    }

    #[test]
    fn tiny_spend_does_not_overflow_roas() {
        let eff = compute_ad_efficiency(dec("0.0000000000000000000000000001"), dec("1000000000"));
        assert_eq!(eff.roas, None);

        let eff = compute_ad_efficiency(Decimal::MAX, dec("0.5"));
        assert_eq!(eff.acos_percent, None);
    }

    #[test]
    fn suggested_cost_is_half_price() {
        assert_eq!(suggested_cost(dec("89.90")), dec("44.95"));
        assert_eq!(suggested_cost(dec("99.99")), dec("50.00"));
    }
}
