use crate::models::shipment::{PaymentMode, ServiceTier};

const STANDARD_BASE: f64 = 50.0;
const EXPRESS_BASE: f64 = 100.0;
const SAME_DAY_PREMIUM: f64 = 500.0;
const PER_KG: f64 = 50.0;
const CASH_HANDLING_FEE: f64 = 50.0;

/// Cost of shipping `weight_kg` at the given tier and payment mode.
///
/// Weights at or below zero are charged as 1 kg; callers validate weight
/// before booking, this is only the formula's floor.
pub fn calculate_rate(weight_kg: f64, tier: ServiceTier, payment: PaymentMode) -> f64 {
    let billable_kg = if weight_kg > 0.0 { weight_kg } else { 1.0 };

    let base = match tier {
        ServiceTier::Standard => STANDARD_BASE,
        ServiceTier::Express => EXPRESS_BASE,
        ServiceTier::SameDay => EXPRESS_BASE + SAME_DAY_PREMIUM,
    };

    let mut cost = base + billable_kg * PER_KG;

    if payment == PaymentMode::Cash {
        cost += CASH_HANDLING_FEE;
    }

    cost
}

#[cfg(test)]
mod tests {
    use super::calculate_rate;
    use crate::models::shipment::{PaymentMode, ServiceTier};

    #[test]
    fn standard_is_base_plus_per_kg() {
        for w in [0.5, 1.0, 2.0, 7.5, 120.0] {
            let cost = calculate_rate(w, ServiceTier::Standard, PaymentMode::Upi);
            assert_eq!(cost, 50.0 + 50.0 * w);
        }
    }

    #[test]
    fn express_is_double_base_plus_per_kg() {
        for w in [0.5, 1.0, 2.0, 7.5, 120.0] {
            let cost = calculate_rate(w, ServiceTier::Express, PaymentMode::Card);
            assert_eq!(cost, 100.0 + 50.0 * w);
        }
    }

    #[test]
    fn same_day_adds_flat_premium_on_express() {
        for w in [0.5, 1.0, 2.0, 7.5, 120.0] {
            let cost = calculate_rate(w, ServiceTier::SameDay, PaymentMode::Upi);
            assert_eq!(cost, 600.0 + 50.0 * w);
        }
    }

    #[test]
    fn cash_adds_exactly_fifty_to_any_tier() {
        for tier in ServiceTier::ALL {
            let upi = calculate_rate(3.0, tier, PaymentMode::Upi);
            let cash = calculate_rate(3.0, tier, PaymentMode::Cash);
            assert_eq!(cash, upi + 50.0);
        }
    }

    #[test]
    fn two_kg_express_upi_costs_two_hundred() {
        let cost = calculate_rate(2.0, ServiceTier::Express, PaymentMode::Upi);
        assert_eq!(cost, 200.0);
    }

    #[test]
    fn non_positive_weight_is_charged_as_one_kg() {
        let one_kg = calculate_rate(1.0, ServiceTier::Standard, PaymentMode::Upi);
        assert_eq!(calculate_rate(0.0, ServiceTier::Standard, PaymentMode::Upi), one_kg);
        assert_eq!(calculate_rate(-4.0, ServiceTier::Standard, PaymentMode::Upi), one_kg);
    }
}
