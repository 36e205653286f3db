use super::domain::{DomRiskBand, EnrichedProperty, PropertyRecord};

const WEEKS_PER_YEAR: f64 = 52.0;
const FAST_BELOW_DAYS: u32 = 21;
const AVERAGE_UP_TO_DAYS: u32 = 45;

/// Rounds half away from zero to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Annualised rent over listed price, as a percentage with two decimals.
///
/// Returns `None` when either input is missing, rent is not positive, or the
/// price is not positive.
pub fn compute_gross_yield(weekly_rent: Option<f64>, listed_price: Option<f64>) -> Option<f64> {
    let weekly_rent = weekly_rent.filter(|rent| *rent > 0.0)?;
    let listed_price = listed_price.filter(|price| *price > 0.0)?;
    let annual_rent = weekly_rent * WEEKS_PER_YEAR;
    Some(round2((annual_rent / listed_price) * 100.0))
}

pub fn dom_band(days_on_market: Option<u32>) -> Option<DomRiskBand> {
    let days = days_on_market?;
    let band = if days < FAST_BELOW_DAYS {
        DomRiskBand::Fast
    } else if days <= AVERAGE_UP_TO_DAYS {
        DomRiskBand::Average
    } else {
        DomRiskBand::Slow
    };
    Some(band)
}

impl PropertyRecord {
    pub fn gross_yield_pct(&self) -> Option<f64> {
        compute_gross_yield(Some(self.weekly_rent_estimate), Some(self.listed_price))
    }

    pub fn dom_risk_band(&self) -> Option<DomRiskBand> {
        dom_band(self.days_on_market)
    }

    pub fn enrich(self) -> EnrichedProperty {
        let gross_yield_pct = self.gross_yield_pct();
        let dom_risk_band = self.dom_risk_band();
        EnrichedProperty {
            record: self,
            gross_yield_pct,
            dom_risk_band,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gross_yield_rounds_to_two_decimals() {
        // 850 * 52 / 1_250_000 * 100 = 3.536
        assert_eq!(compute_gross_yield(Some(850.0), Some(1_250_000.0)), Some(3.54));
        assert_eq!(compute_gross_yield(Some(650.0), Some(780_000.0)), Some(4.33));
        assert_eq!(compute_gross_yield(Some(780.0), Some(985_000.0)), Some(4.12));
    }

    #[test]
    fn rounding_ties_go_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(4.0), 4.0);
    }

    #[test]
    fn gross_yield_absent_for_invalid_inputs() {
        assert_eq!(compute_gross_yield(None, Some(500_000.0)), None);
        assert_eq!(compute_gross_yield(Some(500.0), None), None);
        assert_eq!(compute_gross_yield(Some(0.0), Some(500_000.0)), None);
        assert_eq!(compute_gross_yield(Some(-10.0), Some(500_000.0)), None);
        assert_eq!(compute_gross_yield(Some(500.0), Some(0.0)), None);
        assert_eq!(compute_gross_yield(Some(500.0), Some(-1.0)), None);
    }

    #[test]
    fn dom_band_boundaries() {
        assert_eq!(dom_band(Some(0)), Some(DomRiskBand::Fast));
        assert_eq!(dom_band(Some(20)), Some(DomRiskBand::Fast));
        assert_eq!(dom_band(Some(21)), Some(DomRiskBand::Average));
        assert_eq!(dom_band(Some(45)), Some(DomRiskBand::Average));
        assert_eq!(dom_band(Some(46)), Some(DomRiskBand::Slow));
        assert_eq!(dom_band(None), None);
    }
}
