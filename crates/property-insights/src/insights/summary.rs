use serde::Serialize;

use super::domain::{DomRiskBand, PropertyRecord};
use super::metrics::round2;

/// Count of listings per days-on-market band. Every band is always reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DomMix {
    #[serde(rename = "Fast")]
    pub fast: usize,
    #[serde(rename = "Average")]
    pub average: usize,
    #[serde(rename = "Slow")]
    pub slow: usize,
}

impl DomMix {
    pub fn record(&mut self, band: DomRiskBand) {
        *self.slot(band) += 1;
    }

    pub fn get(&self, band: DomRiskBand) -> usize {
        match band {
            DomRiskBand::Fast => self.fast,
            DomRiskBand::Average => self.average,
            DomRiskBand::Slow => self.slow,
        }
    }

    fn slot(&mut self, band: DomRiskBand) -> &mut usize {
        match band {
            DomRiskBand::Fast => &mut self.fast,
            DomRiskBand::Average => &mut self.average,
            DomRiskBand::Slow => &mut self.slow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub yield_avg: Option<f64>,
    pub yield_p25: Option<f64>,
    pub yield_p75: Option<f64>,
    pub dom_mix: DomMix,
}

/// Aggregates yield and days-on-market figures across a set of listings.
///
/// `count` covers every record, including those without a computable yield.
/// Percentiles are index-based on the ascending yields: p25 reads index
/// `max(0, floor(n / 4) - 1)` and p75 reads `min(n - 1, floor(3n / 4))`.
pub fn summarize(records: &[PropertyRecord]) -> SummaryStats {
    let mut yields = Vec::with_capacity(records.len());
    let mut dom_mix = DomMix::default();

    for record in records {
        if let Some(gross_yield) = record.gross_yield_pct() {
            yields.push(gross_yield);
        }
        if let Some(band) = record.dom_risk_band() {
            dom_mix.record(band);
        }
    }

    if yields.is_empty() {
        return SummaryStats {
            count: records.len(),
            yield_avg: None,
            yield_p25: None,
            yield_p75: None,
            dom_mix,
        };
    }

    let n = yields.len();
    let yield_avg = round2(yields.iter().sum::<f64>() / n as f64);

    yields.sort_by(f64::total_cmp);
    let p25_index = (n / 4).saturating_sub(1);
    let p75_index = ((3 * n) / 4).min(n - 1);

    SummaryStats {
        count: records.len(),
        yield_avg: Some(yield_avg),
        yield_p25: Some(round2(yields[p25_index])),
        yield_p75: Some(round2(yields[p75_index])),
        dom_mix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::listings::SampleListingsSource;

    fn record(id: &str, weekly_rent: f64, price: f64, days: Option<u32>) -> PropertyRecord {
        PropertyRecord {
            id: id.to_string(),
            address: format!("{id} Test St"),
            bedrooms: 2,
            bathrooms: 1,
            car_spaces: 1,
            listed_price: price,
            weekly_rent_estimate: weekly_rent,
            suburb: "Testville".to_string(),
            state: "VIC".to_string(),
            days_on_market: days,
        }
    }

    /// Weekly rent producing exactly `pct` gross yield on a 520k price.
    fn with_yield(id: &str, pct: f64) -> PropertyRecord {
        record(id, pct * 100.0, 520_000.0, None)
    }

    #[test]
    fn summarizes_sample_listings() {
        let stats = summarize(&SampleListingsSource::records());

        assert_eq!(stats.count, 3);
        // (3.54 + 4.33 + 4.12) / 3 = 3.9967
        assert_eq!(stats.yield_avg, Some(4.0));
        // n = 3: p25 index max(0, 0 - 1) = 0, p75 index min(2, 2) = 2
        assert_eq!(stats.yield_p25, Some(3.54));
        assert_eq!(stats.yield_p75, Some(4.33));
        assert_eq!(
            stats.dom_mix,
            DomMix {
                fast: 0,
                average: 2,
                slow: 1
            }
        );
    }

    #[test]
    fn empty_input_reports_zero_counts() {
        let stats = summarize(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.yield_avg.is_none());
        assert!(stats.yield_p25.is_none());
        assert!(stats.yield_p75.is_none());
        assert_eq!(stats.dom_mix, DomMix::default());

        let json = serde_json::to_value(&stats).expect("serializes");
        assert_eq!(json["dom_mix"]["Fast"], 0);
        assert_eq!(json["dom_mix"]["Average"], 0);
        assert_eq!(json["dom_mix"]["Slow"], 0);
        assert!(json["yield_avg"].is_null());
    }

    #[test]
    fn count_includes_records_without_yield() {
        let records = vec![
            record("a", 0.0, 500_000.0, Some(10)),
            record("b", 500.0, 0.0, None),
            with_yield("c", 5.0),
        ];
        let stats = summarize(&records);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.yield_avg, Some(5.0));
        assert_eq!(stats.yield_p25, Some(5.0));
        assert_eq!(stats.yield_p75, Some(5.0));
        assert_eq!(stats.dom_mix.get(DomRiskBand::Fast), 1);
        assert_eq!(stats.dom_mix.get(DomRiskBand::Average), 0);
    }

    #[test]
    fn percentile_indices_are_asymmetric() {
        // Unsorted on purpose; sorted yields are [1, 2, 3, 4, 5, 6, 7, 8].
        let records: Vec<_> = [5.0, 1.0, 8.0, 3.0, 2.0, 7.0, 4.0, 6.0]
            .into_iter()
            .enumerate()
            .map(|(idx, pct)| with_yield(&format!("p{idx}"), pct))
            .collect();
        let stats = summarize(&records);

        // n = 8: p25 index 2 - 1 = 1, p75 index 6
        assert_eq!(stats.yield_p25, Some(2.0));
        assert_eq!(stats.yield_p75, Some(7.0));
        assert_eq!(stats.yield_avg, Some(4.5));
    }

    #[test]
    fn percentile_with_single_yield_and_pair() {
        let single = summarize(&[with_yield("only", 3.0)]);
        assert_eq!(single.yield_p25, Some(3.0));
        assert_eq!(single.yield_p75, Some(3.0));

        // n = 2: p25 index 0, p75 index min(1, 1) = 1
        let pair = summarize(&[with_yield("hi", 6.0), with_yield("lo", 2.0)]);
        assert_eq!(pair.yield_p25, Some(2.0));
        assert_eq!(pair.yield_p75, Some(6.0));
    }
}
