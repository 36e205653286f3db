use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Days-on-market liquidity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomRiskBand {
    Fast,
    Average,
    Slow,
}

impl DomRiskBand {
    pub const fn ordered() -> [Self; 3] {
        [Self::Fast, Self::Average, Self::Slow]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Average => "Average",
            Self::Slow => "Slow",
        }
    }
}

/// Listing as returned by the upstream source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: String,
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    pub bedrooms: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    pub bathrooms: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    pub car_spaces: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub listed_price: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub weekly_rent_estimate: f64,
    pub suburb: String,
    pub state: String,
    #[serde(default, deserialize_with = "deserialize_lenient_days")]
    pub days_on_market: Option<u32>,
}

/// Listing plus the metrics derived on read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedProperty {
    #[serde(flatten)]
    pub record: PropertyRecord,
    pub gross_yield_pct: Option<f64>,
    pub dom_risk_band: Option<DomRiskBand>,
}

/// Optional suburb/state narrowing passed through to the listings source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl PropertyFilter {
    pub fn new(suburb: Option<String>, state: Option<String>) -> Self {
        Self {
            suburb: suburb.and_then(present),
            state: state.and_then(present),
        }
    }

    /// Drops blank values so `?suburb=` behaves like an omitted parameter.
    pub fn normalized(self) -> Self {
        Self::new(self.suburb, self.state)
    }

    pub fn is_empty(&self) -> bool {
        self.suburb.is_none() && self.state.is_none()
    }
}

fn present(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn whole_number(value: Value) -> Option<u32> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|whole| *whole >= 0.0 && whole.fract() == 0.0)
                    .map(|whole| whole as u64)
            })
            .and_then(|whole| u32::try_from(whole).ok()),
        _ => None,
    }
}

/// Upstream feeds occasionally send strings or negative values here; anything
/// that is not a non-negative whole number is read as unknown.
fn deserialize_lenient_days<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(whole_number))
}

/// `null` or malformed counts read as 0.
fn deserialize_lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(whole_number).unwrap_or_default())
}

/// `null` or non-numeric amounts read as 0, which yields no gross yield.
fn deserialize_lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|amount| amount.is_finite())
        .unwrap_or_default())
}
