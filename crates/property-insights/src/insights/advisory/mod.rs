mod openai;

pub use openai::OpenAiTextGenerator;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::EnrichedProperty;
use crate::config::AdvisoryConfig;

const STRONG_YIELD_PCT: f64 = 5.5;
const BALANCED_YIELD_PCT: f64 = 4.5;

/// Property details submitted for coaching. Derived fields are taken as given,
/// so a client may send its own yield and band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachRequest {
    pub address: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub car_spaces: u32,
    pub listed_price: f64,
    pub weekly_rent_estimate: f64,
    pub suburb: String,
    pub state: String,
    #[serde(default)]
    pub days_on_market: Option<u32>,
    #[serde(default)]
    pub gross_yield_pct: Option<f64>,
    #[serde(default)]
    pub dom_risk_band: Option<String>,
}

impl From<&EnrichedProperty> for CoachRequest {
    fn from(property: &EnrichedProperty) -> Self {
        let record = &property.record;
        Self {
            address: record.address.clone(),
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            car_spaces: record.car_spaces,
            listed_price: record.listed_price,
            weekly_rent_estimate: record.weekly_rent_estimate,
            suburb: record.suburb.clone(),
            state: record.state.clone(),
            days_on_market: record.days_on_market,
            gross_yield_pct: property.gross_yield_pct,
            dom_risk_band: property.dom_risk_band.map(|band| band.label().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachResponse {
    pub advice: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory service failure: {0}")]
    AdvisoryServiceFailure(String),
}

/// Free-text generation capability used to polish heuristic advice.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

/// Rule-based advice: yield tier, then liquidity, then family suitability.
///
/// Reads the derived fields as carried on the request (client-supplied for
/// `/api/coach`, computed for an [`EnrichedProperty`] via `CoachRequest::from`);
/// nothing is recomputed here. A missing yield counts as 0.
pub fn heuristic_advice(property: &CoachRequest) -> String {
    let gross_yield = property.gross_yield_pct.unwrap_or(0.0);
    let band = property
        .dom_risk_band
        .as_deref()
        .unwrap_or("Unknown")
        .to_lowercase();

    let mut notes = Vec::with_capacity(3);

    if gross_yield >= STRONG_YIELD_PCT {
        notes.push("Strong cash flow (gross yield ≥ 5.5%).");
    } else if gross_yield >= BALANCED_YIELD_PCT {
        notes.push("Balanced yield; negotiate or uplift rent via minor works.");
    } else {
        notes.push("Low gross yield; growth story must justify entry.");
    }

    match band.as_str() {
        "fast" => notes.push("Liquid market; lower resale risk."),
        "slow" => notes.push("Slower resale; price in longer selling time."),
        _ => {}
    }

    if property.bedrooms >= 3 && property.car_spaces >= 2 {
        notes.push("Family spec; check school catchments for demand uplift.");
    }

    notes.join(" ")
}

pub fn coaching_prompt(property: &CoachRequest, heuristic: &str) -> String {
    let details = serde_json::to_string_pretty(property)
        .unwrap_or_else(|_| format!("{} ({} {})", property.address, property.suburb, property.state));

    format!(
        "You are an Australian property investment coach. \
         Give a short, practical recommendation (max 80 words) in plain English. \
         Focus on cash flow (gross yield) vs resale/liquidity (DOM band) and any quick checks.\n\n\
         PROPERTY:\n{details}\n\n\
         Heuristic summary: {heuristic}\n\n\
         Now produce your final advice:"
    )
}

/// Produces advice for a property, preferring the text generator when one is
/// installed and falling back to the heuristic on any failure.
#[derive(Clone, Default)]
pub struct AdvisoryComposer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AdvisoryComposer {
    pub fn heuristic_only() -> Self {
        Self { generator: None }
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    pub fn from_config(config: &AdvisoryConfig) -> Self {
        match OpenAiTextGenerator::from_config(config) {
            Some(generator) => Self::with_generator(Arc::new(generator)),
            None => Self::heuristic_only(),
        }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn coach(&self, request: &CoachRequest) -> CoachResponse {
        let heuristic = heuristic_advice(request);

        let Some(generator) = &self.generator else {
            return CoachResponse { advice: heuristic };
        };

        let prompt = coaching_prompt(request, &heuristic);
        match generator.generate(&prompt).await {
            Ok(advice) => {
                debug!(address = %request.address, "advice refined by text generator");
                CoachResponse { advice }
            }
            Err(err) => {
                warn!(error = %err, "falling back to heuristic advice");
                CoachResponse { advice: heuristic }
            }
        }
    }
}

impl std::fmt::Debug for AdvisoryComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryComposer")
            .field("generator", &self.has_generator())
            .finish()
    }
}
