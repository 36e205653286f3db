pub mod advisory;
pub mod domain;
pub mod listings;
mod metrics;
mod service;
pub mod summary;

pub use advisory::{
    heuristic_advice, AdvisoryComposer, AdvisoryError, CoachRequest, CoachResponse, TextGenerator,
};
pub use domain::{DomRiskBand, EnrichedProperty, PropertyFilter, PropertyRecord};
pub use listings::{
    listings_source_from_config, HttpListingsSource, ListingsError, ListingsSource,
    SampleListingsSource,
};
pub use metrics::{compute_gross_yield, dom_band};
pub use service::PropertyInsightsService;
pub use summary::{summarize, DomMix, SummaryStats};
