use clap::Args;
use property_insights::config::AppConfig;
use property_insights::error::AppError;
use property_insights::insights::{
    CoachRequest, DomRiskBand, EnrichedProperty, PropertyFilter, PropertyInsightsService,
    SummaryStats,
};

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Restrict listings to a suburb (ignored by the bundled sample data)
    #[arg(long)]
    pub(crate) suburb: Option<String>,
    /// Restrict listings to a state code such as VIC or NSW
    #[arg(long)]
    pub(crate) state: Option<String>,
    /// Include coaching advice for every listing
    #[arg(long)]
    pub(crate) advice: bool,
}

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        suburb,
        state,
        advice,
    } = args;

    let config = AppConfig::load()?;
    let service = PropertyInsightsService::from_config(&config);
    let filter = PropertyFilter::new(suburb, state);

    let (properties, summary) = service.listings_with_summary(&filter).await?;

    let mut advice_lines = Vec::new();
    if advice {
        for property in &properties {
            let response = service.coach(&CoachRequest::from(property)).await;
            advice_lines.push((property.record.id.clone(), response.advice));
        }
    }

    render_report(service.listings_mode(), &properties, &summary, &advice_lines);
    Ok(())
}

fn render_report(
    mode: &str,
    properties: &[EnrichedProperty],
    summary: &SummaryStats,
    advice: &[(String, String)],
) {
    println!("Property insights report");
    if mode == "sample" {
        println!("Data source: bundled sample listings (SANDBOX_BASE_URL not set)");
    } else {
        println!("Data source: listings sandbox");
    }

    println!("\nListings");
    for property in properties {
        let record = &property.record;
        println!(
            "- {} | {} | {}bd/{}ba/{}car | ${:.0} | ${:.0}/wk | yield {} | DOM {}",
            record.id,
            record.address,
            record.bedrooms,
            record.bathrooms,
            record.car_spaces,
            record.listed_price,
            record.weekly_rent_estimate,
            format_pct(property.gross_yield_pct),
            format_band(record.days_on_market, property.dom_risk_band),
        );
    }

    println!("\nSummary");
    println!("- listings: {}", summary.count);
    println!("- average yield: {}", format_pct(summary.yield_avg));
    println!(
        "- yield p25/p75: {} / {}",
        format_pct(summary.yield_p25),
        format_pct(summary.yield_p75)
    );
    for band in DomRiskBand::ordered() {
        println!("- {}: {}", band.label(), summary.dom_mix.get(band));
    }

    if !advice.is_empty() {
        println!("\nAdvice");
        for (id, text) in advice {
            println!("- {id}: {text}");
        }
    }
}

fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(pct) => format!("{pct:.2}%"),
        None => "n/a".to_string(),
    }
}

fn format_band(days: Option<u32>, band: Option<DomRiskBand>) -> String {
    match (days, band) {
        (Some(days), Some(band)) => format!("{days}d ({})", band.label()),
        _ => "unknown".to_string(),
    }
}
