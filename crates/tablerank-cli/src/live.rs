//! Commands that talk to Google Places and PageSpeed Insights.

use std::fmt::Write as _;

use chrono::Utc;
use tablerank_audit::{run_audit as build_report, AuditInput};
use tablerank_core::{AppConfig, Restaurant};
use tablerank_places::{NearbyOptions, PageSpeedClient, PlacesClient, SearchOptions};
use tablerank_ranking::{load_weights, WeightsConfig};

pub(crate) fn render_search(results: &[Restaurant]) -> String {
    if results.is_empty() {
        return "no restaurants found\n".to_string();
    }
    let mut out = format!("{:<8}{:<9}{:<30}ADDRESS\n", "RATING", "REVIEWS", "NAME");
    for r in results {
        let _ = writeln!(
            out,
            "{:<8.1}{:<9}{:<30}{}",
            r.rating, r.total_ratings, r.name, r.address
        );
        let _ = writeln!(out, "        id: {}", r.place_id);
    }
    out
}

pub(crate) async fn run_search(config: &AppConfig, query: &str, limit: u32) -> anyhow::Result<()> {
    let client = PlacesClient::from_config(config)?;
    let options = SearchOptions {
        max_results: limit,
        ..SearchOptions::default()
    };
    let results = client.search_restaurants(query.trim(), &options).await?;
    print!("{}", render_search(&results));
    Ok(())
}

/// Fetches details, nearby competitors and PageSpeed for `place_id`, then
/// prints the audit report as pretty JSON.
///
/// # Errors
///
/// Fails when the details lookup fails or the weights file is invalid. A
/// failed competitor search is logged and the audit continues without
/// competitors.
pub(crate) async fn run_audit(config: &AppConfig, place_id: &str) -> anyhow::Result<()> {
    let weights = match &config.weights_path {
        Some(path) => load_weights(path)?,
        None => WeightsConfig::default(),
    };
    let places = PlacesClient::from_config(config)?;
    let pagespeed = PageSpeedClient::from_config(config)?;

    let restaurant = places.get_restaurant_details(place_id).await?;

    let competitors = if let Some(location) = restaurant.location {
        let options = NearbyOptions {
            radius_m: config.competitor_radius_m,
            max_results: u32::try_from(config.max_competitors).unwrap_or(u32::MAX),
            exclude_place_id: Some(place_id.to_owned()),
        };
        places
            .find_nearby_competitors(location.lat, location.lng, &options)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(place_id, error = %e, "competitor search failed");
                Vec::new()
            })
    } else {
        Vec::new()
    };

    let page_speed = pagespeed.analyze(restaurant.website.as_deref()).await;

    let report = build_report(AuditInput {
        restaurant,
        competitors,
        page_speed,
        params: tablerank_audit::RevenueParams {
            average_order_value: config.average_order_value,
            conversion_rate: config.conversion_rate,
            monthly_visitors: config.monthly_visitors,
        },
        weights,
        now: Utc::now(),
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
