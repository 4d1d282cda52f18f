use serde::{Deserialize, Serialize};
use tablerank_core::{Competitor, PageSpeedResult, Restaurant};

use crate::seo::SeoScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: Priority,
    pub category: String,
    pub title: String,
    pub description: String,
    pub estimated_monthly_revenue: u64,
    pub timeframe: String,
}

fn item(
    priority: Priority,
    category: &str,
    title: &str,
    description: String,
    revenue: u64,
    timeframe: &str,
) -> ActionItem {
    ActionItem {
        priority,
        category: category.to_string(),
        title: title.to_string(),
        description,
        estimated_monthly_revenue: revenue,
        timeframe: timeframe.to_string(),
    }
}

/// Mean competitor rating, if there are any competitors.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_competitor_rating(competitors: &[Competitor]) -> Option<f64> {
    if competitors.is_empty() {
        return None;
    }
    Some(competitors.iter().map(|c| c.rating).sum::<f64>() / competitors.len() as f64)
}

/// Recommendations ordered high priority first.
#[must_use]
pub fn action_items(
    seo: &SeoScore,
    page_speed: &PageSpeedResult,
    restaurant: &Restaurant,
    competitors: &[Competitor],
) -> Vec<ActionItem> {
    let mut items = Vec::new();

    if seo.score < 70 {
        if !restaurant.has_website() {
            items.push(item(
                Priority::High,
                "SEO",
                "Create a professional website",
                "Having a website increases visibility and credibility significantly.".to_string(),
                1200,
                "2-4 weeks",
            ));
        }
        if restaurant.photos.len() < 10 {
            items.push(item(
                Priority::Medium,
                "SEO",
                "Add more high-quality photos",
                "Upload at least 10 professional photos of food, interior, and exterior."
                    .to_string(),
                400,
                "1 week",
            ));
        }
        if restaurant.total_ratings < 50 {
            items.push(item(
                Priority::High,
                "Reviews",
                "Increase customer reviews",
                "Actively ask satisfied customers to leave reviews on Google.".to_string(),
                800,
                "4-8 weeks",
            ));
        }
    }

    if page_speed.score < 80 && restaurant.has_website() {
        items.push(item(
            Priority::High,
            "Website",
            "Optimize website loading speed",
            "Compress images and improve hosting to reduce load time.".to_string(),
            600,
            "1-2 weeks",
        ));
    }

    if let Some(avg) = average_competitor_rating(competitors) {
        if restaurant.rating < avg - 0.2 {
            items.push(item(
                Priority::High,
                "Reviews",
                "Improve service quality",
                format!(
                    "Your {}★ rating is below competitors' {avg:.1}★ average.",
                    restaurant.rating
                ),
                1000,
                "4-12 weeks",
            ));
        }
    }

    items.sort_by(|a, b| b.priority.cmp(&a.priority));
    items
}
