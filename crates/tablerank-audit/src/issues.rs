//! Detects listing, review, website and ranking problems and how to fix them.

use serde::{Deserialize, Serialize};
use tablerank_core::{PageSpeedResult, Restaurant};
use tablerank_ranking::RankOutcome;

use crate::responses::ResponseAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueCategory {
    #[serde(rename = "Google Business Profile")]
    GoogleBusinessProfile,
    #[serde(rename = "Review Management")]
    ReviewManagement,
    #[serde(rename = "Website Performance")]
    WebsitePerformance,
    #[serde(rename = "Competitive Position")]
    CompetitivePosition,
    #[serde(rename = "Business Information")]
    BusinessInformation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueImpact {
    pub monthly: u64,
    pub annual: u64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoIssue {
    pub category: IssueCategory,
    pub severity: Level,
    pub impact: Level,
    pub issue: String,
    pub description: String,
    pub revenue_impact: RevenueImpact,
    pub how_to_fix: Vec<String>,
    pub time_to_fix: String,
    pub difficulty: Difficulty,
    pub priority: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IssueTotals {
    pub monthly: u64,
    pub annual: u64,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Everything the detector looks at. Missing parts skip their checks.
#[derive(Debug, Clone, Copy)]
pub struct IssueContext<'a> {
    pub restaurant: &'a Restaurant,
    pub responses: Option<&'a ResponseAnalysis>,
    pub page_speed: Option<&'a PageSpeedResult>,
    pub ranking: Option<&'a RankOutcome>,
}

struct IssueTemplate<'a> {
    category: IssueCategory,
    severity: Level,
    impact: Level,
    issue: String,
    description: &'a str,
    monthly: u64,
    reason: &'a str,
    how_to_fix: &'a [&'a str],
    time_to_fix: &'a str,
    difficulty: Difficulty,
    priority: u8,
}

impl From<IssueTemplate<'_>> for SeoIssue {
    fn from(s: IssueTemplate<'_>) -> Self {
        SeoIssue {
            category: s.category,
            severity: s.severity,
            impact: s.impact,
            issue: s.issue,
            description: s.description.to_string(),
            revenue_impact: RevenueImpact {
                monthly: s.monthly,
                annual: s.monthly * 12,
                reason: s.reason.to_string(),
            },
            how_to_fix: s.how_to_fix.iter().map(|step| (*step).to_string()).collect(),
            time_to_fix: s.time_to_fix.to_string(),
            difficulty: s.difficulty,
            priority: s.priority,
        }
    }
}

fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn business_profile_issues(r: &Restaurant, out: &mut Vec<SeoIssue>) {
    if blank(r.phone.as_deref()) {
        out.push(
            IssueTemplate {
                category: IssueCategory::GoogleBusinessProfile,
                severity: Level::Critical,
                impact: Level::High,
                issue: "Missing Phone Number".to_string(),
                description: "Your Google Business Profile doesn't have a phone number listed.",
                monthly: 800,
                reason: "Customers can't call you directly from search results",
                how_to_fix: &[
                    "Open your Google Business Profile",
                    "Go to the Info tab",
                    "Add your phone number, verify and save",
                ],
                time_to_fix: "5 minutes",
                difficulty: Difficulty::Easy,
                priority: 1,
            }
            .into(),
        );
    }

    if !r.has_website() {
        out.push(
            IssueTemplate {
                category: IssueCategory::GoogleBusinessProfile,
                severity: Level::Critical,
                impact: Level::High,
                issue: "Missing Website URL".to_string(),
                description: "No website listed on your Google Business Profile.",
                monthly: 1200,
                reason: "Customers can't view your menu, make reservations, or learn more",
                how_to_fix: &[
                    "Add your website to Google Business Profile",
                    "If you don't have a website, create a free Google Site",
                    "Include menu, hours, location and contact info",
                ],
                time_to_fix: "10 minutes (if you have a website)",
                difficulty: Difficulty::Easy,
                priority: 1,
            }
            .into(),
        );
    }

    if r.photos.len() < 10 {
        out.push(
            IssueTemplate {
                category: IssueCategory::GoogleBusinessProfile,
                severity: Level::High,
                impact: Level::Medium,
                issue: format!("Only {} Photos", r.photos.len()),
                description: "Listings with many photos get far more calls and direction requests.",
                monthly: 600,
                reason: "Photos increase customer engagement and trust",
                how_to_fix: &[
                    "Photograph your best dishes, interior and exterior",
                    "Upload them to Google Business Profile with descriptions",
                    "Refresh photos monthly",
                ],
                time_to_fix: "2 hours (photo shoot + upload)",
                difficulty: Difficulty::Medium,
                priority: 2,
            }
            .into(),
        );
    }

    if r.hours.as_ref().is_none_or(|h| h.weekday_text.is_empty()) {
        out.push(
            IssueTemplate {
                category: IssueCategory::GoogleBusinessProfile,
                severity: Level::High,
                impact: Level::Medium,
                issue: "Missing Business Hours".to_string(),
                description: "Customers don't know when you're open.",
                monthly: 400,
                reason: "Customers visit competitors with clear hours",
                how_to_fix: &[
                    "Open the Info tab of your Google Business Profile",
                    "Add hours for each day",
                    "Mark special hours for holidays and events",
                ],
                time_to_fix: "10 minutes",
                difficulty: Difficulty::Easy,
                priority: 2,
            }
            .into(),
        );
    }
}

fn review_issues(r: &Restaurant, responses: Option<&ResponseAnalysis>, out: &mut Vec<SeoIssue>) {
    if r.total_ratings < 50 {
        out.push(
            IssueTemplate {
                category: IssueCategory::ReviewManagement,
                severity: Level::Critical,
                impact: Level::High,
                issue: format!("Only {} Reviews", r.total_ratings),
                description: "Restaurants with 50+ reviews rank significantly higher in search.",
                monthly: 1500,
                reason: "More reviews mean higher rankings and more customers",
                how_to_fix: &[
                    "Ask happy customers for reviews in person",
                    "Send review links by email or SMS after visits",
                    "Put QR codes on receipts and tables",
                    "Aim for 5-10 new reviews per month",
                ],
                time_to_fix: "Ongoing",
                difficulty: Difficulty::Medium,
                priority: 1,
            }
            .into(),
        );
    }

    if r.rating < 4.0 && r.total_ratings > 10 {
        out.push(
            IssueTemplate {
                category: IssueCategory::ReviewManagement,
                severity: Level::Critical,
                impact: Level::Critical,
                issue: format!("Low Rating ({:.1}/5.0)", r.rating),
                description: "Ratings below 4.0 severely hurt your rankings and customer trust.",
                monthly: 2500,
                reason: "Customers skip restaurants with ratings below 4.0",
                how_to_fix: &[
                    "Respond professionally to negative reviews",
                    "Find the common complaints and fix the underlying problems",
                    "Train staff on customer service",
                    "Focus on earning new positive reviews",
                ],
                time_to_fix: "3-6 months",
                difficulty: Difficulty::Hard,
                priority: 1,
            }
            .into(),
        );
    }

    let Some(responses) = responses.filter(|a| a.has_data) else {
        return;
    };

    if responses.response_rate < 0.5 && r.total_ratings > 5 {
        out.push(
            IssueTemplate {
                category: IssueCategory::ReviewManagement,
                severity: Level::High,
                impact: Level::Medium,
                issue: format!(
                    "Low Response Rate ({}%)",
                    (responses.response_rate * 100.0).round()
                ),
                description: "Responding to reviews shows you care and can lift your rating.",
                monthly: 500,
                reason: "Customers prefer businesses that engage with feedback",
                how_to_fix: &[
                    "Respond to all reviews within 24-48 hours",
                    "Thank positive reviewers and invite them back",
                    "Apologize to negative reviewers and explain the fix",
                ],
                time_to_fix: "30 min/week",
                difficulty: Difficulty::Easy,
                priority: 2,
            }
            .into(),
        );
    }

    if responses.response_rate > 0.0 && responses.avg_response_hours > 72.0 {
        out.push(
            IssueTemplate {
                category: IssueCategory::ReviewManagement,
                severity: Level::Medium,
                impact: Level::Low,
                issue: format!(
                    "Slow Response Time ({}h avg)",
                    responses.avg_response_hours.round()
                ),
                description: "Faster responses (within 24h) show better customer service.",
                monthly: 200,
                reason: "Quick responses improve reputation",
                how_to_fix: &[
                    "Turn on Google Business notifications",
                    "Check for new reviews daily",
                    "Use templates to respond within 24 hours",
                ],
                time_to_fix: "Ongoing",
                difficulty: Difficulty::Easy,
                priority: 3,
            }
            .into(),
        );
    }
}

fn performance_issues(page_speed: Option<&PageSpeedResult>, out: &mut Vec<SeoIssue>) {
    // A missing website is already reported as a profile issue.
    let Some(ps) = page_speed.filter(|p| p.has_website()) else {
        return;
    };

    if ps.score < 50 {
        out.push(
            IssueTemplate {
                category: IssueCategory::WebsitePerformance,
                severity: Level::High,
                impact: Level::High,
                issue: format!("Poor PageSpeed Score ({}/100)", ps.score),
                description: "Many users abandon sites that take more than 3 seconds to load.",
                monthly: 800,
                reason: "Slow websites lose customers and rank lower on Google",
                how_to_fix: &[
                    "Compress images and serve WebP",
                    "Enable browser caching",
                    "Minify CSS and JavaScript",
                    "Use a CDN",
                ],
                time_to_fix: "2-4 hours",
                difficulty: Difficulty::Medium,
                priority: 2,
            }
            .into(),
        );
    } else if ps.score < 80 {
        out.push(
            IssueTemplate {
                category: IssueCategory::WebsitePerformance,
                severity: Level::Medium,
                impact: Level::Medium,
                issue: format!("Moderate PageSpeed Score ({}/100)", ps.score),
                description: "Your website could be faster to improve user experience.",
                monthly: 300,
                reason: "Faster sites convert better",
                how_to_fix: &["Compress images", "Enable caching", "Remove unused code"],
                time_to_fix: "1-2 hours",
                difficulty: Difficulty::Easy,
                priority: 3,
            }
            .into(),
        );
    }

    if ps.load_time_secs > 5.0 {
        out.push(
            IssueTemplate {
                category: IssueCategory::WebsitePerformance,
                severity: Level::High,
                impact: Level::High,
                issue: format!("Slow Load Time ({:.1}s)", ps.load_time_secs),
                description: "Pages should load in under 3 seconds.",
                monthly: 600,
                reason: "Every extra second of delay costs conversions",
                how_to_fix: &[
                    "Optimize images",
                    "Lazy-load below-the-fold images",
                    "Reduce server response time",
                    "Remove render-blocking resources",
                ],
                time_to_fix: "2-3 hours",
                difficulty: Difficulty::Medium,
                priority: 2,
            }
            .into(),
        );
    }
}

fn competitive_issues(ranking: Option<&RankOutcome>, out: &mut Vec<SeoIssue>) {
    let Some(ranking) = ranking else {
        return;
    };
    let (rank, competitors) = (ranking.rank, ranking.total_competitors);
    let issue = format!("Ranked #{rank} of {}", competitors + 1);

    if rank > 5 && competitors > 5 {
        out.push(
            IssueTemplate {
                category: IssueCategory::CompetitivePosition,
                severity: Level::High,
                impact: Level::Critical,
                issue,
                description: "Most clicks go to the top 3 results. You're losing customers.",
                monthly: 3000,
                reason: "Higher rankings bring exponentially more customers",
                how_to_fix: &[
                    "Get 10+ new positive reviews",
                    "Add 20+ high-quality photos",
                    "Complete every Google Business Profile field",
                    "Respond to every review",
                    "Build local citations (Yelp, TripAdvisor)",
                ],
                time_to_fix: "2-6 months",
                difficulty: Difficulty::Hard,
                priority: 1,
            }
            .into(),
        );
    } else if rank > 3 && competitors > 3 {
        out.push(
            IssueTemplate {
                category: IssueCategory::CompetitivePosition,
                severity: Level::Medium,
                impact: Level::High,
                issue,
                description: "Breaking into the top 3 will significantly increase visibility.",
                monthly: 1500,
                reason: "Top 3 positions get 3x more clicks",
                how_to_fix: &[
                    "Analyze the top 3 competitors",
                    "Match their review count and rating",
                    "Add more photos than they have",
                ],
                time_to_fix: "1-3 months",
                difficulty: Difficulty::Medium,
                priority: 1,
            }
            .into(),
        );
    }
}

fn content_issues(r: &Restaurant, out: &mut Vec<SeoIssue>) {
    if r.address.trim().is_empty() {
        out.push(
            IssueTemplate {
                category: IssueCategory::BusinessInformation,
                severity: Level::Critical,
                impact: Level::Critical,
                issue: "Missing Address".to_string(),
                description: "Customers can't find your location.",
                monthly: 2000,
                reason: "No address means invisible in local search",
                how_to_fix: &[
                    "Add the complete address to Google Business Profile",
                    "Keep the address identical across platforms",
                    "Verify the location with Google",
                ],
                time_to_fix: "15 minutes",
                difficulty: Difficulty::Easy,
                priority: 1,
            }
            .into(),
        );
    }

    let category_tags = r
        .types
        .iter()
        .filter(|t| t.contains("restaurant") || t.contains("food"))
        .count();
    if category_tags < 2 {
        out.push(
            IssueTemplate {
                category: IssueCategory::BusinessInformation,
                severity: Level::Medium,
                impact: Level::Medium,
                issue: "Limited Category Tags".to_string(),
                description: "More specific categories help you appear in relevant searches.",
                monthly: 400,
                reason: "Better categorization means more search visibility",
                how_to_fix: &[
                    "Add secondary categories such as \"Italian Restaurant\"",
                    "Be specific to your cuisine and service type",
                ],
                time_to_fix: "10 minutes",
                difficulty: Difficulty::Easy,
                priority: 3,
            }
            .into(),
        );
    }
}

/// All detected issues, highest impact first. Equal impacts keep detection
/// order.
#[must_use]
pub fn detect_issues(ctx: &IssueContext<'_>) -> Vec<SeoIssue> {
    let mut issues = Vec::new();
    business_profile_issues(ctx.restaurant, &mut issues);
    review_issues(ctx.restaurant, ctx.responses, &mut issues);
    performance_issues(ctx.page_speed, &mut issues);
    competitive_issues(ctx.ranking, &mut issues);
    content_issues(ctx.restaurant, &mut issues);

    issues.sort_by(|a, b| b.impact.cmp(&a.impact));
    tracing::debug!(count = issues.len(), "seo issues detected");
    issues
}

#[must_use]
pub fn total_impact(issues: &[SeoIssue]) -> IssueTotals {
    let count = |level: Level| issues.iter().filter(|i| i.severity == level).count();
    IssueTotals {
        monthly: issues.iter().map(|i| i.revenue_impact.monthly).sum(),
        annual: issues.iter().map(|i| i.revenue_impact.annual).sum(),
        critical: count(Level::Critical),
        high: count(Level::High),
        medium: count(Level::Medium),
        low: count(Level::Low),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablerank_core::{OpeningHours, Photo};
    use tablerank_ranking::{compute_rank, RankInput};

    fn healthy() -> Restaurant {
        let mut r = Restaurant::new("p1", "Trattoria");
        r.address = "1 Main St".to_string();
        r.phone = Some("+1 555 0100".to_string());
        r.website = Some("https://trattoria.example".to_string());
        r.hours = Some(OpeningHours {
            open_now: Some(true),
            weekday_text: vec!["Monday: 9 AM - 5 PM".to_string()],
        });
        r.photos = (0..12)
            .map(|n| Photo {
                name: format!("photo{n}"),
                width: None,
                height: None,
            })
            .collect();
        r.types = vec![
            "italian_restaurant".to_string(),
            "restaurant".to_string(),
            "food".to_string(),
        ];
        r.rating = 4.6;
        r.total_ratings = 300;
        r
    }

    #[test]
    fn healthy_listing_has_no_issues() {
        let r = healthy();
        let ctx = IssueContext {
            restaurant: &r,
            responses: None,
            page_speed: None,
            ranking: None,
        };
        assert!(detect_issues(&ctx).is_empty());
    }

    #[test]
    fn bare_listing_flags_profile_and_content() {
        let r = Restaurant::new("p1", "Diner");
        let ctx = IssueContext {
            restaurant: &r,
            responses: None,
            page_speed: None,
            ranking: None,
        };
        let issues = detect_issues(&ctx);
        let names: Vec<&str> = issues.iter().map(|i| i.issue.as_str()).collect();
        assert!(names.contains(&"Missing Phone Number"));
        assert!(names.contains(&"Missing Website URL"));
        assert!(names.contains(&"Only 0 Photos"));
        assert!(names.contains(&"Missing Address"));
        assert!(names.contains(&"Limited Category Tags"));
        // Low rating needs more than ten reviews before it counts.
        assert!(!names.iter().any(|n| n.starts_with("Low Rating")));
        assert_eq!(issues[0].impact, Level::Critical);
    }

    #[test]
    fn issues_sorted_by_impact() {
        let r = Restaurant::new("p1", "Diner");
        let ctx = IssueContext {
            restaurant: &r,
            responses: None,
            page_speed: None,
            ranking: None,
        };
        let issues = detect_issues(&ctx);
        for pair in issues.windows(2) {
            assert!(pair[0].impact >= pair[1].impact);
        }
    }

    #[test]
    fn slow_website_flags_performance() {
        let r = healthy();
        let mut ps = PageSpeedResult::estimated("https://trattoria.example");
        ps.score = 35;
        ps.load_time_secs = 6.2;
        let ctx = IssueContext {
            restaurant: &r,
            responses: None,
            page_speed: Some(&ps),
            ranking: None,
        };
        let issues = detect_issues(&ctx);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.issue == "Poor PageSpeed Score (35/100)"));
        assert!(issues.iter().any(|i| i.issue == "Slow Load Time (6.2s)"));
    }

    #[test]
    fn no_website_skips_performance_checks() {
        let r = healthy();
        let ps = PageSpeedResult::no_website();
        let ctx = IssueContext {
            restaurant: &r,
            responses: None,
            page_speed: Some(&ps),
            ranking: None,
        };
        assert!(detect_issues(&ctx)
            .iter()
            .all(|i| i.category != IssueCategory::WebsitePerformance));
    }

    #[test]
    fn low_rank_in_crowded_field_is_critical() {
        let r = healthy();
        let subject = RankInput {
            tags: vec!["italian_restaurant".to_string()],
            rating: Some(3.0),
            ..RankInput::default()
        };
        let competitors: Vec<RankInput> = (0..7)
            .map(|i| RankInput {
                id: Some(format!("c{i}")),
                tags: vec!["italian_restaurant".to_string()],
                rating: Some(4.8),
                total_reviews: Some(800.0),
                distance_km: Some(0.1),
                ..RankInput::default()
            })
            .collect();
        let outcome = compute_rank(&subject, &competitors);
        assert_eq!(outcome.rank, 8);
        let ctx = IssueContext {
            restaurant: &r,
            responses: None,
            page_speed: None,
            ranking: Some(&outcome),
        };
        let issues = detect_issues(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue, "Ranked #8 of 8");
        assert_eq!(issues[0].impact, Level::Critical);
    }

    #[test]
    fn totals_sum_revenue_and_count_severity() {
        let r = Restaurant::new("p1", "Diner");
        let ctx = IssueContext {
            restaurant: &r,
            responses: None,
            page_speed: None,
            ranking: None,
        };
        let issues = detect_issues(&ctx);
        let totals = total_impact(&issues);
        // phone 800 + website 1200 + photos 600 + hours 400 + reviews 1500 + address 2000 + tags 400
        assert_eq!(totals.monthly, 6900);
        assert_eq!(totals.annual, 6900 * 12);
        assert_eq!(totals.critical, 4);
        assert_eq!(totals.high, 2);
        assert_eq!(totals.medium, 1);
        assert_eq!(totals.low, 0);
    }
}
