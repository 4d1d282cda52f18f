//! Monthly revenue lost to weak SEO, slow pages, ratings and slow replies.
//!
//! Each loss converts a share of lost visitors into orders via the conversion
//! rate and average order value.

use serde::{Deserialize, Serialize};

const IDEAL_RATING: f64 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueParams {
    pub average_order_value: f64,
    pub conversion_rate: f64,
    pub monthly_visitors: u32,
}

impl Default for RevenueParams {
    fn default() -> Self {
        Self {
            average_order_value: 28.0,
            conversion_rate: 0.03,
            monthly_visitors: 1000,
        }
    }
}

/// Inputs to [`RevenueCalculator::total_loss`]. Missing values fall back to
/// middling defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueMetrics {
    pub seo_score: f64,
    pub load_time_secs: f64,
    pub rating: f64,
    pub total_reviews: u32,
    pub avg_response_hours: f64,
    pub response_rate: f64,
    pub monthly_visitors: Option<u32>,
}

impl Default for RevenueMetrics {
    fn default() -> Self {
        Self {
            seo_score: 50.0,
            load_time_secs: 4.0,
            rating: 3.8,
            total_reviews: 25,
            avg_response_hours: 48.0,
            response_rate: 0.6,
            monthly_visitors: None,
        }
    }
}

/// One loss line: the share of visitors lost and what that costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loss {
    pub monthly_loss: u64,
    pub annual_loss: u64,
    /// Share of visitors lost, in percent.
    pub lost_percent: u8,
    pub lost_visitors: u64,
    pub lost_orders: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueMessages {
    pub seo: String,
    pub speed: String,
    pub reviews: String,
    pub response: String,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalRevenueLoss {
    pub seo: Loss,
    pub speed: Loss,
    pub reviews: Loss,
    pub response: Loss,
    pub total_monthly_loss: u64,
    pub total_annual_loss: u64,
    pub overall_score: u8,
    pub grade: Grade,
    pub messages: RevenueMessages,
    pub params: RevenueParams,
}

/// Fraction of search traffic missed at a given SEO score.
#[must_use]
pub fn seo_traffic_loss(seo_score: f64) -> f64 {
    let s = seo_score;
    if s <= 40.0 {
        0.6 + (40.0 - s) * 0.005
    } else if s <= 70.0 {
        0.3 + (70.0 - s) * 0.01
    } else if s <= 85.0 {
        0.1 + (85.0 - s) * 0.0133
    } else {
        ((100.0 - s) * 0.01).max(0.0)
    }
}

/// Extra bounce rate caused by a page load time in seconds.
#[must_use]
pub fn bounce_rate_increase(load_time_secs: f64) -> f64 {
    let t = load_time_secs;
    if t <= 1.0 {
        0.0
    } else if t <= 3.0 {
        0.07 + (t - 1.0) * 0.125
    } else if t <= 5.0 {
        0.32 + (t - 3.0) * 0.29
    } else {
        (0.9 + (t - 5.0) * 0.01).min(0.95)
    }
}

/// Visibility lost to a rating below 4.5 and a thin review count.
#[must_use]
pub fn review_visibility_loss(rating: f64, total_reviews: u32) -> f64 {
    let gap = (IDEAL_RATING - rating).max(0.0);
    let count_penalty = match total_reviews {
        n if n < 10 => 0.3,
        n if n < 25 => 0.2,
        n if n < 50 => 0.1,
        _ => 0.0,
    };
    (gap * 0.5 + count_penalty).min(0.8)
}

/// Engagement lost to slow or missing owner replies.
#[must_use]
pub fn response_engagement_loss(avg_response_hours: f64, response_rate: f64) -> f64 {
    let time = if avg_response_hours > 72.0 {
        0.4
    } else if avg_response_hours > 48.0 {
        0.25
    } else if avg_response_hours > 24.0 {
        0.1
    } else {
        0.0
    };
    let rate = if response_rate < 0.5 {
        0.3
    } else if response_rate < 0.8 {
        0.15
    } else {
        0.0
    };
    f64::min(time + rate, 0.7)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_u64(v: f64) -> u64 {
    if v.is_finite() {
        v.round().max(0.0) as u64
    } else {
        0
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_u8(v: f64) -> u8 {
    if v.is_finite() {
        v.round().clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

/// Group digits with commas, e.g. `12,345`.
fn dollars(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RevenueCalculator {
    params: RevenueParams,
}

impl RevenueCalculator {
    #[must_use]
    pub fn new(params: RevenueParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &RevenueParams {
        &self.params
    }

    fn loss(&self, share: f64, visitors: u32) -> Loss {
        let lost_visitors = f64::from(visitors) * share;
        let lost_orders = lost_visitors * self.params.conversion_rate;
        let monthly = lost_orders * self.params.average_order_value;
        Loss {
            monthly_loss: round_u64(monthly),
            annual_loss: round_u64(monthly * 12.0),
            lost_percent: round_u8(share * 100.0),
            lost_visitors: round_u64(lost_visitors),
            lost_orders: round_u64(lost_orders),
        }
    }

    #[must_use]
    pub fn seo_loss(&self, seo_score: f64, visitors: u32) -> Loss {
        self.loss(seo_traffic_loss(seo_score), visitors)
    }

    #[must_use]
    pub fn speed_loss(&self, load_time_secs: f64, visitors: u32) -> Loss {
        self.loss(bounce_rate_increase(load_time_secs), visitors)
    }

    #[must_use]
    pub fn review_loss(&self, rating: f64, total_reviews: u32, visitors: u32) -> Loss {
        self.loss(review_visibility_loss(rating, total_reviews), visitors)
    }

    #[must_use]
    pub fn response_loss(&self, avg_response_hours: f64, response_rate: f64, visitors: u32) -> Loss {
        self.loss(
            response_engagement_loss(avg_response_hours, response_rate),
            visitors,
        )
    }

    /// Weighted 0-100 health score: SEO 30 %, speed 20 %, reviews 30 %,
    /// responses 20 %.
    #[must_use]
    pub fn overall_score(metrics: &RevenueMetrics) -> u8 {
        let speed = (100.0 - (metrics.load_time_secs - 1.0) * 20.0).max(0.0);
        let reviews = metrics.rating / 5.0 * 100.0;
        let response =
            (100.0 - metrics.avg_response_hours / 24.0 * 20.0).max(0.0) * metrics.response_rate;
        round_u8(metrics.seo_score * 0.3 + speed * 0.2 + reviews * 0.3 + response * 0.2)
    }

    #[must_use]
    pub fn total_loss(&self, metrics: &RevenueMetrics) -> TotalRevenueLoss {
        let visitors = metrics
            .monthly_visitors
            .unwrap_or(self.params.monthly_visitors);

        let seo = self.seo_loss(metrics.seo_score, visitors);
        let speed = self.speed_loss(metrics.load_time_secs, visitors);
        let reviews = self.review_loss(metrics.rating, metrics.total_reviews, visitors);
        let response = self.response_loss(
            metrics.avg_response_hours,
            metrics.response_rate,
            visitors,
        );

        let total_monthly_loss =
            seo.monthly_loss + speed.monthly_loss + reviews.monthly_loss + response.monthly_loss;
        let overall_score = Self::overall_score(metrics);
        let grade = Grade::from_score(overall_score);

        let messages = RevenueMessages {
            seo: seo_message(&seo),
            speed: speed_message(&speed, metrics.load_time_secs),
            reviews: review_message(&reviews, metrics.rating, metrics.total_reviews),
            response: response_message(&response, metrics.avg_response_hours),
            total: total_message(total_monthly_loss, total_monthly_loss * 12, grade),
        };

        TotalRevenueLoss {
            seo,
            speed,
            reviews,
            response,
            total_monthly_loss,
            total_annual_loss: total_monthly_loss * 12,
            overall_score,
            grade,
            messages,
            params: RevenueParams {
                monthly_visitors: visitors,
                ..self.params
            },
        }
    }
}

/// Rough monthly visitor count from review volume, rating and price level.
#[must_use]
pub fn estimate_monthly_visitors(rating: f64, total_reviews: u32, price_level: u8) -> u32 {
    let base = match total_reviews {
        n if n < 10 => 200.0,
        n if n < 50 => 500.0,
        n if n < 100 => 1000.0,
        n if n < 500 => 2000.0,
        _ => 5000.0,
    };
    let rating_multiplier = (rating / IDEAL_RATING).max(0.5);
    let price_multiplier = match price_level {
        1 => 1.3,
        2 => 1.0,
        3 => 0.8,
        _ => 0.6,
    };
    u32::try_from(round_u64(base * rating_multiplier * price_multiplier)).unwrap_or(u32::MAX)
}

fn seo_message(loss: &Loss) -> String {
    let (m, a) = (dollars(loss.monthly_loss), dollars(loss.annual_loss));
    if loss.monthly_loss > 2000 {
        format!("Your poor SEO is costing you ${m} every month in lost orders. That's ${a} per year you're leaving on the table.")
    } else if loss.monthly_loss > 500 {
        format!("Your SEO could be better - you're missing out on ${m} monthly (${a} yearly) in potential revenue.")
    } else {
        format!("Your SEO is performing well, but there's still ${m} monthly in optimization opportunities.")
    }
}

fn speed_message(loss: &Loss, load_time_secs: f64) -> String {
    let m = dollars(loss.monthly_loss);
    if load_time_secs > 4.0 {
        format!(
            "Your slow website loses ${m} monthly. Visitors leave before seeing your menu, costing you {} potential orders.",
            loss.lost_orders
        )
    } else if load_time_secs > 3.0 {
        format!("Your website speed is costing you ${m} per month. Faster loading means more customers stay and order.")
    } else {
        format!("Your website speed is good, but optimizing further could save ${m} monthly.")
    }
}

fn review_message(loss: &Loss, rating: f64, total_reviews: u32) -> String {
    let m = dollars(loss.monthly_loss);
    if rating < 4.0 {
        format!(
            "Your {rating}★ rating means ${m} in missed sales each month. Competitors with 4.5★ get {}% more customers.",
            loss.lost_percent
        )
    } else if total_reviews < 25 {
        format!("You need more reviews! Your low review count costs ${m} monthly in reduced visibility.")
    } else {
        format!("Your reviews are performing well, but reaching 4.5★ could add ${m} monthly revenue.")
    }
}

fn response_message(loss: &Loss, avg_response_hours: f64) -> String {
    let m = dollars(loss.monthly_loss);
    if avg_response_hours > 48.0 {
        format!("Slow customer response times cost ${m} monthly. Quick responses build trust and drive orders.")
    } else {
        format!("Your response time is good, but optimizing customer engagement could add ${m} monthly.")
    }
}

fn total_message(monthly: u64, annual: u64, grade: Grade) -> String {
    let (m, a) = (dollars(monthly), dollars(annual));
    match grade {
        Grade::F | Grade::D => format!("Critical: You're losing ${m}/month (${a}/year) across SEO, speed, and reviews. Immediate action needed."),
        Grade::C => format!("Warning: ${m} monthly revenue at risk. With focused improvements, you could capture this lost business."),
        Grade::B => format!("Good performance, but ${m} monthly optimization opportunity exists to reach peak performance."),
        Grade::A => format!("Excellent! You're maximizing revenue potential with minimal losses of only ${m} monthly."),
    }
}
