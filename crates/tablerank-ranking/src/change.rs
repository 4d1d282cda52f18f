use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    New,
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::New => write!(f, "new"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingChange {
    /// Positions gained since the previous ranking; negative when lost.
    pub change: i64,
    pub direction: Direction,
    pub message: String,
}

fn positions(n: i64) -> &'static str {
    if n == 1 {
        "position"
    } else {
        "positions"
    }
}

/// Compare the current rank against the previously recorded one.
#[must_use]
pub fn ranking_change(current: usize, previous: Option<usize>) -> RankingChange {
    let Some(previous) = previous.filter(|p| *p > 0) else {
        return RankingChange {
            change: 0,
            direction: Direction::New,
            message: "First ranking recorded".to_string(),
        };
    };

    let change = i64::try_from(previous).unwrap_or(i64::MAX)
        - i64::try_from(current).unwrap_or(i64::MAX);
    let (direction, message) = match change {
        c if c > 0 => (Direction::Up, format!("Improved by {c} {}", positions(c))),
        c if c < 0 => (
            Direction::Down,
            format!("Declined by {} {}", -c, positions(-c)),
        ),
        _ => (Direction::Stable, "No change in ranking".to_string()),
    };

    RankingChange {
        change,
        direction,
        message,
    }
}
