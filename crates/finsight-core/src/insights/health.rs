//! Financial health score derived from the insight mix

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ranking::SeverityCounts;

const BASE_SCORE: i64 = 100;
const CRITICAL_PENALTY: i64 = 20;
const WARNING_PENALTY: i64 = 10;
const SUCCESS_BONUS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    NeedsAttention,
    Critical,
}

impl HealthStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::NeedsAttention,
            _ => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::NeedsAttention => "needs_attention",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Score in 0..=100 plus its status band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: u8,
    pub status: HealthStatus,
}

impl HealthScore {
    pub fn from_counts(counts: &SeverityCounts) -> Self {
        let raw = BASE_SCORE - CRITICAL_PENALTY * counts.critical as i64
            - WARNING_PENALTY * counts.warning as i64
            + SUCCESS_BONUS * counts.success as i64;
        let score = raw.clamp(0, 100) as u8;

        Self {
            score,
            status: HealthStatus::from_score(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(critical: usize, warning: usize, info: usize, success: usize) -> SeverityCounts {
        SeverityCounts {
            critical,
            warning,
            info,
            success,
        }
    }

    #[test]
    fn test_score_penalties_and_bonus() {
        assert_eq!(HealthScore::from_counts(&counts(0, 0, 5, 0)).score, 100);
        assert_eq!(HealthScore::from_counts(&counts(1, 1, 0, 0)).score, 70);
        assert_eq!(HealthScore::from_counts(&counts(1, 0, 0, 2)).score, 90);
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(HealthScore::from_counts(&counts(0, 0, 0, 10)).score, 100);

        let worst = HealthScore::from_counts(&counts(6, 3, 0, 0));
        assert_eq!(worst.score, 0);
        assert_eq!(worst.status, HealthStatus::Critical);
    }

    #[test]
    fn test_status_bands() {
        assert_eq!(HealthStatus::from_score(100), HealthStatus::Excellent);
        assert_eq!(HealthStatus::from_score(80), HealthStatus::Excellent);
        assert_eq!(HealthStatus::from_score(79), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(60), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(59), HealthStatus::NeedsAttention);
        assert_eq!(HealthStatus::from_score(40), HealthStatus::NeedsAttention);
        assert_eq!(HealthStatus::from_score(39), HealthStatus::Critical);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_value(HealthStatus::NeedsAttention).unwrap();
        assert_eq!(json, "needs_attention");
    }
}
