// src/models/stats.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::attempt::AttemptSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

/// Recent-half vs older-half comparison of a user's scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImprovementScore {
    pub trend: Trend,
    /// Percentage change, rounded to the nearest integer.
    pub percentage: i64,
}

impl ImprovementScore {
    pub fn stable() -> Self {
        ImprovementScore {
            trend: Trend::Stable,
            percentage: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryPerformance {
    pub category: String,
    pub avg_score: f64,
    pub attempt_count: usize,
}

/// Derived statistics over a user's full attempt history. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AggregateStats {
    pub total_attempts: usize,
    pub average_score: f64,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
    /// Insertion order of each category's first occurrence.
    pub category_performance: Vec<CategoryPerformance>,
    pub improvement_score: ImprovementScore,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub recent_attempts: Vec<AttemptSummary>,
    #[serde(flatten)]
    pub stats: AggregateStats,
}
