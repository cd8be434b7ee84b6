// src/scoring/aggregation.rs

use std::collections::HashMap;

use crate::{
    config::{MIN_TREND_ATTEMPTS, TREND_THRESHOLD_PERCENT},
    models::{
        attempt::AttemptSummary,
        stats::{AggregateStats, CategoryPerformance, ImprovementScore, Trend},
    },
};

/// Computes dashboard statistics over a user's full attempt history.
///
/// `attempts` is expected most-recent-first, as returned by the attempt repository.
pub fn aggregate(attempts: &[AttemptSummary]) -> AggregateStats {
    let scores: Vec<i64> = attempts.iter().filter_map(|a| a.score).collect();

    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<i64>() as f64 / scores.len() as f64
    };

    AggregateStats {
        total_attempts: scores.len(),
        average_score,
        min_score: scores.iter().copied().min(),
        max_score: scores.iter().copied().max(),
        category_performance: category_performance(attempts),
        improvement_score: improvement_trend(attempts),
    }
}

/// Average score per quiz category.
///
/// Categories are compared exactly as stored and listed in order of first
/// occurrence. Attempts without a score are skipped.
pub fn category_performance(attempts: &[AttemptSummary]) -> Vec<CategoryPerformance> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, i64, usize)> = Vec::new();

    for attempt in attempts {
        let Some(score) = attempt.score else {
            continue;
        };
        let slot = *index.entry(attempt.category.as_str()).or_insert_with(|| {
            totals.push((attempt.category.as_str(), 0, 0));
            totals.len() - 1
        });
        totals[slot].1 += score;
        totals[slot].2 += 1;
    }

    totals
        .into_iter()
        .map(|(category, sum, count)| CategoryPerformance {
            category: category.to_string(),
            avg_score: sum as f64 / count as f64,
            attempt_count: count,
        })
        .collect()
}

/// Compares the recent half of the scored history against the older half.
///
/// Needs `MIN_TREND_ATTEMPTS` attempts with both a score and a completion
/// time; fewer yields `stable` at 0%. When the older half averages zero the
/// change is undefined, so any positive recent average counts as a 100%
/// improvement and anything else is `stable`.
pub fn improvement_trend(attempts: &[AttemptSummary]) -> ImprovementScore {
    let mut qualifying: Vec<(chrono::DateTime<chrono::Utc>, i64)> = attempts
        .iter()
        .filter_map(|a| Some((a.completed_at?, a.score?)))
        .collect();

    if qualifying.len() < MIN_TREND_ATTEMPTS {
        return ImprovementScore::stable();
    }

    // Stable sort keeps repository order for equal timestamps.
    qualifying.sort_by(|a, b| b.0.cmp(&a.0));

    let mid = qualifying.len() / 2;
    let (recent, older) = qualifying.split_at(mid);
    let recent_avg = mean(recent);
    let older_avg = mean(older);

    if older_avg == 0.0 {
        return if recent_avg > 0.0 {
            ImprovementScore {
                trend: Trend::Improving,
                percentage: 100,
            }
        } else {
            ImprovementScore::stable()
        };
    }

    let change = (recent_avg - older_avg) / older_avg * 100.0;
    let trend = if change > TREND_THRESHOLD_PERCENT {
        Trend::Improving
    } else if change < -TREND_THRESHOLD_PERCENT {
        Trend::Declining
    } else {
        Trend::Stable
    };

    ImprovementScore {
        trend,
        percentage: round_half_up(change),
    }
}

fn mean(samples: &[(chrono::DateTime<chrono::Utc>, i64)]) -> f64 {
    samples.iter().map(|(_, s)| *s as f64).sum::<f64>() / samples.len() as f64
}

/// Nearest integer, halves toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
