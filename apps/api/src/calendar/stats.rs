use serde::Serialize;

use crate::models::schedule::{PostStatus, ScheduledPost};
use crate::resonance::ers::round_to;

/// Dashboard metric cards for one brand's calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarStats {
    pub total_content: usize,
    pub scheduled: usize,
    pub published: usize,
    /// Mean over posts with a positive score, to 1 decimal. Zero when none are scored.
    pub avg_resonance_score: f64,
}

pub fn compute_calendar_stats(posts: &[ScheduledPost]) -> CalendarStats {
    let count_status = |status: PostStatus| posts.iter().filter(|p| p.status == status).count();

    let scores: Vec<f64> = posts
        .iter()
        .map(|p| p.resonance_score)
        .filter(|s| *s > 0.0)
        .collect();
    let avg_resonance_score = if scores.is_empty() {
        0.0
    } else {
        round_to(scores.iter().sum::<f64>() / scores.len() as f64, 1)
    };

    CalendarStats {
        total_content: posts.len(),
        scheduled: count_status(PostStatus::Scheduled),
        published: count_status(PostStatus::Published),
        avg_resonance_score,
    }
}
