//! Turns a finished game's stats into what the result screen shows.

use crate::models::{GameKind, GameStats};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLine {
    pub word: String,
    pub verdict: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Headline {
    /// Match reports time and moves instead of a percentage.
    Timed { seconds: u64, moves: u32 },
    Scored {
        percentage: u32,
        score: u32,
        total: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub mode: GameKind,
    pub message: &'static str,
    pub headline: Headline,
    pub review: Vec<ReviewLine>,
}

pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(score) / f64::from(total) * 100.0).round() as u32
}

pub fn message_for(percentage: u32) -> &'static str {
    match percentage {
        100.. => "Perfect Score! You're a Genius!",
        80..=99 => "Great job! Almost there!",
        50..=79 => "Good effort, keep going!",
        _ => "Keep practicing!",
    }
}

pub fn summarize(stats: &GameStats) -> ResultSummary {
    if stats.mode == GameKind::Match {
        return ResultSummary {
            mode: stats.mode,
            message: "Board Cleared!",
            headline: Headline::Timed {
                seconds: stats.time_seconds.unwrap_or_default(),
                moves: stats.moves.unwrap_or_default(),
            },
            review: Vec::new(),
        };
    }

    let pct = percentage(stats.score, stats.total);
    let review = stats
        .history
        .iter()
        .flatten()
        .map(|entry| ReviewLine {
            word: entry.word.clone(),
            verdict: if entry.is_correct { "Correct" } else { "Missed" },
        })
        .collect();

    ResultSummary {
        mode: stats.mode,
        message: message_for(pct),
        headline: Headline::Scored {
            percentage: pct,
            score: stats.score,
            total: stats.total,
        },
        review,
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.message, self.mode.label())?;
        match &self.headline {
            Headline::Timed { seconds, moves } => {
                writeln!(f, "Total time: {}s", seconds)?;
                writeln!(f, "{} Moves", moves)?;
            }
            Headline::Scored {
                percentage,
                score,
                total,
            } => {
                writeln!(f, "{}%", percentage)?;
                writeln!(f, "You got {} out of {} correct.", score, total)?;
            }
        }
        if !self.review.is_empty() {
            writeln!(f, "Review:")?;
            for line in &self.review {
                writeln!(f, "  {:<20} {}", line.word, line.verdict)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scored(score: u32, total: u32) -> GameStats {
        let mut stats = GameStats::with_history(GameKind::Quiz);
        for i in 0..total {
            stats.record(&format!("w{}", i), i < score);
        }
        stats
    }

    #[test]
    fn test_percentage_rounds_and_handles_zero_total() {
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_message_thresholds() {
        assert_eq!(summarize(&scored(5, 5)).message, "Perfect Score! You're a Genius!");
        assert_eq!(summarize(&scored(4, 5)).message, "Great job! Almost there!");
        assert_eq!(summarize(&scored(1, 2)).message, "Good effort, keep going!");
        assert_eq!(summarize(&scored(1, 3)).message, "Keep practicing!");
        assert_eq!(summarize(&scored(0, 0)).message, "Keep practicing!");
    }

    #[test]
    fn test_match_summary_reports_time_and_moves() {
        let stats = GameStats {
            mode: GameKind::Match,
            score: 100,
            total: 4,
            history: None,
            time_seconds: Some(37),
            moves: Some(9),
        };
        let summary = summarize(&stats);

        assert_eq!(summary.message, "Board Cleared!");
        assert_eq!(
            summary.headline,
            Headline::Timed {
                seconds: 37,
                moves: 9
            }
        );
        assert!(summary.review.is_empty());
    }

    #[test]
    fn test_review_lines_follow_history() {
        let summary = summarize(&scored(1, 2));
        assert_eq!(
            summary.review,
            vec![
                ReviewLine {
                    word: "w0".to_string(),
                    verdict: "Correct"
                },
                ReviewLine {
                    word: "w1".to_string(),
                    verdict: "Missed"
                },
            ]
        );
        assert!(summary.to_string().contains("You got 1 out of 2 correct."));
    }
}
