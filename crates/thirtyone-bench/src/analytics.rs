use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thirtyone_core::game::sampler::SampleParams;
use thirtyone_core::game::trial::TrialRecord;
use thiserror::Error;

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode summary: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid normal distribution: {0}")]
    Distribution(String),
}

/// How the hero fared over a batch of trials.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeroSummary {
    pub trials: usize,
    pub seed: u64,
    pub player_count: usize,
    pub hero: usize,
    pub threshold: u8,
    pub wins_per_seat: Vec<usize>,
    pub hero_win_rate: f64,
    pub hero_win_ci95: (f64, f64),
    pub hero_down_rate: f64,
    pub mean_hero_down_turn: Option<f64>,
    pub mean_turns: f64,
    pub mean_winning_value: f64,
}

impl HeroSummary {
    pub fn from_records(
        params: &SampleParams,
        records: &[TrialRecord],
    ) -> Result<Self, AnalyticsError> {
        let trials = records.len();
        let mut wins_per_seat = vec![0usize; params.player_count];
        let mut down_turns = Vec::new();
        let mut total_turns = 0usize;
        let mut total_winning_value = 0u64;

        for record in records {
            if let Some(wins) = wins_per_seat.get_mut(record.winner) {
                *wins += 1;
            }
            if let Some(turn) = record.hero_down_turn {
                down_turns.push(turn as f64);
            }
            total_turns += record.turns;
            total_winning_value += record
                .players
                .get(record.winner)
                .map_or(0, |seat| seat.value as u64);
        }

        let hero_wins = wins_per_seat.get(params.hero).copied().unwrap_or(0);
        let hero_win_rate = ratio(hero_wins as f64, trials);
        let hero_win_ci95 = proportion_interval(hero_win_rate, trials)?;
        let mean_hero_down_turn = if down_turns.is_empty() {
            None
        } else {
            Some(down_turns.iter().sum::<f64>() / down_turns.len() as f64)
        };

        Ok(Self {
            trials,
            seed: params.seed,
            player_count: params.player_count,
            hero: params.hero,
            threshold: params.threshold,
            wins_per_seat,
            hero_win_rate,
            hero_win_ci95,
            hero_down_rate: ratio(down_turns.len() as f64, trials),
            mean_hero_down_turn,
            mean_turns: ratio(total_turns as f64, trials),
            mean_winning_value: ratio(total_winning_value as f64, trials),
        })
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), text).map_err(|source| AnalyticsError::Io {
            context: "writing summary json",
            source,
        })
    }
}

fn ratio(numerator: f64, trials: usize) -> f64 {
    if trials == 0 {
        0.0
    } else {
        numerator / trials as f64
    }
}

/// Normal-approximation interval for a win rate, clamped to [0, 1].
fn proportion_interval(rate: f64, trials: usize) -> Result<(f64, f64), AnalyticsError> {
    if trials == 0 {
        return Ok((0.0, 0.0));
    }
    let normal =
        Normal::new(0.0, 1.0).map_err(|err| AnalyticsError::Distribution(err.to_string()))?;
    let z = normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);
    let std_error = (rate * (1.0 - rate) / trials as f64).sqrt();
    let margin = z * std_error;
    Ok(((rate - margin).max(0.0), (rate + margin).min(1.0)))
}
