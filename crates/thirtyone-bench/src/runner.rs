use std::path::PathBuf;

use thirtyone_core::game::sampler::{ConfigurationError, SampleParams, Sampler};
use thirtyone_core::game::trial::TrialError;
use thiserror::Error;
use tracing::{debug, info};

use crate::analytics::{AnalyticsError, HeroSummary};
use crate::config::SimulationConfig;
use crate::recorder::{RecordWriter, RecorderError};

const PROGRESS_EVERY: usize = 1_000;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid simulation parameters: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("trial aborted: {0}")]
    Trial(#[from] TrialError),
    #[error(transparent)]
    Recorder(#[from] RecorderError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// Details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub params: SampleParams,
    pub records_path: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
    pub summary: HeroSummary,
}

/// Samples trials, then hands the records to the recorder in one go.
pub struct SimulationRunner {
    config: SimulationConfig,
    sampler: Sampler,
}

impl SimulationRunner {
    /// Build a runner; `seed` is used only when the configuration has none.
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self, RunnerError> {
        let sampler = Sampler::new(config.sample_params(seed))?;
        Ok(Self { config, sampler })
    }

    pub fn params(&self) -> &SampleParams {
        self.sampler.params()
    }

    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        let params = *self.sampler.params();
        info!(
            players = params.player_count,
            hero = params.hero,
            threshold = params.threshold,
            samples = params.samples,
            seed = params.seed,
            "starting simulation"
        );

        let records = self.sampler.run_with(|index, record| {
            debug!(trial = index, winner = record.winner, turns = record.turns, "trial recorded");
            if (index + 1) % PROGRESS_EVERY == 0 {
                info!(completed = index + 1, total = params.samples, "progress");
            }
        })?;

        let writer = RecordWriter::new(&self.config.outputs.records_dir)?;
        let records_path = writer.write(&records)?;
        let summary = HeroSummary::from_records(&params, &records)?;

        let summary_path = match records_path.as_ref() {
            Some(path) if self.config.outputs.summary => {
                let summary_path = path.with_extension("summary.json");
                summary.write_json(&summary_path)?;
                Some(summary_path)
            }
            _ => None,
        };

        info!(
            hero_win_rate = summary.hero_win_rate,
            hero_down_rate = summary.hero_down_rate,
            mean_turns = summary.mean_turns,
            "simulation complete"
        );

        Ok(RunSummary {
            params,
            records_path,
            summary_path,
            summary,
        })
    }
}
