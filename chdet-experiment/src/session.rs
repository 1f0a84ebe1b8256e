use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use chdet_core::{Response, Trial, TrialRecord};
use rand::Rng;

use crate::block::BlockPlanner;

/// Presentation collaborator: everything the participant sees and presses.
pub trait Presenter {
    /// Runs fixation, sample, delay and probe for one trial, then waits
    /// for a keypress and reports it with the reaction time in
    /// milliseconds.
    fn run_trial(&mut self, trial: &Trial) -> Result<Response>;

    /// Shown between blocks; never called after the final block.
    fn block_break(&mut self, finished: usize, total: usize) -> Result<()>;
}

/// Persistence collaborator receiving one row per completed trial.
pub trait Recorder {
    fn record(&mut self, record: &TrialRecord) -> Result<()>;
}

/// Synchronous run loop: plan each block, hand trials to the presenter one
/// at a time, score and forward every record.
pub struct Session<P, S> {
    pub planner: BlockPlanner,
    pub presenter: P,
    pub recorder: S,
}

impl<P: Presenter, S: Recorder> Session<P, S> {
    pub fn new(planner: BlockPlanner, presenter: P, recorder: S) -> Self {
        Self {
            planner,
            presenter,
            recorder,
        }
    }

    pub fn run<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<TrialRecord>> {
        let blocks = self.planner.config().number_of_blocks;
        let mut records = Vec::with_capacity(blocks * self.planner.config().trials_per_block);

        for block_num in 0..blocks {
            let block = self.planner.build(rng)?;
            for (trial_num, trial) in block.iter().enumerate() {
                let response = self.presenter.run_trial(trial)?;
                let record = score_trial(block_num, trial_num, trial, &response);
                self.recorder.record(&record)?;
                records.push(record);
            }

            if block_num + 1 != blocks {
                self.presenter.block_break(block_num + 1, blocks)?;
            }
        }

        Ok(records)
    }
}

/// Assembles the persisted row for one answered trial.
fn score_trial(block: usize, trial_num: usize, trial: &Trial, response: &Response) -> TrialRecord {
    TrialRecord {
        block,
        trial: trial_num,
        timestamp: unix_seconds(),
        condition: trial.condition,
        set_size: trial.set_size,
        rt: response.rt_ms,
        cresp: trial.correct_response_key,
        resp: response.key,
        acc: u8::from(response.key == trial.correct_response_key),
        location_tested: trial.test_index,
        locations: trial.locations.clone(),
        sample_colors: trial.stim_colors.clone(),
        test_color: trial.test_color,
    }
}

fn unix_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
