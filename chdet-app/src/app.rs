use std::fs::File;

use anyhow::{Context, Result};
use chdet_core::Condition;
use chdet_experiment::{BlockPlanner, TaskConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PLAN_PATH: &str = "trial_plan.json";

/// Headless planner: generates every block for one session up front and
/// writes the plan as JSON for inspection or replay.
pub struct App {
    config: TaskConfig,
    seed: u64,
}

impl App {
    /// Takes an optional seed as the first argument; a random seed is
    /// drawn (and printed) otherwise so any plan can be regenerated.
    pub fn new() -> Result<Self> {
        let seed = match std::env::args().nth(1) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("seed must be an unsigned integer, got {raw:?}"))?,
            None => rand::rng().random(),
        };

        Ok(Self {
            config: TaskConfig::default(),
            seed,
        })
    }

    pub fn run(self) -> Result<()> {
        println!("=== CHANGE DETECTION TASK PLANNER ===");
        println!("Seed: {}", self.seed);
        println!(
            "Blocks: {}, trials per block: {}, set sizes: {:?}",
            self.config.number_of_blocks, self.config.trials_per_block, self.config.set_sizes
        );

        let planner =
            BlockPlanner::new(self.config.clone()).context("task configuration rejected")?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut blocks = Vec::with_capacity(self.config.number_of_blocks);
        for block_num in 0..self.config.number_of_blocks {
            let block = planner.build(&mut rng).context("block generation failed")?;
            let same = block
                .iter()
                .filter(|t| t.condition == Condition::Same)
                .count();
            println!(
                "Block {}: {} trials ({} same / {} diff)",
                block_num + 1,
                block.len(),
                same,
                block.len() - same
            );
            blocks.push(block);
        }

        let file = File::create(PLAN_PATH).with_context(|| format!("cannot create {PLAN_PATH}"))?;
        serde_json::to_writer_pretty(file, &blocks).context("failed to write trial plan")?;
        println!("Plan written to {PLAN_PATH}");

        Ok(())
    }
}
