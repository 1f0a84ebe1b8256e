use chdet_core::{Condition, DesignError, Trial, TrialSpec};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::compose::TrialComposer;
use crate::config::{ConditionQuota, TaskConfig};
use crate::layout::LayoutGenerator;

/// Builds randomized blocks of fully specified trials.
///
/// All feasibility rules are checked once in [`BlockPlanner::new`];
/// `build` only fails on draws the configuration cannot predict
/// (color-pool exhaustion under repeated sampling, placement retry
/// budgets).
pub struct BlockPlanner {
    config: TaskConfig,
    quota: ConditionQuota,
    composer: TrialComposer,
    layout: LayoutGenerator,
}

impl BlockPlanner {
    pub fn new(config: TaskConfig) -> Result<Self, DesignError> {
        let quota = config.validate()?;
        let composer = TrialComposer::new(
            config.palette.clone(),
            config.keys,
            config.repeat_stim_colors,
            config.repeat_test_colors,
        );
        let layout = LayoutGenerator::new(config.min_distance, config.max_per_quad);

        Ok(Self {
            config,
            quota,
            composer,
            layout,
        })
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    pub fn quota(&self) -> ConditionQuota {
        self.quota
    }

    /// One block: the full per-set-size condition quota, composed and
    /// uniformly shuffled. Trial order carries no meaning beyond being
    /// unpredictable for the participant.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<Vec<Trial>, DesignError> {
        let mut trials = Vec::with_capacity(self.config.trials_per_block);

        for &set_size in &self.config.set_sizes {
            for _ in 0..self.quota.same_per_set_size {
                trials.push(self.make_trial(
                    TrialSpec {
                        set_size,
                        condition: Condition::Same,
                    },
                    rng,
                )?);
            }
            for _ in 0..self.quota.diff_per_set_size {
                trials.push(self.make_trial(
                    TrialSpec {
                        set_size,
                        condition: Condition::Different,
                    },
                    rng,
                )?);
            }
        }

        trials.shuffle(rng);
        Ok(trials)
    }

    fn make_trial<R: Rng>(&self, spec: TrialSpec, rng: &mut R) -> Result<Trial, DesignError> {
        let composition = self.composer.compose(spec.set_size, spec.condition, rng)?;
        let locations = self.layout.generate(spec.set_size, rng)?;

        Ok(Trial {
            set_size: spec.set_size,
            condition: spec.condition,
            correct_response_key: composition.correct_response_key,
            locations,
            stim_colors: composition.stim_colors,
            test_index: composition.test_index,
            test_color: composition.test_color,
            single_probe: self.config.single_probe,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn block_meets_the_condition_quota() {
        let planner = BlockPlanner::new(TaskConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let block = planner.build(&mut rng).unwrap();
        assert_eq!(block.len(), 10);
        let same = block
            .iter()
            .filter(|t| t.condition == Condition::Same)
            .count();
        assert_eq!(same, 5);
        assert!(block.iter().all(|t| t.set_size == 6));
    }

    #[test]
    fn quota_splits_across_set_sizes() {
        let config = TaskConfig {
            trials_per_block: 12,
            set_sizes: vec![2, 4, 6],
            percent_same: 0.25,
            ..TaskConfig::default()
        };
        let planner = BlockPlanner::new(config).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        let block = planner.build(&mut rng).unwrap();
        assert_eq!(block.len(), 12);
        for set_size in [2, 4, 6] {
            let of_size: Vec<_> = block.iter().filter(|t| t.set_size == set_size).collect();
            assert_eq!(of_size.len(), 4);
            let same = of_size
                .iter()
                .filter(|t| t.condition == Condition::Same)
                .count();
            assert_eq!(same, 1);
        }
    }

    #[test]
    fn trials_are_internally_consistent() {
        let planner = BlockPlanner::new(TaskConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        for trial in planner.build(&mut rng).unwrap() {
            assert_eq!(trial.locations.len(), trial.set_size);
            assert_eq!(trial.stim_colors.len(), trial.set_size);
            assert!(trial.test_index < trial.set_size);
            assert!(trial.single_probe);
        }
    }

    #[test]
    fn same_config_and_seed_reproduce_the_block() {
        let planner = BlockPlanner::new(TaskConfig::default()).unwrap();
        let a = planner.build(&mut StdRng::seed_from_u64(99)).unwrap();
        let b = planner.build(&mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn construction_rejects_an_unbalanced_config() {
        let config = TaskConfig {
            percent_same: 0.33,
            ..TaskConfig::default()
        };
        assert!(matches!(
            BlockPlanner::new(config),
            Err(DesignError::UnbalancedCondition { .. })
        ));
    }
}
