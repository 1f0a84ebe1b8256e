use chdet_core::{Color, DesignError, KeyAssignment, Palette};

/// Tolerance when checking that the same/different split lands on whole
/// trial counts.
const BALANCE_EPS: f64 = 1e-9;

/// Immutable task parameters.
///
/// Constructed once by the caller and validated once by
/// [`crate::BlockPlanner::new`]; nothing re-checks mid-block.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub trials_per_block: usize,
    pub number_of_blocks: usize,
    /// Fraction of trials per set size whose probe matches the sample.
    pub percent_same: f64,
    pub set_sizes: Vec<usize>,
    pub palette: Palette,
    pub keys: KeyAssignment,
    /// Minimum pairwise stimulus separation as a fraction of the display.
    pub min_distance: f64,
    /// Cap on stimuli per display quadrant; `None` for unconstrained
    /// placement.
    pub max_per_quad: Option<usize>,
    pub repeat_stim_colors: bool,
    pub repeat_test_colors: bool,
    /// Probe display shows only the tested stimulus when set.
    pub single_probe: bool,

    // Presentation parameters, stored here so the presenter sees one
    // configuration value rather than ambient constants.
    pub stim_size_deg: f64,
    pub allowed_deg_from_fix: f64,
    pub iti_ms: u64,
    pub sample_ms: u64,
    pub delay_ms: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        let palette = Palette::new(vec![
            Color::new(1.0, -1.0, -1.0),
            Color::new(-1.0, 1.0, -1.0),
            Color::new(-1.0, -1.0, 1.0),
            Color::new(1.0, 1.0, -1.0),
            Color::new(1.0, -1.0, 1.0),
            Color::new(-1.0, 1.0, 1.0),
            Color::new(1.0, 1.0, 1.0),
            Color::new(-1.0, -1.0, -1.0),
            Color::new(1.0, 0.0, -1.0),
        ])
        .expect("default palette is valid");

        Self {
            trials_per_block: 10,
            number_of_blocks: 2,
            percent_same: 0.5,
            set_sizes: vec![6],
            palette,
            keys: KeyAssignment {
                same: 's',
                different: 'd',
            },
            min_distance: 0.1,
            max_per_quad: Some(2),
            repeat_stim_colors: false,
            repeat_test_colors: false,
            single_probe: true,
            stim_size_deg: 1.5,
            allowed_deg_from_fix: 15.0,
            iti_ms: 1000,
            sample_ms: 250,
            delay_ms: 1000,
        }
    }
}

impl TaskConfig {
    /// Checks every feasibility rule the configuration alone decides and
    /// derives the per-set-size condition quota.
    pub fn validate(&self) -> Result<ConditionQuota, DesignError> {
        if self.trials_per_block == 0 {
            return Err(DesignError::invalid("trials_per_block must be positive"));
        }
        if self.number_of_blocks == 0 {
            return Err(DesignError::invalid("number_of_blocks must be positive"));
        }
        if self.set_sizes.is_empty() {
            return Err(DesignError::invalid("set_sizes must not be empty"));
        }
        if self.set_sizes.iter().any(|&s| s == 0) {
            return Err(DesignError::invalid("set sizes must be positive"));
        }
        for (i, &s) in self.set_sizes.iter().enumerate() {
            if self.set_sizes[..i].contains(&s) {
                return Err(DesignError::invalid(format!("duplicate set size {s}")));
            }
        }
        if !(0.0..=1.0).contains(&self.percent_same) {
            return Err(DesignError::invalid(format!(
                "percent_same must lie in [0, 1], got {}",
                self.percent_same
            )));
        }
        if !(self.min_distance > 0.0 && self.min_distance < 0.5) {
            return Err(DesignError::invalid(format!(
                "min_distance must lie in (0, 0.5), got {}",
                self.min_distance
            )));
        }
        if self.max_per_quad == Some(0) {
            return Err(DesignError::invalid("max_per_quad must be positive"));
        }

        let max_set = self.set_sizes.iter().copied().max().unwrap_or(0);

        if let Some(cap) = self.max_per_quad {
            if max_set > cap * 4 {
                return Err(DesignError::AllocationInfeasible {
                    set_size: max_set,
                    max_per_quad: cap,
                });
            }
        }

        if !self.repeat_stim_colors && max_set > self.palette.len() {
            return Err(DesignError::PaletteExhausted {
                palette_len: self.palette.len(),
                required: max_set,
            });
        }
        if !self.repeat_stim_colors && !self.repeat_test_colors && max_set >= self.palette.len() {
            // Distinct samples would use the whole palette, leaving no
            // candidate for the test color.
            return Err(DesignError::PaletteExhausted {
                palette_len: self.palette.len(),
                required: max_set + 1,
            });
        }
        if self.repeat_test_colors && self.palette.len() < 2 {
            return Err(DesignError::PaletteExhausted {
                palette_len: self.palette.len(),
                required: 2,
            });
        }

        self.quota()
    }

    fn quota(&self) -> Result<ConditionQuota, DesignError> {
        let unbalanced = || DesignError::UnbalancedCondition {
            trials_per_block: self.trials_per_block,
            set_sizes: self.set_sizes.len(),
            percent_same: self.percent_same,
        };

        if self.trials_per_block % self.set_sizes.len() != 0 {
            return Err(unbalanced());
        }
        let per_set_size = self.trials_per_block / self.set_sizes.len();

        let same_exact = per_set_size as f64 * self.percent_same;
        let same_rounded = same_exact.round();
        if (same_exact - same_rounded).abs() > BALANCE_EPS {
            return Err(unbalanced());
        }
        let same_per_set_size = same_rounded as usize;

        Ok(ConditionQuota {
            per_set_size,
            same_per_set_size,
            diff_per_set_size: per_set_size - same_per_set_size,
        })
    }
}

/// Per-set-size trial counts derived from a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionQuota {
    pub per_set_size: usize,
    pub same_per_set_size: usize,
    pub diff_per_set_size: usize,
}
