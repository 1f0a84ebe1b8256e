use thiserror::Error;

pub type Result<T> = std::result::Result<T, DesignError>;

/// Failures in task configuration or trial generation.
///
/// Everything the configuration alone decides is raised at planner
/// construction, before any trial exists; the generation-time variants
/// cover draws that can only be judged once colors are assigned or the
/// placement loop runs.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error(
        "cannot split {trials_per_block} trials over {set_sizes} set size(s) \
         into whole same/different counts at percent_same {percent_same}"
    )]
    UnbalancedCondition {
        trials_per_block: usize,
        set_sizes: usize,
        percent_same: f64,
    },

    #[error("set size {set_size} cannot fit under a per-quadrant cap of {max_per_quad}")]
    AllocationInfeasible {
        set_size: usize,
        max_per_quad: usize,
    },

    #[error("palette of {palette_len} color(s) cannot supply {required} distinct draws")]
    PaletteExhausted {
        palette_len: usize,
        required: usize,
    },

    #[error(
        "no layout for set size {set_size} after {attempts} placement attempts \
         (min_distance {min_distance}, max_per_quad {max_per_quad:?})"
    )]
    LayoutInfeasible {
        set_size: usize,
        attempts: usize,
        min_distance: f64,
        max_per_quad: Option<usize>,
    },

    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },
}

impl DesignError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}
