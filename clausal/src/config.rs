//! Solver configuration.
use thiserror::Error;

use clausal_macros::{ConfigUpdate, DocDefault};

/// Configurable parameters used during solving.
///
/// A partial update can be deserialized as [`SolverConfigUpdate`], for example from a TOML
/// snippet like `restart_luby = false`.
#[derive(DocDefault, ConfigUpdate, Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Disable clause learning and backtrack chronologically, only bumping the variables of
    /// conflicting clauses. (Default: false)
    pub only_poor_mans_vsids: bool,

    /// Multiplicative decay for the VSIDS decision heuristic. (Default: 0.95)
    pub vsids_decay: f64,

    /// Multiplicative decay for clause activities. (Default: 0.999)
    pub clause_activity_decay: f64,

    /// Learned clauses with a larger LBD are discarded at the next reduction, independent of
    /// their activity. (Default: 30)
    pub max_learned_lbd: usize,

    /// Maximal recursion depth when removing implied literals from learned clauses, at most 1000.
    /// (Default: 20)
    pub max_minimization_depth: usize,

    /// Learned clauses with at most this LBD are never deleted. (Default: 2)
    pub reduce_keep_lbd: usize,

    /// Fraction of deletable learned clauses removed by a reduction. (Default: 0.5)
    pub reduce_ratio: f64,

    /// Reduce when there are more learned clauses than this multiple of the original clause
    /// count. (Default: Some(1.0))
    pub reduce_original_clause_factor: Option<f64>,

    /// Factor applied to the learned clause limit after each reduction. (Default: 1.1)
    pub reduce_limit_growth: f64,

    /// Lower bound for the learned clause limit. (Default: 2000)
    pub reduce_min_learned: usize,

    /// Reduce when the recent LBD average exceeds the long term average by this ratio.
    /// (Default: None)
    pub reduce_lbd_threshold: Option<f64>,

    /// Reduce when the recent propagation rate falls below this ratio of the long term average.
    /// (Default: None)
    pub reduce_propagation_rate_threshold: Option<f64>,

    /// Number of conflicts between restarts, scaled by the Luby sequence if enabled.
    /// (Default: Some(128))
    pub restart_interval: Option<u64>,

    /// Scale the restart interval using the Luby sequence. (Default: true)
    pub restart_luby: bool,

    /// Restart when the recent LBD average exceeds the long term average by this ratio.
    /// (Default: None)
    pub restart_lbd_threshold: Option<f64>,

    /// Restart when the recent propagation rate falls below this ratio of the long term
    /// average. (Default: None)
    pub restart_propagation_rate_threshold: Option<f64>,

    /// Number of recent learned clauses used for the LBD average. (Default: 50)
    pub lbd_tracking_recent: usize,

    /// Decay of the long term LBD average. (Default: 0.9999)
    pub lbd_tracking_decay: f64,

    /// Number of recent samples used for the propagation rate average. (Default: 50)
    pub propagation_rate_sample_size: usize,

    /// Decay of the long term propagation rate average. (Default: 0.999)
    pub propagation_rate_decay: f64,

    /// Number of conflicts covered by a single propagation rate sample. (Default: 16)
    pub propagation_rate_conflict_interval: u64,
}

/// Rejected configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("option {option} is {value} but must be in {range}")]
    OutOfRange {
        option: &'static str,
        value: String,
        range: &'static str,
    },
}

/// Checks that `value` satisfies `in_range`.
fn check<T: ToString>(
    option: &'static str,
    value: T,
    range: &'static str,
    in_range: bool,
) -> Result<(), ConfigError> {
    if in_range {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            option,
            value: value.to_string(),
            range,
        })
    }
}

impl SolverConfig {
    /// Checks that all values are within their supported ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let decay_range = 1.0 / 16.0..1.0;
        check(
            "vsids_decay",
            self.vsids_decay,
            "(0.0625, 1.0)",
            decay_range.contains(&self.vsids_decay) && self.vsids_decay > 1.0 / 16.0,
        )?;
        check(
            "clause_activity_decay",
            self.clause_activity_decay,
            "(0.0625, 1.0)",
            decay_range.contains(&self.clause_activity_decay)
                && self.clause_activity_decay > 1.0 / 16.0,
        )?;
        check(
            "max_minimization_depth",
            self.max_minimization_depth,
            "[0, 1000]",
            self.max_minimization_depth <= 1000,
        )?;
        check(
            "reduce_ratio",
            self.reduce_ratio,
            "[0.0, 1.0]",
            (0.0..=1.0).contains(&self.reduce_ratio),
        )?;
        if let Some(factor) = self.reduce_original_clause_factor {
            check(
                "reduce_original_clause_factor",
                factor,
                "(0.0, inf)",
                factor > 0.0,
            )?;
        }
        check(
            "reduce_limit_growth",
            self.reduce_limit_growth,
            "[1.0, inf)",
            self.reduce_limit_growth >= 1.0,
        )?;
        if let Some(interval) = self.restart_interval {
            check("restart_interval", interval, "[1, inf)", interval >= 1)?;
        }
        check(
            "lbd_tracking_recent",
            self.lbd_tracking_recent,
            "[1, inf)",
            self.lbd_tracking_recent >= 1,
        )?;
        check(
            "lbd_tracking_decay",
            self.lbd_tracking_decay,
            "[0.0, 1.0)",
            (0.0..1.0).contains(&self.lbd_tracking_decay),
        )?;
        check(
            "propagation_rate_sample_size",
            self.propagation_rate_sample_size,
            "[1, inf)",
            self.propagation_rate_sample_size >= 1,
        )?;
        check(
            "propagation_rate_decay",
            self.propagation_rate_decay,
            "[0.0, 1.0)",
            (0.0..1.0).contains(&self.propagation_rate_decay),
        )?;
        check(
            "propagation_rate_conflict_interval",
            self.propagation_rate_conflict_interval,
            "[1, inf)",
            self.propagation_rate_conflict_interval >= 1,
        )?;
        Ok(())
    }
}
