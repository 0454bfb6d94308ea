//! Scheduling of restarts, reductions and search steps.
use log::debug;

use partial_ref::{partial, PartialRef};

use crate::cdcl::conflict_step;
use crate::clause::reduce::reduce_learned;
use crate::config::SolverConfig;
use crate::context::{parts::*, Context};
use crate::prop::restart;
use crate::state::SatState;

mod ema;
mod luby;

use ema::EmaTracker;
use luby::LubySequence;

/// Scheduling of restarts and learned clause reductions.
pub struct Schedule {
    conflicts_since_restart: u64,
    /// Conflicts until the next restart, if restarting by interval.
    restart_interval: Option<u64>,
    luby: LubySequence,
    conflicts_since_reduction: u64,
    /// Number of tracked clauses above which a reduction is due.
    reduce_limit: Option<f64>,
    lbd: EmaTracker,
    propagation_rate: EmaTracker,
    /// Conflicts and propagations counted towards the current propagation rate sample.
    sample_conflicts: u64,
    sample_start_propagations: u64,
}

impl Default for Schedule {
    fn default() -> Schedule {
        Schedule::new(&SolverConfig::default(), 0)
    }
}

impl Schedule {
    /// Schedule for a problem with the given number of stored clauses.
    pub fn new(config: &SolverConfig, original_clause_count: usize) -> Schedule {
        let mut luby = LubySequence::default();
        let restart_interval = config.restart_interval.map(|interval| {
            if config.restart_luby {
                interval * luby.advance()
            } else {
                interval
            }
        });

        let reduce_limit = config.reduce_original_clause_factor.map(|factor| {
            (factor * original_clause_count as f64).max(config.reduce_min_learned as f64)
        });

        Schedule {
            conflicts_since_restart: 0,
            restart_interval,
            luby,
            conflicts_since_reduction: 0,
            reduce_limit,
            lbd: EmaTracker::new(config.lbd_tracking_recent, config.lbd_tracking_decay),
            propagation_rate: EmaTracker::new(
                config.propagation_rate_sample_size,
                config.propagation_rate_decay,
            ),
            sample_conflicts: 0,
            sample_start_propagations: 0,
        }
    }

    /// Update the trackers after a conflict.
    ///
    /// `lbd` is the glue of the learned clause and `propagations` the total number of propagations
    /// so far.
    pub fn record_conflict(&mut self, config: &SolverConfig, lbd: Option<usize>, propagations: u64) {
        self.conflicts_since_restart += 1;
        self.conflicts_since_reduction += 1;

        if let Some(lbd) = lbd {
            self.lbd.push(lbd as f64);
        }

        self.sample_conflicts += 1;
        if self.sample_conflicts >= config.propagation_rate_conflict_interval {
            let sampled = propagations - self.sample_start_propagations;
            self.propagation_rate
                .push(sampled as f64 / self.sample_conflicts as f64);
            self.sample_conflicts = 0;
            self.sample_start_propagations = propagations;
        }
    }

    /// Whether any of the configured restart conditions holds.
    pub fn restart_due(&self, config: &SolverConfig) -> bool {
        if let Some(interval) = self.restart_interval {
            if self.conflicts_since_restart >= interval {
                return true;
            }
        }
        if let (Some(threshold), Some(ratio)) = (
            config.restart_propagation_rate_threshold,
            self.propagation_rate.ratio(),
        ) {
            if ratio < threshold {
                return true;
            }
        }
        if let (Some(threshold), Some(ratio)) = (config.restart_lbd_threshold, self.lbd.ratio()) {
            if ratio > threshold {
                return true;
            }
        }
        false
    }

    /// Reset the restart conditions after a restart.
    pub fn restarted(&mut self, config: &SolverConfig) {
        self.conflicts_since_restart = 0;
        if let Some(interval) = config.restart_interval {
            self.restart_interval = Some(if config.restart_luby {
                interval * self.luby.advance()
            } else {
                interval
            });
        }
        self.lbd.clear_recent();
        self.propagation_rate.clear_recent();
    }

    /// Whether any of the configured reduction conditions holds.
    pub fn reduction_due(&self, config: &SolverConfig, tracked_count: usize) -> bool {
        if let Some(limit) = self.reduce_limit {
            if tracked_count as f64 > limit {
                return true;
            }
        }
        if self.conflicts_since_reduction < config.lbd_tracking_recent as u64 {
            return false;
        }
        if let (Some(threshold), Some(ratio)) = (config.reduce_lbd_threshold, self.lbd.ratio()) {
            if ratio > threshold {
                return true;
            }
        }
        if let (Some(threshold), Some(ratio)) = (
            config.reduce_propagation_rate_threshold,
            self.propagation_rate.ratio(),
        ) {
            if ratio < threshold {
                return true;
            }
        }
        false
    }

    /// Grow the clause limit after a reduction.
    pub fn reduced(&mut self, config: &SolverConfig) {
        self.conflicts_since_reduction = 0;
        if let Some(limit) = self.reduce_limit.as_mut() {
            *limit *= config.reduce_limit_growth;
        }
    }
}

/// Perform one step of the schedule.
///
/// Returns `false` when the search is done.
pub fn schedule_step(
    mut ctx: partial!(
        Context,
        mut ActivityP,
        mut AnalyzeConflictP,
        mut AssignmentP,
        mut CandidateHeapP,
        mut ClauseDbP,
        mut ImplGraphP,
        mut ScheduleP,
        mut SolverStateP,
        mut StatsP,
        mut TmpDataP,
        mut TrailP,
        mut WatchlistsP,
        InterruptP,
        SolverConfigP,
    ),
) -> bool {
    let (schedule, mut ctx) = ctx.split_part_mut(ScheduleP);
    let (config, mut ctx) = ctx.split_part(SolverConfigP);

    if ctx.part(SolverStateP).sat_state != SatState::Unknown {
        return false;
    }

    if ctx.part(InterruptP).is_interrupted() {
        ctx.part_mut(SolverStateP).sat_state = SatState::Interrupted;
        return false;
    }

    if !config.only_poor_mans_vsids {
        if schedule.restart_due(config) {
            restart(ctx.borrow());
            schedule.restarted(config);
            let stats = ctx.part_mut(StatsP);
            stats.restarts += 1;
            debug!(
                "restart {} after {} conflicts",
                stats.restarts, stats.conflicts
            );
        }

        if schedule.reduction_due(config, ctx.part(ClauseDbP).tracked().len()) {
            let deleted = reduce_learned(ctx.borrow());
            schedule.reduced(config);
            let stats = ctx.part_mut(StatsP);
            stats.reductions += 1;
            stats.deleted_clauses += deleted as u64;
            debug!(
                "reduction {} deleted {} learned clauses",
                stats.reductions, deleted
            );
        }
    }

    let conflicts = ctx.part(StatsP).conflicts;

    let lbd = conflict_step(ctx.borrow());

    let stats = ctx.part(StatsP);
    if stats.conflicts > conflicts {
        schedule.record_conflict(config, lbd, stats.propagations);
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luby_restart_intervals() {
        let config = SolverConfig {
            restart_interval: Some(10),
            ..SolverConfig::default()
        };
        let mut schedule = Schedule::new(&config, 0);

        let mut intervals = vec![];
        for _ in 0..7 {
            let mut conflicts = 0;
            while !schedule.restart_due(&config) {
                schedule.record_conflict(&config, None, 0);
                conflicts += 1;
            }
            intervals.push(conflicts);
            schedule.restarted(&config);
        }

        assert_eq!(intervals, vec![10, 10, 20, 10, 10, 20, 40]);
    }

    #[test]
    fn fixed_restart_interval() {
        let config = SolverConfig {
            restart_interval: Some(3),
            restart_luby: false,
            ..SolverConfig::default()
        };
        let mut schedule = Schedule::new(&config, 0);

        for _ in 0..4 {
            for _ in 0..3 {
                assert!(!schedule.restart_due(&config));
                schedule.record_conflict(&config, None, 0);
            }
            assert!(schedule.restart_due(&config));
            schedule.restarted(&config);
        }
    }

    #[test]
    fn lbd_restart() {
        let config = SolverConfig {
            restart_interval: None,
            restart_lbd_threshold: Some(1.5),
            lbd_tracking_recent: 4,
            lbd_tracking_decay: 0.99,
            ..SolverConfig::default()
        };
        let mut schedule = Schedule::new(&config, 0);

        for _ in 0..8 {
            schedule.record_conflict(&config, Some(2), 0);
            assert!(!schedule.restart_due(&config));
        }

        for _ in 0..4 {
            schedule.record_conflict(&config, Some(10), 0);
        }
        assert!(schedule.restart_due(&config));

        schedule.restarted(&config);
        assert!(!schedule.restart_due(&config));
    }

    #[test]
    fn propagation_rate_restart() {
        let config = SolverConfig {
            restart_interval: None,
            restart_propagation_rate_threshold: Some(0.5),
            propagation_rate_sample_size: 2,
            propagation_rate_decay: 0.99,
            propagation_rate_conflict_interval: 2,
            ..SolverConfig::default()
        };
        let mut schedule = Schedule::new(&config, 0);

        let mut propagations = 0;
        for _ in 0..8 {
            propagations += 100;
            schedule.record_conflict(&config, None, propagations);
            assert!(!schedule.restart_due(&config));
        }

        for _ in 0..4 {
            propagations += 1;
            schedule.record_conflict(&config, None, propagations);
        }
        assert!(schedule.restart_due(&config));
    }

    #[test]
    fn reduction_limit_grows() {
        let config = SolverConfig {
            reduce_original_clause_factor: Some(2.0),
            reduce_min_learned: 10,
            reduce_limit_growth: 1.5,
            ..SolverConfig::default()
        };
        let mut schedule = Schedule::new(&config, 100);

        assert!(!schedule.reduction_due(&config, 200));
        assert!(schedule.reduction_due(&config, 201));

        schedule.reduced(&config);
        assert!(!schedule.reduction_due(&config, 300));
        assert!(schedule.reduction_due(&config, 301));

        let small = Schedule::new(&config, 1);
        assert!(!small.reduction_due(&config, 10));
        assert!(small.reduction_due(&config, 11));
    }

    #[test]
    fn lbd_reduction_needs_recent_conflicts() {
        let config = SolverConfig {
            reduce_original_clause_factor: None,
            reduce_lbd_threshold: Some(1.5),
            lbd_tracking_recent: 4,
            lbd_tracking_decay: 0.99,
            ..SolverConfig::default()
        };
        let mut schedule = Schedule::new(&config, 0);

        for _ in 0..4 {
            schedule.record_conflict(&config, Some(2), 0);
        }
        for _ in 0..4 {
            schedule.record_conflict(&config, Some(10), 0);
        }
        assert!(schedule.reduction_due(&config, 0));

        schedule.reduced(&config);
        schedule.record_conflict(&config, Some(10), 0);
        assert!(!schedule.reduction_due(&config, 0));
    }
}
