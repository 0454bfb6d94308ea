//! Central solver data structure.
use partial_ref::{part, partial, PartialRef, PartialRefTarget};

use crate::activity::ActivityManager;
use crate::analyze_conflict::AnalyzeConflict;
use crate::clause::ClauseDb;
use crate::config::SolverConfig;
use crate::decision::CandidateHeap;
use crate::interrupt::Interrupt;
use crate::prop::{Assignment, ImplGraph, Trail, Watchlists};
use crate::schedule::Schedule;
use crate::state::SolverState;
use crate::stats::SolverStats;
use crate::tmp::TmpData;

/// Part declarations for the [`Context`] struct.
pub mod parts {
    use super::*;

    part!(pub ActivityP: ActivityManager);
    part!(pub AnalyzeConflictP: AnalyzeConflict);
    part!(pub AssignmentP: Assignment);
    part!(pub CandidateHeapP: CandidateHeap);
    part!(pub ClauseDbP: ClauseDb);
    part!(pub ImplGraphP: ImplGraph);
    part!(pub InterruptP: Interrupt);
    part!(pub ScheduleP: Schedule);
    part!(pub SolverConfigP: SolverConfig);
    part!(pub SolverStateP: SolverState);
    part!(pub StatsP: SolverStats);
    part!(pub TmpDataP: TmpData);
    part!(pub TrailP: Trail);
    part!(pub WatchlistsP: Watchlists);
}

pub use parts::*;

/// Central solver data structure.
///
/// This struct contains all data kept by the solver during a single solve. Most functions
/// operating on multiple fields of the context use partial references provided by the
/// `partial_ref` crate. This documents the data dependencies and makes the borrow checker happy
/// without the overhead of passing individual references.
#[derive(PartialRefTarget, Default)]
pub struct Context {
    #[part(ActivityP)]
    pub activity: ActivityManager,
    #[part(AnalyzeConflictP)]
    pub analyze_conflict: AnalyzeConflict,
    #[part(AssignmentP)]
    pub assignment: Assignment,
    #[part(CandidateHeapP)]
    pub candidate_heap: CandidateHeap,
    #[part(ClauseDbP)]
    pub clause_db: ClauseDb,
    #[part(ImplGraphP)]
    pub impl_graph: ImplGraph,
    #[part(InterruptP)]
    pub interrupt: Interrupt,
    #[part(ScheduleP)]
    pub schedule: Schedule,
    #[part(SolverConfigP)]
    pub solver_config: SolverConfig,
    #[part(SolverStateP)]
    pub solver_state: SolverState,
    #[part(StatsP)]
    pub stats: SolverStats,
    #[part(TmpDataP)]
    pub tmp_data: TmpData,
    #[part(TrailP)]
    pub trail: Trail,
    #[part(WatchlistsP)]
    pub watchlists: Watchlists,
}

/// Update structures for a new variable count.
pub fn set_var_count(
    mut ctx: partial!(
        Context,
        mut AnalyzeConflictP,
        mut AssignmentP,
        mut CandidateHeapP,
        mut ImplGraphP,
        mut TmpDataP,
        mut WatchlistsP,
    ),
    count: usize,
) {
    ctx.part_mut(AnalyzeConflictP).set_var_count(count);
    ctx.part_mut(AssignmentP).set_var_count(count);
    ctx.part_mut(CandidateHeapP).set_var_count(count);
    ctx.part_mut(ImplGraphP).set_var_count(count);
    ctx.part_mut(TmpDataP).set_var_count(count);
    ctx.part_mut(WatchlistsP).set_var_count(count);
}

/// Apply the configured decay factors and schedule parameters.
///
/// Has to be called after loading the problem, as the schedule depends on the original clause
/// count.
pub fn apply_config(
    mut ctx: partial!(
        Context,
        mut ActivityP,
        mut ScheduleP,
        ClauseDbP,
        SolverConfigP,
    ),
) {
    let (config, mut ctx) = ctx.split_part(SolverConfigP);

    let activity = ctx.part_mut(ActivityP);
    activity.set_var_decay(config.vsids_decay);
    activity.set_clause_decay(config.clause_activity_decay);

    let original_clause_count = ctx.part(ClauseDbP).irred_count();
    *ctx.part_mut(ScheduleP) = Schedule::new(config, original_clause_count);
}
