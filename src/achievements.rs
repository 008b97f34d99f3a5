//! Achievement evaluation.
//!
//! Achievements are one-way milestones keyed to the completed-task count.
//! Evaluation is pure: the store owns the unioning of newly unlocked ids
//! into its monotonic set.

use crate::rules::GameRules;
use std::collections::BTreeSet;

/// Compute the achievement ids newly unlocked at `completed_count`.
///
/// An id is returned iff its threshold is met and it is not already in
/// `unlocked`. Deterministic and idempotent: re-evaluating with the same
/// inputs yields the same ids, and evaluating after the ids have been
/// unioned into `unlocked` yields nothing.
#[must_use]
pub fn newly_unlocked(
    completed_count: usize,
    rules: &GameRules,
    unlocked: &BTreeSet<String>,
) -> Vec<String> {
    rules
        .achievements
        .iter()
        .filter(|rule| completed_count >= rule.count && !unlocked.contains(&rule.id))
        .map(|rule| rule.id.clone())
        .collect()
}
