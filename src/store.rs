//! Canonical task store with derived points and achievements.
//!
//! The store is constructed once at application start and passed by
//! reference to presentation components. Every mutation recomputes the
//! derived gamification state and persists the full snapshot eagerly;
//! persistence failures are logged and never surfaced to the caller or
//! rolled back.

use crate::achievements;
use crate::error::{Error, Result};
use crate::models::{Task, TaskPatch};
use crate::rules::GameRules;
use crate::storage::{KeyValueStorage, Snapshot};
use crate::view::{self, ViewCriteria};
use std::collections::BTreeSet;

/// Observable result of a store mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mutation {
    /// Number of tasks after the mutation.
    pub task_count: usize,
    /// Achievement ids that transitioned locked -> unlocked during this
    /// mutation. The presentation layer decides how (or whether) to alert
    /// the user.
    pub newly_unlocked: Vec<String>,
}

/// The canonical task collection plus derived gamification state.
///
/// Tasks are kept in insertion order; presentation order comes from
/// [`TaskStore::project`]. Mutations take `&mut self`, so exclusive access
/// is enforced by the borrow checker and no two mutations can interleave.
#[derive(Debug)]
pub struct TaskStore<S> {
    storage: S,
    rules: GameRules,
    tasks: Vec<Task>,
    points: u64,
    achievements: BTreeSet<String>,
}

impl<S: KeyValueStorage> TaskStore<S> {
    /// Create an empty store without reading from storage.
    #[must_use]
    pub fn new(storage: S, rules: GameRules) -> Self {
        Self { storage, rules, tasks: Vec::new(), points: 0, achievements: BTreeSet::new() }
    }

    /// Create a store hydrated from storage.
    ///
    /// Called once at startup. Read or parse failures fall back to the
    /// empty state (logged, never fatal), so a corrupt device store does
    /// not block launch. Points and achievements are recomputed from the
    /// loaded tasks and unioned with the persisted set, healing state left
    /// behind by a crash between the non-transactional key writes.
    #[must_use]
    pub fn hydrate(storage: S, rules: GameRules) -> Self {
        let snapshot = match Snapshot::load(&storage) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(%err, "failed to load task state, starting empty");
                Snapshot::default()
            }
        };
        tracing::debug!(tasks = snapshot.tasks.len(), "hydrated task state");

        let mut store = Self {
            storage,
            rules,
            tasks: snapshot.tasks,
            points: 0,
            achievements: snapshot.achievements,
        };
        let completed = store.completed_count();
        store.points = store.rules.points_for(completed);
        let healed = achievements::newly_unlocked(completed, &store.rules, &store.achievements);
        store.achievements.extend(healed);
        store
    }

    /// The task collection in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Current points total.
    #[must_use]
    pub const fn points(&self) -> u64 {
        self.points
    }

    /// Unlocked achievement ids.
    #[must_use]
    pub const fn achievements(&self) -> &BTreeSet<String> {
        &self.achievements
    }

    /// The gamification rules in effect.
    #[must_use]
    pub const fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// A filtered, sorted projection of the collection.
    #[must_use]
    pub fn project(&self, criteria: &ViewCriteria) -> Vec<Task> {
        view::project(&self.tasks, criteria)
    }

    /// The current full snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.tasks.clone(),
            points: self.points,
            achievements: self.achievements.clone(),
        }
    }

    /// Append a task to the collection.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the task's id collides with an
    /// existing one; the collection is left unchanged.
    pub fn add(&mut self, task: Task) -> Result<Mutation> {
        if self.tasks.iter().any(|existing| existing.id == task.id) {
            return Err(Error::Validation(format!("duplicate task id: {}", task.id)));
        }

        self.tasks.push(task);
        Ok(self.finish_mutation())
    }

    /// Merge the `Some` fields of `patch` into the task with `id`. The id
    /// itself is never changed.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if `id` is absent, or `Error::Validation`
    /// if the patch title trims to empty. Either way the collection is left
    /// unchanged.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Mutation> {
        let title = match &patch.title {
            Some(title) => {
                let trimmed = title.trim();
                if trimmed.is_empty() {
                    return Err(Error::Validation("empty title".to_string()));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(due) = patch.due {
            task.due = due;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }

        Ok(self.finish_mutation())
    }

    /// Remove the task with `id`. Removing an absent id is a no-op, not an
    /// error.
    pub fn remove(&mut self, id: &str) -> Mutation {
        self.tasks.retain(|task| task.id != id);
        self.finish_mutation()
    }

    /// Flip the completion flag of the task with `id`. No other field is
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if `id` is absent.
    pub fn toggle_completed(&mut self, id: &str) -> Result<Mutation> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        task.completed = !task.completed;

        Ok(self.finish_mutation())
    }

    fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Recompute derived state, persist, and report what changed.
    ///
    /// Points are recomputed from scratch, never accumulated, so completing
    /// and then uncompleting a task restores the previous total. The
    /// achievement set only ever grows.
    fn finish_mutation(&mut self) -> Mutation {
        let completed = self.completed_count();
        self.points = self.rules.points_for(completed);

        let newly_unlocked =
            achievements::newly_unlocked(completed, &self.rules, &self.achievements);
        self.achievements.extend(newly_unlocked.iter().cloned());

        self.persist();

        Mutation { task_count: self.tasks.len(), newly_unlocked }
    }

    /// Best-effort persistence. A failed save is logged and swallowed; the
    /// in-memory mutation stands.
    fn persist(&self) {
        if let Err(err) = self.snapshot().save(&self.storage) {
            tracing::warn!(%err, "failed to persist task state");
        }
    }
}
