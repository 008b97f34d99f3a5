//! # `pocket_tasks`
//!
//! Local task-state store for a personal to-do application: task records
//! with due dates and priorities, a mutation API with derived points and
//! achievements, pure filtered/sorted views, and key-value persistence.
//!
//! The crate is an embedded in-process library; it exposes no CLI and no
//! network surface. A presentation layer owns a [`TaskStore`], calls its
//! mutation methods, and renders projections from [`view::project`].
//!
//! # Example
//!
//! ```
//! use pocket_tasks::{GameRules, MemoryStorage, Priority, Task, TaskStore, ViewCriteria};
//!
//! let mut store = TaskStore::hydrate(MemoryStorage::new(), GameRules::default());
//!
//! let task = Task::new("Buy milk", None, chrono::Utc::now(), Priority::High).unwrap();
//! let id = task.id.clone();
//! store.add(task).unwrap();
//!
//! let mutation = store.toggle_completed(&id).unwrap();
//! assert_eq!(store.points(), 10);
//! assert!(mutation.newly_unlocked.is_empty());
//!
//! let visible = store.project(&ViewCriteria { hide_completed: true, ..Default::default() });
//! assert!(visible.is_empty());
//! ```

pub mod achievements;
pub mod error;
pub mod id;
pub mod models;
pub mod rules;
pub mod storage;
pub mod store;
pub mod view;

pub use error::{Error, Result};
pub use models::{Priority, Task, TaskPatch};
pub use rules::{AchievementRule, GameRules};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, Snapshot};
pub use store::{Mutation, TaskStore};
pub use view::{DateFilter, PriorityFilter, SortKey, ViewCriteria};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
