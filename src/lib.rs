//! Consistency checks for scheduling inputs.
//!
//! Validates client, worker, and task collections before they are handed
//! to a scheduler, analyzes user-authored rules for contradictions, and
//! answers structured queries over the same records. Producing an actual
//! schedule is out of scope.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Client`, `Worker`, `Task`, typed cells,
//!   the `Entity` column-access trait, `Rule`, `PrioritySettings`
//! - **`validation`**: Structural and cross-collection checks producing
//!   tagged `ValidationError`s (missing columns, duplicate IDs, ranges,
//!   malformed lists, broken JSON, unknown references, skill coverage)
//! - **`rules`**: Per-rule parameter checks, co-run cycle detection,
//!   pairwise rule conflicts, rule import/export
//! - **`query`**: Structured filters (`SearchFilter`) and keyword search
//! - **`export`**: One-document export of a whole session
//!
//! # Architecture
//!
//! Every check is a pure function of its input. Problems found in the
//! data are returned as values and never abort a pass; only decoding of
//! serialized input returns [`Error`].
//!
//! ```
//! use u_schedule_audit::models::{Client, Rule, Task, Worker};
//! use u_schedule_audit::rules::detect_cycles;
//! use u_schedule_audit::validation::validate_all;
//!
//! let clients = vec![Client::new("C1").with_priority(7)];
//! let errors = validate_all(&clients, &[] as &[Worker], &[] as &[Task]);
//! assert!(errors.iter().any(|e| e.field == "PriorityLevel"));
//!
//! let rules = vec![Rule::co_run("r1", ["T1", "T2"]), Rule::co_run("r2", ["T2", "T3"])];
//! assert!(detect_cycles(&rules).has_cycles);
//! ```

pub mod error;
pub mod export;
pub mod models;
pub mod query;
mod response;
pub mod rules;
pub mod validation;

pub use error::{Error, Result};
