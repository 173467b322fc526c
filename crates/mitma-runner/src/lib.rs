//! `mitma-runner` — the incremental day-by-day driver.
//!
//! Resumes from the day after the last one stored, loads each day's two
//! source files, runs the calculators from `mitma-indicators`, and appends
//! the results through a `mitma_store::TableStore`.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`builder`]  | `RunnerBuilder` — config + store + optional overrides        |
//! | [`runner`]   | `IncrementalRunner` — watermarks and the day loop            |
//! | [`observer`] | `RunObserver`, `LogObserver`, `NoopObserver`                 |
//! | [`summary`]  | `RunSummary`, `DayReport`, `SkipReason`                      |
//! | [`error`]    | `RunError`, `RunResult<T>`                                   |
//!
//! # Error policy
//!
//! | Problem                                  | Effect                         |
//! |------------------------------------------|--------------------------------|
//! | no watermark and no start date           | `RunError::Configuration`      |
//! | source directory cannot be listed        | `RunError::Source`             |
//! | file missing or unreadable for one day   | day skipped, `SkipReason`      |
//! | region with zero sampled population      | region left out, logged        |
//! | append fails                             | `RunError::StorageWrite`       |

pub mod builder;
pub mod error;
pub mod observer;
pub mod runner;
pub mod summary;


pub use builder::RunnerBuilder;
pub use error::{RunError, RunResult};
pub use observer::{LogObserver, NoopObserver, RunObserver};
pub use runner::{IncrementalRunner, Watermarks};
pub use summary::{DayReport, RunSummary, SkipReason, SkippedDay};
