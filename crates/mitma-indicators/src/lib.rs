//! `mitma-indicators` — the daily indicator calculators.
//!
//! Every function here is pure: one day's rows in, a fresh collection of
//! output rows out.  Nothing is cached between calls, so running a calculator
//! twice on the same input yields identical output.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                       |
//! |-----------|----------------------------------------------------------------|
//! | [`trips`] | from-home filter, per-region totals, full pair matrix          |
//! | [`qrp`]   | `Qrp`, `compute_indexes` — the q/r/p mobility indexes          |
//! | [`flux`]  | `compute_flux` — cross-region destination shares               |
//! | [`error`] | `IndicatorError`, `IndicatorResult<T>`                         |
//!
//! # Data flow
//!
//! ```text
//! raw trip rows ──► trips::from_home_matrix ──► qrp::compute_indexes ◄── population rows
//!        │                                 └──► flux::compute_flux
//!        ├────────► trips::trip_totals
//!        └────────► trips::trip_matrix
//! ```

pub mod error;
pub mod flux;
pub mod qrp;
pub mod trips;

#[cfg(test)]
mod tests;

pub use error::{IndicatorError, IndicatorResult};
pub use flux::compute_flux;
pub use qrp::{IndexOutcome, Qrp, TripSplit, compute_indexes, region_index};
pub use trips::{from_home_matrix, trip_matrix, trip_totals};
