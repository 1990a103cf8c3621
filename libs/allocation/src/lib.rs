//! # advis-allocation
//!
//! Core of the advisor allocation service.
//!
//! A [`Roster`] is parsed and validated from CSV, then two independent, pure
//! operations run over it:
//!
//! - [`allocate`] stable-sorts students by CGPA (descending) and hands out
//!   faculties round-robin in column order.
//! - [`summarize`] counts how often each faculty was given each preference
//!   rank.
//!
//! Round-robin deliberately ignores the students' preferences. The summary
//! exists so that reviewers can see how far the allocation is from what
//! students asked for; it never feeds back into the allocation.
//!
//! [`AllocationReport`] bundles both results with the dashboard metrics, and
//! the [`export`] module writes both tables back out as CSV.

mod allocator;
mod error;
pub mod export;
mod model;
mod report;
mod roster;
mod summary;

pub use allocator::allocate;
pub use error::{ExportError, RosterError};
pub use model::{AllocationRecord, FacultyId, StudentRecord};
pub use report::{AllocationReport, FacultyLoad, Metrics};
pub use roster::{RankIssue, Roster, CGPA_RANGE, REQUIRED_COLUMNS};
pub use summary::{summarize, PivotTable, PreferenceSummary, SummaryRow};
