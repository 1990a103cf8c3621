//! Allocation report: both output tables plus the dashboard metrics.

use serde::Serialize;

use crate::allocator::allocate;
use crate::error::RosterError;
use crate::model::{AllocationRecord, FacultyId};
use crate::roster::Roster;
use crate::summary::{summarize, PreferenceSummary};

/// Scalar metrics shown above the results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub student_count: usize,
    pub faculty_count: usize,
    pub mean_cgpa: f64,
}

/// Number of students assigned to one faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacultyLoad {
    pub faculty: FacultyId,
    pub assigned: usize,
}

/// Everything produced for one roster. Either the whole report is built or
/// an error is returned; there is no partial report.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationReport {
    pub allocations: Vec<AllocationRecord>,
    pub summary: PreferenceSummary,
    pub metrics: Metrics,
    /// Per-faculty assignment counts in column order, zeros included.
    pub loads: Vec<FacultyLoad>,
}

impl AllocationReport {
    pub fn build(roster: &Roster) -> Result<Self, RosterError> {
        let allocations = allocate(roster.students(), roster.faculties())?;
        let summary = summarize(roster.students(), roster.faculties());

        let loads = roster
            .faculties()
            .iter()
            .map(|faculty| FacultyLoad {
                faculty: faculty.clone(),
                assigned: allocations.iter().filter(|r| &r.faculty == faculty).count(),
            })
            .collect();

        let total: f64 = allocations.iter().map(|r| r.student.cgpa).sum();
        let metrics = Metrics {
            student_count: allocations.len(),
            faculty_count: roster.faculties().len(),
            mean_cgpa: total / allocations.len() as f64,
        };

        Ok(Self {
            allocations,
            summary,
            metrics,
            loads,
        })
    }

    /// Students who got a faculty they ranked first.
    pub fn first_choice_hits(&self) -> usize {
        self.allocations
            .iter()
            .filter(|r| r.satisfied_rank() == Some(1))
            .count()
    }

    /// Largest per-faculty load, used to scale the chart.
    pub fn max_load(&self) -> usize {
        self.loads.iter().map(|l| l.assigned).max().unwrap_or(0)
    }
}
