//! Round-robin advisor allocation.

use crate::error::RosterError;
use crate::model::{AllocationRecord, FacultyId, StudentRecord};

/// Assigns every student to a faculty.
///
/// Students are stable-sorted by CGPA, highest first, so equal CGPAs keep
/// their upload order. The `i`-th student in that order gets
/// `faculties[i % faculties.len()]`. Records come back in sorted order.
///
/// Preferences play no part here and no faculty has a capacity limit; every
/// faculty ends up with either `floor(n/k)` or `ceil(n/k)` students.
pub fn allocate(
    students: &[StudentRecord],
    faculties: &[FacultyId],
) -> Result<Vec<AllocationRecord>, RosterError> {
    if students.is_empty() {
        return Err(RosterError::EmptyInput);
    }
    if faculties.is_empty() {
        return Err(RosterError::NoFacultyColumns);
    }

    let mut ordered: Vec<&StudentRecord> = students.iter().collect();
    // `sort_by` is stable; `total_cmp` keeps the order total for any f64.
    ordered.sort_by(|a, b| b.cgpa.total_cmp(&a.cgpa));

    Ok(ordered
        .into_iter()
        .zip(faculties.iter().cycle())
        .map(|(student, faculty)| AllocationRecord {
            student: student.clone(),
            faculty: faculty.clone(),
        })
        .collect())
}
