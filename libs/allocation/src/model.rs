//! Roster and allocation data model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A faculty advisor, named after its preference column in the upload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacultyId(String);

impl FacultyId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacultyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FacultyId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FacultyId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// One student row from the uploaded roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Roll number; unique within a roster.
    pub roll: String,
    pub name: String,
    pub email: String,
    /// Cumulative grade-point average, always finite and within `0..=10`
    /// once it has passed roster validation.
    pub cgpa: f64,
    /// Declared rank per faculty (1 = most preferred). Faculties the student
    /// left blank or filled with garbage are absent.
    pub preferences: BTreeMap<FacultyId, u32>,
}

impl StudentRecord {
    /// Builds a record without preferences.
    pub fn new(
        roll: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        cgpa: f64,
    ) -> Self {
        Self {
            roll: roll.into(),
            name: name.into(),
            email: email.into(),
            cgpa,
            preferences: BTreeMap::new(),
        }
    }

    /// Adds a declared rank for `faculty`.
    #[must_use]
    pub fn with_preference(mut self, faculty: impl Into<FacultyId>, rank: u32) -> Self {
        self.preferences.insert(faculty.into(), rank);
        self
    }

    /// The rank this student gave `faculty`, if any.
    pub fn rank_for(&self, faculty: &FacultyId) -> Option<u32> {
        self.preferences.get(faculty).copied()
    }
}

/// A student paired with the faculty the allocator assigned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationRecord {
    pub student: StudentRecord,
    pub faculty: FacultyId,
}

impl AllocationRecord {
    /// Rank the student gave their assigned faculty, if they ranked it.
    pub fn satisfied_rank(&self) -> Option<u32> {
        self.student.rank_for(&self.faculty)
    }
}
