//! Roster parsing and validation.
//!
//! A roster is a CSV file with the required columns `Roll`, `Name`, `Email`
//! and `CGPA`. Every other column names a faculty and holds the student's
//! rank for that faculty (1 = most preferred).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::Serialize;

use crate::error::RosterError;
use crate::model::{FacultyId, StudentRecord};

/// Required columns, in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Roll", "Name", "Email", "CGPA"];

/// Accepted CGPA values. Anything outside rejects the file.
pub const CGPA_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// A preference cell that could not be read as a positive integer rank.
///
/// These do not reject the roster; the cell is treated as if the student
/// left it blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankIssue {
    /// 1-based data row (the header is not counted).
    pub row: usize,
    pub roll: String,
    pub faculty: FacultyId,
    pub value: String,
}

/// A validated roster: the students in upload order plus the faculty columns
/// in header order.
#[derive(Debug, Clone)]
pub struct Roster {
    faculties: Vec<FacultyId>,
    students: Vec<StudentRecord>,
    rank_issues: Vec<RankIssue>,
}

/// Positions of the required columns within a header row.
struct ColumnLayout {
    roll: usize,
    name: usize,
    email: usize,
    cgpa: usize,
    faculties: Vec<(usize, FacultyId)>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, RosterError> {
        if headers.iter().all(str::is_empty) {
            return Err(RosterError::EmptyInput);
        }

        let mut seen = HashSet::new();
        for (position, header) in headers.iter().enumerate() {
            if header.is_empty() {
                return Err(RosterError::BlankHeader {
                    position: position + 1,
                });
            }
            if !seen.insert(header) {
                return Err(RosterError::DuplicateColumn {
                    column: header.to_string(),
                });
            }
        }

        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(RosterError::MissingColumn { column })
        };

        let [roll, name, email, cgpa] = REQUIRED_COLUMNS;
        let layout = Self {
            roll: find(roll)?,
            name: find(name)?,
            email: find(email)?,
            cgpa: find(cgpa)?,
            faculties: headers
                .iter()
                .enumerate()
                .filter(|(_, h)| !REQUIRED_COLUMNS.contains(h))
                .map(|(idx, h)| (idx, FacultyId::new(h)))
                .collect(),
        };

        if layout.faculties.is_empty() {
            return Err(RosterError::NoFacultyColumns);
        }

        Ok(layout)
    }
}

impl Roster {
    /// Parses and validates a roster from any CSV source.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, RosterError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let layout = ColumnLayout::from_headers(reader.headers()?)?;

        let mut students = Vec::new();
        let mut rank_issues = Vec::new();
        let mut first_seen: HashMap<String, usize> = HashMap::new();

        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let row = idx + 1;
            let cell = |pos: usize| record.get(pos).unwrap_or_default();

            let roll = cell(layout.roll);
            if roll.is_empty() {
                return Err(RosterError::MissingValue {
                    row,
                    column: "Roll",
                });
            }
            if let Some(&first_row) = first_seen.get(roll) {
                return Err(RosterError::DuplicateRoll {
                    roll: roll.to_string(),
                    first_row,
                    row,
                });
            }
            first_seen.insert(roll.to_string(), row);

            let cgpa = parse_cgpa(cell(layout.cgpa)).ok_or_else(|| RosterError::InvalidCgpa {
                row,
                value: cell(layout.cgpa).to_string(),
            })?;

            let mut preferences = BTreeMap::new();
            for (pos, faculty) in &layout.faculties {
                let raw = cell(*pos);
                match parse_rank(raw) {
                    Ok(Some(rank)) => {
                        preferences.insert(faculty.clone(), rank);
                    }
                    Ok(None) => {}
                    Err(()) => rank_issues.push(RankIssue {
                        row,
                        roll: roll.to_string(),
                        faculty: faculty.clone(),
                        value: raw.to_string(),
                    }),
                }
            }

            students.push(StudentRecord {
                roll: roll.to_string(),
                name: cell(layout.name).to_string(),
                email: cell(layout.email).to_string(),
                cgpa,
                preferences,
            });
        }

        if students.is_empty() {
            return Err(RosterError::EmptyInput);
        }

        Ok(Self {
            faculties: layout.faculties.into_iter().map(|(_, f)| f).collect(),
            students,
            rank_issues,
        })
    }

    /// Parses a roster held in memory, e.g. an uploaded file body.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, RosterError> {
        Self::from_reader(bytes)
    }

    /// Parses a roster from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Students in upload order.
    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    /// Faculty columns in header order.
    pub fn faculties(&self) -> &[FacultyId] {
        &self.faculties
    }

    /// Preference cells that were ignored because they held no valid rank.
    pub fn rank_issues(&self) -> &[RankIssue] {
        &self.rank_issues
    }

    /// The first `limit` students, for previews.
    pub fn preview(&self, limit: usize) -> &[StudentRecord] {
        &self.students[..self.students.len().min(limit)]
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

fn parse_cgpa(raw: &str) -> Option<f64> {
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() || !CGPA_RANGE.contains(&value) {
        return None;
    }
    // Fold -0.0 into 0.0 so the descending sort has a single zero.
    Some(value + 0.0)
}

/// Blank cells are `Ok(None)`; anything that is not a positive integer is an
/// error. Integral floats such as `2.0` are accepted since spreadsheet
/// exports often write ranks that way.
fn parse_rank(raw: &str) -> Result<Option<u32>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(rank) = raw.parse::<u32>() {
        return if rank > 0 { Ok(Some(rank)) } else { Err(()) };
    }
    match raw.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v >= 1.0 && v <= f64::from(u32::MAX) => Ok(Some(v as u32)),
        _ => Err(()),
    }
}
