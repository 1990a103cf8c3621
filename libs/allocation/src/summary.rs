//! Preference tallies per faculty and rank.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{FacultyId, StudentRecord};

/// How many students gave each faculty each rank.
///
/// Every faculty carries a zero-initialised slot for ranks `1..=k` (`k` being
/// the number of faculties), so the table always has a full grid even when a
/// rank was never chosen. Ranks beyond `k` are counted when they occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceSummary {
    faculties: Vec<FacultyId>,
    counts: BTreeMap<FacultyId, BTreeMap<u32, usize>>,
}

/// One `(Faculty, Rank, Count)` row of the long-form summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub faculty: FacultyId,
    pub rank: u32,
    pub count: usize,
}

/// Wide view of the summary: one row per faculty, one column per rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotTable {
    pub ranks: Vec<u32>,
    pub rows: Vec<(FacultyId, Vec<usize>)>,
}

/// Counts, for each faculty in `faculties`, how many students ranked it at
/// each rank. Students without a rank for a faculty add nothing for it.
///
/// The result depends only on the multiset of students, not their order.
pub fn summarize(students: &[StudentRecord], faculties: &[FacultyId]) -> PreferenceSummary {
    let seeded_ranks = 1..=u32::try_from(faculties.len()).unwrap_or(u32::MAX);
    let mut counts: BTreeMap<FacultyId, BTreeMap<u32, usize>> = faculties
        .iter()
        .map(|f| (f.clone(), seeded_ranks.clone().map(|r| (r, 0)).collect()))
        .collect();

    for student in students {
        for faculty in faculties {
            let Some(rank) = student.rank_for(faculty) else {
                continue;
            };
            if let Some(by_rank) = counts.get_mut(faculty) {
                *by_rank.entry(rank).or_insert(0) += 1;
            }
        }
    }

    PreferenceSummary {
        faculties: faculties.to_vec(),
        counts,
    }
}

impl PreferenceSummary {
    /// Faculties in column order.
    pub fn faculties(&self) -> &[FacultyId] {
        &self.faculties
    }

    /// Number of students that ranked `faculty` at `rank`.
    pub fn count(&self, faculty: &FacultyId, rank: u32) -> usize {
        self.counts
            .get(faculty)
            .and_then(|by_rank| by_rank.get(&rank))
            .copied()
            .unwrap_or(0)
    }

    /// Long-form rows, faculty by faculty in column order, ranks ascending.
    pub fn rows(&self) -> impl Iterator<Item = SummaryRow> + '_ {
        self.faculties.iter().flat_map(move |faculty| {
            self.counts
                .get(faculty)
                .into_iter()
                .flatten()
                .map(move |(&rank, &count)| SummaryRow {
                    faculty: faculty.clone(),
                    rank,
                    count,
                })
        })
    }

    /// Wide table over every rank that appears for any faculty.
    pub fn pivot(&self) -> PivotTable {
        let mut ranks: Vec<u32> = self
            .counts
            .values()
            .flat_map(|by_rank| by_rank.keys().copied())
            .collect();
        ranks.sort_unstable();
        ranks.dedup();

        let rows = self
            .faculties
            .iter()
            .map(|faculty| {
                let counts = ranks.iter().map(|&rank| self.count(faculty, rank)).collect();
                (faculty.clone(), counts)
            })
            .collect();

        PivotTable { ranks, rows }
    }

    /// Number of students whose first choice was `faculty`.
    pub fn first_choice(&self, faculty: &FacultyId) -> usize {
        self.count(faculty, 1)
    }
}

impl Serialize for PreferenceSummary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn faculties(names: &[&str]) -> Vec<FacultyId> {
        names.iter().map(|n| FacultyId::new(*n)).collect()
    }

    fn ranked(roll: &str, ranks: &[(&str, u32)]) -> StudentRecord {
        ranks.iter().fold(
            StudentRecord::new(roll, roll, format!("{roll}@uni.edu"), 8.0),
            |s, (f, r)| s.with_preference(*f, *r),
        )
    }

    #[test]
    fn test_counts_each_rank() {
        let facs = faculties(&["A", "B"]);
        let students = [
            ranked("1", &[("A", 1), ("B", 2)]),
            ranked("2", &[("A", 1), ("B", 2)]),
            ranked("3", &[("A", 2), ("B", 1)]),
        ];
        let summary = summarize(&students, &facs);
        assert_eq!(summary.count(&"A".into(), 1), 2);
        assert_eq!(summary.count(&"A".into(), 2), 1);
        assert_eq!(summary.first_choice(&"B".into()), 1);
        assert_eq!(summary.count(&"B".into(), 2), 2);
    }

    #[test]
    fn test_grid_is_seeded_with_zeros() {
        let facs = faculties(&["A", "B", "C"]);
        let summary = summarize(&[ranked("1", &[("A", 1)])], &facs);
        let rows: Vec<(String, u32, usize)> = summary
            .rows()
            .map(|r| (r.faculty.to_string(), r.rank, r.count))
            .collect();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0], ("A".to_string(), 1, 1));
        assert_eq!(rows[3], ("B".to_string(), 1, 0));
        assert!(rows[1..].iter().all(|(_, _, c)| *c == 0));
    }

    #[test]
    fn test_missing_ranks_contribute_nothing() {
        let facs = faculties(&["A", "B"]);
        let summary = summarize(&[ranked("1", &[("B", 1)])], &facs);
        assert_eq!(summary.rows().map(|r| r.count).sum::<usize>(), 1);
        assert_eq!(summary.first_choice(&"A".into()), 0);
    }

    #[test]
    fn test_ranks_beyond_faculty_count_are_kept() {
        let facs = faculties(&["A", "B"]);
        let summary = summarize(&[ranked("1", &[("A", 5)])], &facs);
        assert_eq!(summary.count(&"A".into(), 5), 1);

        let pivot = summary.pivot();
        assert_eq!(pivot.ranks, [1, 2, 5]);
        assert_eq!(pivot.rows[0], ("A".into(), vec![0, 0, 1]));
        assert_eq!(pivot.rows[1], ("B".into(), vec![0, 0, 0]));
    }

    #[test]
    fn test_unknown_faculty_preferences_are_ignored() {
        let facs = faculties(&["A"]);
        let summary = summarize(&[ranked("1", &[("Z", 1)])], &facs);
        assert_eq!(summary.count(&"Z".into(), 1), 0);
        assert_eq!(summary.rows().count(), 1);
    }

    #[test]
    fn test_serializes_as_long_rows() {
        let summary = summarize(&[ranked("1", &[("A", 1)])], &faculties(&["A"]));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "faculty": "A", "rank": 1, "count": 1 }])
        );
    }

    fn students_strategy() -> impl Strategy<Value = Vec<StudentRecord>> {
        prop::collection::vec(prop::collection::vec(prop::option::of(1u32..6), 4), 0..40)
            .prop_map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, ranks)| {
                        let mut s = StudentRecord::new(format!("r{i}"), "n", "e", 7.5);
                        for (f, rank) in ["A", "B", "C", "D"].iter().zip(ranks) {
                            if let Some(rank) = rank {
                                s = s.with_preference(*f, rank);
                            }
                        }
                        s
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn prop_summary_is_order_independent(
            (students, shuffled) in students_strategy()
                .prop_flat_map(|s| (Just(s.clone()), Just(s).prop_shuffle()))
        ) {
            let facs = faculties(&["A", "B", "C", "D"]);
            prop_assert_eq!(summarize(&students, &facs), summarize(&shuffled, &facs));
        }

        #[test]
        fn prop_total_count_matches_declared_ranks(students in students_strategy()) {
            let facs = faculties(&["A", "B", "C", "D"]);
            let declared: usize = students.iter().map(|s| s.preferences.len()).sum();
            let counted: usize = summarize(&students, &facs).rows().map(|r| r.count).sum();
            prop_assert_eq!(declared, counted);
        }
    }
}
