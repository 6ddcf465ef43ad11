//! Selection state and view derivation
//!
//! The only control logic in the crate: a three-state selection (nothing /
//! year / year + section) with the dashboard's transition rules, plus pure
//! entry points that recompute the attendance and assessment views from
//! scratch for whatever is selected. Nothing here caches or mutates the
//! input tables, so every call is idempotent and re-entrant.

use crate::assessment;
use crate::attendance;
use crate::dataset::Dataset;
use crate::sections;
use crate::types::{
    AssessmentStats, DayAttendance, SectionAssessmentSummary, SectionAttendanceSummary,
    StudentAttendance, StudentRecord, YearAssessmentSummary, YearAttendanceSummary,
};
use serde::{Deserialize, Serialize};

/// Active year/section filter.
///
/// Transitions: selecting a year clears any section; selecting an empty
/// year clears everything; a section can only be selected under a year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    #[default]
    All,
    Year(String),
    YearSection {
        year: String,
        section: String,
    },
}

impl Selection {
    /// Select a year; an empty label clears the whole selection
    pub fn select_year(&mut self, year: &str) {
        *self = if year.is_empty() {
            Selection::All
        } else {
            Selection::Year(year.to_string())
        };
    }

    /// Select a section under the current year; ignored when no year is
    /// selected. An empty label drops back to the year level.
    pub fn select_section(&mut self, section: &str) {
        let year = match self {
            Selection::All => return,
            Selection::Year(y) | Selection::YearSection { year: y, .. } => y.clone(),
        };
        *self = if section.is_empty() {
            Selection::Year(year)
        } else {
            Selection::YearSection {
                year,
                section: section.to_string(),
            }
        };
    }

    /// Reset to no selection
    pub fn clear(&mut self) {
        *self = Selection::All;
    }

    pub fn year(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Year(y) | Selection::YearSection { year: y, .. } => Some(y),
        }
    }

    pub fn section(&self) -> Option<&str> {
        match self {
            Selection::YearSection { section, .. } => Some(section),
            _ => None,
        }
    }
}

/// Sorted unique year labels present in the roster
pub fn years(students: &[StudentRecord]) -> Vec<String> {
    let mut years: Vec<String> = students
        .iter()
        .map(|s| s.year.clone())
        .filter(|y| !y.is_empty())
        .collect();
    years.sort();
    years.dedup();
    years
}

/// Sorted unique section labels for one year
pub fn sections_for_year(students: &[StudentRecord], year: &str) -> Vec<String> {
    let mut sections: Vec<String> = students
        .iter()
        .filter(|s| s.year == year)
        .map(|s| s.section.clone())
        .filter(|sec| !sec.is_empty())
        .collect();
    sections.sort();
    sections.dedup();
    sections
}

/// Narrow the roster to the current selection
pub fn filter_students<'a>(
    students: &'a [StudentRecord],
    selection: &Selection,
) -> Vec<&'a StudentRecord> {
    students
        .iter()
        .filter(|s| match selection {
            Selection::All => true,
            Selection::Year(year) => &s.year == year,
            Selection::YearSection { year, section } => &s.year == year && &s.section == section,
        })
        .collect()
}

/// Attendance aggregates for the current selection.
///
/// The populated fields follow the selection state: year rollups with no
/// selection, section rollups under a year, daily trend and per-student
/// roster under a section. `has_attendance_data` distinguishes "no session
/// data exists for this scope" from genuinely empty aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceView {
    pub selection: Selection,
    pub total_students: usize,
    pub avg_attendance: f64,
    pub has_attendance_data: bool,
    pub days_tracked: usize,
    pub year_summaries: Vec<YearAttendanceSummary>,
    pub section_summaries: Vec<SectionAttendanceSummary>,
    pub daily: Vec<DayAttendance>,
    pub roster: Vec<StudentAttendance>,
}

/// Derive the attendance view for a selection
pub fn attendance_view(dataset: &Dataset, selection: &Selection) -> AttendanceView {
    match selection {
        Selection::All => {
            let year_summaries = attendance::year_summaries(dataset);
            let has_data = year_summaries.iter().any(|y| y.has_data);
            AttendanceView {
                selection: selection.clone(),
                total_students: dataset.students.len(),
                avg_attendance: attendance::overall_attendance(dataset),
                has_attendance_data: has_data,
                days_tracked: 0,
                year_summaries,
                section_summaries: Vec::new(),
                daily: Vec::new(),
                roster: Vec::new(),
            }
        }
        Selection::Year(year) => {
            let section_summaries = attendance::section_summaries(dataset, year);
            let tracked: Vec<&SectionAttendanceSummary> =
                section_summaries.iter().filter(|s| s.has_data).collect();
            let days_tracked = tracked.iter().map(|s| s.days).max().unwrap_or(0);
            let avg_attendance = attendance::year_summaries(dataset)
                .into_iter()
                .find(|y| &y.year == year)
                .map(|y| y.avg_attendance)
                .unwrap_or(0.0);
            AttendanceView {
                selection: selection.clone(),
                total_students: dataset.students_in_year(year).len(),
                avg_attendance,
                has_attendance_data: !tracked.is_empty(),
                days_tracked,
                year_summaries: Vec::new(),
                section_summaries,
                daily: Vec::new(),
                roster: Vec::new(),
            }
        }
        Selection::YearSection { year, section } => {
            let total_students = dataset.students_in_section(section).len();
            let mapped = sections::has_attendance_data(section, year);
            let batch = if mapped {
                dataset.batch_for_section(section)
            } else {
                None
            };

            let (daily, roster) = match batch {
                Some(b) => (
                    attendance::daily_attendance(&b.days, total_students),
                    attendance::section_roster(dataset, section),
                ),
                None => (Vec::new(), Vec::new()),
            };

            AttendanceView {
                selection: selection.clone(),
                total_students,
                avg_attendance: attendance::average_attendance(&daily),
                has_attendance_data: !daily.is_empty(),
                days_tracked: daily.len(),
                year_summaries: Vec::new(),
                section_summaries: Vec::new(),
                daily,
                roster,
            }
        }
    }
}

/// Assessment aggregates for the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentView {
    pub selection: Selection,
    pub total_students: usize,
    pub stats: AssessmentStats,
    pub year_summaries: Vec<YearAssessmentSummary>,
    pub section_summaries: Vec<SectionAssessmentSummary>,
    pub top_performers: Vec<StudentRecord>,
}

/// How many top performers the section view lists
pub const TOP_PERFORMER_COUNT: usize = 5;

/// Derive the assessment view for a selection
pub fn assessment_view(dataset: &Dataset, selection: &Selection) -> AssessmentView {
    let filtered = filter_students(&dataset.students, selection);
    let stats = assessment::aggregate(filtered.iter().copied());

    let (year_summaries, section_summaries, top_performers) = match selection {
        Selection::All => (
            assessment::year_summaries(&dataset.students),
            Vec::new(),
            Vec::new(),
        ),
        Selection::Year(year) => (
            Vec::new(),
            assessment::section_summaries(&dataset.students, Some(year)),
            Vec::new(),
        ),
        Selection::YearSection { .. } => (
            Vec::new(),
            Vec::new(),
            assessment::top_performers(filtered.iter().copied(), TOP_PERFORMER_COUNT)
                .into_iter()
                .cloned()
                .collect(),
        ),
    };

    AssessmentView {
        selection: selection.clone(),
        total_students: filtered.len(),
        stats,
        year_summaries,
        section_summaries,
        top_performers,
    }
}
