//! Core types for the FRSP Insight derivation layer
//!
//! This module defines the two immutable input tables (student roster with
//! assessment scores, session-level attendance batches) and the derived
//! structures the aggregators produce for the presentation layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A student roster row with assessment scores.
///
/// Sourced wholesale from the assessments dataset and never mutated.
/// `total` is `practical + theory` when the student was assessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Display name; missing for some roster rows
    #[serde(default)]
    pub name: Option<String>,
    /// Registration number, the canonical student identifier
    pub reg_no: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Academic year label (e.g. "1st Year")
    pub year: String,
    /// Section label (e.g. "1BCOM A")
    pub section: String,
    #[serde(default)]
    pub gender: Option<String>,
    /// Practical score, 0-20
    pub practical: f64,
    /// Theory score, 0-30
    pub theory: f64,
    /// Total score, 0-50
    pub total: f64,
    /// True only if the student has a recorded, nonzero assessment
    pub has_assessment: bool,
}

/// One class session within an attendance day.
///
/// Absentees are recorded as roll numbers, which are only meaningful
/// relative to the section whose base offset produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Session time label (e.g. "07:00")
    pub time: String,
    /// Roll numbers marked absent in this session
    pub absent: Vec<i64>,
    /// Redundant absentee count carried by the source data
    pub absent_count: u32,
}

/// An ordered sequence of sessions held on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDay {
    pub date: NaiveDate,
    pub sessions: Vec<SessionRecord>,
}

/// Section-level attendance container keyed by a raw batch label.
///
/// Batch labels use a naming scheme distinct from the roster's section
/// labels; [`crate::sections::BATCH_SECTIONS`] unifies the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceBatch {
    /// Raw batch label (e.g. "2 BCOM A")
    pub batch: String,
    pub days: Vec<AttendanceDay>,
}

/// Ordered map of batch label to attendance batch, as loaded from the
/// attendance dataset
pub type AttendanceTable = BTreeMap<String, AttendanceBatch>;

/// Group attendance for one day, derived from session absentee counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAttendance {
    pub date: NaiveDate,
    /// Day attendance percentage: (students - avg absent) / students * 100
    pub attendance_pct: f64,
    /// Average absentees per session, rounded to a whole student for display
    pub absent: u32,
    /// Sessions held that day
    pub session_count: u32,
}

/// Per-day presence breakdown for a single student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPresence {
    pub present: u32,
    pub absent: u32,
    pub total: u32,
}

/// Session tally for a single roll number across a batch.
///
/// Serializes camelCase so that flattening into [`StudentAttendance`]
/// yields a single uniformly-cased JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTally {
    pub total_sessions: u32,
    pub present_sessions: u32,
    pub absent_sessions: u32,
    /// present / total * 100; defaults to 100 when no sessions exist
    pub attendance_rate: f64,
    /// Per-date breakdown in calendar order
    pub days: BTreeMap<NaiveDate, DayPresence>,
}

/// A roster row joined with its per-student attendance tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendance {
    pub reg_no: String,
    pub name: Option<String>,
    /// Roll number derived from the registration number; <= 0 means the
    /// roll could not be resolved for this section
    pub roll: i64,
    #[serde(flatten)]
    pub tally: SessionTally,
}

/// One bucket of the fixed five-bucket total-score histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Inclusive range label (e.g. "41-50")
    pub range: String,
    pub count: usize,
}

/// Aggregate statistics over a set of assessed students
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentStats {
    pub avg_total: f64,
    pub avg_practical: f64,
    pub avg_theory: f64,
    /// Highest total in the set; 0 when the set is empty
    pub highest: f64,
    /// Percentage of the set with total >= 25
    pub pass_rate: f64,
    /// Number of assessed records the stats were computed over
    pub assessed_count: usize,
    /// All five buckets are always present, zero counts included
    pub histogram: Vec<HistogramBucket>,
}

/// One (attendance rate, score) observation for the correlation view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    /// Display name, falling back to the registration number
    pub name: String,
    pub attendance_rate: f64,
    pub score: f64,
    pub section: String,
}

/// Joined attendance/score pairs with their Pearson coefficient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub pairs: Vec<CorrelationPair>,
    /// Pearson product-moment coefficient; 0 when fewer than 2 pairs exist
    /// or either axis has zero variance
    pub correlation: f64,
}

/// Mean score within one attendance band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceScoreGroup {
    /// Band label (e.g. "70-80%")
    pub range: String,
    pub avg_score: f64,
    pub count: usize,
}

/// Year-level attendance rollup shown on the overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearAttendanceSummary {
    pub year: String,
    pub total_students: usize,
    pub sections: usize,
    pub sections_with_data: usize,
    pub avg_attendance: f64,
    pub has_data: bool,
}

/// Section-level attendance rollup for a selected year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAttendanceSummary {
    pub section: String,
    pub total_students: usize,
    pub avg_attendance: f64,
    /// Days of session data backing the average
    pub days: usize,
    pub has_data: bool,
}

/// Year-level assessment rollup shown on the overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearAssessmentSummary {
    pub year: String,
    pub total: usize,
    pub assessed: usize,
    pub avg_score: f64,
}

/// Section-level assessment rollup for a selected year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAssessmentSummary {
    pub section: String,
    pub year: String,
    pub total: usize,
    pub assessed: usize,
    pub avg_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_attendance_serializes_one_casing() {
        let record = StudentAttendance {
            reg_no: "2510101".to_string(),
            name: Some("Asha R".to_string()),
            roll: 1,
            tally: SessionTally {
                total_sessions: 4,
                present_sessions: 3,
                absent_sessions: 1,
                attendance_rate: 75.0,
                days: BTreeMap::new(),
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("regNo"));
        assert!(object.contains_key("totalSessions"));
        assert!(object.contains_key("attendanceRate"));
        assert!(!object.contains_key("total_sessions"));
        assert!(!object.contains_key("attendance_rate"));
    }
}
