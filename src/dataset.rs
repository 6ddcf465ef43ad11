//! Dataset loading
//!
//! This module is the input boundary: it parses the two pre-baked JSON
//! assets (student roster with assessments, attendance batches) into the
//! immutable in-memory tables every aggregator reads. Batch labels are
//! checked against the closed mapping tables at load time; after
//! construction nothing is ever mutated and all derivation functions take
//! shared borrows only.

use crate::error::InsightError;
use crate::sections;
use crate::types::{AttendanceBatch, AttendanceTable, StudentRecord};

/// The two immutable input tables
#[derive(Debug, Clone)]
pub struct Dataset {
    pub students: Vec<StudentRecord>,
    pub attendance: AttendanceTable,
}

impl Dataset {
    /// Build a dataset from already-parsed tables, verifying batch labels
    pub fn new(
        students: Vec<StudentRecord>,
        attendance: AttendanceTable,
    ) -> Result<Self, InsightError> {
        if students.is_empty() {
            return Err(InsightError::EmptyDataset("no student records".to_string()));
        }
        sections::verify_batches(attendance.keys().map(String::as_str))?;
        Ok(Self { students, attendance })
    }

    /// Parse the two JSON assets.
    ///
    /// `students_json` is an array of roster rows; `attendance_json` is an
    /// object keyed by raw batch label.
    pub fn from_json(students_json: &str, attendance_json: &str) -> Result<Self, InsightError> {
        let students: Vec<StudentRecord> = serde_json::from_str(students_json)?;
        let attendance: AttendanceTable = serde_json::from_str(attendance_json)?;
        Self::new(students, attendance)
    }

    /// Students enrolled in a section
    pub fn students_in_section(&self, section: &str) -> Vec<&StudentRecord> {
        self.students.iter().filter(|s| s.section == section).collect()
    }

    /// Students enrolled in a year
    pub fn students_in_year(&self, year: &str) -> Vec<&StudentRecord> {
        self.students.iter().filter(|s| s.year == year).collect()
    }

    /// Attendance batch for a roster section, if the section is mapped and
    /// the batch is present in the attendance table
    pub fn batch_for_section(&self, section: &str) -> Option<&AttendanceBatch> {
        let label = sections::batch_for_section(section)?;
        self.attendance.get(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STUDENTS_JSON: &str = r#"[
        {
            "name": "Asha R",
            "regNo": "2510101",
            "year": "1st Year",
            "section": "1BCOM A",
            "gender": "F",
            "practical": 18,
            "theory": 24,
            "total": 42,
            "hasAssessment": true
        },
        {
            "name": null,
            "regNo": "2510102",
            "year": "1st Year",
            "section": "1BCOM A",
            "practical": 0,
            "theory": 0,
            "total": 0,
            "hasAssessment": false
        }
    ]"#;

    const ATTENDANCE_JSON: &str = r#"{
        "2 BCOM A": {
            "batch": "2 BCOM A",
            "days": [
                {
                    "date": "2026-01-20",
                    "sessions": [
                        { "time": "07:00", "absent": [1, 5], "absentCount": 2 },
                        { "time": "08:00", "absent": [5], "absentCount": 1 }
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn test_from_json_parses_both_tables() {
        let dataset = Dataset::from_json(STUDENTS_JSON, ATTENDANCE_JSON).unwrap();

        assert_eq!(dataset.students.len(), 2);
        assert_eq!(dataset.students[0].reg_no, "2510101");
        assert_eq!(dataset.students[0].total, 42.0);
        assert!(dataset.students[0].has_assessment);
        assert_eq!(dataset.students[1].name, None);

        let batch = &dataset.attendance["2 BCOM A"];
        assert_eq!(batch.days.len(), 1);
        assert_eq!(batch.days[0].sessions[0].absent, vec![1, 5]);
        assert_eq!(batch.days[0].sessions[1].absent_count, 1);
    }

    #[test]
    fn test_from_json_rejects_unknown_batch() {
        let bad_attendance = r#"{
            "9 BCOM X": { "batch": "9 BCOM X", "days": [] }
        }"#;
        let result = Dataset::from_json(STUDENTS_JSON, bad_attendance);
        assert!(matches!(result, Err(InsightError::UnknownBatch(_))));
    }

    #[test]
    fn test_new_rejects_empty_roster() {
        let result = Dataset::new(Vec::new(), AttendanceTable::new());
        assert!(matches!(result, Err(InsightError::EmptyDataset(_))));
    }

    #[test]
    fn test_batch_for_section_lookup() {
        let dataset = Dataset::from_json(STUDENTS_JSON, ATTENDANCE_JSON).unwrap();
        assert!(dataset.batch_for_section("1BCOM A").is_some());
        // Mapped section whose batch is absent from this dataset
        assert!(dataset.batch_for_section("1BCOM B").is_none());
        // Unmapped section
        assert!(dataset.batch_for_section("1BCOM Z").is_none());
    }
}
