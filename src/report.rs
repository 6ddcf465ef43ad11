//! Report encoding
//!
//! Bundles the derived views for a selection into a versioned JSON payload
//! with producer and generation metadata, so downstream consumers can tell
//! which engine build produced a report. Numeric fields stay raw floats;
//! rounding and formatting belong to the consumer.

use crate::correlate;
use crate::dataset::Dataset;
use crate::error::InsightError;
use crate::selector::{self, AssessmentView, AttendanceView, Selection};
use crate::types::{AttendanceScoreGroup, CorrelationResult};
use crate::{INSIGHT_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Report producer metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Complete derived report for one selection
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub report_version: String,
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub selection: Selection,
    pub attendance: AttendanceView,
    pub assessment: AssessmentView,
    pub correlation: CorrelationResult,
    pub score_by_attendance: Vec<AttendanceScoreGroup>,
}

/// Report encoder carrying a per-process instance ID
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Derive every view for the selection and wrap it in a payload.
    ///
    /// The correlation section always spans the full dataset, matching the
    /// dashboard overview; the attendance/assessment sections follow the
    /// selection.
    pub fn encode(&self, dataset: &Dataset, selection: &Selection) -> ReportPayload {
        let correlation = correlate::correlate(&dataset.students, &dataset.attendance);
        let score_by_attendance = correlate::score_by_attendance(&correlation.pairs);

        ReportPayload {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: INSIGHT_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            generated_at_utc: Utc::now().to_rfc3339(),
            selection: selection.clone(),
            attendance: selector::attendance_view(dataset, selection),
            assessment: selector::assessment_view(dataset, selection),
            correlation,
            score_by_attendance,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        dataset: &Dataset,
        selection: &Selection,
    ) -> Result<String, InsightError> {
        let payload = self.encode(dataset, selection);
        serde_json::to_string_pretty(&payload).map_err(InsightError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AttendanceBatch, AttendanceDay, AttendanceTable, SessionRecord, StudentRecord,
    };
    use chrono::NaiveDate;

    fn make_dataset() -> Dataset {
        let students = vec![
            StudentRecord {
                name: Some("Asha R".to_string()),
                reg_no: "2510101".to_string(),
                email: None,
                year: "1st Year".to_string(),
                section: "1BCOM A".to_string(),
                gender: None,
                practical: 18.0,
                theory: 24.0,
                total: 42.0,
                has_assessment: true,
            },
            StudentRecord {
                name: None,
                reg_no: "2510102".to_string(),
                email: None,
                year: "1st Year".to_string(),
                section: "1BCOM A".to_string(),
                gender: None,
                practical: 10.0,
                theory: 12.0,
                total: 22.0,
                has_assessment: true,
            },
        ];

        let mut attendance = AttendanceTable::new();
        attendance.insert(
            "2 BCOM A".to_string(),
            AttendanceBatch {
                batch: "2 BCOM A".to_string(),
                days: vec![AttendanceDay {
                    date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
                    sessions: vec![SessionRecord {
                        time: "07:00".to_string(),
                        absent: vec![2],
                        absent_count: 1,
                    }],
                }],
            },
        );

        Dataset::new(students, attendance).unwrap()
    }

    #[test]
    fn test_encode_payload_shape() {
        let dataset = make_dataset();
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let json = encoder.encode_to_json(&dataset, &Selection::All).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["report_version"], REPORT_VERSION);
        assert_eq!(value["producer"]["name"], PRODUCER_NAME);
        assert_eq!(value["producer"]["instance_id"], "test-instance");
        assert_eq!(value["selection"], "all");
        assert_eq!(value["assessment"]["stats"]["assessed_count"], 2);
        assert_eq!(value["correlation"]["pairs"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["score_by_attendance"].as_array().unwrap().len(),
            4
        );
    }

    #[test]
    fn test_correlation_spans_full_dataset_regardless_of_selection() {
        let dataset = make_dataset();
        let encoder = ReportEncoder::new();

        let mut selection = Selection::default();
        selection.select_year("2nd Year");

        let payload = encoder.encode(&dataset, &selection);
        // No 2nd Year students, but the correlation still covers everyone
        assert_eq!(payload.assessment.total_students, 0);
        assert_eq!(payload.correlation.pairs.len(), 2);
    }

    #[test]
    fn test_pair_name_falls_back_to_reg_no() {
        let dataset = make_dataset();
        let payload = ReportEncoder::new().encode(&dataset, &Selection::All);
        assert_eq!(payload.correlation.pairs[0].name, "Asha R");
        assert_eq!(payload.correlation.pairs[1].name, "2510102");
    }
}
