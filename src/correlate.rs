//! Attendance/score correlation
//!
//! Joins per-student attendance rates with assessment totals across every
//! section that has a mapped attendance batch, then computes the Pearson
//! product-moment coefficient over the joined pairs.
//!
//! Output order is deterministic: batches in the canonical mapping order,
//! students sorted by registration number within each section.

use crate::assessment::is_assessed;
use crate::attendance::student_attendance;
use crate::sections::{self, BATCH_SECTIONS};
use crate::types::{
    AttendanceScoreGroup, AttendanceTable, CorrelationPair, CorrelationResult, StudentRecord,
};

/// Attendance bands for the score-by-attendance view: half-open
/// [min, max) percentages with a display label
pub const ATTENDANCE_BANDS: [(f64, f64, &str); 4] = [
    (0.0, 70.0, "< 70%"),
    (70.0, 80.0, "70-80%"),
    (80.0, 90.0, "80-90%"),
    (90.0, 101.0, "90-100%"),
];

/// Join attendance rates with assessment totals and correlate them.
///
/// One pair is emitted per assessed student whose roll resolves (> 0) in a
/// section with attendance data. Fewer than two pairs, or zero variance on
/// either axis, yields a coefficient of 0 rather than NaN.
pub fn correlate(students: &[StudentRecord], attendance: &AttendanceTable) -> CorrelationResult {
    let mut pairs = Vec::new();

    for mapping in &BATCH_SECTIONS {
        let batch = match attendance.get(mapping.batch) {
            Some(b) => b,
            None => continue,
        };

        let mut section_students: Vec<&StudentRecord> = students
            .iter()
            .filter(|s| s.section == mapping.section && is_assessed(s))
            .collect();
        section_students.sort_by(|a, b| a.reg_no.cmp(&b.reg_no));

        for student in section_students {
            let roll = sections::resolve_roll(&student.reg_no, mapping.section);
            if roll <= 0 {
                continue;
            }

            let tally = student_attendance(&batch.days, roll);
            pairs.push(CorrelationPair {
                name: student
                    .name
                    .clone()
                    .unwrap_or_else(|| student.reg_no.clone()),
                attendance_rate: tally.attendance_rate,
                score: student.total,
                section: mapping.section.to_string(),
            });
        }
    }

    let correlation = pearson(
        pairs
            .iter()
            .map(|p| (p.attendance_rate, p.score)),
    );

    CorrelationResult { pairs, correlation }
}

/// Pearson product-moment coefficient over (x, y) observations.
///
/// Defined as 0 for fewer than two observations or a zero denominator.
pub fn pearson<I>(observations: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let obs: Vec<(f64, f64)> = observations.into_iter().collect();
    if obs.len() < 2 {
        return 0.0;
    }

    let n = obs.len() as f64;
    let sum_x: f64 = obs.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = obs.iter().map(|(_, y)| y).sum();
    let sum_xy: f64 = obs.iter().map(|(x, y)| x * y).sum();
    let sum_x2: f64 = obs.iter().map(|(x, _)| x * x).sum();
    let sum_y2: f64 = obs.iter().map(|(_, y)| y * y).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Mean score within each attendance band; empty bands report 0
pub fn score_by_attendance(pairs: &[CorrelationPair]) -> Vec<AttendanceScoreGroup> {
    ATTENDANCE_BANDS
        .iter()
        .map(|(min, max, label)| {
            let in_band: Vec<&CorrelationPair> = pairs
                .iter()
                .filter(|p| p.attendance_rate >= *min && p.attendance_rate < *max)
                .collect();
            let avg_score = if in_band.is_empty() {
                0.0
            } else {
                in_band.iter().map(|p| p.score).sum::<f64>() / in_band.len() as f64
            };
            AttendanceScoreGroup {
                range: (*label).to_string(),
                avg_score,
                count: in_band.len(),
            }
        })
        .collect()
}
