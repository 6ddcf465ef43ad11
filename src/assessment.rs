//! Assessment aggregation
//!
//! Statistics over assessed students: means, extrema, pass rate and the
//! fixed five-bucket score histogram. Only records with a recorded, nonzero
//! assessment participate; everything else is roster noise for these views.
//!
//! Empty input yields all-zero stats by policy. The presentation layer
//! renders 0 rather than NaN, so the mean of an empty set is defined as 0
//! here and must stay that way.

use crate::types::{
    AssessmentStats, HistogramBucket, SectionAssessmentSummary, StudentRecord,
    YearAssessmentSummary,
};

/// Passing threshold: half of the 50-point maximum
pub const PASS_MARK: f64 = 25.0;

/// Fixed histogram partition of the total score, inclusive on both ends
pub const SCORE_BUCKETS: [(f64, f64, &str); 5] = [
    (0.0, 10.0, "0-10"),
    (11.0, 20.0, "11-20"),
    (21.0, 30.0, "21-30"),
    (31.0, 40.0, "31-40"),
    (41.0, 50.0, "41-50"),
];

/// Whether a record counts as assessed for aggregation purposes
pub fn is_assessed(record: &StudentRecord) -> bool {
    record.has_assessment && record.total > 0.0
}

/// Aggregate statistics over the assessed subset of `records`.
///
/// Unassessed records are filtered out here, so callers can pass raw roster
/// slices. All five histogram buckets appear in the output even at zero.
pub fn aggregate<'a, I>(records: I) -> AssessmentStats
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let assessed: Vec<&StudentRecord> = records.into_iter().filter(|r| is_assessed(r)).collect();

    let histogram = histogram(&assessed);

    if assessed.is_empty() {
        return AssessmentStats {
            avg_total: 0.0,
            avg_practical: 0.0,
            avg_theory: 0.0,
            highest: 0.0,
            pass_rate: 0.0,
            assessed_count: 0,
            histogram,
        };
    }

    let n = assessed.len() as f64;
    let avg_total = assessed.iter().map(|r| r.total).sum::<f64>() / n;
    let avg_practical = assessed.iter().map(|r| r.practical).sum::<f64>() / n;
    let avg_theory = assessed.iter().map(|r| r.theory).sum::<f64>() / n;
    let highest = assessed.iter().map(|r| r.total).fold(0.0, f64::max);
    let passed = assessed.iter().filter(|r| r.total >= PASS_MARK).count();
    let pass_rate = passed as f64 / n * 100.0;

    AssessmentStats {
        avg_total,
        avg_practical,
        avg_theory,
        highest,
        pass_rate,
        assessed_count: assessed.len(),
        histogram,
    }
}

fn histogram(assessed: &[&StudentRecord]) -> Vec<HistogramBucket> {
    SCORE_BUCKETS
        .iter()
        .map(|(min, max, label)| HistogramBucket {
            range: (*label).to_string(),
            count: assessed
                .iter()
                .filter(|r| r.total >= *min && r.total <= *max)
                .count(),
        })
        .collect()
}

/// The `n` highest-scoring assessed records, best first
pub fn top_performers<'a, I>(records: I, n: usize) -> Vec<&'a StudentRecord>
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let mut assessed: Vec<&StudentRecord> =
        records.into_iter().filter(|r| is_assessed(r)).collect();
    assessed.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.reg_no.cmp(&b.reg_no))
    });
    assessed.truncate(n);
    assessed
}

/// Per-year assessed counts and mean totals, sorted by year
pub fn year_summaries(students: &[StudentRecord]) -> Vec<YearAssessmentSummary> {
    crate::selector::years(students)
        .into_iter()
        .map(|year| {
            let year_students: Vec<&StudentRecord> =
                students.iter().filter(|s| s.year == year).collect();
            let assessed: Vec<&StudentRecord> = year_students
                .iter()
                .copied()
                .filter(|s| is_assessed(s))
                .collect();
            YearAssessmentSummary {
                total: year_students.len(),
                assessed: assessed.len(),
                avg_score: mean_total(&assessed),
                year,
            }
        })
        .collect()
}

/// Per-section assessed counts and mean totals, optionally narrowed to one
/// year, sorted by section label
pub fn section_summaries(
    students: &[StudentRecord],
    year: Option<&str>,
) -> Vec<SectionAssessmentSummary> {
    let mut section_labels: Vec<String> = students
        .iter()
        .filter(|s| year.map_or(true, |y| s.year == y))
        .map(|s| s.section.clone())
        .collect();
    section_labels.sort();
    section_labels.dedup();

    section_labels
        .into_iter()
        .map(|section| {
            let section_students: Vec<&StudentRecord> =
                students.iter().filter(|s| s.section == section).collect();
            let assessed: Vec<&StudentRecord> = section_students
                .iter()
                .copied()
                .filter(|s| is_assessed(s))
                .collect();
            SectionAssessmentSummary {
                year: section_students
                    .first()
                    .map(|s| s.year.clone())
                    .unwrap_or_default(),
                total: section_students.len(),
                assessed: assessed.len(),
                avg_score: mean_total(&assessed),
                section,
            }
        })
        .collect()
}

fn mean_total(assessed: &[&StudentRecord]) -> f64 {
    if assessed.is_empty() {
        return 0.0;
    }
    assessed.iter().map(|r| r.total).sum::<f64>() / assessed.len() as f64
}
