//! Session aggregation
//!
//! Two pure operation modes over ordered attendance days:
//! - group-day mode: per-day attendance percentages for a whole group,
//!   derived from the session absentee counts
//! - per-student mode: session tallies for a single roll number
//!
//! The two modes use mathematically different rates on purpose. Group views
//! use `(students - avg absent) / students`; per-student views (and the
//! correlation engine) use `present sessions / total sessions`.

use crate::dataset::Dataset;
use crate::sections;
use crate::types::{
    AttendanceDay, DayAttendance, DayPresence, SectionAttendanceSummary, SessionTally,
    StudentAttendance, YearAttendanceSummary,
};
use std::collections::BTreeMap;

/// Group-day mode: one record per day for a group of `student_count`
/// students.
///
/// Days without sessions, or a zero-sized group, yield 0% rather than
/// dividing by zero; the caller decides how to present "no data".
pub fn daily_attendance(days: &[AttendanceDay], student_count: usize) -> Vec<DayAttendance> {
    days.iter()
        .map(|day| {
            let session_count = day.sessions.len() as u32;
            if session_count == 0 || student_count == 0 {
                return DayAttendance {
                    date: day.date,
                    attendance_pct: 0.0,
                    absent: 0,
                    session_count,
                };
            }

            let total_absent: u32 = day.sessions.iter().map(|s| s.absent_count).sum();
            let avg_absent = f64::from(total_absent) / f64::from(session_count);
            let attendance_pct =
                (student_count as f64 - avg_absent) / student_count as f64 * 100.0;

            DayAttendance {
                date: day.date,
                attendance_pct,
                absent: avg_absent.round() as u32,
                session_count,
            }
        })
        .collect()
}

/// Mean of per-day attendance percentages; 0 for an empty range
pub fn average_attendance(daily: &[DayAttendance]) -> f64 {
    if daily.is_empty() {
        return 0.0;
    }
    daily.iter().map(|d| d.attendance_pct).sum::<f64>() / daily.len() as f64
}

/// Per-student mode: session tally for one roll number across a batch.
///
/// A roll that never appears in an absentee list counts as present in every
/// session. With zero sessions the rate defaults to 100 (vacuous truth).
pub fn student_attendance(days: &[AttendanceDay], roll: i64) -> SessionTally {
    let mut total_sessions = 0u32;
    let mut absent_sessions = 0u32;
    let mut day_breakdown = BTreeMap::new();

    for day in days {
        let day_total = day.sessions.len() as u32;
        let day_absent = day
            .sessions
            .iter()
            .filter(|s| s.absent.contains(&roll))
            .count() as u32;

        day_breakdown.insert(
            day.date,
            DayPresence {
                present: day_total - day_absent,
                absent: day_absent,
                total: day_total,
            },
        );

        total_sessions += day_total;
        absent_sessions += day_absent;
    }

    let present_sessions = total_sessions - absent_sessions;
    let attendance_rate = if total_sessions > 0 {
        f64::from(present_sessions) / f64::from(total_sessions) * 100.0
    } else {
        100.0
    };

    SessionTally {
        total_sessions,
        present_sessions,
        absent_sessions,
        attendance_rate,
        days: day_breakdown,
    }
}

/// Per-student tallies for every student of a section, sorted by
/// registration number.
///
/// Returns an empty roster when the section has no mapped batch in the
/// dataset; callers must check for attendance availability before treating
/// the result as "everyone absent".
pub fn section_roster(dataset: &Dataset, section: &str) -> Vec<StudentAttendance> {
    let batch = match dataset.batch_for_section(section) {
        Some(b) => b,
        None => return Vec::new(),
    };

    let mut students = dataset.students_in_section(section);
    students.sort_by(|a, b| a.reg_no.cmp(&b.reg_no));

    students
        .into_iter()
        .map(|student| {
            let roll = sections::resolve_roll(&student.reg_no, &student.section);
            StudentAttendance {
                reg_no: student.reg_no.clone(),
                name: student.name.clone(),
                roll,
                tally: student_attendance(&batch.days, roll),
            }
        })
        .collect()
}

/// Year-level rollups across every mapped batch present in the dataset
pub fn year_summaries(dataset: &Dataset) -> Vec<YearAttendanceSummary> {
    crate::selector::years(&dataset.students)
        .into_iter()
        .map(|year| {
            let year_students = dataset.students_in_year(&year);
            let year_sections = unique_sections(&year_students);

            let mut attendance_sum = 0.0;
            let mut days_count = 0usize;
            let mut sections_with_data = 0usize;

            for section in &year_sections {
                if !sections::has_attendance_data(section, &year) {
                    continue;
                }
                let batch = match dataset.batch_for_section(section) {
                    Some(b) => b,
                    None => continue,
                };
                sections_with_data += 1;
                let count = dataset.students_in_section(section).len();
                for day in daily_attendance(&batch.days, count) {
                    attendance_sum += day.attendance_pct;
                    days_count += 1;
                }
            }

            YearAttendanceSummary {
                total_students: year_students.len(),
                sections: year_sections.len(),
                sections_with_data,
                avg_attendance: if days_count > 0 {
                    attendance_sum / days_count as f64
                } else {
                    0.0
                },
                has_data: sections_with_data > 0,
                year,
            }
        })
        .collect()
}

/// Section-level rollups for one year, sorted by section label
pub fn section_summaries(dataset: &Dataset, year: &str) -> Vec<SectionAttendanceSummary> {
    let year_students = dataset.students_in_year(year);
    unique_sections(&year_students)
        .into_iter()
        .map(|section| {
            let total_students = dataset.students_in_section(&section).len();
            let batch = if sections::has_attendance_data(&section, year) {
                dataset.batch_for_section(&section)
            } else {
                None
            };

            let (avg_attendance, days, has_data) = match batch {
                Some(b) => {
                    let daily = daily_attendance(&b.days, total_students);
                    (average_attendance(&daily), daily.len(), true)
                }
                None => (0.0, 0, false),
            };

            SectionAttendanceSummary {
                section,
                total_students,
                avg_attendance,
                days,
                has_data,
            }
        })
        .collect()
}

/// Mean of per-day attendance percentages across every mapped batch in the
/// dataset, iterated in the canonical batch order
pub fn overall_attendance(dataset: &Dataset) -> f64 {
    let mut attendance_sum = 0.0;
    let mut days_count = 0usize;

    for mapping in &sections::BATCH_SECTIONS {
        let batch = match dataset.attendance.get(mapping.batch) {
            Some(b) => b,
            None => continue,
        };
        let count = dataset.students_in_section(mapping.section).len();
        for day in daily_attendance(&batch.days, count) {
            attendance_sum += day.attendance_pct;
            days_count += 1;
        }
    }

    if days_count > 0 {
        attendance_sum / days_count as f64
    } else {
        0.0
    }
}

fn unique_sections(students: &[&crate::types::StudentRecord]) -> Vec<String> {
    let mut sections: Vec<String> = students.iter().map(|s| s.section.clone()).collect();
    sections.sort();
    sections.dedup();
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionRecord;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn session(time: &str, absent: &[i64]) -> SessionRecord {
        SessionRecord {
            time: time.to_string(),
            absent: absent.to_vec(),
            absent_count: absent.len() as u32,
        }
    }

    fn make_days() -> Vec<AttendanceDay> {
        vec![
            AttendanceDay {
                date: date(20),
                sessions: vec![
                    session("07:00", &[1, 5]),
                    session("08:00", &[5]),
                    session("09:00", &[]),
                ],
            },
            AttendanceDay {
                date: date(21),
                sessions: vec![session("07:00", &[]), session("08:00", &[2])],
            },
        ]
    }

    #[test]
    fn test_daily_attendance_group_mode() {
        let daily = daily_attendance(&make_days(), 10);
        assert_eq!(daily.len(), 2);

        // Day 1: avg absent = (2 + 1 + 0) / 3 = 1, attendance = 90%
        assert!((daily[0].attendance_pct - 90.0).abs() < 1e-9);
        assert_eq!(daily[0].absent, 1);
        assert_eq!(daily[0].session_count, 3);

        // Day 2: avg absent = 0.5, attendance = 95%
        assert!((daily[1].attendance_pct - 95.0).abs() < 1e-9);
        assert_eq!(daily[1].absent, 1); // 0.5 rounds up for display
    }

    #[test]
    fn test_daily_attendance_zero_absentees_is_full() {
        let days = vec![
            AttendanceDay {
                date: date(20),
                sessions: vec![session("07:00", &[]), session("08:00", &[])],
            },
            AttendanceDay {
                date: date(21),
                sessions: vec![session("07:00", &[])],
            },
        ];
        for day in daily_attendance(&days, 40) {
            assert!((day.attendance_pct - 100.0).abs() < 1e-9);
            assert_eq!(day.absent, 0);
        }
    }

    #[test]
    fn test_daily_attendance_guards_division_by_zero() {
        let empty_day = vec![AttendanceDay { date: date(20), sessions: Vec::new() }];
        let daily = daily_attendance(&empty_day, 10);
        assert_eq!(daily[0].attendance_pct, 0.0);

        let daily = daily_attendance(&make_days(), 0);
        assert_eq!(daily[0].attendance_pct, 0.0);
        assert_eq!(daily[1].attendance_pct, 0.0);
    }

    #[test]
    fn test_average_attendance_empty_is_zero() {
        assert_eq!(average_attendance(&[]), 0.0);
    }

    #[test]
    fn test_student_attendance_tally() {
        let days = make_days();

        // Roll 5 was absent in 2 of 5 sessions
        let tally = student_attendance(&days, 5);
        assert_eq!(tally.total_sessions, 5);
        assert_eq!(tally.absent_sessions, 2);
        assert_eq!(tally.present_sessions, 3);
        assert!((tally.attendance_rate - 60.0).abs() < 1e-9);

        let day1 = tally.days[&date(20)];
        assert_eq!(day1, DayPresence { present: 1, absent: 2, total: 3 });
        let day2 = tally.days[&date(21)];
        assert_eq!(day2, DayPresence { present: 2, absent: 0, total: 2 });
    }

    #[test]
    fn test_student_attendance_unseen_roll_is_present() {
        let tally = student_attendance(&make_days(), 77);
        assert_eq!(tally.absent_sessions, 0);
        assert!((tally.attendance_rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_student_attendance_no_sessions_defaults_to_full() {
        // Vacuous-truth policy: zero sessions means a 100% rate
        let tally = student_attendance(&[], 1);
        assert_eq!(tally.total_sessions, 0);
        assert!((tally.attendance_rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_day_two_sessions_scenario() {
        // Three students of 1BCOM A; roll 1 absent in 1 of 2 sessions
        let days = vec![AttendanceDay {
            date: date(20),
            sessions: vec![session("07:00", &[1]), session("08:00", &[])],
        }];

        let roll1 = crate::sections::resolve_roll("2510101", "1BCOM A");
        let roll2 = crate::sections::resolve_roll("2510102", "1BCOM A");
        let roll3 = crate::sections::resolve_roll("2510103", "1BCOM A");
        assert_eq!((roll1, roll2, roll3), (1, 2, 3));

        assert!((student_attendance(&days, roll1).attendance_rate - 50.0).abs() < 1e-9);
        assert!((student_attendance(&days, roll2).attendance_rate - 100.0).abs() < 1e-9);
        assert!((student_attendance(&days, roll3).attendance_rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregators_are_idempotent() {
        let days = make_days();
        assert_eq!(daily_attendance(&days, 10), daily_attendance(&days, 10));
        assert_eq!(student_attendance(&days, 5), student_attendance(&days, 5));
    }
}
