//! Section and batch label mappings
//!
//! Three small closed tables unify the naming schemes used across the two
//! datasets: roster section labels, raw attendance batch labels, and the
//! per-section register number bases that absentee roll numbers are derived
//! from. Keeping them in one place makes "unknown section" a detectable,
//! testable condition rather than scattered inline literals.

use crate::error::InsightError;

/// Mapping from a raw attendance batch label to its roster year and section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchMapping {
    /// Raw label used by the attendance dataset
    pub batch: &'static str,
    /// Academic year label used by the roster
    pub year: &'static str,
    /// Section label used by the roster
    pub section: &'static str,
}

/// Closed, ordered mapping of the ten attendance batches.
///
/// The declared order here is the canonical iteration order for every
/// derived view that walks batches, so output stays deterministic.
pub const BATCH_SECTIONS: [BatchMapping; 10] = [
    BatchMapping { batch: "2 BCOM A", year: "1st Year", section: "1BCOM A" },
    BatchMapping { batch: "2 BCOM B", year: "1st Year", section: "1BCOM B" },
    BatchMapping { batch: "2 BCOM C", year: "1st Year", section: "1BCOM C" },
    BatchMapping { batch: "2 BCOM D", year: "1st Year", section: "1BCOM D" },
    BatchMapping { batch: "2 BCOM F", year: "1st Year", section: "1BCOM E" },
    BatchMapping { batch: "4 BCOM A", year: "2nd Year", section: "1BCOMA&T" },
    BatchMapping { batch: "4 BCOM B", year: "2nd Year", section: "1BCOMAFA" },
    BatchMapping { batch: "4 BCOM C", year: "2nd Year", section: "1BCOMF&I A" },
    BatchMapping { batch: "4 BCOM D", year: "2nd Year", section: "1BCOMF&I B" },
    BatchMapping { batch: "4 BCOM F", year: "2nd Year", section: "1BCOMSF" },
];

/// Closed table of register number bases: roll = register number - base
pub const SECTION_ROLL_BASES: [(&str, i64); 10] = [
    ("1BCOM A", 2_510_100),
    ("1BCOM B", 2_510_200),
    ("1BCOM C", 2_510_300),
    ("1BCOM D", 2_510_400),
    ("1BCOM E", 2_510_500),
    ("1BCOMA&T", 2_511_000),
    ("1BCOMAFA", 2_511_100),
    ("1BCOMF&I A", 2_511_300),
    ("1BCOMF&I B", 2_511_400),
    ("1BCOMSF", 2_511_500),
];

/// Look up the register number base for a section
pub fn roll_base(section: &str) -> Option<i64> {
    SECTION_ROLL_BASES
        .iter()
        .find(|(s, _)| *s == section)
        .map(|(_, base)| *base)
}

/// Derive a roll number from a registration number and section.
///
/// The numeric value is taken from the leading digit prefix, so register
/// numbers carrying a suffix (e.g. "2510101A") still resolve. Returns 0
/// when no leading digits exist or the section has no entry in the base
/// table. No bounds checking is performed against the batch's actual roll
/// range; callers must tolerate rolls that never appear in any absentee
/// list (those students are simply present) and treat any result <= 0 as
/// unresolvable.
pub fn resolve_roll(reg_no: &str, section: &str) -> i64 {
    let trimmed = reg_no.trim();
    let digits = match trimmed.find(|c: char| !c.is_ascii_digit()) {
        Some(end) => &trimmed[..end],
        None => trimmed,
    };
    let num: i64 = match digits.parse() {
        Ok(n) => n,
        Err(_) => return 0,
    };

    match roll_base(section) {
        Some(base) => num - base,
        None => 0,
    }
}

/// Find the batch mapping for a raw batch label
pub fn mapping_for_batch(batch: &str) -> Option<&'static BatchMapping> {
    BATCH_SECTIONS.iter().find(|m| m.batch == batch)
}

/// Find the batch mapping for a roster section label
pub fn mapping_for_section(section: &str) -> Option<&'static BatchMapping> {
    BATCH_SECTIONS.iter().find(|m| m.section == section)
}

/// Roster section for a raw batch label
pub fn section_for_batch(batch: &str) -> Option<&'static str> {
    mapping_for_batch(batch).map(|m| m.section)
}

/// Raw batch label for a roster section
pub fn batch_for_section(section: &str) -> Option<&'static str> {
    mapping_for_section(section).map(|m| m.batch)
}

/// Whether session data exists for a section within a year.
///
/// Sections absent from the mapping have no attendance data at all; that is
/// a distinct state from "zero absentees" and callers must check it before
/// asking for group or per-student attendance.
pub fn has_attendance_data(section: &str, year: &str) -> bool {
    BATCH_SECTIONS
        .iter()
        .any(|m| m.section == section && m.year == year)
}

/// Verify a dataset's batch labels against the closed tables.
///
/// Every label must map to a section, and that section must have a roll
/// base, so load time is the last point where a misnamed batch can be
/// caught; afterwards unknown sections degrade to the 0 sentinel.
pub fn verify_batches<'a, I>(labels: I) -> Result<(), InsightError>
where
    I: IntoIterator<Item = &'a str>,
{
    for label in labels {
        let mapping = mapping_for_batch(label)
            .ok_or_else(|| InsightError::UnknownBatch(label.to_string()))?;
        if roll_base(mapping.section).is_none() {
            return Err(InsightError::MissingRollBase(mapping.section.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_roll_known_section() {
        assert_eq!(resolve_roll("2510101", "1BCOM A"), 1);
        assert_eq!(resolve_roll("2510103", "1BCOM A"), 3);
        assert_eq!(resolve_roll("2511592", "1BCOMSF"), 92);
    }

    #[test]
    fn test_resolve_roll_unknown_section_is_zero() {
        // Sections outside the closed table never produce a roll
        assert_eq!(resolve_roll("2510101", "1BCOM Z"), 0);
        assert_eq!(resolve_roll("2510101", ""), 0);
        assert_eq!(resolve_roll("9999999", "3BSC A"), 0);
    }

    #[test]
    fn test_resolve_roll_unparsable_reg_no_is_zero() {
        assert_eq!(resolve_roll("not-a-number", "1BCOM A"), 0);
        assert_eq!(resolve_roll("", "1BCOM A"), 0);
    }

    #[test]
    fn test_resolve_roll_takes_leading_digit_prefix() {
        // Register numbers with a trailing suffix resolve from their digits
        assert_eq!(resolve_roll("2510101A", "1BCOM A"), 1);
        assert_eq!(resolve_roll("2510105 rev2", "1BCOM A"), 5);
        assert_eq!(resolve_roll(" 2510103\n", "1BCOM A"), 3);
        // A non-digit prefix leaves nothing to parse
        assert_eq!(resolve_roll("A2510101", "1BCOM A"), 0);
    }

    #[test]
    fn test_resolve_roll_below_base_is_nonpositive() {
        // Register numbers below the base resolve to a nonpositive roll,
        // which callers treat as unresolvable
        assert!(resolve_roll("2510050", "1BCOM A") <= 0);
    }

    #[test]
    fn test_batch_section_roundtrip() {
        for m in &BATCH_SECTIONS {
            assert_eq!(section_for_batch(m.batch), Some(m.section));
            assert_eq!(batch_for_section(m.section), Some(m.batch));
        }
    }

    #[test]
    fn test_every_mapped_section_has_roll_base() {
        for m in &BATCH_SECTIONS {
            assert!(roll_base(m.section).is_some(), "no base for {}", m.section);
        }
    }

    #[test]
    fn test_has_attendance_data_requires_matching_year() {
        assert!(has_attendance_data("1BCOM A", "1st Year"));
        assert!(!has_attendance_data("1BCOM A", "2nd Year"));
        assert!(!has_attendance_data("1BCOM Z", "1st Year"));
    }

    #[test]
    fn test_verify_batches_accepts_known_labels() {
        let labels = BATCH_SECTIONS.iter().map(|m| m.batch);
        assert!(verify_batches(labels).is_ok());
    }

    #[test]
    fn test_verify_batches_rejects_unknown_label() {
        let result = verify_batches(["2 BCOM A", "5 BCOM X"]);
        assert!(matches!(result, Err(InsightError::UnknownBatch(ref l)) if l == "5 BCOM X"));
    }
}
