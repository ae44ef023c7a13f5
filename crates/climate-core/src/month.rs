use crate::error::{ReportError, Result};

/// The twelve recognised month abbreviations, in calendar order.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Rewrite a three-letter English month abbreviation to its two-digit
/// ordinal code (`"Jan"` → `"01"`, …, `"Dec"` → `"12"`).
///
/// The mapping is case-sensitive and total over exactly the twelve
/// abbreviations above; any other value fails with
/// [`ReportError::UnknownMonth`] so a bad month label surfaces at the row
/// being processed instead of becoming a null downstream.
pub fn month_code(abbr: &str) -> Result<&'static str> {
    match abbr {
        "Jan" => Ok("01"),
        "Feb" => Ok("02"),
        "Mar" => Ok("03"),
        "Apr" => Ok("04"),
        "May" => Ok("05"),
        "Jun" => Ok("06"),
        "Jul" => Ok("07"),
        "Aug" => Ok("08"),
        "Sep" => Ok("09"),
        "Oct" => Ok("10"),
        "Nov" => Ok("11"),
        "Dec" => Ok("12"),
        other => Err(ReportError::UnknownMonth(other.to_string())),
    }
}

/// Month abbreviation for a two-digit code, for chart labels.
///
/// Returns `None` for anything outside `"01".."12"`.
pub fn month_name(code: &str) -> Option<&'static str> {
    let index: usize = code.parse().ok()?;
    if (1..=12).contains(&index) {
        Some(MONTH_ABBREVIATIONS[index - 1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_twelve_map_to_unique_codes() {
        let codes: Vec<&str> = MONTH_ABBREVIATIONS
            .iter()
            .map(|m| month_code(m).unwrap())
            .collect();
        let unique: HashSet<&&str> = codes.iter().collect();
        assert_eq!(unique.len(), 12);
        for code in &codes {
            assert_eq!(code.len(), 2);
            let n: u32 = code.parse().unwrap();
            assert!((1..=12).contains(&n));
        }
    }

    #[test]
    fn test_calendar_order() {
        assert_eq!(month_code("Jan").unwrap(), "01");
        assert_eq!(month_code("Jun").unwrap(), "06");
        assert_eq!(month_code("Dec").unwrap(), "12");
    }

    #[test]
    fn test_unrecognised_value_is_lookup_error() {
        for bad in ["Jann", "January", "", "Des", "01"] {
            let err = month_code(bad).unwrap_err();
            assert!(matches!(err, ReportError::UnknownMonth(ref v) if v == bad));
        }
    }

    #[test]
    fn test_mapping_is_case_sensitive() {
        assert!(month_code("jan").is_err());
        assert!(month_code("JAN").is_err());
        assert!(month_code("dec").is_err());
    }

    #[test]
    fn test_month_name_round_trip() {
        for abbr in MONTH_ABBREVIATIONS {
            let code = month_code(abbr).unwrap();
            assert_eq!(month_name(code), Some(abbr));
        }
    }

    #[test]
    fn test_month_name_rejects_out_of_range() {
        assert_eq!(month_name("00"), None);
        assert_eq!(month_name("13"), None);
        assert_eq!(month_name("abc"), None);
    }
}
