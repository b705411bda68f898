use serde::Serialize;

use crate::model::{IndicatorYears, VendorRecord};

/// How incoming indicator data combines with what is already stored.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// Each imported year replaces that year's stored months wholesale.
    #[default]
    ReplaceYear,
    /// Only the imported (year, month) slots are overwritten.
    MergeMonths,
}

impl MergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReplaceYear => "year",
            Self::MergeMonths => "month",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "year" => Some(Self::ReplaceYear),
            "month" => Some(Self::MergeMonths),
            _ => None,
        }
    }
}

pub fn merge_indicators(
    existing: &IndicatorYears,
    incoming: &IndicatorYears,
    mode: MergeMode,
) -> IndicatorYears {
    let mut merged = existing.clone();
    for (year, months) in incoming {
        match mode {
            MergeMode::ReplaceYear => {
                merged.insert(*year, months.clone());
            }
            MergeMode::MergeMonths => {
                let stored = merged.entry(*year).or_default();
                for (month, record) in months {
                    stored.insert(*month, record.clone());
                }
            }
        }
    }
    merged
}

/// Vendor data is never merged: an import replaces the whole list.
pub fn replace_vendors(incoming: Vec<VendorRecord>) -> Vec<VendorRecord> {
    incoming
}

#[cfg(test)]
mod tests {
    use super::{MergeMode, merge_indicators, replace_vendors};
    use crate::model::{IndicatorRecord, IndicatorYears};

    fn record(itb: u32) -> IndicatorRecord {
        IndicatorRecord {
            itb,
            ..IndicatorRecord::default()
        }
    }

    fn years(entries: &[(i32, u8, u32)]) -> IndicatorYears {
        let mut value = IndicatorYears::new();
        for (year, month, itb) in entries {
            value.entry(*year).or_default().insert(*month, record(*itb));
        }
        value
    }

    #[test]
    fn replace_year_drops_months_absent_from_the_import() {
        let existing = years(&[(2023, 0, 1), (2024, 0, 5), (2024, 1, 6)]);
        let incoming = years(&[(2024, 2, 9)]);
        let merged = merge_indicators(&existing, &incoming, MergeMode::ReplaceYear);

        assert_eq!(merged, years(&[(2023, 0, 1), (2024, 2, 9)]));
    }

    #[test]
    fn merge_months_keeps_untouched_months() {
        let existing = years(&[(2024, 0, 5), (2024, 1, 6)]);
        let incoming = years(&[(2024, 1, 8), (2025, 0, 3)]);
        let merged = merge_indicators(&existing, &incoming, MergeMode::MergeMonths);

        assert_eq!(merged, years(&[(2024, 0, 5), (2024, 1, 8), (2025, 0, 3)]));
    }

    #[test]
    fn merging_the_same_import_twice_is_idempotent() {
        let existing = years(&[(2023, 4, 2)]);
        let incoming = years(&[(2024, 0, 5), (2024, 6, 1)]);
        for mode in [MergeMode::ReplaceYear, MergeMode::MergeMonths] {
            let once = merge_indicators(&existing, &incoming, mode);
            let twice = merge_indicators(&once, &incoming, mode);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn vendors_are_replaced_wholesale() {
        assert!(replace_vendors(Vec::new()).is_empty());
    }

    #[test]
    fn merge_mode_parses_cli_names() {
        assert_eq!(MergeMode::parse("year"), Some(MergeMode::ReplaceYear));
        assert_eq!(MergeMode::parse("Month"), Some(MergeMode::MergeMonths));
        assert_eq!(MergeMode::parse("week"), None);
        assert_eq!(MergeMode::default(), MergeMode::ReplaceYear);
    }
}
