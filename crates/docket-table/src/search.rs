//! Free-text search across every field of a record

use docket_core::Record;

/// Keep the records where at least one field value contains `term`
/// (case-insensitive). An empty term returns the input unchanged.
pub fn search<'a, R: Record>(records: &[&'a R], term: &str) -> Vec<&'a R> {
    let term = term.trim();
    if term.is_empty() {
        return records.to_vec();
    }
    let needle = term.to_lowercase();
    records
        .iter()
        .copied()
        .filter(|record| record_matches(*record, &needle))
        .collect()
}

/// Whether any field of `record` contains the already-lowercased `needle`.
///
/// Missing values render as the empty string.
pub fn record_matches<R: Record>(record: &R, needle: &str) -> bool {
    record
        .fields()
        .iter()
        .any(|(_, value)| value.to_string().to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_core::{DynamicRecord, Value};

    fn records() -> Vec<DynamicRecord> {
        vec![
            DynamicRecord::new(1)
                .with("title", "People v. Santos")
                .with("branch", "RTC 12"),
            DynamicRecord::new(2)
                .with("title", "Reyes v. Cruz")
                .with("remarks", Value::Null),
            DynamicRecord::new(3).with("title", "Estate of Lim"),
        ]
    }

    #[test]
    fn test_empty_term_returns_everything() {
        let records = records();
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        assert_eq!(search(&refs, "").len(), 3);
        assert_eq!(search(&refs, "   ").len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = records();
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        let found = search(&refs, "SANTOS");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id().to_string(), "1");
    }

    #[test]
    fn test_search_matches_any_field_including_id() {
        let records = records();
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        assert_eq!(search(&refs, "rtc").len(), 1);
        assert_eq!(search(&refs, "3").len(), 1);
    }

    #[test]
    fn test_null_fields_do_not_match_or_panic() {
        let records = records();
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        assert!(search(&refs, "null").is_empty());
    }

    #[test]
    fn test_result_is_subset_in_input_order() {
        let records = records();
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        let found = search(&refs, "v.");
        let ids: Vec<String> = found.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
