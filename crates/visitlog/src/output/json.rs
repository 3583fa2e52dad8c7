//! JSON output formatting.

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use visitlog_core::visits::{DataPage, Visit, VisitKey};

    #[test]
    fn test_format_page_as_json() {
        let page = DataPage::new(vec![Visit::new("matt", "italy").with_count(2)], false);

        assert_eq!(
            format_json(&page),
            r#"{"values":[{"visitor":"matt","location":"italy","count":2}],"has_more_pages":false}"#
        );
    }

    #[test]
    fn test_format_deleted_key_as_json() {
        let key = VisitKey::new("matt", "utah");
        assert_eq!(format_json(&key), r#"{"visitor":"matt","location":"utah"}"#);
    }
}
