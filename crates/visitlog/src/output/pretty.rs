//! Pretty output formatting.

use visitlog_core::visits::{DataPage, Visit, VisitKey, Visitor};

/// Format a visit count for display.
pub fn format_count(visit: &Visit) -> String {
    format!(
        "{} has visited {} {} time(s)",
        visit.visitor, visit.location, visit.count
    )
}

/// Format a page of visits for display.
///
/// The continuation flag is always shown, even on an empty page.
pub fn format_page(title: &str, page: &DataPage<Visit>) -> String {
    let mut output = format!("{} ({})\n", title, page.len());
    output.push_str(&"-".repeat(40));
    if page.is_empty() {
        output.push_str("\n  No visits found.");
    }
    for visit in &page.values {
        output.push_str(&format!("\n  {}", visit));
    }
    output.push_str(&format!(
        "\nMore pages: {}",
        if page.has_more_pages { "yes" } else { "no" }
    ));
    output
}

/// Format a visitor for display.
pub fn format_visitor(visitor: &Visitor) -> String {
    format!(
        "{}\n  Email: {}\n  Home: {}, {}",
        visitor.name, visitor.email, visitor.city, visitor.state
    )
}

/// Format the key of a deleted visit for display.
pub fn format_deleted(key: &VisitKey) -> String {
    format!("Deleted visits of {} to {}", key.visitor, key.location)
}

/// Format visitors for display.
pub fn format_visitors(visitors: &[Visitor]) -> String {
    if visitors.is_empty() {
        return "No visitors found.".to_string();
    }
    let mut output = format!("VISITORS ({})\n", visitors.len());
    output.push_str(&"-".repeat(40));
    for visitor in visitors {
        output.push_str(&format!("\n{}", format_visitor(visitor)));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        let visit = Visit::new("matt", "guatemala").with_count(2);
        assert_eq!(format_count(&visit), "matt has visited guatemala 2 time(s)");
    }

    #[test]
    fn test_format_page() {
        let page = DataPage::new(
            vec![
                Visit::new("adam", "italy").with_count(1),
                Visit::new("elliot", "italy").with_count(3),
            ],
            true,
        );

        let output = format_page("ITALY", &page);

        assert!(output.starts_with("ITALY (2)\n"));
        assert!(output.contains("Visit{visitor='adam', location='italy', visit_count=1}"));
        assert!(output.ends_with("More pages: yes"));
    }

    #[test]
    fn test_format_empty_results() {
        assert_eq!(
            format_page("ITALY", &DataPage::new(Vec::new(), false)),
            format!("ITALY (0)\n{}\n  No visits found.\nMore pages: no", "-".repeat(40))
        );
        assert_eq!(format_visitors(&[]), "No visitors found.");
    }

    #[test]
    fn test_format_empty_page_keeps_continuation_flag() {
        let output = format_page("ITALY", &DataPage::new(Vec::new(), true));

        assert!(output.contains("No visits found."));
        assert!(output.ends_with("More pages: yes"));
    }

    #[test]
    fn test_format_deleted() {
        let key = VisitKey::new("matt", "utah");
        assert_eq!(format_deleted(&key), "Deleted visits of matt to utah");
    }

    #[test]
    fn test_format_visitor() {
        let visitor = Visitor::new("nate", "nate@example.com", "Boise", "ID");
        assert_eq!(
            format_visitor(&visitor),
            "nate\n  Email: nate@example.com\n  Home: Boise, ID"
        );
    }
}
