//! Sample data shared by the demo driver and `cargo xtask dynamodb seed`.

use super::types::{VisitKey, Visitor};

/// Visits removed before the demo starts so every run begins from zero.
pub fn demo_visit_keys() -> Vec<VisitKey> {
    [
        ("matt", "utah"),
        ("matt", "guatemala"),
        ("matt", "idaho"),
        ("matt", "italy"),
        ("elliot", "italy"),
        ("nate", "italy"),
        ("adam", "italy"),
    ]
    .into_iter()
    .map(|(visitor, location)| VisitKey::new(visitor, location))
    .collect()
}

/// Profiles of everyone who appears in the demo.
pub fn sample_visitors() -> Vec<Visitor> {
    vec![
        Visitor::new("matt", "matt@example.com", "Provo", "UT"),
        Visitor::new("elliot", "elliot@example.com", "Boise", "ID"),
        Visitor::new("nate", "nate@example.com", "Salt Lake City", "UT"),
        Visitor::new("adam", "adam@example.com", "Denver", "CO"),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_every_demo_visitor_has_a_profile() {
        let profiles: BTreeSet<String> = sample_visitors().into_iter().map(|v| v.name).collect();
        let visitors: BTreeSet<String> = demo_visit_keys().into_iter().map(|k| k.visitor).collect();

        assert_eq!(profiles, visitors);
    }
}
