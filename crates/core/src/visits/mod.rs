mod conversions;
mod keys;
mod repository;
mod sample;
mod types;
mod visitors;

pub use conversions::{item_to_visit, item_to_visitor, visit_to_item, visitor_to_item};
pub use keys::{
    visit_key, visitor_key, AccessPath, VisitTables, DEFAULT_PAGE_LIMIT, DEFAULT_VISITOR_TABLE,
    DEFAULT_VISIT_INDEX, DEFAULT_VISIT_TABLE, LOCATION_ATTR, VISITOR_ATTR, VISIT_COUNT_ATTR,
};
pub use repository::VisitRepository;
pub use sample::{demo_visit_keys, sample_visitors};
pub use types::{DataPage, Visit, VisitKey, Visitor};
pub use visitors::VisitorRepository;
