use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of visits a visitor has made to a location.
///
/// Identity is `(visitor, location)`. A stored visit always has `count >= 1`;
/// the zero default only exists for values built in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub visitor: String,
    pub location: String,
    #[serde(default)]
    pub count: u64,
}

impl Visit {
    /// Creates a visit with a zero count.
    pub fn new(visitor: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            visitor: visitor.into(),
            location: location.into(),
            count: 0,
        }
    }

    /// Sets the count.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    /// The primary key of this visit, usable as a pagination cursor.
    pub fn key(&self) -> VisitKey {
        VisitKey::new(&self.visitor, &self.location)
    }
}

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Visit{{visitor='{}', location='{}', visit_count={}}}",
            self.visitor, self.location, self.count
        )
    }
}

/// Primary key of a [`Visit`].
///
/// Also serves as the continuation cursor for both visit access paths: the
/// base collection and the location index share the same full key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisitKey {
    pub visitor: String,
    pub location: String,
}

impl VisitKey {
    pub fn new(visitor: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            visitor: visitor.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for VisitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.visitor, self.location)
    }
}

/// Profile of a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    pub name: String,
    pub email: String,
    pub city: String,
    pub state: String,
}

impl Visitor {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            city: city.into(),
            state: state.into(),
        }
    }
}

impl fmt::Display for Visitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Visitor{{name='{}', email='{}', city={}, state={}}}",
            self.name, self.email, self.city, self.state
        )
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPage<T> {
    /// Values in the store's key order.
    pub values: Vec<T>,
    /// Whether the store reported a continuation cursor.
    pub has_more_pages: bool,
}

impl<T> DataPage<T> {
    pub fn new(values: Vec<T>, has_more_pages: bool) -> Self {
        Self {
            values,
            has_more_pages,
        }
    }

    /// The last value on the page, whose key resumes the scan.
    pub fn last(&self) -> Option<&T> {
        self.values.last()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}
