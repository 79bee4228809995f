//! OData query construction.
//!
//! The calendar service narrows list results with an OData `$filter`
//! expression. Every predicate sent to the service is built here, so string
//! literal quoting lives in exactly one place: [`Literal`] renders strings
//! single-quoted with embedded quotes doubled.
//!
//! [`ListQuery::from_criteria`] turns [`FilterCriteria`] into the parameters
//! of the event list request.

use std::fmt;

use chrono::NaiveDateTime;

use crate::filter::FilterCriteria;
use crate::time::QUERY_DATETIME_FORMAT;

/// Fields requested when listing events.
pub const EVENT_SELECT_FIELDS: [&str; 3] = ["id", "subject", "isOnlineMeeting"];

/// Page size for the event list request.
pub const EVENT_PAGE_SIZE: u32 = 50;

/// A literal value on the right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// A string, rendered as `'value'` with `'` doubled.
    String(String),
    /// A datetime, rendered as a quoted `YYYY-MM-DDTHH:MM:SS` string.
    DateTime(NaiveDateTime),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "'{}'", value.replace('\'', "''")),
            Self::DateTime(dt) => write!(f, "'{}'", dt.format(QUERY_DATETIME_FORMAT)),
        }
    }
}

/// OData comparison operators used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Equal.
    Eq,
    /// Greater than or equal.
    Ge,
    /// Less than or equal.
    Le,
}

impl Comparison {
    /// Returns the OData operator keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ge => "ge",
            Self::Le => "le",
        }
    }
}

/// A single `field op literal` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    field: &'static str,
    op: Comparison,
    value: Literal,
}

impl Predicate {
    /// Creates a predicate.
    pub fn new(field: &'static str, op: Comparison, value: Literal) -> Self {
        Self { field, op, value }
    }

    /// `field eq 'value'`.
    pub fn string_eq(field: &'static str, value: impl Into<String>) -> Self {
        Self::new(field, Comparison::Eq, Literal::String(value.into()))
    }

    /// `field ge 'datetime'`.
    pub fn datetime_ge(field: &'static str, value: NaiveDateTime) -> Self {
        Self::new(field, Comparison::Ge, Literal::DateTime(value))
    }

    /// `field le 'datetime'`.
    pub fn datetime_le(field: &'static str, value: NaiveDateTime) -> Self {
        Self::new(field, Comparison::Le, Literal::DateTime(value))
    }

    /// Returns the field path this predicate tests.
    pub fn field(&self) -> &str {
        self.field
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op.as_str(), self.value)
    }
}

/// A conjunction of predicates.
///
/// Predicates render in insertion order joined by ` and `.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression {
    predicates: Vec<Predicate>,
}

impl FilterExpression {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to append a predicate.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Appends a predicate if one is given.
    pub fn and_maybe(self, predicate: Option<Predicate>) -> Self {
        match predicate {
            Some(p) => self.and(p),
            None => self,
        }
    }

    /// Returns the predicates in order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns true if there are no predicates.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Renders the expression, or `None` when it has no predicates.
    pub fn render(&self) -> Option<String> {
        if self.predicates.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.predicates.iter().map(ToString::to_string).collect();
        Some(parts.join(" and "))
    }
}

/// Parameters of the event list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Fields to select.
    pub select: &'static [&'static str],
    /// The `$filter` expression, absent when nothing is filtered.
    pub filter: Option<String>,
    /// Page size.
    pub top: u32,
}

impl ListQuery {
    /// Builds the list query for the given criteria.
    ///
    /// Predicates appear in fixed order: subject, start, end.
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let expression = Self::filter_expression(criteria);

        Self {
            select: &EVENT_SELECT_FIELDS,
            filter: expression.render(),
            top: EVENT_PAGE_SIZE,
        }
    }

    /// Builds the filter expression for the given criteria.
    pub fn filter_expression(criteria: &FilterCriteria) -> FilterExpression {
        FilterExpression::new()
            .and_maybe(criteria.subject().map(|s| Predicate::string_eq("subject", s)))
            .and_maybe(
                criteria
                    .start()
                    .map(|dt| Predicate::datetime_ge("start/dateTime", dt)),
            )
            .and_maybe(
                criteria
                    .end()
                    .map(|dt| Predicate::datetime_le("end/dateTime", dt)),
            )
    }

    /// Returns the `$select` value.
    pub fn select_param(&self) -> String {
        self.select.join(",")
    }

    /// Returns the query string pairs for the request.
    ///
    /// `$filter` is omitted entirely when there is no expression.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("$select", self.select_param()),
            ("$top", self.top.to_string()),
        ];
        if let Some(ref filter) = self.filter {
            pairs.push(("$filter", filter.clone()));
        }
        pairs
    }
}

/// Builds the filter matching an online meeting by its join URL.
pub fn join_url_filter(join_url: &str) -> String {
    Predicate::string_eq("joinWebUrl", join_url).to_string()
}
