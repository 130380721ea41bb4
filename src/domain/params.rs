//! Query parameter parsing
//!
//! Typed validation for the query strings of the transaction list and
//! per-user aggregation endpoints. Dates are calendar dates in the
//! `YYYY-MM-DD` format; anything that is not a real date is rejected.

use chrono::NaiveDate;

use super::error::{DomainError, INVALID_CHOICE};

/// Format accepted for date query parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Check that a value is a real calendar date in `YYYY-MM-DD` format.
pub fn is_valid_date_format(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Treat empty query values as absent
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range from optional `start`/`end` query values.
    ///
    /// Returns `Ok(None)` when neither is given. Giving only one of them,
    /// or a value that is not a valid date, is an error.
    pub fn from_params(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, DomainError> {
        match (start, end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => match (parse_date(start), parse_date(end)) {
                (Some(start), Some(end)) => Ok(Some(Self { start, end })),
                _ => Err(DomainError::InvalidDateRange),
            },
            _ => Err(DomainError::InvalidDateRange),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Transaction type selected by the `type_ta` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// amount > 0
    Income,
    /// amount < 0
    Outcome,
}

impl TransactionKind {
    /// Unknown values select no kind.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "outcome" => Some(Self::Outcome),
            _ => None,
        }
    }
}

/// Column a transaction list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Amount,
    Date,
}

/// One term of the `ordering` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: OrderField,
    pub descending: bool,
}

/// Parse a comma-separated ordering such as `-amount,date`.
///
/// Unknown terms are dropped, as are repeats of a field already listed.
pub fn parse_ordering(value: &str) -> Vec<OrderBy> {
    let mut terms: Vec<OrderBy> = Vec::new();
    for term in value.split(',').map(str::trim) {
        let (name, descending) = match term.strip_prefix('-') {
            Some(name) => (name, true),
            None => (term, false),
        };
        let field = match name {
            "amount" => OrderField::Amount,
            "date" => OrderField::Date,
            _ => continue,
        };
        if terms.iter().all(|t| t.field != field) {
            terms.push(OrderBy { field, descending });
        }
    }
    terms
}

/// Filters for listing transactions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub user: Option<i64>,
    pub date: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub ordering: Vec<OrderBy>,
}

impl TransactionFilter {
    /// All transactions of one user, in store order
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user: Some(user_id),
            ..Self::default()
        }
    }

    /// Build a filter from raw query values.
    ///
    /// The date is checked first so that a malformed date is reported
    /// before anything else.
    pub fn from_params(
        user: Option<&str>,
        date: Option<&str>,
        type_ta: Option<&str>,
        ordering: Option<&str>,
    ) -> Result<Self, DomainError> {
        let date = match non_empty(date) {
            Some(raw) => Some(parse_date(raw).ok_or(DomainError::InvalidDateParameter("date"))?),
            None => None,
        };

        let user = match non_empty(user) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<i64>()
                    .map_err(|_| DomainError::field("user", INVALID_CHOICE))?,
            ),
            None => None,
        };

        Ok(Self {
            user,
            date,
            kind: type_ta.and_then(TransactionKind::from_param),
            ordering: ordering.map(parse_ordering).unwrap_or_default(),
        })
    }
}
