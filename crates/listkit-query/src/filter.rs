//! Filter criteria and predicate evaluation.
//!
//! A record matches a [`FilterCriteria`] when all three dimensions agree:
//!
//! ```text
//! match = (search term empty, or ANY search field contains it, case-insensitively)
//!       ∧ (every categorical dimension is All, or equals the record's value)
//!       ∧ (date window is All, or ceil(|now - ts| / 1 day) <= window days)
//! ```
//!
//! `All` is a sentinel variant, never a value: a record whose status is
//! literally the string `"all"` is only matched by `Category::Is("all")`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::record::Listable;
use crate::value::{FieldValue, Timestamp, Value};

/// One categorical dimension of the criteria.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Predicate is always true for this dimension.
    #[default]
    All,
    /// Record field must equal this value exactly.
    Is(FieldValue),
}

impl Category {
    /// Parses a dropdown value: `"all"` is the sentinel, anything else is a
    /// string to match exactly.
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            Category::All
        } else {
            Category::Is(FieldValue::String(value.to_string()))
        }
    }

    /// Returns `true` for the `All` sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, Category::All)
    }
}

impl From<FieldValue> for Category {
    fn from(value: FieldValue) -> Self {
        Category::Is(value)
    }
}

/// Supported date window lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum WindowDays {
    /// Last (or next) 7 days.
    Week,
    /// Last (or next) 30 days.
    Month,
    /// Last (or next) 90 days.
    Quarter,
}

impl WindowDays {
    /// Window length in days.
    pub fn days(self) -> u32 {
        match self {
            WindowDays::Week => 7,
            WindowDays::Month => 30,
            WindowDays::Quarter => 90,
        }
    }
}

impl TryFrom<u32> for WindowDays {
    type Error = QueryError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(WindowDays::Week),
            30 => Ok(WindowDays::Month),
            90 => Ok(WindowDays::Quarter),
            other => Err(QueryError::InvalidWindowDays(other)),
        }
    }
}

impl From<WindowDays> for u32 {
    fn from(window: WindowDays) -> Self {
        window.days()
    }
}

/// Temporal dimension of the criteria.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    /// Predicate is always true.
    #[default]
    All,
    /// Timestamp field must lie within `days` of now, in either direction.
    Within {
        /// Timestamp field to test.
        field: String,
        /// Window length.
        days: WindowDays,
    },
}

/// The full set of active filter dimensions for a view.
///
/// # Example
///
/// ```
/// use listkit_query::{FilterCriteria, WindowDays};
///
/// let criteria = FilterCriteria::new()
///     .search("smith")
///     .category("status", "pending")
///     .within("created_at", WindowDays::Month);
///
/// assert!(!criteria.is_unfiltered());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Free-text search term. Empty matches everything.
    #[serde(default)]
    pub search: String,

    /// Overrides the record's declared search fields when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_fields: Vec<String>,

    /// Categorical dimensions by field name.
    #[serde(default)]
    pub categorical: BTreeMap<String, Category>,

    /// Date window dimension.
    #[serde(default)]
    pub date_window: DateWindow,
}

impl FilterCriteria {
    /// Criteria that match every record.
    pub fn new() -> Self {
        FilterCriteria::default()
    }

    /// Sets the free-text search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Restricts free-text search to the given fields.
    pub fn search_in<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Requires a field to equal `value` exactly.
    pub fn category(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.categorical
            .insert(field.into(), Category::Is(value.into()));
        self
    }

    /// Sets a categorical dimension, sentinel included.
    pub fn set_category(mut self, field: impl Into<String>, category: Category) -> Self {
        self.categorical.insert(field.into(), category);
        self
    }

    /// Resets a categorical dimension to `All`.
    pub fn any(mut self, field: impl Into<String>) -> Self {
        self.categorical.insert(field.into(), Category::All);
        self
    }

    /// Sets the date window.
    pub fn within(mut self, field: impl Into<String>, days: WindowDays) -> Self {
        self.date_window = DateWindow::Within {
            field: field.into(),
            days,
        };
        self
    }

    /// Resets the date window to `All`.
    pub fn all_dates(mut self) -> Self {
        self.date_window = DateWindow::All;
        self
    }

    /// Returns `true` if every dimension is the `All` sentinel and the
    /// search term is empty.
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && self.categorical.values().all(Category::is_all)
            && self.date_window == DateWindow::All
    }

    /// Compiles the criteria into a predicate evaluated against `now`.
    pub fn predicate_at(&self, now: Timestamp) -> FilterPredicate<'_> {
        let needle = if self.search.is_empty() {
            None
        } else {
            Some(self.search.to_lowercase())
        };
        let categories = self
            .categorical
            .iter()
            .filter_map(|(field, category)| match category {
                Category::All => None,
                Category::Is(value) => Some((field.as_str(), value)),
            })
            .collect();
        let window = match &self.date_window {
            DateWindow::All => None,
            DateWindow::Within { field, days } => Some((field.as_str(), days.days() as u64)),
        };

        FilterPredicate {
            needle,
            search_fields: &self.search_fields,
            categories,
            window,
            now,
        }
    }

    /// Tests one record against the criteria using the current time.
    pub fn matches<T: Listable>(&self, record: &T) -> bool {
        self.matches_at(record, Timestamp::now())
    }

    /// Tests one record against the criteria at a fixed instant.
    pub fn matches_at<T: Listable>(&self, record: &T, now: Timestamp) -> bool {
        self.predicate_at(now).matches(record)
    }

    /// Human-readable summary of the active dimensions, e.g.
    /// `search~"ann", status=pending, created_at within 7d`.
    ///
    /// Returns `None` when nothing is filtered.
    pub fn summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.search.is_empty() {
            parts.push(format!("search~\"{}\"", self.search));
        }
        for (field, category) in &self.categorical {
            if let Category::Is(value) = category {
                parts.push(format!("{}={}", field, value));
            }
        }
        if let DateWindow::Within { field, days } = &self.date_window {
            parts.push(format!("{} within {}d", field, days.days()));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Criteria compiled for repeated evaluation.
///
/// Lowercases the search term once and drops `All` dimensions up front.
#[derive(Debug)]
pub struct FilterPredicate<'c> {
    needle: Option<String>,
    search_fields: &'c [String],
    categories: Vec<(&'c str, &'c FieldValue)>,
    window: Option<(&'c str, u64)>,
    now: Timestamp,
}

impl FilterPredicate<'_> {
    /// Tests one record. Pure function of the record and the criteria.
    pub fn matches<T: Listable>(&self, record: &T) -> bool {
        self.matches_search(record)
            && self.matches_categories(record)
            && self.matches_window(record)
    }

    fn matches_search<T: Listable>(&self, record: &T) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };

        let contains = |field: &str| match record.list_field_value(field) {
            Value::String(text) => text.to_lowercase().contains(needle.as_str()),
            _ => false,
        };

        if self.search_fields.is_empty() {
            T::search_fields().iter().any(|field| contains(field))
        } else {
            self.search_fields.iter().any(|field| contains(field))
        }
    }

    fn matches_categories<T: Listable>(&self, record: &T) -> bool {
        self.categories
            .iter()
            .all(|(field, expected)| expected.equals(&record.list_field_value(field)))
    }

    fn matches_window<T: Listable>(&self, record: &T) -> bool {
        let Some((field, days)) = self.window else {
            return true;
        };

        match record.list_field_value(field) {
            Value::Timestamp(ts) => self.now.abs_diff_days(ts) <= days,
            _ => false,
        }
    }
}

/// Filters a slice using the current time, preserving input order.
pub fn filter<'a, T: Listable>(records: &'a [T], criteria: &FilterCriteria) -> Vec<&'a T> {
    filter_at(records, criteria, Timestamp::now())
}

/// Filters a slice at a fixed instant, preserving input order.
pub fn filter_at<'a, T: Listable>(
    records: &'a [T],
    criteria: &FilterCriteria,
    now: Timestamp,
) -> Vec<&'a T> {
    let predicate = criteria.predicate_at(now);
    records
        .iter()
        .filter(|record| predicate.matches(*record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, MILLIS_PER_DAY};

    #[derive(Debug, Clone, PartialEq)]
    struct User {
        id: u32,
        name: String,
        email: String,
        role: String,
        verified: bool,
        joined: Option<Timestamp>,
    }

    impl Listable for User {
        type Id = u32;

        fn list_id(&self) -> u32 {
            self.id
        }

        fn list_field_value(&self, field: &str) -> Value<'_> {
            match field {
                "id" => Value::Number(Number::from(self.id)),
                "name" => Value::String(&self.name),
                "email" => Value::String(&self.email),
                "role" => Value::String(&self.role),
                "verified" => Value::Bool(self.verified),
                "joined" => self.joined.map(Value::Timestamp).unwrap_or(Value::None),
                _ => Value::None,
            }
        }

        fn search_fields() -> &'static [&'static str] {
            &["name", "email"]
        }
    }

    const NOW: Timestamp = Timestamp(1_000 * MILLIS_PER_DAY);

    fn user(id: u32, name: &str, email: &str, role: &str, joined_days_ago: Option<i64>) -> User {
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            verified: id % 2 == 0,
            joined: joined_days_ago.map(|d| NOW.plus_days(-d)),
        }
    }

    fn users() -> Vec<User> {
        vec![
            user(1, "Ann Lee", "ann@example.com", "admin", Some(2)),
            user(2, "Bob Stone", "bob@corp.io", "staff", Some(20)),
            user(3, "Cara Ng", "cara@example.com", "staff", Some(60)),
            user(4, "Dan Annis", "dan@corp.io", "all", None),
        ]
    }

    fn ids(records: &[&User]) -> Vec<u32> {
        records.iter().map(|u| u.id).collect()
    }

    #[test]
    fn empty_criteria_matches_everything() {
        let data = users();
        let result = filter_at(&data, &FilterCriteria::new(), NOW);
        assert_eq!(ids(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn search_is_case_insensitive_and_ors_fields() {
        let data = users();
        let result = filter_at(&data, &FilterCriteria::new().search("ANN"), NOW);
        // "Ann Lee" by name, "Dan Annis" by name, "ann@example.com" is user 1 again
        assert_eq!(ids(&result), vec![1, 4]);

        let result = filter_at(&data, &FilterCriteria::new().search("corp.io"), NOW);
        assert_eq!(ids(&result), vec![2, 4]);
    }

    #[test]
    fn search_field_override() {
        let data = users();
        let criteria = FilterCriteria::new().search("example").search_in(["name"]);
        assert!(filter_at(&data, &criteria, NOW).is_empty());
    }

    #[test]
    fn search_ignores_non_text_fields() {
        let data = users();
        let criteria = FilterCriteria::new().search("1").search_in(["id"]);
        assert!(filter_at(&data, &criteria, NOW).is_empty());
    }

    #[test]
    fn categorical_exact_match() {
        let data = users();
        let criteria = FilterCriteria::new().category("role", "staff");
        assert_eq!(ids(&filter_at(&data, &criteria, NOW)), vec![2, 3]);

        let criteria = FilterCriteria::new().category("role", "Staff");
        assert!(filter_at(&data, &criteria, NOW).is_empty());
    }

    #[test]
    fn all_sentinel_is_never_a_literal() {
        let data = users();
        let criteria = FilterCriteria::new().any("role");
        assert_eq!(filter_at(&data, &criteria, NOW).len(), 4);

        // The literal string "all" only matches through Is
        let criteria = FilterCriteria::new().category("role", FieldValue::from("all"));
        assert_eq!(ids(&filter_at(&data, &criteria, NOW)), vec![4]);

        assert_eq!(Category::parse("all"), Category::All);
        assert_eq!(
            Category::parse("admin"),
            Category::from(FieldValue::from("admin"))
        );
    }

    #[test]
    fn bool_category() {
        let data = users();
        let criteria = FilterCriteria::new().category("verified", true);
        assert_eq!(ids(&filter_at(&data, &criteria, NOW)), vec![2, 4]);
    }

    #[test]
    fn missing_category_field_never_matches() {
        let data = users();
        let criteria = FilterCriteria::new().category("department", "sales");
        assert!(filter_at(&data, &criteria, NOW).is_empty());
    }

    #[test]
    fn date_window_uses_ceiling_days() {
        let data = users();
        let week = FilterCriteria::new().within("joined", WindowDays::Week);
        assert_eq!(ids(&filter_at(&data, &week, NOW)), vec![1]);

        let month = FilterCriteria::new().within("joined", WindowDays::Month);
        assert_eq!(ids(&filter_at(&data, &month, NOW)), vec![1, 2]);

        let quarter = FilterCriteria::new().within("joined", WindowDays::Quarter);
        assert_eq!(ids(&filter_at(&data, &quarter, NOW)), vec![1, 2, 3]);
    }

    #[test]
    fn date_window_boundary() {
        let mut exact = user(9, "Edge", "edge@example.com", "staff", None);
        exact.joined = Some(NOW.plus_days(-7));
        let mut over = exact.clone();
        over.id = 10;
        over.joined = Some(Timestamp(NOW.0 - 7 * MILLIS_PER_DAY - 1));

        let criteria = FilterCriteria::new().within("joined", WindowDays::Week);
        assert!(criteria.matches_at(&exact, NOW));
        assert!(!criteria.matches_at(&over, NOW));
    }

    #[test]
    fn date_window_accepts_future_dates_symmetrically() {
        let mut scheduled = user(5, "Future", "f@example.com", "staff", None);
        scheduled.joined = Some(NOW.plus_days(5));
        let criteria = FilterCriteria::new().within("joined", WindowDays::Week);
        assert!(criteria.matches_at(&scheduled, NOW));

        scheduled.joined = Some(NOW.plus_days(8));
        assert!(!criteria.matches_at(&scheduled, NOW));
    }

    #[test]
    fn dimensions_combine_with_and() {
        let data = users();
        let criteria = FilterCriteria::new()
            .search("example")
            .category("role", "staff")
            .within("joined", WindowDays::Quarter);
        assert_eq!(ids(&filter_at(&data, &criteria, NOW)), vec![3]);
    }

    #[test]
    fn window_days_conversion() {
        assert_eq!(WindowDays::try_from(30), Ok(WindowDays::Month));
        assert_eq!(
            WindowDays::try_from(14),
            Err(QueryError::InvalidWindowDays(14))
        );
        assert_eq!(u32::from(WindowDays::Quarter), 90);
    }

    #[test]
    fn summary_lists_active_dimensions() {
        assert_eq!(FilterCriteria::new().any("role").summary(), None);

        let criteria = FilterCriteria::new()
            .search("ann")
            .category("status", "pending")
            .within("created_at", WindowDays::Week);
        assert_eq!(
            criteria.summary().unwrap(),
            "search~\"ann\", status=pending, created_at within 7d"
        );
    }

    #[test]
    fn criteria_round_trip_through_json() {
        let criteria = FilterCriteria::new()
            .category("status", "pending")
            .any("payment")
            .within("created_at", WindowDays::Month);
        let json = serde_json::to_string(&criteria).unwrap();
        assert!(json.contains("\"payment\":\"all\""));
        assert!(json.contains("\"days\":30"));
        let back: FilterCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(back, criteria);

        let bad = r#"{"date_window":{"within":{"field":"created_at","days":14}}}"#;
        assert!(serde_json::from_str::<FilterCriteria>(bad).is_err());
    }
}
