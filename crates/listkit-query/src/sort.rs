//! Sort specification and the stable sort engine.
//!
//! Provides [`Dir`] for sort direction, [`SortSpec`] for the active sort and
//! [`sort`] to order a filtered collection.
//!
//! Sorting is stable: records whose keys compare equal keep their relative
//! input order, so re-sorting an unchanged collection never reorders rows.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::QueryError;
use crate::record::Listable;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// The opposite direction, used when a sort header is clicked twice.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dir {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Dir::Asc),
            "desc" | "descending" => Ok(Dir::Desc),
            _ => Err(QueryError::UnknownDirection(s.to_string())),
        }
    }
}

/// The active sort: one field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(default)]
    pub direction: Dir,
}

impl SortSpec {
    /// Creates a sort with the given direction.
    pub fn new(field: impl Into<String>, direction: Dir) -> Self {
        SortSpec {
            field: field.into(),
            direction,
        }
    }

    /// Creates an ascending sort.
    pub fn asc(field: impl Into<String>) -> Self {
        SortSpec::new(field, Dir::Asc)
    }

    /// Creates a descending sort.
    pub fn desc(field: impl Into<String>) -> Self {
        SortSpec::new(field, Dir::Desc)
    }

    /// Parses the compact form used in URLs and config: `field` is
    /// ascending, `-field` is descending.
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix('-') {
            Some(field) => SortSpec::desc(field),
            None => SortSpec::asc(s),
        }
    }

    /// Header-click behavior: same field flips direction, a new field
    /// starts ascending.
    pub fn toggled(&self, field: &str) -> Self {
        if self.field == field {
            SortSpec::new(field, self.direction.flip())
        } else {
            SortSpec::asc(field)
        }
    }

    /// Compares two field values according to this sort.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        self.direction.apply(compare_values(a, b))
    }
}

impl std::fmt::Display for SortSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            Dir::Asc => write!(f, "{}", self.field),
            Dir::Desc => write!(f, "-{}", self.field),
        }
    }
}

/// Ascending comparison of two field values.
///
/// - strings: accent- and case-folded first, code points as tiebreak
/// - numbers: exactly, mixed integer/float allowed
/// - timestamps: by epoch milliseconds
/// - enums by discriminant, bools `false < true`
/// - `None` and NaN sort after every value
///
/// Values of different kinds order by kind, strings first, so a column
/// with mixed kinds still sorts into a total order.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => compare_strings(a, b),
        (Value::Number(x), Value::Number(y)) if !x.is_nan() && !y.is_nan() => x.total_cmp(*y),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Enum(a), Value::Enum(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::String(_) => 0,
        Value::Number(n) if n.is_nan() => 5,
        Value::Number(_) => 1,
        Value::Timestamp(_) => 2,
        Value::Enum(_) => 3,
        Value::Bool(_) => 4,
        Value::None => 5,
    }
}

/// Collation-style string comparison.
///
/// `"éclair"` sorts with `"eclair"`, and `"apple"` before `"Banana"`.
pub fn compare_strings(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Returns `true` if `field` can be used to sort `records`.
///
/// Declared sort fields win; otherwise a field is known when at least one
/// record yields a value for it. An empty collection accepts any field.
pub fn is_sortable<T: Listable>(records: &[&T], field: &str) -> bool {
    let declared = T::sort_fields();
    if !declared.is_empty() {
        return declared.contains(&field);
    }
    records.is_empty()
        || records
            .iter()
            .any(|record| !record.list_field_value(field).is_none())
}

/// Picks the sort to apply: the requested one if its field is known,
/// otherwise the record's default. `None` keeps the input order.
pub fn resolve_sort<T: Listable>(records: &[&T], spec: &SortSpec) -> Option<SortSpec> {
    if is_sortable(records, &spec.field) {
        return Some(spec.clone());
    }

    let fallback = T::default_sort();
    debug!(
        field = %spec.field,
        fallback = ?fallback.as_ref().map(ToString::to_string),
        "unknown sort field, falling back to default sort"
    );
    fallback
}

/// Sorts records into a new vector; the input is not touched.
///
/// Unknown fields fall back to [`Listable::default_sort`].
pub fn sort<'a, T, I>(records: I, spec: &SortSpec) -> Vec<&'a T>
where
    T: Listable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut ordered: Vec<&'a T> = records.into_iter().collect();

    if let Some(spec) = resolve_sort(&ordered, spec) {
        // slice::sort_by is a stable sort
        ordered.sort_by(|a, b| {
            spec.compare(
                &a.list_field_value(&spec.field),
                &b.list_field_value(&spec.field),
            )
        });
    }

    ordered
}
