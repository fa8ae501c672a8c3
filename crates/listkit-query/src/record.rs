//! The record trait and its helper traits.
//!
//! [`Listable`] is what every collection element implements. It is usually
//! derived with `#[derive(Listable)]` from `listkit-macros`, but a manual
//! implementation only needs an id and a field accessor.

use std::fmt::Debug;
use std::hash::Hash;

use crate::sort::SortSpec;
use crate::value::{Timestamp, Value};

/// A record that can flow through filter, sort, pagination and selection.
///
/// # Manual Implementation
///
/// ```
/// use listkit_query::{Listable, Number, SortSpec, Value};
///
/// struct Order {
///     id: u64,
///     customer: String,
///     total: u32,
/// }
///
/// impl Listable for Order {
///     type Id = u64;
///
///     fn list_id(&self) -> u64 {
///         self.id
///     }
///
///     fn list_field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "customer" => Value::String(&self.customer),
///             "total" => Value::Number(Number::U64(self.total as u64)),
///             _ => Value::None,
///         }
///     }
///
///     fn search_fields() -> &'static [&'static str] {
///         &["customer"]
///     }
///
///     fn default_sort() -> Option<SortSpec> {
///         Some(SortSpec::desc("total"))
///     }
/// }
/// ```
pub trait Listable {
    /// Stable unique identifier type.
    type Id: Clone + Eq + Ord + Hash + Debug;

    /// Returns this record's identifier.
    fn list_id(&self) -> Self::Id;

    /// Returns the value of a field, or [`Value::None`] if the field doesn't
    /// exist or is empty for this record.
    fn list_field_value(&self, field: &str) -> Value<'_>;

    /// Text fields the free-text search looks at.
    fn search_fields() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }

    /// Fields that may be used as sort keys.
    ///
    /// An empty list means "not declared": any field that yields a value for
    /// at least one record is accepted.
    fn sort_fields() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }

    /// Sort applied when a requested sort field is unknown.
    fn default_sort() -> Option<SortSpec>
    where
        Self: Sized,
    {
        None
    }
}

/// Stable discriminant for enum-typed fields.
///
/// ```
/// use listkit_query::ListEnum;
///
/// enum Status {
///     Pending,
///     Completed,
/// }
///
/// impl ListEnum for Status {
///     fn list_discriminant(&self) -> u32 {
///         match self {
///             Status::Pending => 0,
///             Status::Completed => 1,
///         }
///     }
/// }
/// ```
pub trait ListEnum {
    /// Returns the discriminant for this variant.
    fn list_discriminant(&self) -> u32;
}

/// Conversion of date/time fields into [`Timestamp`].
pub trait ListTimestamp {
    /// Converts this value to a [`Timestamp`].
    fn list_timestamp(&self) -> Timestamp;
}

impl ListTimestamp for i64 {
    fn list_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl ListTimestamp for u64 {
    fn list_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self as i64)
    }
}

impl ListTimestamp for Timestamp {
    fn list_timestamp(&self) -> Timestamp {
        *self
    }
}

impl ListTimestamp for chrono::DateTime<chrono::Utc> {
    fn list_timestamp(&self) -> Timestamp {
        Timestamp::from(*self)
    }
}
