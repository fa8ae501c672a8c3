//! Integration tests for the Listable derive macro.
//!
//! These tests verify that `#[derive(Listable)]` generates accessors, field
//! constants, search and sort field lists, and the default sort from
//! `#[list(...)]` annotations.

#![cfg(feature = "macros")]
#![allow(dead_code)] // Some fields are intentionally skipped for testing

use listkit::{
    FieldValue, FilterCriteria, ListEnum, Listable, SortSpec, Timestamp, Value, ViewState,
    WindowDays,
};
use listkit_macros::Listable as DeriveListable;

// =============================================================================
// Basic derive tests
// =============================================================================

#[derive(DeriveListable)]
struct User {
    #[list(id, Number)]
    id: u32,

    #[list(String, search, sort)]
    name: String,

    #[list(String, search)]
    email: String,

    #[list(Bool)]
    active: bool,

    #[list(skip)]
    password_hash: String,

    notes: String,
}

fn user(id: u32, name: &str, active: bool) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        active,
        password_hash: "x".to_string(),
        notes: String::new(),
    }
}

#[test]
fn accessors_are_generated() {
    let ann = user(7, "Ann", true);

    assert_eq!(ann.list_id(), 7);
    assert!(matches!(ann.list_field_value("name"), Value::String("Ann")));
    assert!(matches!(ann.list_field_value("id"), Value::Number(_)));
    assert!(matches!(ann.list_field_value("active"), Value::Bool(true)));
}

#[test]
fn skipped_and_untyped_fields_are_hidden() {
    let ann = user(1, "Ann", true);
    assert!(ann.list_field_value("password_hash").is_none());
    assert!(ann.list_field_value("notes").is_none());
    assert!(ann.list_field_value("nope").is_none());
}

#[test]
fn field_constants_generated() {
    assert_eq!(User::ID, "id");
    assert_eq!(User::NAME, "name");
    assert_eq!(User::EMAIL, "email");
    assert_eq!(User::ACTIVE, "active");
}

#[test]
fn search_and_sort_fields() {
    assert_eq!(User::search_fields(), &["name", "email"]);
    assert_eq!(User::sort_fields(), &["name"]);
    assert_eq!(User::default_sort(), None);
}

#[test]
fn search_covers_every_search_field() {
    let users = vec![user(1, "Ann", true), user(2, "Bob", false)];
    let by_email = FilterCriteria::new().search("BOB@EXAMPLE");
    let found = listkit::filter(&users, &by_email);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);
}

#[test]
fn undeclared_sort_field_falls_back_to_input_order() {
    let users = vec![user(2, "Zed", true), user(1, "Amy", true)];
    let sorted = listkit::sort(&users, &SortSpec::asc(User::ID));
    assert_eq!(sorted.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2, 1]);

    let sorted = listkit::sort(&users, &SortSpec::asc(User::NAME));
    assert_eq!(sorted.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2]);
}

// =============================================================================
// Enum, timestamp, rename and default sort
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Pending,
    Shipped,
    Cancelled,
}

impl ListEnum for Status {
    fn list_discriminant(&self) -> u32 {
        *self as u32
    }
}

#[derive(DeriveListable)]
#[list(default_sort = "-placed")]
struct Order {
    #[list(id)]
    number: String,

    #[list(ty = "enum")]
    status: Status,

    #[list(Timestamp, rename = "placed")]
    placed_at: Timestamp,

    #[list(Number)]
    total: f64,
}

const DAY: i64 = 86_400_000;
const NOW: Timestamp = Timestamp(1_000 * DAY);

fn orders() -> Vec<Order> {
    vec![
        Order {
            number: "A-1".into(),
            status: Status::Pending,
            placed_at: NOW.plus_days(-40),
            total: 12.5,
        },
        Order {
            number: "A-2".into(),
            status: Status::Shipped,
            placed_at: NOW.plus_days(-2),
            total: 99.0,
        },
        Order {
            number: "A-3".into(),
            status: Status::Cancelled,
            placed_at: NOW.plus_days(-10),
            total: 5.0,
        },
    ]
}

#[test]
fn string_id_and_renamed_field() {
    let data = orders();
    assert_eq!(data[0].list_id(), "A-1".to_string());
    assert_eq!(Order::PLACED, "placed");
    assert!(data[0].list_field_value("placed_at").is_none());
    assert!(data[0].list_field_value("placed").is_timestamp());
}

#[test]
fn enum_filter_by_discriminant() {
    let data = orders();
    let criteria =
        FilterCriteria::new().category(Order::STATUS, FieldValue::from_enum(&Status::Shipped));
    let found = listkit::filter(&data, &criteria);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].number, "A-2");
}

#[test]
fn default_sort_is_used_when_none_is_chosen() {
    let data = orders();
    let view = ViewState::new(10).unwrap().compute_at(&data, NOW);
    let numbers: Vec<&str> = view.items.iter().map(|o| o.number.as_str()).collect();
    assert_eq!(numbers, vec!["A-2", "A-3", "A-1"]);
}

#[test]
fn date_window_on_derived_timestamp() {
    let data = orders();
    let view = ViewState::new(10)
        .unwrap()
        .with_criteria(FilterCriteria::new().within(Order::PLACED, WindowDays::Month))
        .compute_at(&data, NOW);
    assert_eq!(view.total, 2);
}
