//! Proc macros for listkit.
//!
//! # Available Macros
//!
//! - [`Listable`] - Implement `listkit_query::Listable` from field annotations
//!
//! For working examples, see `listkit/tests/listable_derive.rs`.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod listable;

/// Derives the `Listable` trait for record structs.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `id` | The record's stable identifier (exactly one field) |
/// | `String` | Text field: searchable, categorical, sortable |
/// | `Number` | Numeric field (any primitive integer or float) |
/// | `Timestamp` | Date/time field - requires `ListTimestamp` impl |
/// | `Enum` | Enum field - requires `ListEnum` impl |
/// | `Bool` | Boolean field |
/// | `search` | Include in free-text search (String fields only) |
/// | `sort` | Declare as a sort key |
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name in criteria and sorts |
/// | `ty = "..."` | Spell the type as a string (`"enum"`, `"bool"`) |
///
/// # Struct Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `default_sort = "-field"` | Fallback sort; a leading `-` means descending |
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Order::TOTAL`, `Order::CREATED_AT`)
/// 2. `Listable` with `Id`, `list_id`, `list_field_value`, `search_fields`,
///    and, when declared, `sort_fields` and `default_sort`
///
/// When no field is marked `sort`, every typed field can be sorted on.
///
/// # Example
///
/// ```ignore
/// use listkit::{FilterCriteria, Listable, SortSpec, ViewState};
///
/// #[derive(Listable)]
/// #[list(default_sort = "-total")]
/// struct Order {
///     #[list(id, Number)]
///     id: u32,
///
///     #[list(String, search)]
///     customer: String,
///
///     #[list(String)]
///     status: String,
///
///     #[list(Number)]
///     total: u32,
/// }
///
/// let orders = vec![
///     Order { id: 1, customer: "Ann".into(), status: "completed".into(), total: 100 },
///     Order { id: 2, customer: "Bob".into(), status: "pending".into(), total: 50 },
/// ];
///
/// let view = ViewState::new(10)?
///     .with_criteria(FilterCriteria::new().category(Order::STATUS, "pending"))
///     .compute(&orders);
/// assert_eq!(view.items[0].id, 2);
/// ```
///
/// # Enum Fields
///
/// Implement `ListEnum` on the enum type:
///
/// ```ignore
/// use listkit::ListEnum;
///
/// #[derive(Clone, Copy)]
/// enum Status { Pending, Completed }
///
/// impl ListEnum for Status {
///     fn list_discriminant(&self) -> u32 {
///         *self as u32
///     }
/// }
///
/// #[derive(Listable)]
/// struct Order {
///     #[list(id)]
///     id: u32,
///     #[list(Enum)]
///     status: Status,
/// }
/// ```
#[proc_macro_derive(Listable, attributes(list))]
pub fn listable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    listable::listable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
