//! The record type shown on the orders screen, plus seed data.

use listkit::{Listable, Timestamp};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, Listable)]
#[list(default_sort = "-placed")]
pub struct Order {
    #[list(id, Number, sort)]
    pub id: u32,

    #[list(String, search, sort)]
    pub customer: String,

    #[list(String, search)]
    pub email: String,

    #[list(String, sort)]
    pub status: String,

    #[list(Number, sort)]
    pub total: f64,

    #[list(Timestamp, sort)]
    pub placed: Timestamp,
}

const CUSTOMERS: &[&str] = &[
    "Ann Smith",
    "Bob Jones",
    "Cat Smith",
    "Dora Ruiz",
    "Émile Zola",
    "Farah Khan",
    "Gus Olsen",
];

pub const STATUSES: &[&str] = &["pending", "paid", "shipped", "cancelled"];

/// `count` deterministic orders placed over the last few weeks.
pub fn seed(count: u32, now: Timestamp) -> Vec<Order> {
    (1..=count)
        .map(|id| {
            let customer = CUSTOMERS[(id as usize * 5) % CUSTOMERS.len()];
            let handle = customer
                .split_whitespace()
                .next()
                .unwrap_or(customer)
                .to_lowercase();
            Order {
                id,
                customer: customer.to_string(),
                email: format!("{}{}@example.com", handle, id),
                status: STATUSES[(id as usize * 3) % STATUSES.len()].to_string(),
                total: f64::from(id * 37 % 250) + 0.99,
                placed: now.plus_days(-i64::from(id * 4 % 45)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_deterministic() {
        let now = Timestamp::from_secs(1_700_000_000);
        assert_eq!(seed(12, now), seed(12, now));
        assert_eq!(seed(12, now).len(), 12);
    }

    #[test]
    fn derived_fields() {
        assert_eq!(Order::search_fields(), &["customer", "email"]);
        assert_eq!(
            Order::sort_fields(),
            &["id", "customer", "status", "total", "placed"]
        );
        assert_eq!(Order::PLACED, "placed");
    }
}
