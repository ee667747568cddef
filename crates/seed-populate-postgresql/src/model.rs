//! Domain values of the service station schema.

use crate::random_entity::EntityId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tables the seeder expects to exist.
pub const REQUIRED_TABLES: &[&str] = &[
    "service_centers",
    "employees",
    "employee_service_center",
    "customers",
    "services",
    "spare_parts",
    "stockpile",
    "orders",
    "spare_part_order",
    "service_order",
    "receipts",
];

/// Role tag on the employee/service center association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeRole {
    Analyst,
    Master,
    Manager,
    Administrator,
}

impl EmployeeRole {
    /// Roles handed out to generated staff.
    pub const STAFF: [EmployeeRole; 3] = [Self::Analyst, Self::Master, Self::Manager];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyst => "Analyst",
            Self::Master => "Master",
            Self::Manager => "Manager",
            Self::Administrator => "Administrator",
        }
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Value as stored in `orders.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Car,
    Moto,
}

impl VehicleType {
    pub const ALL: [VehicleType; 2] = [Self::Car, Self::Moto];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Moto => "Moto",
        }
    }
}

/// Render a value from a closed enum as a SQL string literal.
///
/// Used for enum-typed columns whose PostgreSQL type name is unknown to the
/// seeder; the values never come from input.
pub(crate) fn sql_literal(value: &'static str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Order row to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_id: EntityId,
    pub service_center_id: EntityId,
    pub manager_id: EntityId,
    pub master_id: EntityId,
    pub scheduled_date: NaiveDate,
    pub status: OrderStatus,
}

/// `spare_part_order` association to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderSparePart {
    pub order_id: EntityId,
    pub part_id: EntityId,
    pub quantity: i32,
    pub purchase_price: Decimal,
}

/// Generated employee login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub login: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_values() {
        assert_eq!(OrderStatus::InProgress.as_str(), "In Progress");
        assert_eq!(OrderStatus::Completed.to_string(), "Completed");
    }

    #[test]
    fn test_staff_roles_exclude_administrator() {
        assert!(!EmployeeRole::STAFF.contains(&EmployeeRole::Administrator));
    }

    #[test]
    fn test_sql_literal() {
        assert_eq!(sql_literal("In Progress"), "'In Progress'");
        assert_eq!(sql_literal("O'Brien"), "'O''Brien'");
    }
}
