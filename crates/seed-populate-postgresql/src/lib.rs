//! PostgreSQL seeders for the vehicle service station schema.
//!
//! Fills an existing schema with reference data (service centers, staff,
//! customers, services, inventory), then creates orders through a
//! per-attempt workflow and finalizes receipts for completed orders.
//!
//! # Architecture
//!
//! - `ConnectionManager` / `PgPool` - role-keyed pools of `tokio_postgres` clients
//! - `SchemaCatalog` - tables and columns from `information_schema`
//! - `RandomEntityQuery` - one random id through joins and a predicate tree
//! - `reference` / `employees` - single-table seeders and `create_user` provisioning
//! - `OrderStore` / `run_order_batch` - the order workflow, storage-agnostic
//! - `PgOrderStore` / `create_orders` - the workflow on a PostgreSQL transaction
//! - `create_receipts` - receipts for completed orders
//!
//! Every quantity is a parameter; defaults live with the caller.

pub mod args;
pub mod catalog;
pub mod employees;
pub mod error;
pub mod model;
pub mod order_store;
pub mod orders;
pub mod pool;
pub mod random_entity;
pub mod receipts;
pub mod reference;

pub use args::{PostgreSQLConnectionArgs, SeedArgs};
pub use catalog::SchemaCatalog;
pub use employees::{create_employees, init_admin, write_credentials, AdminParams};
pub use error::SeedError;
pub use model::{Credential, EmployeeRole, OrderStatus, REQUIRED_TABLES};
pub use order_store::{create_orders, PgOrderStore};
pub use orders::{
    run_order_batch, AttachOutcome, AttemptOutcome, BatchReport, OrderPlan, OrderStore,
};
pub use pool::{ConnectionConfig, ConnectionManager, PgPool};
pub use random_entity::{ColumnRef, EntityId, Join, JoinKind, Predicate, RandomEntityQuery};
pub use receipts::{create_receipts, ReceiptParams};
pub use reference::{
    create_customers, create_service_centers, create_services, create_spare_parts,
    create_stockpile, CustomerParams, ServiceCenterParams, ServiceParams, SparePartParams,
};
