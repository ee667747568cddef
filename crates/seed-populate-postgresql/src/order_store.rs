//! PostgreSQL-backed [`OrderStore`] and the batch driver.

use crate::error::SeedError;
use crate::model::{sql_literal, EmployeeRole, NewOrder, NewOrderSparePart};
use crate::orders::{run_order_batch, BatchReport, OrderPlan, OrderStore};
use crate::random_entity::{ColumnRef, EntityId, Join, Predicate, RandomEntityQuery};
use async_trait::async_trait;
use seed_generator::FakeData;
use tokio_postgres::{Client, Transaction};
use tracing::{debug, info};

const QUALIFYING_CENTER_SQL: &str = "SELECT service_center_id
     FROM employee_service_center
     GROUP BY service_center_id
     HAVING COUNT(*) FILTER (WHERE employee_role::text = $1) > 0
        AND COUNT(*) FILTER (WHERE employee_role::text = $2) > 0
     ORDER BY RANDOM()
     LIMIT 1";

/// Employees of `center_id` holding `role`.
pub fn staff_query(center_id: EntityId, role: EmployeeRole) -> RandomEntityQuery {
    RandomEntityQuery::new("employees", "employee_id")
        .join(Join::inner(
            "employee_service_center",
            ColumnRef::new("employees", "employee_id"),
            ColumnRef::new("employee_service_center", "employee_id"),
        ))
        .filter(
            Predicate::eq(
                ColumnRef::new("employee_service_center", "employee_role"),
                role.as_str(),
            )
            .and(Predicate::eq(
                ColumnRef::new("employee_service_center", "service_center_id"),
                center_id,
            )),
        )
}

pub fn customer_query() -> RandomEntityQuery {
    RandomEntityQuery::new("customers", "customer_id")
}

pub fn spare_part_query() -> RandomEntityQuery {
    RandomEntityQuery::new("spare_parts", "part_id")
}

pub fn service_query() -> RandomEntityQuery {
    RandomEntityQuery::new("services", "service_id")
}

/// Every selector the workflow runs, for validation against the catalog.
pub fn workflow_queries() -> Vec<RandomEntityQuery> {
    vec![
        staff_query(0, EmployeeRole::Master),
        customer_query(),
        spare_part_query(),
        service_query(),
    ]
}

/// Columns written or read by the workflow's fixed statements.
pub const WORKFLOW_COLUMNS: &[(&str, &str)] = &[
    ("employee_service_center", "service_center_id"),
    ("employee_service_center", "employee_role"),
    ("orders", "order_id"),
    ("orders", "customer_id"),
    ("orders", "service_center_id"),
    ("orders", "manager_id"),
    ("orders", "assigned_master_id"),
    ("orders", "scheduled_date"),
    ("orders", "status"),
    ("spare_parts", "stock_quantity"),
    ("spare_part_order", "part_id"),
    ("spare_part_order", "order_id"),
    ("spare_part_order", "quantity"),
    ("spare_part_order", "purchase_price"),
    ("service_order", "service_id"),
    ("service_order", "order_id"),
];

/// [`OrderStore`] running every statement on one transaction.
pub struct PgOrderStore<'t, 'c> {
    tx: &'t Transaction<'c>,
    customers: RandomEntityQuery,
    spare_parts: RandomEntityQuery,
    services: RandomEntityQuery,
}

impl<'t, 'c> PgOrderStore<'t, 'c> {
    pub fn new(tx: &'t Transaction<'c>) -> Self {
        Self {
            tx,
            customers: customer_query(),
            spare_parts: spare_part_query(),
            services: service_query(),
        }
    }
}

#[async_trait]
impl<'t, 'c> OrderStore for PgOrderStore<'t, 'c> {
    async fn random_qualifying_center(&mut self) -> Result<EntityId, SeedError> {
        let row = self
            .tx
            .query_opt(
                QUALIFYING_CENTER_SQL,
                &[
                    &EmployeeRole::Master.as_str(),
                    &EmployeeRole::Manager.as_str(),
                ],
            )
            .await?;
        match row {
            Some(row) => Ok(row.try_get(0)?),
            None => Err(SeedError::not_found("employee_service_center")),
        }
    }

    async fn random_staff(
        &mut self,
        center_id: EntityId,
        role: EmployeeRole,
    ) -> Result<EntityId, SeedError> {
        staff_query(center_id, role).select(self.tx).await
    }

    async fn random_customer(&mut self) -> Result<EntityId, SeedError> {
        self.customers.select(self.tx).await
    }

    async fn random_spare_part(&mut self) -> Result<EntityId, SeedError> {
        self.spare_parts.select(self.tx).await
    }

    async fn random_service(&mut self) -> Result<EntityId, SeedError> {
        self.services.select(self.tx).await
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<EntityId, SeedError> {
        let sql = format!(
            "INSERT INTO orders
             (customer_id, service_center_id, manager_id, assigned_master_id, scheduled_date, status)
             VALUES ($1, $2, $3, $4, $5::date, {})
             RETURNING order_id",
            sql_literal(order.status.as_str())
        );
        let row = self
            .tx
            .query_one(
                sql.as_str(),
                &[
                    &order.customer_id,
                    &order.service_center_id,
                    &order.manager_id,
                    &order.master_id,
                    &order.scheduled_date,
                ],
            )
            .await
            .map_err(|e| SeedError::insert("order", e))?;
        Ok(row.try_get(0)?)
    }

    async fn lock_stock_quantity(&mut self, part_id: EntityId) -> Result<i32, SeedError> {
        let row = self
            .tx
            .query_opt(
                "SELECT stock_quantity::int4 FROM spare_parts WHERE part_id = $1 FOR UPDATE",
                &[&part_id],
            )
            .await?;
        match row {
            Some(row) => Ok(row.try_get(0)?),
            None => Err(SeedError::not_found("spare_parts")),
        }
    }

    async fn attach_spare_part(&mut self, attachment: &NewOrderSparePart) -> Result<(), SeedError> {
        let what = || {
            format!(
                "spare part {} for order {}",
                attachment.part_id, attachment.order_id
            )
        };
        self.tx
            .execute(
                "INSERT INTO spare_part_order (part_id, order_id, quantity, purchase_price)
                 VALUES ($1, $2, $3, $4::numeric)",
                &[
                    &attachment.part_id,
                    &attachment.order_id,
                    &attachment.quantity,
                    &attachment.purchase_price,
                ],
            )
            .await
            .map_err(|e| SeedError::insert(what(), e))?;
        self.tx
            .execute(
                "UPDATE spare_parts SET stock_quantity = stock_quantity - $1 WHERE part_id = $2",
                &[&attachment.quantity, &attachment.part_id],
            )
            .await
            .map_err(|e| SeedError::insert(what(), e))?;
        Ok(())
    }

    async fn attach_service(
        &mut self,
        order_id: EntityId,
        service_id: EntityId,
    ) -> Result<(), SeedError> {
        self.tx
            .execute(
                "INSERT INTO service_order (service_id, order_id) VALUES ($1, $2)",
                &[&service_id, &order_id],
            )
            .await
            .map_err(|e| {
                SeedError::insert(format!("service {service_id} for order {order_id}"), e)
            })?;
        Ok(())
    }
}

/// Split `attempts` into transaction-sized chunks.
fn chunk_sizes(attempts: usize, commit_every: Option<usize>) -> Vec<usize> {
    let size = match commit_every {
        Some(k) if k > 0 => k,
        _ => return vec![attempts],
    };
    let mut chunks = vec![size; attempts / size];
    if attempts % size > 0 {
        chunks.push(attempts % size);
    }
    chunks
}

/// Run the order workflow for `plan.attempts` attempts.
///
/// With `commit_every = None` everything happens in one transaction that is
/// committed after the last attempt. A fatal error rolls back the open
/// transaction; chunks committed earlier stay.
pub async fn create_orders(
    client: &mut Client,
    plan: &OrderPlan,
    fake: &mut FakeData,
) -> Result<BatchReport, SeedError> {
    let mut report = BatchReport::default();

    for (chunk, attempts) in chunk_sizes(plan.attempts, plan.commit_every)
        .into_iter()
        .enumerate()
    {
        let tx = client.transaction().await?;
        let batch = {
            let mut store = PgOrderStore::new(&tx);
            run_order_batch(&mut store, plan, fake, attempts).await?
        };
        tx.commit().await?;
        debug!(
            "Committed order chunk {} ({} orders)",
            chunk + 1,
            batch.orders_created
        );
        report.merge(batch);
    }

    info!(
        "Created {} orders out of {} attempts ({} abandoned, {} parts, {} services, {} parts skipped for stock)",
        report.orders_created,
        report.attempts,
        report.abandoned,
        report.parts_attached,
        report.services_attached,
        report.parts_skipped_stock
    );
    Ok(report)
}
