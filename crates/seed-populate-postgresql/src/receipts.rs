//! Receipt finalizer for completed orders.

use crate::error::SeedError;
use crate::model::{sql_literal, OrderStatus};
use crate::random_entity::EntityId;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use seed_generator::{Bounds, FakeData};
use serde::{Deserialize, Serialize};
use tokio_postgres::Client;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceiptParams {
    /// Share of the customer's bonus points spent on the receipt.
    pub bonus_fraction: Bounds<f64>,
}

/// `(bonus_points_spent, total_paid)` for a receipt, rounded to cents.
pub fn receipt_amounts(
    bonus_points: Decimal,
    total_cost: Decimal,
    fraction: f64,
) -> (Decimal, Decimal) {
    let fraction = Decimal::from_f64(fraction).unwrap_or(Decimal::ONE);
    let spent = (bonus_points * fraction)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    (spent, total_cost - spent)
}

fn candidates_sql() -> String {
    format!(
        "SELECT o.order_id,
                COALESCE(o.total_cost, 0)::numeric,
                COALESCE(c.bonus_points, 0)::numeric
         FROM orders o
         JOIN customers c ON o.customer_id = c.customer_id
         LEFT JOIN receipts r ON o.order_id = r.order_id
         WHERE o.status::text = {}
           AND r.order_id IS NULL
         ORDER BY o.order_id",
        sql_literal(OrderStatus::Completed.as_str())
    )
}

/// Insert a receipt for every Completed order that has none.
///
/// Each candidate is re-checked right before its insert, which narrows but
/// does not close the window for a concurrent finalizer. Returns the number
/// of receipts inserted.
pub async fn create_receipts(
    client: &Client,
    fake: &mut FakeData,
    params: &ReceiptParams,
) -> Result<u64, SeedError> {
    let candidates: Vec<(EntityId, Decimal, Decimal)> = client
        .query(candidates_sql().as_str(), &[])
        .await?
        .iter()
        .map(|row| -> Result<_, tokio_postgres::Error> {
            Ok((row.try_get(0)?, row.try_get(1)?, row.try_get(2)?))
        })
        .collect::<Result<_, _>>()?;
    info!("Found {} completed orders without a receipt", candidates.len());

    let mut inserted = 0u64;
    for (order_id, total_cost, bonus_points) in candidates {
        let existing = client
            .query_opt(
                "SELECT receipt_id FROM receipts WHERE order_id = $1 LIMIT 1",
                &[&order_id],
            )
            .await?;
        if existing.is_some() {
            debug!("Order {} already has a receipt", order_id);
            continue;
        }

        let fraction = fake.fraction(params.bonus_fraction);
        let (spent, paid) = receipt_amounts(bonus_points, total_cost, fraction);
        client
            .execute(
                "INSERT INTO receipts (order_id, bonus_points_spent, total_paid)
                 VALUES ($1, $2::numeric, $3::numeric)",
                &[&order_id, &spent, &paid],
            )
            .await
            .map_err(|e| SeedError::insert(format!("receipt for order {order_id}"), e))?;
        inserted += 1;
    }

    Ok(inserted)
}
