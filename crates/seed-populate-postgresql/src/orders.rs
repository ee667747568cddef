//! Order creation workflow.
//!
//! Each attempt walks
//! `SelectCenter → SelectMaster → SelectManager → SelectCustomer →
//! InsertOrder → AttachParts → AttachServices`. A selection that finds
//! nothing abandons the attempt and the batch moves on; any storage failure
//! is returned and ends the batch, leaving rollback to the caller that owns
//! the transaction.
//!
//! The workflow only talks to an [`OrderStore`], so the same logic runs
//! against a PostgreSQL transaction or an in-memory store.

use crate::error::SeedError;
use crate::model::{EmployeeRole, NewOrder, NewOrderSparePart, OrderStatus};
use crate::random_entity::EntityId;
use async_trait::async_trait;
use seed_generator::{Bounds, FakeData};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Storage operations the workflow needs, all scoped to one transaction.
#[async_trait]
pub trait OrderStore: Send {
    /// A random center with at least one Master and one Manager.
    async fn random_qualifying_center(&mut self) -> Result<EntityId, SeedError>;

    /// A random employee associated with `center_id` under `role`.
    async fn random_staff(
        &mut self,
        center_id: EntityId,
        role: EmployeeRole,
    ) -> Result<EntityId, SeedError>;

    async fn random_customer(&mut self) -> Result<EntityId, SeedError>;

    async fn random_spare_part(&mut self) -> Result<EntityId, SeedError>;

    async fn random_service(&mut self) -> Result<EntityId, SeedError>;

    /// Insert the order and return its generated id.
    async fn insert_order(&mut self, order: &NewOrder) -> Result<EntityId, SeedError>;

    /// Read a part's stock, locking the row until the transaction ends.
    async fn lock_stock_quantity(&mut self, part_id: EntityId) -> Result<i32, SeedError>;

    /// Insert the association and take `quantity` out of stock.
    async fn attach_spare_part(&mut self, attachment: &NewOrderSparePart) -> Result<(), SeedError>;

    async fn attach_service(
        &mut self,
        order_id: EntityId,
        service_id: EntityId,
    ) -> Result<(), SeedError>;
}

/// Order workflow settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderPlan {
    /// Order attempts in the batch.
    pub attempts: usize,
    /// Spare part picks per order (duplicates and shortages use up a pick).
    pub parts_per_order: usize,
    /// Service picks per order (duplicates use up a pick).
    pub services_per_order: usize,
    pub purchase_price: Bounds<f64>,
    /// Desired quantity per attached part.
    pub quantity: Bounds<i32>,
    /// Orders are scheduled 1..=horizon days from today.
    pub schedule_horizon_days: u32,
    /// Commit every K attempts; `None` commits once after the whole batch.
    #[serde(default)]
    pub commit_every: Option<usize>,
}

/// Workflow stage, used to report where an attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    SelectCenter,
    SelectMaster,
    SelectManager,
    SelectCustomer,
    InsertOrder,
    AttachParts,
    AttachServices,
}

impl fmt::Display for AttemptStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SelectCenter => "select center",
            Self::SelectMaster => "select master",
            Self::SelectManager => "select manager",
            Self::SelectCustomer => "select customer",
            Self::InsertOrder => "insert order",
            Self::AttachParts => "attach parts",
            Self::AttachServices => "attach services",
        };
        f.write_str(name)
    }
}

/// Result of one spare part pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached { part_id: EntityId, quantity: i32 },
    Duplicate { part_id: EntityId },
    InsufficientStock {
        part_id: EntityId,
        requested: i32,
        available: i32,
    },
    NothingToPick,
}

/// Result of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Created {
        order_id: EntityId,
        parts: Vec<AttachOutcome>,
        services: usize,
    },
    Abandoned {
        stage: AttemptStage,
        reason: String,
    },
}

/// Counters over a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub attempts: usize,
    pub orders_created: usize,
    pub abandoned: usize,
    pub parts_attached: usize,
    pub parts_skipped_stock: usize,
    pub duplicate_picks: usize,
    pub services_attached: usize,
    /// Ids of the orders created, in creation order.
    pub order_ids: Vec<EntityId>,
}

impl BatchReport {
    fn record(&mut self, outcome: &AttemptOutcome) {
        self.attempts += 1;
        match outcome {
            AttemptOutcome::Created {
                order_id,
                parts,
                services,
            } => {
                self.orders_created += 1;
                self.order_ids.push(*order_id);
                self.services_attached += services;
                for part in parts {
                    match part {
                        AttachOutcome::Attached { .. } => self.parts_attached += 1,
                        AttachOutcome::InsufficientStock { .. } => self.parts_skipped_stock += 1,
                        AttachOutcome::Duplicate { .. } => self.duplicate_picks += 1,
                        AttachOutcome::NothingToPick => {}
                    }
                }
            }
            AttemptOutcome::Abandoned { .. } => self.abandoned += 1,
        }
    }

    /// Fold another batch into this one.
    pub fn merge(&mut self, other: BatchReport) {
        self.attempts += other.attempts;
        self.orders_created += other.orders_created;
        self.abandoned += other.abandoned;
        self.parts_attached += other.parts_attached;
        self.parts_skipped_stock += other.parts_skipped_stock;
        self.duplicate_picks += other.duplicate_picks;
        self.services_attached += other.services_attached;
        self.order_ids.extend(other.order_ids);
    }
}

/// Turn a selection result into "abandon" or "fatal".
fn attempt_scoped<T>(
    result: Result<T, SeedError>,
    stage: AttemptStage,
) -> Result<Result<T, AttemptOutcome>, SeedError> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(e) if e.is_attempt_scoped() => Ok(Err(AttemptOutcome::Abandoned {
            stage,
            reason: e.to_string(),
        })),
        Err(e) => Err(e),
    }
}

macro_rules! select_or_abandon {
    ($result:expr, $stage:expr) => {
        match attempt_scoped($result, $stage)? {
            Ok(id) => id,
            Err(abandoned) => return Ok(abandoned),
        }
    };
}

/// Run one order attempt.
pub async fn run_attempt<S: OrderStore>(
    store: &mut S,
    plan: &OrderPlan,
    fake: &mut FakeData,
) -> Result<AttemptOutcome, SeedError> {
    let center_id = select_or_abandon!(
        store.random_qualifying_center().await,
        AttemptStage::SelectCenter
    );
    let master_id = select_or_abandon!(
        store.random_staff(center_id, EmployeeRole::Master).await,
        AttemptStage::SelectMaster
    );
    let manager_id = select_or_abandon!(
        store.random_staff(center_id, EmployeeRole::Manager).await,
        AttemptStage::SelectManager
    );
    let customer_id = select_or_abandon!(
        store.random_customer().await,
        AttemptStage::SelectCustomer
    );

    let status = fake
        .pick(&OrderStatus::ALL)
        .copied()
        .unwrap_or(OrderStatus::Pending);
    let order = NewOrder {
        customer_id,
        service_center_id: center_id,
        manager_id,
        master_id,
        scheduled_date: fake.future_date(plan.schedule_horizon_days),
        status,
    };
    let order_id = store.insert_order(&order).await?;
    debug!(
        "Inserted order {} (center {}, master {}, manager {}, customer {}, {})",
        order_id, center_id, master_id, manager_id, customer_id, status
    );

    let parts = attach_parts(store, plan, fake, order_id).await?;
    let services = attach_services(store, plan, order_id).await?;

    Ok(AttemptOutcome::Created {
        order_id,
        parts,
        services,
    })
}

async fn attach_parts<S: OrderStore>(
    store: &mut S,
    plan: &OrderPlan,
    fake: &mut FakeData,
    order_id: EntityId,
) -> Result<Vec<AttachOutcome>, SeedError> {
    let mut used = HashSet::new();
    let mut outcomes = Vec::with_capacity(plan.parts_per_order);

    for _ in 0..plan.parts_per_order {
        let picked = attempt_scoped(store.random_spare_part().await, AttemptStage::AttachParts)?;
        let part_id = match picked {
            Ok(id) => id,
            Err(_) => {
                outcomes.push(AttachOutcome::NothingToPick);
                continue;
            }
        };
        if !used.insert(part_id) {
            outcomes.push(AttachOutcome::Duplicate { part_id });
            continue;
        }

        let available = match attempt_scoped(
            store.lock_stock_quantity(part_id).await,
            AttemptStage::AttachParts,
        )? {
            Ok(quantity) => quantity,
            Err(_) => {
                outcomes.push(AttachOutcome::NothingToPick);
                continue;
            }
        };
        let requested = fake.int_in(plan.quantity);
        if available < requested {
            info!(
                "Not enough spare parts for part_id {}: need {}, in stock {}. Skipping.",
                part_id, requested, available
            );
            outcomes.push(AttachOutcome::InsufficientStock {
                part_id,
                requested,
                available,
            });
            continue;
        }

        store
            .attach_spare_part(&NewOrderSparePart {
                order_id,
                part_id,
                quantity: requested,
                purchase_price: fake.price(plan.purchase_price),
            })
            .await?;
        outcomes.push(AttachOutcome::Attached {
            part_id,
            quantity: requested,
        });
    }

    Ok(outcomes)
}

async fn attach_services<S: OrderStore>(
    store: &mut S,
    plan: &OrderPlan,
    order_id: EntityId,
) -> Result<usize, SeedError> {
    let mut used = HashSet::new();

    for _ in 0..plan.services_per_order {
        let picked = attempt_scoped(store.random_service().await, AttemptStage::AttachServices)?;
        let service_id = match picked {
            Ok(id) => id,
            Err(_) => continue,
        };
        if !used.insert(service_id) {
            continue;
        }
        store.attach_service(order_id, service_id).await?;
    }

    Ok(used.len())
}

/// Run `attempts` order attempts sequentially against one store.
///
/// Abandoned attempts are logged and counted; the first batch-fatal error
/// is returned as is.
pub async fn run_order_batch<S: OrderStore>(
    store: &mut S,
    plan: &OrderPlan,
    fake: &mut FakeData,
    attempts: usize,
) -> Result<BatchReport, SeedError> {
    let mut report = BatchReport::default();

    for attempt in 0..attempts {
        let outcome = run_attempt(store, plan, fake).await?;
        if let AttemptOutcome::Abandoned { stage, reason } = &outcome {
            warn!("Order attempt {} abandoned at {}: {}", attempt + 1, stage, reason);
        }
        report.record(&outcome);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    /// In-memory stand-in for the PostgreSQL tables the workflow touches.
    #[derive(Default)]
    struct MemoryStore {
        rng_state: u64,
        /// (employee_id, center_id, role)
        staff: Vec<(EntityId, EntityId, EmployeeRole)>,
        customers: Vec<EntityId>,
        stock: HashMap<EntityId, i32>,
        services: Vec<EntityId>,
        orders: Vec<(EntityId, NewOrder)>,
        order_parts: Vec<NewOrderSparePart>,
        order_services: Vec<(EntityId, EntityId)>,
        fail_order_insert: bool,
        fail_service_insert: bool,
        /// Roles that vanish between the center pick and the staff pick.
        vacated_roles: Vec<EmployeeRole>,
        /// Forced part picks, consumed front to back before random picks.
        scripted_parts: Vec<EntityId>,
    }

    impl MemoryStore {
        fn next_index(&mut self, len: usize) -> usize {
            // xorshift keeps picks varied without another RNG dependency
            self.rng_state ^= self.rng_state << 13;
            self.rng_state ^= self.rng_state >> 7;
            self.rng_state ^= self.rng_state << 17;
            (self.rng_state % len as u64) as usize
        }

        fn pick(&mut self, ids: &[EntityId], table: &str) -> Result<EntityId, SeedError> {
            if ids.is_empty() {
                return Err(SeedError::not_found(table));
            }
            let idx = self.next_index(ids.len());
            Ok(ids[idx])
        }

        fn qualifying_centers(&self) -> Vec<EntityId> {
            let mut centers: Vec<EntityId> = self
                .staff
                .iter()
                .map(|(_, center, _)| *center)
                .filter(|center| {
                    let has = |role| {
                        self.staff
                            .iter()
                            .any(|(_, c, r)| c == center && *r == role)
                    };
                    has(EmployeeRole::Master) && has(EmployeeRole::Manager)
                })
                .collect();
            centers.sort_unstable();
            centers.dedup();
            centers
        }

        fn has_role(&self, employee: EntityId, center: EntityId, role: EmployeeRole) -> bool {
            self.staff
                .iter()
                .any(|(e, c, r)| *e == employee && *c == center && *r == role)
        }
    }

    #[async_trait]
    impl OrderStore for MemoryStore {
        async fn random_qualifying_center(&mut self) -> Result<EntityId, SeedError> {
            let centers = self.qualifying_centers();
            self.pick(&centers, "employee_service_center")
        }

        async fn random_staff(
            &mut self,
            center_id: EntityId,
            role: EmployeeRole,
        ) -> Result<EntityId, SeedError> {
            if self.vacated_roles.contains(&role) {
                return Err(SeedError::not_found("employees"));
            }
            let ids: Vec<EntityId> = self
                .staff
                .iter()
                .filter(|(_, c, r)| *c == center_id && *r == role)
                .map(|(e, _, _)| *e)
                .collect();
            self.pick(&ids, "employees")
        }

        async fn random_customer(&mut self) -> Result<EntityId, SeedError> {
            let ids = self.customers.clone();
            self.pick(&ids, "customers")
        }

        async fn random_spare_part(&mut self) -> Result<EntityId, SeedError> {
            if !self.scripted_parts.is_empty() {
                return Ok(self.scripted_parts.remove(0));
            }
            let mut ids: Vec<EntityId> = self.stock.keys().copied().collect();
            ids.sort_unstable();
            self.pick(&ids, "spare_parts")
        }

        async fn random_service(&mut self) -> Result<EntityId, SeedError> {
            let ids = self.services.clone();
            self.pick(&ids, "services")
        }

        async fn insert_order(&mut self, order: &NewOrder) -> Result<EntityId, SeedError> {
            if self.fail_order_insert {
                return Err(SeedError::Connection("orders_customer_id_fkey".into()));
            }
            let id = self.orders.len() as EntityId + 1;
            self.orders.push((id, order.clone()));
            Ok(id)
        }

        async fn lock_stock_quantity(&mut self, part_id: EntityId) -> Result<i32, SeedError> {
            self.stock
                .get(&part_id)
                .copied()
                .ok_or_else(|| SeedError::not_found("spare_parts"))
        }

        async fn attach_spare_part(
            &mut self,
            attachment: &NewOrderSparePart,
        ) -> Result<(), SeedError> {
            let stock = self
                .stock
                .get_mut(&attachment.part_id)
                .ok_or_else(|| SeedError::Configuration("unknown part".into()))?;
            if *stock < attachment.quantity {
                return Err(SeedError::Configuration("stock_quantity check violated".into()));
            }
            *stock -= attachment.quantity;
            self.order_parts.push(attachment.clone());
            Ok(())
        }

        async fn attach_service(
            &mut self,
            order_id: EntityId,
            service_id: EntityId,
        ) -> Result<(), SeedError> {
            if self.fail_service_insert {
                return Err(SeedError::Connection("service_order insert failed".into()));
            }
            self.order_services.push((order_id, service_id));
            Ok(())
        }
    }

    fn plan() -> OrderPlan {
        OrderPlan {
            attempts: 50,
            parts_per_order: 5,
            services_per_order: 2,
            purchase_price: Bounds::new(500.0, 500000.0),
            quantity: Bounds::new(1, 5),
            schedule_horizon_days: 365,
            commit_every: None,
        }
    }

    fn populated_store() -> MemoryStore {
        MemoryStore {
            rng_state: 0x2545F4914F6CDD1D,
            staff: vec![
                (1, 10, EmployeeRole::Master),
                (2, 10, EmployeeRole::Manager),
                (3, 10, EmployeeRole::Analyst),
                (4, 20, EmployeeRole::Master),
                (5, 20, EmployeeRole::Manager),
                (6, 20, EmployeeRole::Manager),
                // Center 30 has staff but no Master
                (7, 30, EmployeeRole::Manager),
                (8, 30, EmployeeRole::Analyst),
            ],
            customers: vec![100, 101, 102],
            stock: (1..=8).map(|id| (id, 4)).collect(),
            services: vec![200, 201, 202],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_batch_respects_invariants() {
        let mut store = populated_store();
        let mut fake = FakeData::with_seed(42);

        let report = run_order_batch(&mut store, &plan(), &mut fake, 50).await.unwrap();

        assert_eq!(report.attempts, 50);
        assert_eq!(report.orders_created, 50);
        assert_eq!(report.order_ids.len(), 50);

        for (order_id, order) in &store.orders {
            assert_ne!(order.service_center_id, 30, "center without a master chosen");
            let center = order.service_center_id;
            assert!(store.has_role(order.master_id, center, EmployeeRole::Master));
            assert!(store.has_role(order.manager_id, center, EmployeeRole::Manager));

            let parts: Vec<EntityId> = store
                .order_parts
                .iter()
                .filter(|p| p.order_id == *order_id)
                .map(|p| p.part_id)
                .collect();
            let unique: HashSet<&EntityId> = parts.iter().collect();
            assert_eq!(unique.len(), parts.len(), "duplicate part on order {order_id}");

            let services: Vec<EntityId> = store
                .order_services
                .iter()
                .filter(|(o, _)| o == order_id)
                .map(|(_, s)| *s)
                .collect();
            let unique: HashSet<&EntityId> = services.iter().collect();
            assert_eq!(unique.len(), services.len(), "duplicate service on order {order_id}");
        }

        assert!(store.stock.values().all(|q| *q >= 0));
        assert_eq!(report.parts_attached, store.order_parts.len());
        assert_eq!(report.services_attached, store.order_services.len());
        for part in &store.order_parts {
            assert!((1..=5).contains(&part.quantity));
            assert!(part.purchase_price >= Decimal::new(500, 0));
        }
    }

    #[tokio::test]
    async fn test_stock_drained_by_attachments() {
        let mut store = populated_store();
        let mut fake = FakeData::with_seed(3);
        let initial: i32 = store.stock.values().sum();

        run_order_batch(&mut store, &plan(), &mut fake, 30).await.unwrap();

        let attached: i32 = store.order_parts.iter().map(|p| p.quantity).sum();
        let remaining: i32 = store.stock.values().sum();
        assert_eq!(initial - attached, remaining);
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_skipped() {
        let mut store = populated_store();
        store.stock = HashMap::from([(7, 3)]);
        store.scripted_parts = vec![7];
        let plan = OrderPlan {
            parts_per_order: 1,
            quantity: Bounds::new(5, 5),
            ..plan()
        };
        let mut fake = FakeData::with_seed(1);

        let outcome = run_attempt(&mut store, &plan, &mut fake).await.unwrap();

        match outcome {
            AttemptOutcome::Created { parts, .. } => assert_eq!(
                parts,
                vec![AttachOutcome::InsufficientStock {
                    part_id: 7,
                    requested: 5,
                    available: 3
                }]
            ),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(store.order_parts.is_empty());
        assert_eq!(store.stock[&7], 3);
    }

    #[tokio::test]
    async fn test_sufficient_stock_is_decremented() {
        let mut store = populated_store();
        store.stock = HashMap::from([(7, 10)]);
        store.scripted_parts = vec![7];
        let plan = OrderPlan {
            parts_per_order: 1,
            quantity: Bounds::new(4, 4),
            ..plan()
        };
        let mut fake = FakeData::with_seed(1);

        run_attempt(&mut store, &plan, &mut fake).await.unwrap();

        assert_eq!(store.order_parts.len(), 1);
        assert_eq!(store.order_parts[0].part_id, 7);
        assert_eq!(store.order_parts[0].quantity, 4);
        assert_eq!(store.stock[&7], 6);
    }

    #[tokio::test]
    async fn test_duplicate_pick_uses_up_a_slot() {
        let mut store = populated_store();
        store.scripted_parts = vec![2, 2, 2];
        let plan = OrderPlan {
            parts_per_order: 3,
            quantity: Bounds::new(1, 1),
            ..plan()
        };
        let mut fake = FakeData::with_seed(5);

        let outcome = run_attempt(&mut store, &plan, &mut fake).await.unwrap();

        let AttemptOutcome::Created { parts, .. } = outcome else {
            panic!("order was not created");
        };
        assert_eq!(
            parts,
            vec![
                AttachOutcome::Attached {
                    part_id: 2,
                    quantity: 1
                },
                AttachOutcome::Duplicate { part_id: 2 },
                AttachOutcome::Duplicate { part_id: 2 },
            ]
        );
        assert_eq!(store.order_parts.len(), 1);
    }

    #[tokio::test]
    async fn test_no_qualifying_center_abandons_every_attempt() {
        let mut store = populated_store();
        store.staff.retain(|(_, _, role)| *role != EmployeeRole::Master);
        let mut fake = FakeData::with_seed(9);

        let report = run_order_batch(&mut store, &plan(), &mut fake, 5).await.unwrap();

        assert_eq!(report.attempts, 5);
        assert_eq!(report.abandoned, 5);
        assert_eq!(report.orders_created, 0);
        assert!(store.orders.is_empty());
    }

    #[tokio::test]
    async fn test_missing_customer_abandons_attempt() {
        let mut store = populated_store();
        store.customers.clear();
        let mut fake = FakeData::with_seed(9);

        let outcome = run_attempt(&mut store, &plan(), &mut fake).await.unwrap();

        assert!(matches!(
            outcome,
            AttemptOutcome::Abandoned {
                stage: AttemptStage::SelectCustomer,
                ..
            }
        ));
        assert!(store.orders.is_empty());
    }

    #[tokio::test]
    async fn test_missing_staff_abandons_attempt() {
        for (role, stage) in [
            (EmployeeRole::Master, AttemptStage::SelectMaster),
            (EmployeeRole::Manager, AttemptStage::SelectManager),
        ] {
            let mut store = populated_store();
            store.vacated_roles.push(role);
            let mut fake = FakeData::with_seed(9);

            let outcome = run_attempt(&mut store, &plan(), &mut fake).await.unwrap();

            match outcome {
                AttemptOutcome::Abandoned { stage: got, .. } => assert_eq!(got, stage),
                other => panic!("expected abandon at {stage}, got {other:?}"),
            }
            assert!(store.orders.is_empty());
            assert!(store.order_parts.is_empty());
        }
    }

    #[tokio::test]
    async fn test_vacated_master_abandons_every_attempt_of_batch() {
        let mut store = populated_store();
        store.vacated_roles.push(EmployeeRole::Master);
        let mut fake = FakeData::with_seed(3);

        let report = run_order_batch(&mut store, &plan(), &mut fake, 6).await.unwrap();

        assert_eq!(report.attempts, 6);
        assert_eq!(report.abandoned, 6);
        assert_eq!(report.orders_created, 0);
        assert!(store.orders.is_empty());
    }

    #[tokio::test]
    async fn test_order_insert_failure_is_fatal() {
        let mut store = populated_store();
        store.fail_order_insert = true;
        let mut fake = FakeData::with_seed(9);

        let result = run_order_batch(&mut store, &plan(), &mut fake, 5).await;

        assert!(result.is_err());
        assert!(store.orders.is_empty());
    }

    #[tokio::test]
    async fn test_service_insert_failure_is_fatal() {
        let mut store = populated_store();
        store.fail_service_insert = true;
        let mut fake = FakeData::with_seed(9);

        let err = run_order_batch(&mut store, &plan(), &mut fake, 5)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("service_order"));
        assert_eq!(store.orders.len(), 1, "batch must stop at the first failure");
    }

    #[tokio::test]
    async fn test_empty_parts_catalog_skips_slots() {
        let mut store = populated_store();
        store.stock.clear();
        let mut fake = FakeData::with_seed(9);

        let report = run_order_batch(&mut store, &plan(), &mut fake, 3).await.unwrap();

        assert_eq!(report.orders_created, 3);
        assert_eq!(report.parts_attached, 0);
    }

    #[tokio::test]
    async fn test_both_qualifying_centers_are_used() {
        let mut store = populated_store();
        let mut fake = FakeData::with_seed(11);

        run_order_batch(&mut store, &plan(), &mut fake, 200).await.unwrap();

        let centers: HashSet<EntityId> = store
            .orders
            .iter()
            .map(|(_, order)| order.service_center_id)
            .collect();
        assert_eq!(centers, HashSet::from([10, 20]));
    }

    #[test]
    fn test_report_merge() {
        let mut total = BatchReport {
            attempts: 2,
            orders_created: 1,
            abandoned: 1,
            order_ids: vec![1],
            ..Default::default()
        };
        total.merge(BatchReport {
            attempts: 3,
            orders_created: 3,
            parts_attached: 4,
            order_ids: vec![2, 3, 4],
            ..Default::default()
        });
        assert_eq!(total.attempts, 5);
        assert_eq!(total.orders_created, 4);
        assert_eq!(total.parts_attached, 4);
        assert_eq!(total.order_ids, vec![1, 2, 3, 4]);
    }
}
