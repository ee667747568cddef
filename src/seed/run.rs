//! End-to-end seeding run.

use super::concurrent::{run_concurrent_phase, PhaseReport, SeedTask, TaskOutput};
use crate::config::SeedPlan;
use anyhow::Context;
use seed_generator::FakeData;
use seed_populate_postgresql::order_store::{workflow_queries, WORKFLOW_COLUMNS};
use seed_populate_postgresql::{
    create_customers, create_employees, create_orders, create_receipts, create_service_centers,
    create_services, create_spare_parts, create_stockpile, init_admin, write_credentials,
    AdminParams, BatchReport, ConnectionManager, PostgreSQLConnectionArgs, SchemaCatalog,
    SeedArgs, SeedError, REQUIRED_TABLES,
};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

const SUPERUSER: &str = "superuser";
const ADMIN: &str = "admin";

// Per-task RNG stream ids, so a fixed --seed reproduces every task
const CENTERS_STREAM: u64 = 1;
const CUSTOMERS_STREAM: u64 = 2;
const SERVICES_STREAM: u64 = 3;
const INVENTORY_STREAM: u64 = 4;
const EMPLOYEES_STREAM: u64 = 5;
const ORDERS_STREAM: u64 = 6;
const RECEIPTS_STREAM: u64 = 7;

/// Counts reported at the end of a run.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub service_centers: u64,
    pub admin_provisioned: bool,
    pub concurrent: PhaseReport,
    pub orders: BatchReport,
    pub receipts: u64,
}

/// Check that every table and column the run touches exists in `schema`.
pub fn preflight(catalog: &SchemaCatalog) -> Result<(), SeedError> {
    for table in REQUIRED_TABLES {
        catalog.require(table, "")?;
    }
    for (table, column) in WORKFLOW_COLUMNS {
        catalog.require(table, column)?;
    }
    for query in workflow_queries() {
        query.validate_against(catalog)?;
    }
    Ok(())
}

/// Seed the database described by `conn` according to `plan`.
pub async fn run_seed(
    conn: &PostgreSQLConnectionArgs,
    args: &SeedArgs,
    plan: &SeedPlan,
) -> anyhow::Result<SeedSummary> {
    let manager = Arc::new(ConnectionManager::new());
    let result = seed_with(&manager, conn, args, plan).await;
    manager.close_all();
    result
}

async fn seed_with(
    manager: &Arc<ConnectionManager>,
    conn: &PostgreSQLConnectionArgs,
    args: &SeedArgs,
    plan: &SeedPlan,
) -> anyhow::Result<SeedSummary> {
    if args.needs_admin() {
        args.admin_password()?;
    }

    let superuser = conn.superuser();
    info!("Connecting to {}", superuser);
    manager
        .add_pool(SUPERUSER, &superuser, conn.pool_size)
        .await
        .context("Failed to connect as superuser")?;
    let pool = manager.pool(SUPERUSER)?;

    {
        let client = pool.acquire().await?;
        let catalog = SchemaCatalog::load(&*client, &args.schema)
            .await
            .context("Failed to load schema catalog")?;
        preflight(&catalog).with_context(|| format!("Schema '{}' is not seedable", args.schema))?;
        info!("Schema '{}' has {} tables", args.schema, catalog.table_names().len());
    }

    let mut summary = SeedSummary::default();

    info!("Creating service centers...");
    {
        let client = pool.acquire().await?;
        let mut fake = FakeData::for_task(args.seed, CENTERS_STREAM);
        summary.service_centers =
            create_service_centers(&client, &mut fake, &plan.service_centers).await?;
    }
    info!("Creating service centers done");

    if args.skip_admin_init {
        info!("Skipping administrator initialization");
    } else {
        let client = pool.acquire().await?;
        let admin = AdminParams {
            login: args.admin_login.clone(),
            password: args.admin_password()?.to_string(),
            full_name: "Station Administrator".to_string(),
        };
        match init_admin(&client, &admin).await {
            Ok(()) => summary.admin_provisioned = true,
            Err(SeedError::AlreadyProvisioned(reason)) => {
                warn!("Skipping administrator initialization: {}", reason);
            }
            Err(e) => return Err(e).context("Failed to initialize administrator"),
        }
    }

    if !args.skip_employees_creation {
        let admin = conn.for_user(&args.admin_login, args.admin_password()?);
        manager
            .add_pool(ADMIN, &admin, conn.pool_size)
            .await
            .context("Failed to connect as administrator")?;
    }

    let deadline = Instant::now() + plan.deadline()?;
    let tasks = concurrent_tasks(manager, args, plan)?;
    summary.concurrent = run_concurrent_phase(tasks, deadline).await?;

    info!("Creating orders...");
    {
        let mut client = pool.acquire().await?;
        let mut fake = FakeData::for_task(args.seed, ORDERS_STREAM);
        summary.orders = create_orders(&mut client, &plan.orders, &mut fake)
            .await
            .context("Order creation failed, the open batch was rolled back")?;
    }
    info!("Creating orders done");

    info!("Creating receipts for completed orders...");
    {
        let client = pool.acquire().await?;
        let mut fake = FakeData::for_task(args.seed, RECEIPTS_STREAM);
        summary.receipts = create_receipts(&client, &mut fake, &plan.receipts).await?;
    }
    info!("Creating receipts done");

    Ok(summary)
}

fn concurrent_tasks(
    manager: &Arc<ConnectionManager>,
    args: &SeedArgs,
    plan: &SeedPlan,
) -> anyhow::Result<Vec<SeedTask>> {
    let superuser = manager.pool(SUPERUSER)?;
    let mut tasks = Vec::with_capacity(4);

    {
        let pool = Arc::clone(&superuser);
        let params = plan.customers;
        let mut fake = FakeData::for_task(args.seed, CUSTOMERS_STREAM);
        tasks.push(SeedTask::new("customers", async move {
            let client = pool.acquire().await?;
            let rows = create_customers(&client, &mut fake, &params).await?;
            Ok(TaskOutput::rows(rows))
        }));
    }

    {
        let pool = Arc::clone(&superuser);
        let params = plan.services;
        let mut fake = FakeData::for_task(args.seed, SERVICES_STREAM);
        tasks.push(SeedTask::new("services", async move {
            let client = pool.acquire().await?;
            let rows = create_services(&client, &mut fake, &params).await?;
            Ok(TaskOutput::rows(rows))
        }));
    }

    {
        let pool = Arc::clone(&superuser);
        let params = plan.spare_parts;
        let mut fake = FakeData::for_task(args.seed, INVENTORY_STREAM);
        tasks.push(SeedTask::new("stockpile and spare parts", async move {
            let client = pool.acquire().await?;
            let stockpile_id = create_stockpile(&client, &mut fake).await?;
            let rows = create_spare_parts(&client, &mut fake, stockpile_id, &params).await?;
            Ok(TaskOutput::rows(rows + 1))
        }));
    }

    {
        let admin = if args.skip_employees_creation {
            None
        } else {
            Some(manager.pool(ADMIN)?)
        };
        let count = plan.employees.count;
        let path = args.credentials_path.clone();
        let mut fake = FakeData::for_task(args.seed, EMPLOYEES_STREAM);
        tasks.push(SeedTask::new("employees", async move {
            let credentials = match admin {
                Some(pool) => {
                    let client = pool.acquire().await?;
                    create_employees(&client, &mut fake, count).await?
                }
                None => {
                    info!("Skipping employee creation");
                    Vec::new()
                }
            };
            write_credentials(&path, &credentials)?;
            Ok(TaskOutput {
                rows: credentials.len() as u64,
                credentials,
            })
        }));
    }

    Ok(tasks)
}
