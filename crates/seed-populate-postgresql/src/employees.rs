//! Employee provisioning through the `create_user` routine.
//!
//! `create_user(name, experience, age, salary, login, password, role,
//! service_center_id)` creates the employee row, its database login and the
//! role-tagged association in one call.

use crate::error::SeedError;
use crate::model::{sql_literal, Credential, EmployeeRole};
use crate::random_entity::EntityId;
use seed_generator::{Bounds, FakeData};
use std::io::Write;
use std::path::Path;
use tokio_postgres::Client;
use tracing::{debug, info};

const EXPERIENCE_YEARS: Bounds<i32> = Bounds { min: 0, max: 30 };
const AGE_YEARS: Bounds<i32> = Bounds { min: 18, max: 65 };
const SALARY: Bounds<f64> = Bounds {
    min: 30000.0,
    max: 150000.0,
};
const PASSWORD_LEN: usize = 10;

/// Administrator login to provision.
#[derive(Debug, Clone)]
pub struct AdminParams {
    pub login: String,
    pub password: String,
    pub full_name: String,
}

fn create_user_sql(role: EmployeeRole) -> String {
    format!(
        "SELECT create_user($1, $2, $3, $4::numeric, $5, $6, {}, $7)",
        sql_literal(role.as_str())
    )
}

/// Provision the administrator unless one exists.
///
/// Returns [`SeedError::AlreadyProvisioned`] when an `Administrator`
/// association is already present; callers treat that as a skip.
pub async fn init_admin(client: &Client, params: &AdminParams) -> Result<(), SeedError> {
    let row = client
        .query_one(
            "SELECT COUNT(*) FROM employee_service_center WHERE employee_role::text = $1",
            &[&EmployeeRole::Administrator.as_str()],
        )
        .await?;
    let count: i64 = row.try_get(0)?;
    if count > 0 {
        return Err(SeedError::AlreadyProvisioned(format!(
            "{count} administrator(s) already exist"
        )));
    }

    let center = client
        .query_opt(
            "SELECT MIN(service_center_id) FROM service_centers HAVING COUNT(*) > 0",
            &[],
        )
        .await?
        .map(|row| row.try_get::<_, EntityId>(0))
        .transpose()?
        .ok_or_else(|| {
            SeedError::Configuration("an administrator needs at least one service center".into())
        })?;

    let experience = 0i32;
    let age = 30i32;
    let salary = rust_decimal::Decimal::ZERO;
    client
        .execute(
            create_user_sql(EmployeeRole::Administrator).as_str(),
            &[
                &params.full_name,
                &experience,
                &age,
                &salary,
                &params.login,
                &params.password,
                &center,
            ],
        )
        .await
        .map_err(|e| SeedError::insert("administrator", e))?;

    info!("Provisioned administrator '{}' at service center {}", params.login, center);
    Ok(())
}

/// Create `count` employees with random staff roles and centers.
///
/// Returns the credentials of every employee created, in creation order.
/// The first failing call aborts the run.
pub async fn create_employees(
    client: &Client,
    fake: &mut FakeData,
    count: usize,
) -> Result<Vec<Credential>, SeedError> {
    let center_ids: Vec<EntityId> = client
        .query("SELECT service_center_id FROM service_centers", &[])
        .await?
        .iter()
        .map(|row| row.try_get(0))
        .collect::<Result<_, _>>()?;
    if center_ids.is_empty() && count > 0 {
        return Err(SeedError::not_found("service_centers"));
    }

    let mut credentials = Vec::with_capacity(count);
    for i in 0..count {
        let role = fake
            .pick(&EmployeeRole::STAFF)
            .copied()
            .unwrap_or(EmployeeRole::Analyst);
        let center_id = fake.pick(&center_ids).copied().unwrap_or_default();
        let name = fake.name();
        let experience = fake.int_in(EXPERIENCE_YEARS);
        let age = fake.int_in(AGE_YEARS);
        let salary = fake.price(SALARY);
        let credential = Credential {
            login: fake.username(),
            password: fake.password(PASSWORD_LEN..PASSWORD_LEN + 1),
        };

        client
            .execute(
                create_user_sql(role).as_str(),
                &[
                    &name,
                    &experience,
                    &age,
                    &salary,
                    &credential.login,
                    &credential.password,
                    &center_id,
                ],
            )
            .await
            .map_err(|e| SeedError::insert(format!("employee {}", i + 1), e))?;

        debug!("Created {} '{}' at center {}", role, credential.login, center_id);
        credentials.push(credential);
    }

    Ok(credentials)
}

/// Write credentials as a pretty JSON array of `{login, password}`.
pub fn write_credentials(path: &Path, credentials: &[Credential]) -> Result<(), SeedError> {
    let mut file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, credentials)?;
    file.write_all(b"\n")?;
    file.flush()?;
    info!("Saved {} credentials to {}", credentials.len(), path.display());
    Ok(())
}
