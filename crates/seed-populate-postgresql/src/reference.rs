//! Single-table reference data: service centers, customers, services,
//! stockpile and spare parts.

use crate::error::SeedError;
use crate::model::{sql_literal, VehicleType};
use crate::random_entity::EntityId;
use seed_generator::{Bounds, FakeData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tokio_postgres::Client;
use tracing::{debug, info};

const SERVICE_NAMES: &[&str] = &[
    "Oil change",
    "Engine repair",
    "Tire fitting",
    "Suspension diagnostics",
    "Brake pad replacement",
    "Battery replacement",
    "Gearbox repair",
    "Body polishing",
    "Air conditioning recharge",
    "Computer diagnostics",
];

const PART_NAMES: &[&str] = &[
    "Oil filter", "Brake disc", "Starter", "Spark plug", "Ball joint",
    "Timing belt", "Fuel pump", "Shock absorber", "Wheel bearing", "Engine oil seal",
    "Shock absorber boot", "Radiator", "Brake pads", "Thermostat", "Front fender",
    "Headlight", "Tail light", "Muffler", "Clutch", "Drive belt",
    "Clutch cable", "Timing chain", "Oil pump", "Valve cover", "Water pump",
    "Fuel filter", "Head gasket", "Tie rod end", "Stabilizer bushing", "Control arm",
    "Heater core", "Alternator", "Recirculation valve", "EGR valve", "Drive shaft",
    "Turbocharger", "Manifold gasket", "Oil pressure sensor", "Temperature sensor",
    "Crankshaft pulley", "CV joint", "Fan belt", "Brake repair kit", "Clutch disc",
];

/// Service center generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceCenterParams {
    /// Centers to insert.
    pub count: usize,
    /// City names drawn; centers are spread over the distinct ones.
    pub city_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomerParams {
    pub count: usize,
    pub spent_money: Bounds<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceParams {
    pub count: usize,
    pub price: Bounds<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SparePartParams {
    pub count: usize,
    pub price: Bounds<f64>,
    pub stock_quantity: Bounds<i32>,
}

/// Draw up to `city_count` distinct city names.
fn draw_cities(fake: &mut FakeData, city_count: usize) -> Vec<String> {
    let cities: BTreeSet<String> = (0..city_count.max(1)).map(|_| fake.city()).collect();
    cities.into_iter().collect()
}

/// Insert service centers spread over a small set of cities.
pub async fn create_service_centers(
    client: &Client,
    fake: &mut FakeData,
    params: &ServiceCenterParams,
) -> Result<u64, SeedError> {
    let cities = draw_cities(fake, params.city_count);
    info!(
        "Creating {} service centers in {} cities",
        params.count,
        cities.len()
    );

    let statement = client
        .prepare(
            "INSERT INTO service_centers (full_address, city, postal_code, phone_number)
             VALUES ($1, $2, $3, $4)",
        )
        .await?;

    for i in 0..params.count {
        let city = fake.pick(&cities).cloned().ok_or_else(|| {
            SeedError::Configuration("no cities to place service centers in".into())
        })?;
        let address = fake.street_address(&city);
        let postal_code = fake.postal_code();
        let phone = format!("+{}", fake.phone());

        client
            .execute(&statement, &[&address, &city, &postal_code, &phone])
            .await
            .map_err(|e| SeedError::insert(format!("service center {}", i + 1), e))?;
    }

    Ok(params.count as u64)
}

/// Insert customers, then raise everyone's spent money by 1.00.
pub async fn create_customers(
    client: &Client,
    fake: &mut FakeData,
    params: &CustomerParams,
) -> Result<u64, SeedError> {
    let statement = client
        .prepare(
            "INSERT INTO customers (full_name, phone_number, spent_money)
             VALUES ($1, $2, $3::numeric)",
        )
        .await?;

    for i in 0..params.count {
        let full_name = fake.name();
        let phone = fake.phone();
        let spent_money = fake.price(params.spent_money);

        client
            .execute(&statement, &[&full_name, &phone, &spent_money])
            .await
            .map_err(|e| SeedError::insert(format!("customer {}", i + 1), e))?;
    }

    let updated = client
        .execute("UPDATE customers SET spent_money = spent_money + 1.00", &[])
        .await?;
    debug!("Adjusted spent money of {} customers", updated);

    Ok(params.count as u64)
}

/// Insert catalog services.
pub async fn create_services(
    client: &Client,
    fake: &mut FakeData,
    params: &ServiceParams,
) -> Result<u64, SeedError> {
    for i in 0..params.count {
        let name = fake.pick(SERVICE_NAMES).copied().unwrap_or(SERVICE_NAMES[0]);
        let vehicle_type = fake
            .pick(&VehicleType::ALL)
            .copied()
            .unwrap_or(VehicleType::Car);
        let price = fake.price(params.price);

        let sql = format!(
            "INSERT INTO services (full_name, vehicle_type, price) VALUES ($1, {}, $2::numeric)",
            sql_literal(vehicle_type.as_str())
        );
        client
            .execute(sql.as_str(), &[&name, &price])
            .await
            .map_err(|e| SeedError::insert(format!("service {}", i + 1), e))?;
    }

    Ok(params.count as u64)
}

/// Insert one stockpile and return its id.
pub async fn create_stockpile(client: &Client, fake: &mut FakeData) -> Result<EntityId, SeedError> {
    let city = fake.city();
    let address = fake.street_address(&city);
    let postal_code = fake.postal_code();
    let phone = fake.phone();

    let row = client
        .query_one(
            "INSERT INTO stockpile (full_address, postal_code, phone_number)
             VALUES ($1, $2, $3)
             RETURNING stockpile_id",
            &[&address, &postal_code, &phone],
        )
        .await
        .map_err(|e| SeedError::insert("stockpile", e))?;

    let id: EntityId = row.try_get(0)?;
    debug!("Created stockpile {}", id);
    Ok(id)
}

/// Insert spare parts stored in `stockpile_id`.
pub async fn create_spare_parts(
    client: &Client,
    fake: &mut FakeData,
    stockpile_id: EntityId,
    params: &SparePartParams,
) -> Result<u64, SeedError> {
    let statement = client
        .prepare(
            "INSERT INTO spare_parts (name, article_number, description, price, stock_quantity, stockpile_id)
             VALUES ($1, $2, $3, $4::numeric, $5, $6)",
        )
        .await?;

    for i in 0..params.count {
        let name = fake.pick(PART_NAMES).copied().unwrap_or(PART_NAMES[0]);
        let article_number = fake.int_in(Bounds::new(1, 200_000));
        let description = fake.sentence(10..11);
        let price = fake.price(params.price);
        let stock_quantity = fake.int_in(params.stock_quantity);

        client
            .execute(
                &statement,
                &[
                    &name,
                    &article_number,
                    &description,
                    &price,
                    &stock_quantity,
                    &stockpile_id,
                ],
            )
            .await
            .map_err(|e| SeedError::insert(format!("spare part {}", i + 1), e))?;
    }

    Ok(params.count as u64)
}
