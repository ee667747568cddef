//! Seeding plan: every tunable quantity of a run.

use super::duration::parse_duration;
use anyhow::Context;
use seed_generator::Bounds;
use seed_populate_postgresql::{
    CustomerParams, OrderPlan, ReceiptParams, SeedArgs, ServiceCenterParams, ServiceParams,
    SparePartParams,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePlan {
    pub count: usize,
}

/// Quantities and ranges for one seeding run, loadable from YAML.
///
/// ```yaml
/// service_centers: { count: 50, city_count: 3 }
/// employees: { count: 150 }
/// customers: { count: 100, spent_money: { min: 0.0, max: 150000.0 } }
/// services: { count: 20, price: { min: 2000.0, max: 50000.0 } }
/// spare_parts:
///   count: 30
///   price: { min: 500.0, max: 500000.0 }
///   stock_quantity: { min: 10, max: 100 }
/// orders:
///   attempts: 200
///   parts_per_order: 5
///   services_per_order: 2
///   purchase_price: { min: 500.0, max: 500000.0 }
///   quantity: { min: 1, max: 5 }
///   schedule_horizon_days: 365
/// receipts: { bonus_fraction: { min: 0.1, max: 1.0 } }
/// deadline: 300s
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPlan {
    pub service_centers: ServiceCenterParams,
    pub employees: EmployeePlan,
    pub customers: CustomerParams,
    pub services: ServiceParams,
    pub spare_parts: SparePartParams,
    pub orders: OrderPlan,
    pub receipts: ReceiptParams,
    /// Time budget of the concurrent seeding phase ("300", "300s", "5m", "1h").
    pub deadline: String,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            service_centers: ServiceCenterParams {
                count: 50,
                city_count: 3,
            },
            employees: EmployeePlan { count: 150 },
            customers: CustomerParams {
                count: 100,
                spent_money: Bounds::new(0.0, 150000.0),
            },
            services: ServiceParams {
                count: 20,
                price: Bounds::new(2000.0, 50000.0),
            },
            spare_parts: SparePartParams {
                count: 30,
                price: Bounds::new(500.0, 500000.0),
                stock_quantity: Bounds::new(10, 100),
            },
            orders: OrderPlan {
                attempts: 200,
                parts_per_order: 5,
                services_per_order: 2,
                purchase_price: Bounds::new(500.0, 500000.0),
                quantity: Bounds::new(1, 5),
                schedule_horizon_days: 365,
                commit_every: None,
            },
            receipts: ReceiptParams {
                bonus_fraction: Bounds::new(0.1, 1.0),
            },
            deadline: "300s".to_string(),
        }
    }
}

impl SeedPlan {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed plan {}", path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse seed plan")
    }

    /// Built-in plan, or the plan file, with the CLI overrides applied.
    pub fn resolve(args: &SeedArgs) -> anyhow::Result<Self> {
        let mut plan = match &args.plan {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        plan.apply_overrides(args);
        plan.validate()?;
        Ok(plan)
    }

    /// Apply count, deadline and commit-granularity flags on top of the plan.
    pub fn apply_overrides(&mut self, args: &SeedArgs) {
        if let Some(count) = args.employees_count {
            self.employees.count = count;
        }
        if let Some(count) = args.orders_count {
            self.orders.attempts = count;
        }
        if let Some(count) = args.customers_count {
            self.customers.count = count;
        }
        if let Some(count) = args.service_centers_count {
            self.service_centers.count = count;
        }
        if let Some(k) = args.commit_every {
            self.orders.commit_every = Some(k);
        }
        if let Some(deadline) = &args.deadline {
            self.deadline = deadline.clone();
        }
    }

    pub fn deadline(&self) -> anyhow::Result<Duration> {
        parse_duration(&self.deadline)
    }

    /// Reject plans that cannot produce a meaningful run.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.customers.spent_money.validate("customers.spent_money")?;
        self.services.price.validate("services.price")?;
        self.spare_parts.price.validate("spare_parts.price")?;
        self.spare_parts
            .stock_quantity
            .validate("spare_parts.stock_quantity")?;
        self.orders.purchase_price.validate("orders.purchase_price")?;
        self.orders.quantity.validate("orders.quantity")?;
        self.receipts.bonus_fraction.validate("receipts.bonus_fraction")?;

        if self.service_centers.city_count == 0 {
            anyhow::bail!("service_centers.city_count must be at least 1");
        }
        if self.orders.quantity.min < 1 {
            anyhow::bail!("orders.quantity must start at 1 or more");
        }
        if self.spare_parts.stock_quantity.min < 0 {
            anyhow::bail!("spare_parts.stock_quantity cannot be negative");
        }
        for (name, bounds) in [
            ("customers.spent_money", self.customers.spent_money),
            ("services.price", self.services.price),
            ("spare_parts.price", self.spare_parts.price),
            ("orders.purchase_price", self.orders.purchase_price),
        ] {
            if bounds.min < 0.0 {
                anyhow::bail!("{name} cannot be negative");
            }
        }
        let fraction = self.receipts.bonus_fraction;
        if fraction.min < 0.0 || fraction.max > 1.0 {
            anyhow::bail!("receipts.bonus_fraction must lie within [0, 1]");
        }
        if self.orders.commit_every == Some(0) {
            anyhow::bail!("orders.commit_every must be at least 1");
        }
        self.deadline()
            .with_context(|| format!("Invalid deadline '{}'", self.deadline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        seed: SeedArgs,
    }

    fn args(extra: &[&str]) -> SeedArgs {
        let mut argv = vec!["station-seed", "--admin-password", "secret"];
        argv.extend_from_slice(extra);
        TestCli::parse_from(argv).seed
    }

    #[test]
    fn test_default_plan_is_valid() {
        let plan = SeedPlan::default();
        plan.validate().unwrap();
        assert_eq!(plan.deadline().unwrap(), Duration::from_secs(300));
        assert_eq!(plan.orders.quantity, Bounds::new(1, 5));
        assert_eq!(plan.orders.commit_every, None);
    }

    #[test]
    fn test_yaml_round_trip_of_default() {
        let yaml = serde_yaml::to_string(&SeedPlan::default()).unwrap();
        assert_eq!(SeedPlan::from_yaml(&yaml).unwrap(), SeedPlan::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
service_centers: {{ count: 5, city_count: 2 }}
employees: {{ count: 12 }}
customers: {{ count: 8, spent_money: {{ min: 0.0, max: 1000.0 }} }}
services: {{ count: 3, price: {{ min: 2000.0, max: 3000.0 }} }}
spare_parts:
  count: 4
  price: {{ min: 500.0, max: 900.0 }}
  stock_quantity: {{ min: 1, max: 10 }}
orders:
  attempts: 10
  parts_per_order: 2
  services_per_order: 1
  purchase_price: {{ min: 500.0, max: 900.0 }}
  quantity: {{ min: 1, max: 3 }}
  schedule_horizon_days: 30
  commit_every: 5
receipts: {{ bonus_fraction: {{ min: 0.5, max: 0.5 }} }}
deadline: 2m
"#
        )
        .unwrap();

        let plan = SeedPlan::from_file(file.path()).unwrap();
        plan.validate().unwrap();
        assert_eq!(plan.employees.count, 12);
        assert_eq!(plan.orders.commit_every, Some(5));
        assert_eq!(plan.deadline().unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_overrides_from_flags() {
        let mut plan = SeedPlan::default();
        plan.apply_overrides(&args(&[
            "--ec", "7", "--oc", "9", "--cc", "11", "--sc", "2", "--commit-every", "3",
            "--deadline", "1h",
        ]));

        assert_eq!(plan.employees.count, 7);
        assert_eq!(plan.orders.attempts, 9);
        assert_eq!(plan.customers.count, 11);
        assert_eq!(plan.service_centers.count, 2);
        assert_eq!(plan.orders.commit_every, Some(3));
        assert_eq!(plan.deadline().unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_no_flags_keep_plan() {
        let mut plan = SeedPlan::default();
        plan.apply_overrides(&args(&[]));
        assert_eq!(plan, SeedPlan::default());
    }

    #[test]
    fn test_validate_rejects_bad_plans() {
        let mut plan = SeedPlan::default();
        plan.orders.quantity = Bounds::new(5, 1);
        assert!(plan.validate().is_err());

        let mut plan = SeedPlan::default();
        plan.orders.quantity = Bounds::new(0, 5);
        assert!(plan.validate().is_err());

        let mut plan = SeedPlan::default();
        plan.service_centers.city_count = 0;
        assert!(plan.validate().is_err());

        let mut plan = SeedPlan::default();
        plan.receipts.bonus_fraction = Bounds::new(0.1, 1.5);
        assert!(plan.validate().is_err());

        let mut plan = SeedPlan::default();
        plan.deadline = "soon".to_string();
        assert!(plan.validate().is_err());

        let mut plan = SeedPlan::default();
        plan.orders.commit_every = Some(0);
        assert!(plan.validate().is_err());
    }
}
