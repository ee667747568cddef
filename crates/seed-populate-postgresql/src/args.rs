//! CLI argument definitions for the PostgreSQL seeder.

use crate::error::SeedError;
use crate::pool::ConnectionConfig;
use clap::Args;
use std::path::PathBuf;

/// Connection settings for the target database.
///
/// The environment variable names match the `.env` files used to provision
/// the schema.
#[derive(Args, Clone, Debug)]
pub struct PostgreSQLConnectionArgs {
    /// Database host
    #[arg(long, env = "DB_IP", default_value = "localhost")]
    pub db_ip: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value = "5432")]
    pub db_port: u16,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: String,

    /// Superuser login used for reference data and orders
    #[arg(long, env = "DB_SUPERUSER_LOGIN")]
    pub db_superuser: String,

    /// Superuser password
    #[arg(long, env = "DB_SUPERUSER_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Connections per role pool
    #[arg(long, default_value = "5")]
    pub pool_size: usize,
}

impl PostgreSQLConnectionArgs {
    /// Connection settings for the superuser.
    pub fn superuser(&self) -> ConnectionConfig {
        self.for_user(&self.db_superuser, &self.db_password)
    }

    /// Connection settings for another login on the same database.
    pub fn for_user(&self, user: &str, password: &str) -> ConnectionConfig {
        ConnectionConfig {
            host: self.db_ip.clone(),
            port: self.db_port,
            user: user.to_string(),
            password: password.to_string(),
            dbname: self.db_name.clone(),
        }
    }
}

/// Seeding switches and count overrides.
#[derive(Args, Clone, Debug)]
pub struct SeedArgs {
    /// YAML plan with every tunable quantity (built-in plan when omitted)
    #[arg(long, value_name = "PATH")]
    pub plan: Option<PathBuf>,

    /// Skip initializing the administrator
    #[arg(long)]
    pub skip_admin_init: bool,

    /// Skip creating employees
    #[arg(long)]
    pub skip_employees_creation: bool,

    /// Number of employees to create
    #[arg(long, visible_alias = "ec")]
    pub employees_count: Option<usize>,

    /// Number of order attempts
    #[arg(long, visible_alias = "oc")]
    pub orders_count: Option<usize>,

    /// Number of customers to create
    #[arg(long, visible_alias = "cc")]
    pub customers_count: Option<usize>,

    /// Number of service centers to create
    #[arg(long, visible_alias = "sc")]
    pub service_centers_count: Option<usize>,

    /// Commit the order batch every K attempts (single transaction when omitted)
    #[arg(long)]
    pub commit_every: Option<usize>,

    /// Time budget for the concurrent seeding phase (e.g. "300", "300s", "5m")
    #[arg(long)]
    pub deadline: Option<String>,

    /// Random seed for deterministic generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Schema holding the seeded tables
    #[arg(long, default_value = "public")]
    pub schema: String,

    /// Where generated employee credentials are written
    #[arg(long, default_value = "/tmp/creds.json")]
    pub credentials_path: PathBuf,

    /// Administrator login
    #[arg(long, env = "ADMIN_LOGIN", default_value = "admin_user")]
    pub admin_login: String,

    /// Administrator password (needed unless both admin steps are skipped)
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

impl SeedArgs {
    /// Whether the run connects as, or provisions, the administrator.
    pub fn needs_admin(&self) -> bool {
        !self.skip_admin_init || !self.skip_employees_creation
    }

    /// The administrator password, required once an admin step runs.
    pub fn admin_password(&self) -> Result<&str, SeedError> {
        self.admin_password.as_deref().ok_or_else(|| {
            SeedError::Configuration(
                "--admin-password (or ADMIN_PASSWORD) is required unless both \
                 --skip-admin-init and --skip-employees-creation are given"
                    .to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        seed: SeedArgs,
    }

    #[test]
    fn test_admin_password_optional_when_admin_steps_skipped() {
        let args = TestCli::try_parse_from([
            "station-seed",
            "--skip-admin-init",
            "--skip-employees-creation",
        ])
        .unwrap()
        .seed;
        assert!(!args.needs_admin());
    }

    #[test]
    fn test_admin_password_required_for_admin_steps() {
        let mut args = TestCli::try_parse_from(["station-seed", "--skip-admin-init"])
            .unwrap()
            .seed;
        assert!(args.needs_admin());
        args.admin_password = None;
        let err = args.admin_password().unwrap_err();
        assert!(matches!(err, SeedError::Configuration(_)));

        args.admin_password = Some("secret".to_string());
        assert_eq!(args.admin_password().unwrap(), "secret");
    }
}
