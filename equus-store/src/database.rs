use equus_booking::ValidationRule;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

#[derive(sqlx::FromRow)]
struct RuleRow {
    name: String,
    rule: Json<ValidationRule>,
    priority: i32,
    is_active: bool,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations").run(&self.pool).await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Validation rules stored in the database, layered over `defaults`.
    /// A stored row replaces the default rule with the same name.
    pub async fn fetch_validation_rules(
        &self,
        defaults: Vec<ValidationRule>,
    ) -> Result<Vec<ValidationRule>, sqlx::Error> {
        let rows: Vec<RuleRow> = sqlx::query_as(
            "SELECT name, rule, priority, is_active FROM validation_rules",
        )
        .fetch_all(&self.pool)
        .await?;

        let rules = merge_rules(defaults, rows);
        info!("Loaded {} validation rules", rules.len());
        Ok(rules)
    }
}

/// Layer stored rows over `defaults`. A row replaces the default rule with the
/// same name or is appended; the row's name, priority and active flag win over
/// whatever the JSON document carries.
fn merge_rules(defaults: Vec<ValidationRule>, rows: Vec<RuleRow>) -> Vec<ValidationRule> {
    let mut rules = defaults;
    for row in rows {
        let Json(mut rule) = row.rule;
        if rule.name != row.name {
            warn!("Validation rule row {} carries name {}, using row name", row.name, rule.name);
        }
        rule.name = row.name;
        rule.priority = row.priority;
        rule.is_active = row.is_active;

        match rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
    }
    rules
}
