//! Shared test utilities.
//!
//! This module provides helpers for setting up in-memory test databases and
//! creating entities with sensible defaults.

use crate::{
    api::AppState,
    config::AppConfig,
    core::{CustomerService, PlanService, TransactionService},
    entities,
    errors::Result,
    models::{CustomerCreate, PlanCreate, TransactionCreate},
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test customer registered under `email`.
///
/// # Defaults
/// * `name`: `"Prueba"`
/// * `description`: `"Test"`
/// * `age`: 30
pub async fn create_test_customer(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::customer::Model> {
    CustomerService::new()
        .create(
            db,
            CustomerCreate {
                name: "Prueba".to_string(),
                description: Some("Test".to_string()),
                age: 30,
                email: email.to_string(),
            },
        )
        .await
}

/// Creates a test plan priced at 1000 cents.
pub async fn create_test_plan(db: &DatabaseConnection, name: &str) -> Result<entities::plan::Model> {
    PlanService::default()
        .create(
            db,
            PlanCreate {
                name: name.to_string(),
                price: Some(1000),
                description: "Test plan".to_string(),
            },
        )
        .await
}

/// Creates a test transaction for `customer_id`.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    customer_id: i64,
    amount: i64,
) -> Result<entities::transaction::Model> {
    TransactionService::new()
        .create(
            db,
            TransactionCreate {
                amount,
                description: "Test transaction".to_string(),
                customer_id,
            },
        )
        .await
}

/// Sets up a test database holding one customer (`test@test.com`).
/// Returns (db, customer) for common test scenarios.
pub async fn setup_with_customer() -> Result<(DatabaseConnection, entities::customer::Model)> {
    let db = setup_test_db().await?;
    let customer = create_test_customer(&db, "test@test.com").await?;
    Ok((db, customer))
}

/// Default configuration pointed at an in-memory database.
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        ..AppConfig::default()
    }
}

/// Application state over a fresh in-memory database.
pub async fn test_state() -> Result<AppState> {
    let db = setup_test_db().await?;
    Ok(AppState::new(db, test_config()))
}
