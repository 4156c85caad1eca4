//! Database connection and schema creation.
//!
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the models.
//! Creation is idempotent and runs in foreign-key dependency order.

use super::AppConfig;
use crate::entities::{Customer, CustomerPlan, Plan, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};

/// Opens a connection pool to `config.database_url`.
///
/// SQL statement logging follows `config.debug`.
pub async fn connect(config: &AppConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(config.debug);
    Database::connect(options).await.map_err(Into::into)
}

/// Creates every table that does not exist yet.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut customers = schema.create_table_from_entity(Customer);
    let mut plans = schema.create_table_from_entity(Plan);
    let mut customer_plans = schema.create_table_from_entity(CustomerPlan);
    let mut transactions = schema.create_table_from_entity(Transaction);

    for table in [
        customers.if_not_exists(),
        plans.if_not_exists(),
        customer_plans.if_not_exists(),
        transactions.if_not_exists(),
    ] {
        db.execute(builder.build(&*table)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CustomerModel, CustomerPlanModel, PlanModel, TransactionModel};
    use sea_orm::{EntityTrait, QuerySelect};

    fn memory_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_connect_and_create_tables() -> Result<()> {
        let db = connect(&memory_config()).await?;
        create_tables(&db).await?;

        let _: Vec<CustomerModel> = Customer::find().limit(1).all(&db).await?;
        let _: Vec<PlanModel> = Plan::find().limit(1).all(&db).await?;
        let _: Vec<CustomerPlanModel> = CustomerPlan::find().limit(1).all(&db).await?;
        let _: Vec<TransactionModel> = Transaction::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_twice() -> Result<()> {
        let db = connect(&memory_config()).await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
