//! Generic CRUD over any SeaORM entity.
//!
//! [`CrudService`] is parameterized by the entity's active model `A`, its create
//! input `C` and its update input `U`. Entity-specific services wrap one and add
//! their own invariants on top. Every write runs in its own database transaction
//! that is committed on success and rolled back before an error is returned.

use crate::{
    entities::{customer, plan, transaction},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IntoActiveModel, Iterable, PaginatorTrait,
    PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder, QuerySelect, Select, TransactionTrait,
};
use std::marker::PhantomData;
use tracing::{error, info};

/// The model type produced by active model `A`
pub type ModelOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Model;

type KeyOf<A> =
    <<<A as ActiveModelTrait>::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Input accepted by [`CrudService::create`].
pub trait CreateInput<A>: IntoActiveModel<A> + Send
where
    A: ActiveModelTrait,
{
    /// Checks field constraints before anything touches the database.
    fn check(&self) -> Result<()>;
}

/// Partial input accepted by [`CrudService::update`].
pub trait UpdateInput<A>: Send {
    fn check(&self) -> Result<()>;

    /// Writes only the supplied fields into `model`.
    fn apply_to(self, model: &mut A);
}

/// Models that expose their integer identifier, for logging.
pub trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for customer::Model {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for plan::Model {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for transaction::Model {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Orders a query by primary key, which for autoincrement ids is insertion order.
pub fn insertion_order<E: EntityTrait>(query: Select<E>) -> Select<E> {
    E::PrimaryKey::iter().fold(query, |query, key| query.order_by_asc(key.into_column()))
}

/// Commits `txn` when `result` is `Ok`, otherwise rolls it back, then returns `result`.
pub async fn finish<T>(txn: DatabaseTransaction, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                error!("Rollback failed after {}: {}", err, rollback_err);
            }
            Err(err)
        }
    }
}

/// CRUD operations for one entity type
pub struct CrudService<A, C, U> {
    entity_name: &'static str,
    _marker: PhantomData<fn() -> (A, C, U)>,
}

impl<A, C, U> CrudService<A, C, U> {
    /// `entity_name` is used in `NotFound` errors and log lines.
    #[must_use]
    pub const fn new(entity_name: &'static str) -> Self {
        Self {
            entity_name,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn entity_name(&self) -> &'static str {
        self.entity_name
    }
}

impl<A, C, U> CrudService<A, C, U>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    ModelOf<A>: IntoActiveModel<A> + Keyed + Send + Sync,
    i64: Into<KeyOf<A>>,
    C: CreateInput<A>,
    U: UpdateInput<A>,
{
    /// Fetches one record, `None` if it does not exist.
    pub async fn get<Db: ConnectionTrait>(&self, db: &Db, id: i64) -> Result<Option<ModelOf<A>>> {
        A::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Fetches one record or fails with `NotFound(entity, id)`.
    pub async fn get_or_404<Db: ConnectionTrait>(&self, db: &Db, id: i64) -> Result<ModelOf<A>> {
        self.get(db, id)
            .await?
            .ok_or_else(|| Error::not_found(self.entity_name, id))
    }

    /// One page of records in insertion order. `skip`/`limit` are validated by the caller.
    pub async fn list<Db: ConnectionTrait>(
        &self,
        db: &Db,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ModelOf<A>>> {
        insertion_order(A::Entity::find())
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Total number of records, used for pagination metadata.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn count<Db: ConnectionTrait>(&self, db: &Db) -> Result<u64> {
        A::Entity::find().count(db).await.map_err(Into::into)
    }

    /// Validates and inserts a new record, returning it with its generated id.
    ///
    /// The insert runs in its own transaction. A unique or foreign-key violation
    /// raised by the database is reported as `Conflict`, so a uniqueness rule
    /// holds even when two callers race past an application-level lookup.
    ///
    /// # Errors
    /// Returns `Validation` if `input.check()` fails, `Conflict` on a constraint
    /// violation, or a database error.
    pub async fn create(&self, db: &DatabaseConnection, input: C) -> Result<ModelOf<A>> {
        input.check()?;
        let active: A = input.into_active_model();

        let txn = db.begin().await?;
        let result = active.insert(&txn).await.map_err(|e| {
            Error::from_write(e, "Resource already exists or violates constraints")
        });
        let model = finish(txn, result).await?;

        info!("Created {} with id {}", self.entity_name, model.key());
        Ok(model)
    }

    /// Applies the fields present in `input` to `model` and persists them.
    ///
    /// An input that changes nothing returns `model` without a write.
    ///
    /// # Arguments
    /// * `model` - The current row, usually from [`CrudService::get_or_404`]
    /// * `input` - Partial update; unset fields are left untouched
    ///
    /// # Errors
    /// Returns `Validation`, `Conflict` on a constraint violation, or a database error.
    pub async fn update(
        &self,
        db: &DatabaseConnection,
        model: ModelOf<A>,
        input: U,
    ) -> Result<ModelOf<A>> {
        input.check()?;
        let mut active: A = model.clone().into_active_model();
        input.apply_to(&mut active);
        if !active.is_changed() {
            return Ok(model);
        }

        let txn = db.begin().await?;
        let result = active
            .update(&txn)
            .await
            .map_err(|e| Error::from_write(e, "Update violates constraints"));
        let updated = finish(txn, result).await?;

        info!("Updated {} with id {}", self.entity_name, updated.key());
        Ok(updated)
    }

    /// Removes a record, failing with `NotFound` if it does not exist.
    ///
    /// Rows still referenced by another table are not removed; the foreign-key
    /// violation comes back as `Conflict` and the transaction is rolled back.
    pub async fn delete(&self, db: &DatabaseConnection, id: i64) -> Result<()> {
        let txn = db.begin().await?;
        let result = self.delete_in(&txn, id).await;
        finish(txn, result).await?;

        info!("Deleted {} with id {}", self.entity_name, id);
        Ok(())
    }

    async fn delete_in(&self, txn: &DatabaseTransaction, id: i64) -> Result<()> {
        self.get_or_404(txn, id).await?;
        A::Entity::delete_by_id(id)
            .exec(txn)
            .await
            .map_err(|e| {
                Error::from_write(
                    e,
                    &format!("{} is still referenced by other records", self.entity_name),
                )
            })?;
        Ok(())
    }
}
