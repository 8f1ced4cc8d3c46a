use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, PrimaryKeyTrait, Select,
};

use quill_core::domain::BlogEvent;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, EventPublisher};

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    events: Arc<dyn EventPublisher>,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn, events: Arc<dyn EventPublisher>) -> Self {
        Self {
            db,
            events,
            _entity: PhantomData,
        }
    }

    /// Publish a lifecycle event. The write is already committed, so a
    /// failed publish is logged rather than reported to the caller.
    pub(crate) async fn emit(&self, event: BlogEvent) {
        if let Err(e) = self.events.publish(&event).await {
            tracing::warn!(event = event.name(), error = %e, "Failed to publish blog event");
        }
    }
}

/// Count the rows of `query` and fetch one 1-based page of it.
pub(crate) async fn fetch_page<E>(
    db: &DbConn,
    query: Select<E>,
    page: u64,
    per_page: u64,
) -> Result<(Vec<E::Model>, u64), DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let paginator = query.paginate(db, per_page.max(1));
    let total = paginator.num_items().await?;
    let models = paginator.fetch_page(page.max(1) - 1).await?;
    Ok((models, total))
}

/// Map a SeaORM error onto the repository error taxonomy.
pub(crate) fn db_err(e: DbErr) -> RepoError {
    match e {
        DbErr::RecordNotFound(_) => RepoError::NotFound,
        DbErr::Conn(err) => RepoError::Connection(err.to_string()),
        DbErr::ConnectionAcquire(err) => RepoError::Connection(err.to_string()),
        other => {
            let err_str = other.to_string();
            if err_str.contains("duplicate") || err_str.contains("unique") {
                RepoError::Constraint("Entity already exists".to_string())
            } else if err_str.contains("foreign key") {
                RepoError::Constraint("Referenced entity does not exist or is still in use".to_string())
            } else {
                RepoError::Query(err_str)
            }
        }
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(&self.db).await.map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();

        // Every column is set, so try the row as an update first.
        let model = match active_model.clone().update(&self.db).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => active_model.insert(&self.db).await.map_err(db_err)?,
            Err(e) => return Err(db_err(e)),
        };

        Ok(model.into())
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let result = E::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
