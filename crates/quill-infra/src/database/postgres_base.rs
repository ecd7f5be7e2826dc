use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel, Order,
    PaginatorTrait, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
};
use uuid::Uuid;

use quill_core::error::RepoError;
use quill_core::pagination::{SearchQuery, SortDirection, SortField};
use quill_core::ports::BaseRepository;

/// Columns the generic repository needs to search an entity.
pub trait SearchableEntity: EntityTrait {
    /// Domain record a row converts to and from.
    type Domain;

    type Field: SortField;

    /// Columns carrying a unique index, used to name the column in a
    /// unique-violation error.
    const UNIQUE_COLUMNS: &'static [&'static str];

    fn sort_column(field: Self::Field) -> Self::Column;

    /// Text column matched by the listing filter.
    fn filter_column() -> Self::Column;

    fn created_at_column() -> Self::Column;

    fn id_column() -> Self::Column;
}

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// `LIKE` wildcards in user input must match literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match on the entity's filter column.
pub(crate) fn contains_filter<E: SearchableEntity>(filter: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&filter.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(E::filter_column()))).like(LikeExpr::new(pattern).escape('\\'))
}

fn filtered<E: SearchableEntity>(filter: Option<&str>) -> Select<E> {
    match filter {
        Some(filter) => E::find().filter(contains_filter::<E>(filter)),
        None => E::find(),
    }
}

pub(crate) fn query_err(err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

fn write_err<E: SearchableEntity>(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            let column = E::UNIQUE_COLUMNS
                .iter()
                .find(|column| detail.contains(*column))
                .copied()
                .unwrap_or("value");
            tracing::warn!(column, "Unique constraint rejected write");
            RepoError::UniqueViolation(column.to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => RepoError::Constraint(detail),
        _ => match err {
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => query_err(other),
        },
    }
}

#[async_trait]
impl<E> BaseRepository<E::Domain, E::Field> for PostgresBaseRepository<E>
where
    E: SearchableEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
    E::Domain: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<E::Domain>, RepoError> {
        let result = E::find_by_id(id).one(&self.db).await.map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, entity: E::Domain) -> Result<E::Domain, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(write_err::<E>)?;

        Ok(model.into())
    }

    async fn replace(&self, entity: E::Domain) -> Result<E::Domain, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model
            .update(&self.db)
            .await
            .map_err(write_err::<E>)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<E::Domain, RepoError> {
        let existing = E::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .ok_or(RepoError::NotFound)?;

        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_err::<E>)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(existing.into())
    }

    async fn scan(&self, query: &SearchQuery<E::Field>) -> Result<Vec<E::Domain>, RepoError> {
        let order = match query.sort_dir {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        // created_at then id break ties so pages never overlap
        let models = filtered::<E>(query.filter.as_deref())
            .order_by(E::sort_column(query.sort), order)
            .order_by(E::created_at_column(), Order::Asc)
            .order_by(E::id_column(), Order::Asc)
            .offset(query.skip())
            .limit(query.limit())
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: Option<&str>) -> Result<u64, RepoError> {
        filtered::<E>(filter)
            .count(&self.db)
            .await
            .map_err(query_err)
    }
}
