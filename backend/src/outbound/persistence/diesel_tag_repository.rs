//! PostgreSQL-backed `TagRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{TagPersistenceError, TagRepository};
use crate::domain::{Tag, TagId, TagName};

use super::diesel_basic_error_mapping::{
    PortErrorCtors, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::TagRow;
use super::pool::{DbPool, PoolError};
use super::schema::{note_tags, tags};

/// Diesel implementation of [`TagRepository`].
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TagPersistenceError {
    map_basic_pool_error(error, |message| TagPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> TagPersistenceError {
    map_basic_diesel_error(
        error,
        PortErrorCtors {
            query: |message| TagPersistenceError::query(message),
            connection: |message| TagPersistenceError::connection(message),
            unique: |constraint| TagPersistenceError::unique_violation(constraint),
        },
    )
}

pub(super) fn row_to_tag(row: TagRow) -> Result<Tag, TagPersistenceError> {
    let name = TagName::new(&row.name)
        .map_err(|err| TagPersistenceError::query(format!("invalid stored tag name: {err}")))?;
    Ok(Tag::new(TagId::from_uuid(row.id), name))
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, TagPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .filter(tags::id.eq(id.as_uuid()))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_tag).transpose()
    }

    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagPersistenceError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .filter(tags::id.eq_any(&uuids))
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_tag).collect()
    }

    async fn find_by_name(&self, name: &TagName) -> Result<Option<Tag>, TagPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .filter(tags::name.eq(name.as_ref()))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_tag).transpose()
    }

    async fn list(&self) -> Result<Vec<Tag>, TagPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .select(TagRow::as_select())
            .order_by(tags::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_tag).collect()
    }

    async fn save(&self, tag: &Tag) -> Result<(), TagPersistenceError> {
        let row = TagRow {
            id: *tag.id().as_uuid(),
            name: tag.name().to_string(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(tags::table)
            .values(&row)
            .on_conflict(tags::id)
            .do_update()
            .set(tags::name.eq(excluded(tags::name)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn remove(&self, id: &TagId) -> Result<bool, TagPersistenceError> {
        let tag_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(note_tags::table.filter(note_tags::tag_id.eq(tag_id)))
                    .execute(conn)
                    .await?;
                let deleted = diesel::delete(tags::table.filter(tags::id.eq(tag_id)))
                    .execute(conn)
                    .await?;
                Ok(deleted > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
