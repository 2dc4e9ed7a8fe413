//! PostgreSQL-backed `NoteRepository`.
//!
//! A note row and its `note_tags` rows are written in one transaction; tag
//! associations are loaded with a single join per query.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{NotePersistenceError, NoteRepository};
use crate::domain::{Note, NoteId, Slug, Tag};

use super::diesel_basic_error_mapping::{
    PortErrorCtors, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_tag_repository::row_to_tag;
use super::models::{NewNoteRow, NoteRow, NoteTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{note_tags, notes, tags};

/// Diesel implementation of [`NoteRepository`].
#[derive(Clone)]
pub struct DieselNoteRepository {
    pool: DbPool,
}

impl DieselNoteRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotePersistenceError {
    map_basic_pool_error(error, |message| NotePersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> NotePersistenceError {
    map_basic_diesel_error(
        error,
        PortErrorCtors {
            query: |message| NotePersistenceError::query(message),
            connection: |message| NotePersistenceError::connection(message),
            unique: |constraint| NotePersistenceError::unique_violation(constraint),
        },
    )
}

/// Load the tags of every note in `rows` and assemble aggregates.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<NoteRow>,
) -> Result<Vec<Note>, NotePersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let links: Vec<(Uuid, TagRow)> = note_tags::table
        .inner_join(tags::table)
        .filter(note_tags::note_id.eq_any(&ids))
        .order_by((note_tags::note_id, note_tags::position))
        .select((note_tags::note_id, TagRow::as_select()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut by_note: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (note_id, row) in links {
        let tag = row_to_tag(row).map_err(|err| NotePersistenceError::query(err.to_string()))?;
        by_note.entry(note_id).or_default().push(tag);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let tags = by_note.remove(&row.id).unwrap_or_default();
            Note::restore(NoteId::from_uuid(row.id), row.title, row.body, tags)
        })
        .collect())
}

fn link_rows(note: &Note) -> Result<Vec<NoteTagRow>, NotePersistenceError> {
    note.tags()
        .enumerate()
        .map(|(index, tag)| {
            let position = i32::try_from(index)
                .map_err(|_| NotePersistenceError::query("too many tags on note"))?;
            Ok(NoteTagRow {
                note_id: *note.id().as_uuid(),
                tag_id: *tag.id().as_uuid(),
                position,
            })
        })
        .collect()
}

#[async_trait]
impl NoteRepository for DieselNoteRepository {
    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, NotePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NoteRow> = notes::table
            .filter(notes::id.eq(id.as_uuid()))
            .select(NoteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(hydrate(&mut conn, rows).await?.pop())
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Vec<Note>, NotePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NoteRow> = notes::table
            .filter(notes::slug.eq(slug.as_ref()))
            .select(NoteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn list(&self) -> Result<Vec<Note>, NotePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NoteRow> = notes::table
            .select(NoteRow::as_select())
            .order_by((notes::title, notes::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn save(&self, note: &Note) -> Result<(), NotePersistenceError> {
        let links = link_rows(note)?;
        let note_id = *note.id().as_uuid();
        let row = NewNoteRow {
            id: note_id,
            title: note.title(),
            body: note.body(),
            slug: note.slug().as_ref(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(notes::table)
                    .values(&row)
                    .on_conflict(notes::id)
                    .do_update()
                    .set((
                        notes::title.eq(excluded(notes::title)),
                        notes::body.eq(excluded(notes::body)),
                        notes::slug.eq(excluded(notes::slug)),
                    ))
                    .execute(conn)
                    .await?;
                diesel::delete(note_tags::table.filter(note_tags::note_id.eq(note_id)))
                    .execute(conn)
                    .await?;
                if !links.is_empty() {
                    diesel::insert_into(note_tags::table)
                        .values(&links)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn remove(&self, id: &NoteId) -> Result<bool, NotePersistenceError> {
        let note_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(note_tags::table.filter(note_tags::note_id.eq(note_id)))
                    .execute(conn)
                    .await?;
                let deleted = diesel::delete(notes::table.filter(notes::id.eq(note_id)))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TagId, TagName};
    use rstest::rstest;

    #[rstest]
    fn link_rows_keep_submission_order() {
        let mut note = Note::new(NoteId::random(), "Title", "Body");
        let first = Tag::new(TagId::random(), TagName::new("b").expect("valid"));
        let second = Tag::new(TagId::random(), TagName::new("a").expect("valid"));
        note.replace_tags([first.clone(), second.clone()]);

        let rows = link_rows(&note).expect("rows");
        let order: Vec<_> = rows.iter().map(|row| (row.tag_id, row.position)).collect();
        assert_eq!(
            order,
            vec![(*first.id().as_uuid(), 0), (*second.id().as_uuid(), 1)]
        );
    }

    #[rstest]
    fn diesel_connection_errors_map_to_connection() {
        let error = map_pool_error(PoolError::build("bad url"));
        assert!(matches!(error, NotePersistenceError::Connection { .. }));
    }
}
