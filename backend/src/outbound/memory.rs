//! In-process repositories used when no database is configured and by the
//! integration tests.
//!
//! One [`InMemoryStore`] implements all three repository ports over a single
//! lock so a note's tag associations always see the current tag records.
//! Notes keep tag identifiers only and are hydrated on read, matching the
//! join the Diesel adapter performs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    NotePersistenceError, NoteRepository, TagPersistenceError, TagRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Note, NoteId, Slug, Tag, TagId, TagName, User, UserId, Username};

#[derive(Debug, Clone)]
struct NoteRecord {
    id: NoteId,
    title: String,
    body: String,
    slug: Slug,
    tag_ids: Vec<TagId>,
}

#[derive(Debug, Default)]
struct Tables {
    notes: HashMap<NoteId, NoteRecord>,
    tags: HashMap<TagId, Tag>,
    users: HashMap<UserId, User>,
}

impl Tables {
    fn hydrate(&self, record: &NoteRecord) -> Note {
        let tags = record
            .tag_ids
            .iter()
            .filter_map(|id| self.tags.get(id).cloned());
        Note::restore(record.id, record.title.clone(), record.body.clone(), tags)
    }

    fn notes_where(&self, keep: impl Fn(&NoteRecord) -> bool) -> Vec<Note> {
        self.notes
            .values()
            .filter(|record| keep(record))
            .map(|record| self.hydrate(record))
            .collect()
    }
}

/// Shared in-memory tables for notes, tags, and users.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for InMemoryStore {
    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, NotePersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.notes.get(id).map(|record| tables.hydrate(record)))
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Vec<Note>, NotePersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.notes_where(|record| &record.slug == slug))
    }

    async fn list(&self) -> Result<Vec<Note>, NotePersistenceError> {
        let tables = self.tables.read().await;
        let mut notes = tables.notes_where(|_| true);
        notes.sort_by(|a, b| a.title().cmp(b.title()).then(a.id().cmp(&b.id())));
        Ok(notes)
    }

    async fn save(&self, note: &Note) -> Result<(), NotePersistenceError> {
        let mut tables = self.tables.write().await;
        let slug_taken = tables
            .notes
            .values()
            .any(|other| other.id != note.id() && &other.slug == note.slug());
        if slug_taken {
            return Err(NotePersistenceError::unique_violation("notes.slug"));
        }
        let tag_ids: Vec<TagId> = note.tags().map(Tag::id).collect();
        if let Some(missing) = tag_ids.iter().find(|id| !tables.tags.contains_key(*id)) {
            return Err(NotePersistenceError::query(format!(
                "tag {missing} does not exist"
            )));
        }
        tables.notes.insert(
            note.id(),
            NoteRecord {
                id: note.id(),
                title: note.title().to_owned(),
                body: note.body().to_owned(),
                slug: note.slug().clone(),
                tag_ids,
            },
        );
        Ok(())
    }

    async fn remove(&self, id: &NoteId) -> Result<bool, NotePersistenceError> {
        Ok(self.tables.write().await.notes.remove(id).is_some())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, TagPersistenceError> {
        Ok(self.tables.read().await.tags.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagPersistenceError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.tags.get(id).cloned())
            .collect())
    }

    async fn find_by_name(&self, name: &TagName) -> Result<Option<Tag>, TagPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.values().find(|tag| tag.name() == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Tag>, TagPersistenceError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name().as_ref().cmp(b.name().as_ref()));
        Ok(tags)
    }

    async fn save(&self, tag: &Tag) -> Result<(), TagPersistenceError> {
        let mut tables = self.tables.write().await;
        let name_taken = tables
            .tags
            .values()
            .any(|other| other.id() != tag.id() && other.name() == tag.name());
        if name_taken {
            return Err(TagPersistenceError::unique_violation("tags.name"));
        }
        tables.tags.insert(tag.id(), tag.clone());
        Ok(())
    }

    async fn remove(&self, id: &TagId) -> Result<bool, TagPersistenceError> {
        let mut tables = self.tables.write().await;
        let removed = tables.tags.remove(id).is_some();
        if removed {
            for record in tables.notes.values_mut() {
                record.tag_ids.retain(|tag_id| tag_id != id);
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.username().cmp(b.username()));
        Ok(users)
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let count = self.tables.read().await.users.len();
        u64::try_from(count).map_err(|err| UserPersistenceError::query(err.to_string()))
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables.write().await;
        let name_taken = tables
            .users
            .values()
            .any(|other| other.id() != user.id() && other.username() == user.username());
        if name_taken {
            return Err(UserPersistenceError::unique_violation("users.username"));
        }
        tables.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn remove(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.tables.write().await.users.remove(id).is_some())
    }
}
