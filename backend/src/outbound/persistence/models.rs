//! Internal Diesel row structs.
//!
//! Never exposed to the domain; repositories convert at the boundary.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{note_tags, notes, tags, users};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub salt: Vec<u8>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NoteRow {
    pub id: Uuid,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = notes)]
pub(crate) struct NewNoteRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub slug: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = note_tags)]
pub(crate) struct NoteTagRow {
    pub note_id: Uuid,
    pub tag_id: Uuid,
    pub position: i32,
}
