//! Diesel table definitions.
//!
//! Schema migrations are managed outside this crate; these definitions must
//! match the deployed tables. `notes.slug` and `tags.name` carry unique
//! indexes, and `note_tags` rows cascade with either side.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// Output of the hashing capability.
        password -> Varchar,
        /// 16 random bytes fixed at registration.
        salt -> Bytea,
    }
}

diesel::table! {
    notes (id) {
        id -> Uuid,
        title -> Varchar,
        body -> Text,
        /// Derived from `title`; unique.
        slug -> Varchar,
    }
}

diesel::table! {
    tags (id) {
        id -> Uuid,
        /// Unique label, at most 64 characters.
        name -> Varchar,
    }
}

diesel::table! {
    /// Note-to-tag associations.
    note_tags (note_id, tag_id) {
        note_id -> Uuid,
        tag_id -> Uuid,
        /// Submission order of the tag on the note.
        position -> Int4,
    }
}

diesel::joinable!(note_tags -> notes (note_id));
diesel::joinable!(note_tags -> tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(notes, note_tags, tags, users);
