//! Typed command map from request types to their handlers.
//!
//! [`Dispatcher`] owns one handler per use case and routes by request type at
//! compile time: `dispatcher.send(SaveNote { .. })` resolves to the
//! [`SaveNoteHandler`] without any runtime lookup. Every `send` goes through
//! [`dispatch`], so validation always runs first.

use std::sync::Arc;

use super::Error;
use super::dispatch::{Request, RequestHandler, dispatch};
use super::events::EventBus;
use super::notes::{
    GetNoteById, GetNoteByIdHandler, GetNoteBySlug, GetNoteBySlugHandler, GetNotes,
    GetNotesHandler, RemoveNote, RemoveNoteHandler, SaveNote, SaveNoteHandler,
};
use super::ports::{NoteRepository, PasswordHasher, TagRepository, TokenProvider, UserRepository};
use super::tags::{
    GetTagById, GetTagByIdHandler, GetTags, GetTagsHandler, RemoveTag, RemoveTagHandler, SaveTag,
    SaveTagHandler,
};
use super::users::{
    Authenticate, AuthenticateHandler, ChangePassword, ChangePasswordHandler, CreateUser,
    CreateUserHandler, GetUserById, GetUserByIdHandler, GetUsers, GetUsersHandler, RemoveUser,
    RemoveUserHandler, UpdateUser, UpdateUserHandler,
};

/// Capabilities the handlers are built from.
#[derive(Clone)]
pub struct DispatcherPorts {
    /// Note persistence.
    pub notes: Arc<dyn NoteRepository>,
    /// Tag persistence.
    pub tags: Arc<dyn TagRepository>,
    /// User persistence.
    pub users: Arc<dyn UserRepository>,
    /// Hashing capability.
    pub hasher: Arc<dyn PasswordHasher>,
    /// Token-issuing capability.
    pub tokens: Arc<dyn TokenProvider>,
    /// Post-commit event fan-out.
    pub bus: Arc<EventBus>,
}

/// Resolves the handler for request type `R`.
pub trait Route<R: Request> {
    /// Handler registered for `R`.
    fn route(&self) -> &dyn RequestHandler<R>;
}

macro_rules! routes {
    ($($field:ident: $request:ty),+ $(,)?) => {
        /// One handler per request type.
        #[derive(Clone)]
        pub struct Dispatcher {
            $($field: Arc<dyn RequestHandler<$request>>,)+
        }

        $(
            impl Route<$request> for Dispatcher {
                fn route(&self) -> &dyn RequestHandler<$request> {
                    self.$field.as_ref()
                }
            }
        )+
    };
}

routes! {
    save_note: SaveNote,
    remove_note: RemoveNote,
    get_note_by_slug: GetNoteBySlug,
    get_note_by_id: GetNoteById,
    get_notes: GetNotes,
    save_tag: SaveTag,
    remove_tag: RemoveTag,
    get_tag_by_id: GetTagById,
    get_tags: GetTags,
    create_user: CreateUser,
    update_user: UpdateUser,
    remove_user: RemoveUser,
    change_password: ChangePassword,
    authenticate: Authenticate,
    get_user_by_id: GetUserById,
    get_users: GetUsers,
}

impl Dispatcher {
    /// Wire every handler from `ports`.
    pub fn new(ports: DispatcherPorts) -> Self {
        let DispatcherPorts {
            notes,
            tags,
            users,
            hasher,
            tokens,
            bus,
        } = ports;
        Self {
            save_note: Arc::new(SaveNoteHandler::new(
                Arc::clone(&notes),
                Arc::clone(&tags),
                Arc::clone(&bus),
            )),
            remove_note: Arc::new(RemoveNoteHandler::new(Arc::clone(&notes), bus)),
            get_note_by_slug: Arc::new(GetNoteBySlugHandler::new(Arc::clone(&notes))),
            get_note_by_id: Arc::new(GetNoteByIdHandler::new(Arc::clone(&notes))),
            get_notes: Arc::new(GetNotesHandler::new(notes)),
            save_tag: Arc::new(SaveTagHandler::new(Arc::clone(&tags))),
            remove_tag: Arc::new(RemoveTagHandler::new(Arc::clone(&tags))),
            get_tag_by_id: Arc::new(GetTagByIdHandler::new(Arc::clone(&tags))),
            get_tags: Arc::new(GetTagsHandler::new(tags)),
            create_user: Arc::new(CreateUserHandler::new(
                Arc::clone(&users),
                Arc::clone(&hasher),
            )),
            update_user: Arc::new(UpdateUserHandler::new(Arc::clone(&users))),
            remove_user: Arc::new(RemoveUserHandler::new(Arc::clone(&users))),
            change_password: Arc::new(ChangePasswordHandler::new(
                Arc::clone(&users),
                Arc::clone(&hasher),
            )),
            authenticate: Arc::new(AuthenticateHandler::new(
                Arc::clone(&users),
                hasher,
                tokens,
            )),
            get_user_by_id: Arc::new(GetUserByIdHandler::new(Arc::clone(&users))),
            get_users: Arc::new(GetUsersHandler::new(users)),
        }
    }

    /// Validate `request` and run its handler.
    pub async fn send<R>(&self, request: R) -> Result<R::Response, Error>
    where
        R: Request,
        Self: Route<R>,
    {
        dispatch(<Self as Route<R>>::route(self), request).await
    }
}
