//! Domain primitives, use cases, and ports.
//!
//! Purpose: Define the strongly typed entities (users, notes, tags), the
//! request/handler pairs that operate on them, and the driven ports those
//! handlers depend on. Nothing here knows about HTTP, WebSockets, or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: caller-visible failure payload and its stable code.
//! - Note, Tag, User and their identifiers: aggregates and value types.
//! - dispatch / validation: request plumbing and field-level rules.
//! - events: explicit event collection and post-commit fan-out.
//! - Dispatcher: one handler per request type, wired from ports.

pub mod dispatch;
pub mod dispatcher;
pub mod error;
pub mod events;
mod identifier;
pub mod note;
pub mod notes;
pub mod ports;
pub mod slug;
pub mod tag;
pub mod tags;
pub mod trace_id;
pub mod user;
pub mod users;
pub mod validation;

pub use self::dispatch::{Request, RequestHandler, dispatch};
pub use self::dispatcher::{Dispatcher, DispatcherPorts, Route};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::events::{
    DeliveryReport, DomainEvent, EventBus, EventCollector, EventKind, NoteRemoved, NoteSaved,
    NotificationError, NotificationHandler,
};
pub use self::identifier::IdentifierError;
pub use self::note::{Note, NoteId, NoteTag};
pub use self::slug::{Slug, SlugValidationError};
pub use self::tag::{Tag, TagId, TagName, TagValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{PasswordHash, Salt, User, UserId, UserValidationError, Username};

/// Convenient result alias for use-case and API code.
///
/// # Examples
/// ```
/// use notes_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
