//! Shared stubs and harness for integration tests.
//!
//! Ports are backed by the in-memory store; hashing, tokens, and the hub are
//! hand-written stubs so tests can observe calls without mockall.

#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use notes_backend::domain::notes::NoteEventsNotifier;
use notes_backend::domain::ports::{
    HubMessage, NotePersistenceError, NoteRepository, PasswordHashError, PasswordHasher,
    TokenError, TokenProvider, TransportHub, TransportHubError,
};
use notes_backend::domain::{
    Dispatcher, DispatcherPorts, EventBus, Note, NoteId, PasswordHash, Salt, Slug, Username,
};
use notes_backend::outbound::memory::InMemoryStore;

/// Maps `changePassword` to `passwordChanged`; other inputs are prefixed.
#[derive(Debug, Default)]
pub struct StubHasher;

impl PasswordHasher for StubHasher {
    fn hash(&self, _salt: &Salt, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        let hashed = match plaintext {
            "changePassword" => "passwordChanged".to_owned(),
            other => format!("hashed:{other}"),
        };
        Ok(PasswordHash::new(hashed))
    }
}

/// Issues `token:<username>` and verifies the same shape.
#[derive(Debug, Default)]
pub struct StubTokens;

impl TokenProvider for StubTokens {
    fn issue(&self, identity: &Username) -> Result<String, TokenError> {
        Ok(format!("token:{identity}"))
    }

    fn verify(&self, token: &str) -> Result<Username, TokenError> {
        let name = token
            .strip_prefix("token:")
            .ok_or_else(|| TokenError::invalid("unknown token"))?;
        Username::new(name).map_err(|err| TokenError::invalid(err.to_string()))
    }
}

/// Hub that records every message it is asked to broadcast.
#[derive(Debug, Default)]
pub struct RecordingHub {
    messages: Mutex<Vec<HubMessage>>,
}

impl RecordingHub {
    pub fn messages(&self) -> Vec<HubMessage> {
        self.messages.lock().expect("hub lock").clone()
    }
}

#[async_trait]
impl TransportHub for RecordingHub {
    async fn broadcast(&self, message: HubMessage) -> Result<(), TransportHubError> {
        self.messages.lock().expect("hub lock").push(message);
        Ok(())
    }
}

/// Note repository wrapper counting every call that reaches the store.
#[derive(Debug, Clone)]
pub struct CountingNotes {
    inner: InMemoryStore,
    calls: Arc<AtomicUsize>,
}

impl CountingNotes {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl NoteRepository for CountingNotes {
    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, NotePersistenceError> {
        self.tick();
        NoteRepository::find_by_id(&self.inner, id).await
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Vec<Note>, NotePersistenceError> {
        self.tick();
        self.inner.find_by_slug(slug).await
    }

    async fn list(&self) -> Result<Vec<Note>, NotePersistenceError> {
        self.tick();
        NoteRepository::list(&self.inner).await
    }

    async fn save(&self, note: &Note) -> Result<(), NotePersistenceError> {
        self.tick();
        NoteRepository::save(&self.inner, note).await
    }

    async fn remove(&self, id: &NoteId) -> Result<bool, NotePersistenceError> {
        self.tick();
        NoteRepository::remove(&self.inner, id).await
    }
}

/// Dispatcher over a fresh store with observable collaborators.
pub struct Harness {
    pub dispatcher: Dispatcher,
    pub store: InMemoryStore,
    pub notes: CountingNotes,
    pub hub: Arc<RecordingHub>,
}

pub fn harness() -> Harness {
    let store = InMemoryStore::new();
    let notes = CountingNotes::new(store.clone());
    let hub = Arc::new(RecordingHub::default());
    let hub_port: Arc<dyn TransportHub> = hub.clone();
    let bus = Arc::new(NoteEventsNotifier::new(hub_port).register(EventBus::new()));
    let dispatcher = Dispatcher::new(DispatcherPorts {
        notes: Arc::new(notes.clone()),
        tags: Arc::new(store.clone()),
        users: Arc::new(store.clone()),
        hasher: Arc::new(StubHasher),
        tokens: Arc::new(StubTokens),
        bus,
    });
    Harness {
        dispatcher,
        store,
        notes,
        hub,
    }
}
