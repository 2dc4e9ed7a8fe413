//! Builders wiring adapters into the dispatcher and adapter state.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::info;

use notes_backend::domain::notes::NoteEventsNotifier;
use notes_backend::domain::ports::{
    NoteRepository, PasswordHasher, TagRepository, TokenProvider, UserRepository,
};
use notes_backend::domain::{Dispatcher, DispatcherPorts, EventBus};
use notes_backend::inbound::http::state::HttpState;
use notes_backend::inbound::ws::state::WsState;
use notes_backend::outbound::hub::BroadcastHub;
use notes_backend::outbound::memory::InMemoryStore;
use notes_backend::outbound::persistence::{
    DbPool, DieselNoteRepository, DieselTagRepository, DieselUserRepository,
};
use notes_backend::outbound::security::{Argon2PasswordHasher, JwtConfig, JwtTokenProvider};

use super::ServerConfig;

struct Repositories {
    notes: Arc<dyn NoteRepository>,
    tags: Arc<dyn TagRepository>,
    users: Arc<dyn UserRepository>,
}

async fn build_repositories(config: &ServerConfig) -> std::io::Result<Repositories> {
    match &config.database {
        Some(pool_config) => {
            let pool = DbPool::new(pool_config.clone())
                .await
                .map_err(|err| std::io::Error::other(err.into_message()))?;
            info!(max_size = pool_config.max_size(), "using PostgreSQL store");
            Ok(Repositories {
                notes: Arc::new(DieselNoteRepository::new(pool.clone())),
                tags: Arc::new(DieselTagRepository::new(pool.clone())),
                users: Arc::new(DieselUserRepository::new(pool)),
            })
        }
        None => {
            info!("no database configured; using in-memory store");
            let store = InMemoryStore::new();
            Ok(Repositories {
                notes: Arc::new(store.clone()),
                tags: Arc::new(store.clone()),
                users: Arc::new(store),
            })
        }
    }
}

/// Adapter state shared by every worker.
pub(super) struct AdapterStates {
    pub(super) http: HttpState,
    pub(super) ws: WsState,
}

/// Build the dispatcher over the configured store and the hub-backed
/// notifier, plus the state the HTTP and WebSocket adapters need.
pub(super) async fn build_adapter_states(config: &ServerConfig) -> std::io::Result<AdapterStates> {
    let Repositories { notes, tags, users } = build_repositories(config).await?;
    let hub = BroadcastHub::default();
    let bus = Arc::new(NoteEventsNotifier::new(Arc::new(hub.clone())).register(EventBus::new()));
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::default());
    let tokens: Arc<dyn TokenProvider> = Arc::new(JwtTokenProvider::new(
        &JwtConfig::new(config.token_secret.clone(), config.token_ttl),
        Arc::new(DefaultClock),
    ));

    let dispatcher = Dispatcher::new(DispatcherPorts {
        notes,
        tags,
        users,
        hasher,
        tokens: Arc::clone(&tokens),
        bus,
    });

    Ok(AdapterStates {
        http: HttpState::new(Arc::new(dispatcher), tokens),
        ws: WsState::new(hub, config.allowed_origins.iter().cloned()),
    })
}
