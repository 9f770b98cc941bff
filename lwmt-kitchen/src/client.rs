//! Per-browser client state
//!
//! Each browser is identified by the `lwmt_client` cookie. Its state
//! (session, pantry mirror, tab selection, recipe book, pending notice) is
//! kept here and only changed through the methods below. Locks guard single
//! fields and are released before any directory or API call.
//!
//! State is registered only for browsers that send the cookie back, and is
//! dropped again after an idle period. Dropping a signed-in state stops its
//! pantry mirror.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use lwmt_common::models::{Account, LocationFilter};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::directory::Directory;
use crate::pantry::{PantryMirror, PantrySnapshot};
use crate::recipes::{FileStore, LocalStore, MemoryStore, RecipeBook, RecipeCache};
use crate::session::{resolve_display_name, AuthMode, Session};
use crate::AppState;

/// Cookie carrying the client id
pub const CLIENT_COOKIE: &str = "lwmt_client";

pub struct ClientState {
    id: String,
    session: RwLock<Option<Session>>,
    auth_mode: RwLock<AuthMode>,
    pantry: RwLock<Option<Arc<PantryMirror>>>,
    place_filter: RwLock<LocationFilter>,
    recipes: RecipeBook,
    notice: Mutex<Option<String>>,
    /// Receiver source while signed out; never changes
    idle_pantry: watch::Sender<PantrySnapshot>,
    last_seen: Mutex<Instant>,
}

impl ClientState {
    pub fn new(id: impl Into<String>, cache: RecipeCache) -> Self {
        let (idle_pantry, _) = watch::channel(None);
        Self {
            id: id.into(),
            session: RwLock::new(None),
            auth_mode: RwLock::new(AuthMode::default()),
            pantry: RwLock::new(None),
            place_filter: RwLock::new(LocationFilter::default()),
            recipes: RecipeBook::new(cache),
            notice: Mutex::new(None),
            idle_pantry,
            last_seen: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    async fn touch(&self) {
        *self.last_seen.lock().await = Instant::now();
    }

    async fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_seen.lock().await)
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn user_id(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.user_id().to_string())
    }

    /// Establish the session and everything that hangs off it
    pub async fn sign_in(&self, directory: Arc<dyn Directory>, account: Account) {
        let display_name = resolve_display_name(directory.as_ref(), &account).await;
        let user_id = account.user_id.clone();
        let mirror = Arc::new(PantryMirror::start(directory.clone(), user_id.clone()));

        *self.session.write().await = Some(Session {
            account,
            display_name,
        });
        *self.pantry.write().await = Some(mirror);
        *self.auth_mode.write().await = AuthMode::SignIn;
        info!(client = %self.id, user_id = %user_id, "User is authenticated");

        self.recipes.load_saved_ids(directory.as_ref(), &user_id).await;
    }

    /// Clear the session and everything derived from it
    pub async fn sign_out(&self) {
        let previous = self.session.write().await.take();
        self.pantry.write().await.take();
        *self.place_filter.write().await = LocationFilter::default();
        self.recipes.reset().await;

        if let Some(session) = previous {
            info!(client = %self.id, user_id = %session.user_id(), "User is signed out");
        }
    }

    pub async fn auth_mode(&self) -> AuthMode {
        *self.auth_mode.read().await
    }

    pub async fn set_auth_mode(&self, mode: AuthMode) {
        *self.auth_mode.write().await = mode;
    }

    pub async fn pantry(&self) -> Option<Arc<PantryMirror>> {
        self.pantry.read().await.clone()
    }

    /// Mirror changes while signed in, a silent channel otherwise
    pub async fn pantry_watch(&self) -> watch::Receiver<PantrySnapshot> {
        match self.pantry.read().await.as_ref() {
            Some(mirror) => mirror.watch(),
            None => self.idle_pantry.subscribe(),
        }
    }

    pub async fn place_filter(&self) -> LocationFilter {
        *self.place_filter.read().await
    }

    pub async fn set_place_filter(&self, filter: LocationFilter) {
        *self.place_filter.write().await = filter;
    }

    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// Queue a one-shot notice for the next page render
    pub async fn push_notice(&self, message: impl Into<String>) {
        *self.notice.lock().await = Some(message.into());
    }

    pub async fn take_notice(&self) -> Option<String> {
        self.notice.lock().await.take()
    }
}

/// All known browsers
pub struct ClientRegistry {
    clients: RwLock<HashMap<String, Arc<ClientState>>>,
    store_dir: Option<PathBuf>,
}

impl ClientRegistry {
    /// `store_dir` holds one local-store file per browser; `None` keeps stores in memory
    pub fn new(store_dir: Option<PathBuf>) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            store_dir,
        }
    }

    /// Registered state for `id`, marked as seen now
    pub async fn get_or_create(&self, id: &str) -> Arc<ClientState> {
        let existing = self.clients.read().await.get(id).cloned();
        let client = match existing {
            Some(client) => client,
            None => {
                let mut clients = self.clients.write().await;
                clients
                    .entry(id.to_string())
                    .or_insert_with(|| {
                        debug!(client = %id, "New client");
                        Arc::new(ClientState::new(id, RecipeCache::new(self.open_store(id))))
                    })
                    .clone()
            }
        };
        client.touch().await;
        client
    }

    /// Unregistered state for a request that carried no cookie
    pub fn ephemeral(&self, id: &str) -> Arc<ClientState> {
        let cache = RecipeCache::new(Box::new(MemoryStore::new()));
        Arc::new(ClientState::new(id, cache))
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Drop every client not seen for `max_idle`; returns how many went
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut clients = self.clients.write().await;

        let mut idle = Vec::new();
        for (id, client) in clients.iter() {
            if client.idle_for(now).await >= max_idle {
                idle.push(id.clone());
            }
        }
        for id in &idle {
            clients.remove(id);
            debug!(client = %id, "Idle client evicted");
        }
        idle.len()
    }

    /// Evict idle clients every `interval` until the task is aborted
    pub fn spawn_idle_sweep(
        self: &Arc<Self>,
        max_idle: Duration,
        interval: Duration,
    ) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(max_idle).await;
                if evicted > 0 {
                    let remaining = registry.client_count().await;
                    info!(
                        evicted,
                        remaining,
                        "Idle clients evicted"
                    );
                }
            }
        })
    }

    fn open_store(&self, id: &str) -> Box<dyn LocalStore> {
        match &self.store_dir {
            Some(dir) => Box::new(FileStore::open(dir, id)),
            None => Box::new(MemoryStore::new()),
        }
    }
}

/// Client id from the request cookies, if well formed
///
/// Ids are UUIDs; anything else is ignored since the id names a file.
pub fn client_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CLIENT_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|id| id.to_string())
}

/// Attach the browser's [`ClientState`] to the request, issuing a cookie when new
pub async fn client_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let (client, issued) = match client_id_from_headers(request.headers()) {
        Some(id) => (state.clients.get_or_create(&id).await, false),
        None => (state.clients.ephemeral(&Uuid::new_v4().to_string()), true),
    };
    let id = client.id().to_string();
    request.extensions_mut().insert(client);

    let mut response = next.run(request).await;
    if issued {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", CLIENT_COOKIE, id);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Could not set client cookie: {}", e),
        }
    }
    response
}
