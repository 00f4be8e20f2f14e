//! Server-side sessions
//!
//! Session data lives in memory, keyed by a random id carried in the
//! `eplayers_session` cookie. A session is only stored, and its cookie only
//! issued, once a handler writes to it. Sessions idle longer than the store's
//! timeout are dropped when resumed, and swept whenever a new one is stored.

use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "eplayers_session";

/// Session key holding the logged-in player's name
pub const USER_NAME_KEY: &str = "_UserName";

#[derive(Debug)]
struct SessionData {
    values: HashMap<String, String>,
    flash: Option<String>,
    last_seen: Instant,
}

impl SessionData {
    fn new(now: Instant) -> Self {
        Self {
            values: HashMap::new(),
            flash: None,
            last_seen: now,
        }
    }
}

/// All live sessions
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionData>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Resume the session `id` if it is still live.
    ///
    /// Otherwise the handle has no id yet and nothing is stored until the
    /// first write.
    pub async fn resume(&self, id: Option<Uuid>) -> Session {
        let slot = OnceLock::new();

        if let Some(id) = id {
            let now = Instant::now();
            let mut sessions = self.sessions.write().await;
            match sessions.get_mut(&id) {
                Some(data) if self.is_live(data, now) => {
                    data.last_seen = now;
                    let _ = slot.set(id);
                }
                Some(_) => {
                    sessions.remove(&id);
                    debug!("Session {} expired", id);
                }
                None => {}
            }
        }

        Session {
            id: Arc::new(slot),
            store: self.clone(),
        }
    }

    /// Number of stored (not yet purged) sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    fn is_live(&self, data: &SessionData, now: Instant) -> bool {
        now.duration_since(data.last_seen) <= self.idle_timeout
    }

    fn purge_expired(&self, sessions: &mut HashMap<Uuid, SessionData>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, data| self.is_live(data, now));
        let expired = before - sessions.len();
        if expired > 0 {
            debug!("Expired {} idle session(s)", expired);
        }
    }
}

/// Per-request handle to one session
#[derive(Clone)]
pub struct Session {
    id: Arc<OnceLock<Uuid>>,
    store: SessionStore,
}

impl Session {
    /// Session id, or `None` until the session is first written
    pub fn id(&self) -> Option<Uuid> {
        self.id.get().copied()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let id = self.id()?;
        let sessions = self.store.sessions.read().await;
        sessions.get(&id).and_then(|data| data.values.get(key).cloned())
    }

    pub async fn insert(&self, key: &str, value: impl Into<String>) {
        self.with_data(|data| {
            data.values.insert(key.to_string(), value.into());
        })
        .await;
    }

    pub async fn remove(&self, key: &str) -> Option<String> {
        let id = self.id()?;
        let mut sessions = self.store.sessions.write().await;
        sessions.get_mut(&id).and_then(|data| data.values.remove(key))
    }

    /// Store a message shown once on the next page that reads it
    pub async fn set_flash(&self, message: impl Into<String>) {
        self.with_data(|data| data.flash = Some(message.into())).await;
    }

    pub async fn take_flash(&self) -> Option<String> {
        let id = self.id()?;
        let mut sessions = self.store.sessions.write().await;
        sessions.get_mut(&id).and_then(|data| data.flash.take())
    }

    async fn with_data<F: FnOnce(&mut SessionData)>(&self, f: F) {
        let mut created = false;
        let id = *self.id.get_or_init(|| {
            created = true;
            Uuid::new_v4()
        });

        let now = Instant::now();
        let mut sessions = self.store.sessions.write().await;
        if created {
            self.store.purge_expired(&mut sessions, now);
            debug!("Started session {}", id);
        }
        let data = sessions.entry(id).or_insert_with(|| SessionData::new(now));
        f(data);
    }
}

/// Session id from the request's `Cookie` headers, if well-formed
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
}

/// Attach a [`Session`] to the request extensions, issuing a cookie when the
/// handler stored a new session
pub async fn session_middleware(
    State(store): State<SessionStore>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_id = session_id_from_headers(request.headers());
    let session = store.resume(cookie_id).await;
    let resumed = session.id().is_some();
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if let (false, Some(id)) = (resumed, session.id()) {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resume_without_write_stores_nothing() {
        let store = SessionStore::new(Duration::from_secs(60));

        let session = store.resume(None).await;
        assert_eq!(session.id(), None);
        assert_eq!(session.get(USER_NAME_KEY).await, None);
        assert_eq!(session.take_flash().await, None);

        let stale = store.resume(Some(Uuid::new_v4())).await;
        assert_eq!(stale.id(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_first_write_stores_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.resume(None).await;

        session.insert(USER_NAME_KEY, "Gabi").await;
        let id = session.id().unwrap();
        assert!(store.contains(id).await);

        let again = store.resume(Some(id)).await;
        assert_eq!(again.id(), Some(id));
        assert_eq!(again.get(USER_NAME_KEY).await.as_deref(), Some("Gabi"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_values_and_remove() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.resume(None).await;

        session.insert(USER_NAME_KEY, "Gabi").await;
        assert_eq!(session.get(USER_NAME_KEY).await.as_deref(), Some("Gabi"));

        assert_eq!(session.remove(USER_NAME_KEY).await.as_deref(), Some("Gabi"));
        assert_eq!(session.get(USER_NAME_KEY).await, None);
    }

    #[tokio::test]
    async fn test_flash_is_read_once() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.resume(None).await;

        session.set_flash("oops").await;
        assert_eq!(session.take_flash().await.as_deref(), Some("oops"));
        assert_eq!(session.take_flash().await, None);
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::new(Duration::ZERO);
        let session = store.resume(None).await;
        session.insert(USER_NAME_KEY, "Gabi").await;
        let id = session.id().unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;

        let resumed = store.resume(Some(id)).await;
        assert_eq!(resumed.id(), None);
        assert_eq!(resumed.get(USER_NAME_KEY).await, None);
        assert!(!store.contains(id).await);
    }

    #[tokio::test]
    async fn test_new_session_sweeps_idle_ones() {
        let store = SessionStore::new(Duration::ZERO);
        let old = store.resume(None).await;
        old.set_flash("old").await;

        tokio::time::sleep(Duration::from_millis(5)).await;

        let fresh = store.resume(None).await;
        fresh.set_flash("new").await;
        assert_eq!(store.len().await, 1);
        assert!(store.contains(fresh.id().unwrap()).await);
    }

    #[test]
    fn test_cookie_parsing() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, id)).unwrap(),
        );

        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_cookie_parsing_rejects_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{}=not-a-uuid", SESSION_COOKIE)).unwrap(),
        );

        assert_eq!(session_id_from_headers(&headers), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }
}
