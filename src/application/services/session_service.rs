use crate::application::ports::post_backend::PostBackend;
use crate::domain::value_objects::Principal;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// 呼び出し元に紐づいたリモートサービスのハンドル
#[derive(Clone)]
pub struct SessionClient {
    pub principal: Principal,
    pub backend: Arc<dyn PostBackend>,
}

impl SessionClient {
    pub fn new(principal: Principal, backend: Arc<dyn PostBackend>) -> Self {
        Self { principal, backend }
    }
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("principal", &self.principal)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Ready(SessionClient),
}

impl SessionState {
    pub fn client(&self) -> Option<&SessionClient> {
        match self {
            SessionState::Ready(client) => Some(client),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready(_))
    }
}

/// 状態と、状態が変わるたびに進む世代
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub state: SessionState,
}

/// サインイン中の ID と、それに紐づくクライアント
pub struct SessionContext {
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::default());
        Self { tx }
    }

    fn transition(&self, state: SessionState) {
        self.tx.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.state = state;
        });
    }

    pub fn begin_connect(&self) {
        self.transition(SessionState::Connecting);
    }

    pub fn sign_in(&self, principal: Principal, backend: Arc<dyn PostBackend>) {
        info!(principal = %principal, "session signed in");
        self.transition(SessionState::Ready(SessionClient::new(principal, backend)));
    }

    pub fn sign_out(&self) {
        info!("session signed out");
        self.transition(SessionState::Disconnected);
    }

    pub fn current(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn client(&self) -> Option<SessionClient> {
        self.tx.borrow().state.client().cloned()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.tx
            .borrow()
            .state
            .client()
            .map(|client| client.principal.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
