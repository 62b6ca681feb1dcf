//! Scripted `UserApi` double for dispatcher tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use relay_client::UserApi;
use relay_common::error::{AttemptFailure, DeliveryError, FetchError};
use relay_common::types::{User, UserPayload};

type SendScript = Box<dyn Fn(&UserPayload) -> Result<(), DeliveryError> + Send + Sync>;

/// Returns a canned fetch result and answers each send from a script,
/// recording every call it receives.
pub struct ScriptedApi {
    fetch: Mutex<Option<Result<Vec<User>, FetchError>>>,
    send: SendScript,
    pub fetch_calls: Mutex<usize>,
    pub sent: Mutex<Vec<(UserPayload, String)>>,
}

impl ScriptedApi {
    pub fn with_users(users: Vec<User>) -> Self {
        Self::new(Ok(users), Box::new(|_| Ok(())))
    }

    pub fn failing_fetch(err: FetchError) -> Self {
        Self::new(Err(err), Box::new(|_| Ok(())))
    }

    pub fn new(fetch: Result<Vec<User>, FetchError>, send: SendScript) -> Self {
        Self {
            fetch: Mutex::new(Some(fetch)),
            send,
            fetch_calls: Mutex::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Replace the send script.
    pub fn sending_with<F>(mut self, send: F) -> Self
    where
        F: Fn(&UserPayload) -> Result<(), DeliveryError> + Send + Sync + 'static,
    {
        self.send = Box::new(send);
        self
    }

    pub fn sent_emails(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.email.clone())
            .collect()
    }
}

#[async_trait]
impl UserApi for ScriptedApi {
    async fn fetch_users(&self, _cancel: &CancellationToken) -> Result<Vec<User>, FetchError> {
        *self.fetch_calls.lock().unwrap() += 1;
        self.fetch
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(FetchError::Transport("fetched twice".to_string())))
    }

    async fn send_user(
        &self,
        _cancel: &CancellationToken,
        payload: &UserPayload,
        destination_url: &str,
    ) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((payload.clone(), destination_url.to_string()));
        (self.send)(payload)
    }
}

/// Delivery outcome seen by [`RecordingApi`] for one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    Exhausted,
    Cancelled,
}

/// Wraps a real `UserApi` and records how each delivery ended.
pub struct RecordingApi<A> {
    inner: A,
    pub outcomes: Mutex<Vec<(String, Outcome)>>,
}

impl<A> RecordingApi<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            outcomes: Mutex::new(Vec::new()),
        }
    }

    pub fn outcomes(&self) -> Vec<(String, Outcome)> {
        self.outcomes.lock().unwrap().clone()
    }
}

#[async_trait]
impl<A: UserApi> UserApi for RecordingApi<A> {
    async fn fetch_users(&self, cancel: &CancellationToken) -> Result<Vec<User>, FetchError> {
        self.inner.fetch_users(cancel).await
    }

    async fn send_user(
        &self,
        cancel: &CancellationToken,
        payload: &UserPayload,
        destination_url: &str,
    ) -> Result<(), DeliveryError> {
        let result = self.inner.send_user(cancel, payload, destination_url).await;
        let outcome = match &result {
            Ok(()) => Outcome::Delivered,
            Err(e) if e.is_cancelled() => Outcome::Cancelled,
            Err(_) => Outcome::Exhausted,
        };
        self.outcomes
            .lock()
            .unwrap()
            .push((payload.email.clone(), outcome));
        result
    }
}

pub fn user(id: i64, name: &str, email: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
    }
}

/// The seven-user fixture used throughout: two `.biz` addresses.
pub fn sample_users() -> Vec<User> {
    vec![
        user(1, "Leanne Graham", "Sincere@april.biz"),
        user(2, "Ervin Howell", "Shanna@melissa.tv"),
        user(3, "Clementine Bauch", "Nathan@yesenia.net"),
        user(4, "Patricia Lebsack", "Julianne.OConner@kory.org"),
        user(5, "Chelsey Dietrich", "Lucio_Hettinger@annie.ca"),
        user(6, "Mrs. Dennis Schulist", "Karley_Dach@jasper.info"),
        user(7, "Kurtis Weissnat", "Telly.Hoeger@billy.biz"),
    ]
}

pub fn exhausted() -> DeliveryError {
    DeliveryError::Exhausted {
        attempts: 3,
        last: AttemptFailure::Status {
            status: 500,
            body: String::new(),
        },
    }
}
