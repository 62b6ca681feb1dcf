//! Clients for the source and destination user APIs.
//!
//! [`UserApi`] is the capability the dispatcher depends on: fetch the user
//! list once, then send matching users one at a time. [`HttpUserApi`] is the
//! reqwest implementation; tests substitute scripted doubles.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use relay_common::error::{DeliveryError, FetchError};
use relay_common::types::{User, UserPayload};

pub mod http;
pub mod retry;

pub use http::HttpUserApi;
pub use retry::DeliveryPolicy;

#[async_trait]
pub trait UserApi: Send + Sync {
    /// Fetch every user from the source API. Not retried.
    async fn fetch_users(&self, cancel: &CancellationToken) -> Result<Vec<User>, FetchError>;

    /// Deliver one payload to `destination_url`, retrying per the client's
    /// [`DeliveryPolicy`].
    async fn send_user(
        &self,
        cancel: &CancellationToken,
        payload: &UserPayload,
        destination_url: &str,
    ) -> Result<(), DeliveryError>;
}

#[async_trait]
impl<T: UserApi + ?Sized> UserApi for Arc<T> {
    async fn fetch_users(&self, cancel: &CancellationToken) -> Result<Vec<User>, FetchError> {
        (**self).fetch_users(cancel).await
    }

    async fn send_user(
        &self,
        cancel: &CancellationToken,
        payload: &UserPayload,
        destination_url: &str,
    ) -> Result<(), DeliveryError> {
        (**self).send_user(cancel, payload, destination_url).await
    }
}
