//! Contracts for the hosted backend: document database, authentication and
//! file storage.
//!
//! The booking services only ever talk to these traits. Each call is a
//! single request/response; there are no transactions. The in-memory
//! implementations back the tests and the demo binary.
//!
//! # Collections
//!
//! | path                       | body type |
//! |----------------------------|-----------|
//! | `users`                    | [`UserProfile`](crate::model::UserProfile) keyed by uid |
//! | `equipment`, `rooms`       | [`CatalogItem`](crate::model::CatalogItem) |
//! | `events`                   | [`CalendarEvent`](crate::model::CalendarEvent) |
//! | `{equipment,rooms}/{id}/bookings` | [`Reservation`](crate::model::Reservation) |

mod auth;
mod files;
mod memory;

pub use auth::MemoryAuth;
pub use files::MemoryFiles;
pub use memory::MemoryStore;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BookingResult;
use crate::model::{AuthIdentity, Credentials, Record};
use crate::Id;

/// A stored document: its id plus the JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Id,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<Id>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Decodes the body into `T` and attaches the document id.
    pub fn decode<T: Record>(self) -> BookingResult<T> {
        let mut record: T = serde_json::from_value(self.data)?;
        record.set_id(self.id);
        Ok(record)
    }
}

/// Equality filter on a field of the document body.
///
/// Nested fields use dots: `"owner.uid"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, data: &Value) -> bool {
        let pointer = format!("/{}", self.field.replace('.', "/"));
        data.pointer(&pointer) == Some(&self.value)
    }
}

/// Callback invoked with the full document list of a collection on every change.
pub type Listener = Arc<dyn Fn(&[Document]) + Send + Sync>;

/// Handle to a live listener. The listener is released on
/// [`Subscription::unsubscribe`] or when the handle is dropped.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Adds a document under a generated id and returns the id.
    async fn create(&self, collection: &str, document: Value) -> BookingResult<Id>;

    /// Creates or replaces the document with the given id.
    async fn set(&self, collection: &str, id: &str, document: Value) -> BookingResult<()>;

    async fn get(&self, collection: &str, id: &str) -> BookingResult<Option<Document>>;

    /// All documents matching every filter. No filters lists the collection.
    async fn query(&self, collection: &str, filters: &[Filter]) -> BookingResult<Vec<Document>>;

    /// Merges the top-level fields of `patch` into an existing document.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> BookingResult<()>;

    /// Registers `listener`; it fires once right away and after every write.
    fn subscribe(&self, collection: &str, listener: Listener) -> Subscription;
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Registers an account and signs it in.
    async fn create_user(&self, credentials: &Credentials) -> BookingResult<AuthIdentity>;

    async fn sign_in(&self, credentials: &Credentials) -> BookingResult<AuthIdentity>;

    async fn sign_out(&self) -> BookingResult<()>;

    async fn current_user(&self) -> Option<AuthIdentity>;

    async fn update_profile(&self, uid: &str, display_name: &str) -> BookingResult<AuthIdentity>;
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores `bytes` at `path` and returns a public URL for it.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> BookingResult<String>;
}
