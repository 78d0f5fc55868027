// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-request payload storage.
//!
//! One [`RequestContext`] is created per request and handed from the
//! pre-processing stage to the handler. It is safe to read and write from
//! several tasks at once; it must never be shared across requests.

use std::{any::Any, collections::HashMap, error::Error, fmt, sync::Arc};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::error::ContextError;

type Slot = Box<dyn Any + Send + Sync>;

/// Shared error type stored in the context.
pub type SharedError = Arc<dyn Error + Send + Sync>;

/// Mutex-guarded payload map plus a write-once error slot.
#[derive(Default)]
pub struct RequestContext {
    payloads: Mutex<HashMap<String, Slot>>,
    error:    OnceCell<SharedError>
}

impl RequestContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `payload` under `key`, replacing any previous value.
    pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, payload: T) {
        self.set_boxed(key, Box::new(payload));
    }

    /// Store an already boxed payload under `key`.
    pub fn set_boxed(&self, key: impl Into<String>, payload: Slot) {
        self.payloads.lock().insert(key.into(), payload);
    }

    /// Clone of the payload under `key`, if it is a `T`.
    #[must_use]
    pub fn get<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.payloads.lock().get(key)?.downcast_ref::<T>().cloned()
    }

    /// Remove and return the payload under `key`, if it is a `T`.
    ///
    /// A payload of another type is left in place.
    pub fn take<T: Any>(&self, key: &str) -> Option<T> {
        let mut payloads = self.payloads.lock();
        let slot = payloads.remove(key)?;
        match slot.downcast::<T>() {
            Ok(payload) => Some(*payload),
            Err(slot) => {
                payloads.insert(key.to_owned(), slot);
                None
            }
        }
    }

    /// Check if a payload is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.payloads.lock().contains_key(key)
    }

    /// Record the outcome of the pre-processing stage.
    ///
    /// # Errors
    ///
    /// [`ContextError::ErrorAlreadySet`] when an error was already recorded.
    pub fn set_error<E: Error + Send + Sync + 'static>(&self, error: E) -> Result<(), ContextError> {
        self.error
            .set(Arc::new(error))
            .map_err(|_| ContextError::ErrorAlreadySet)
    }

    /// Error recorded by the pre-processing stage.
    #[must_use]
    pub fn error(&self) -> Option<SharedError> {
        self.error.get().cloned()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.payloads.lock().keys().cloned().collect();
        keys.sort();
        f.debug_struct("RequestContext")
            .field("keys", &keys)
            .field("error", &self.error.get().map(ToString::to_string))
            .finish()
    }
}
