//! The expense collection store: the authoritative in-memory cache of
//! fetched records and the synchronization contract with the remote service.
//!
//! Cache-update policy:
//! - `refresh` replaces the cache wholesale; a connectivity failure keeps the
//!   stale cache (the data is still the best available), a request failure
//!   clears it (the service says the data is invalid or gone).
//! - mutations apply their result to the cache only on success and leave it
//!   untouched on failure; `add` prepends without a refetch.
//!
//! Operations may run concurrently from separate tasks. The cache mutex is
//! held only to read or apply an update, never across an await, so each
//! completion applies in the order it resolves and the last completion wins
//! for overlapping fields.

use crate::api::ExpenseApi;
use crate::model::{ExpenseDraft, ExpensePatch, ExpensePayload, ExpenseRecord};
use crate::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::debug;

pub struct ExpenseStore {
    api: Box<dyn ExpenseApi>,
    cache: Mutex<Vec<ExpenseRecord>>,
    in_flight: AtomicUsize,
    last_error: Mutex<Option<String>>,
}

impl ExpenseStore {
    /// Create a new store backed by a dynamically-dispatched `ExpenseApi`.
    pub fn new(api: Box<dyn ExpenseApi>) -> Self {
        Self {
            api,
            cache: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            last_error: Mutex::new(None),
        }
    }

    /// A snapshot of the cached records in their current order. The snapshot
    /// is a derived view; mutating it does not touch the cache.
    pub fn records(&self) -> Vec<ExpenseRecord> {
        self.cache.lock().unwrap().clone()
    }

    /// Looks up a cached record by id.
    pub fn get(&self, id: &str) -> Option<ExpenseRecord> {
        self.cache.lock().unwrap().iter().find(|r| r.id() == id).cloned()
    }

    /// True exactly while at least one network call is outstanding.
    pub fn busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// The message from the most recent failed operation, if the failure has
    /// not been superseded by a newer operation.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    /// Replaces the cache with a fresh fetch. Returns the number of records.
    pub async fn refresh(&self) -> Result<usize> {
        self.begin();
        let result = {
            let _guard = Flight::new(&self.in_flight);
            self.api.list().await
        };
        match result {
            Ok(payloads) => {
                let records: Vec<ExpenseRecord> =
                    payloads.into_iter().map(ExpensePayload::normalize).collect();
                let count = records.len();
                *self.cache.lock().unwrap() = records;
                debug!("refreshed {count} expense records");
                Ok(count)
            }
            Err(err) => {
                if matches!(err, Error::Request { .. }) {
                    self.cache.lock().unwrap().clear();
                }
                self.fail(err)
            }
        }
    }

    /// Validates and creates an expense, prepending the stored record to the
    /// cache on success so it is visible without a refetch.
    pub async fn add(&self, draft: &ExpenseDraft) -> Result<ExpenseRecord> {
        self.begin();
        if let Err(err) = draft.validate() {
            return self.fail(err);
        }
        let result = {
            let _guard = Flight::new(&self.in_flight);
            self.api.create(draft).await
        };
        match result {
            Ok(payload) => {
                let record = payload.normalize();
                self.cache.lock().unwrap().insert(0, record.clone());
                Ok(record)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Applies a partial update. On success the returned fields are merged
    /// into the cached record; fields the service did not return keep their
    /// prior local values.
    pub async fn modify(&self, id: &str, patch: &ExpensePatch) -> Result<ExpenseRecord> {
        self.begin();
        let result = {
            let _guard = Flight::new(&self.in_flight);
            self.api.update(id, patch).await
        };
        match result {
            Ok(payload) => {
                let mut cache = self.cache.lock().unwrap();
                match cache.iter_mut().find(|r| r.id() == id) {
                    Some(record) => {
                        record.merge(payload);
                        Ok(record.clone())
                    }
                    // The record fell out of the cache (e.g. a concurrent
                    // refresh); the mutation still applied remotely.
                    None => Ok(payload.normalize()),
                }
            }
            Err(err) => self.fail(err),
        }
    }

    /// Deletes an expense and drops it from the cache on success.
    pub async fn remove(&self, id: &str) -> Result<()> {
        self.begin();
        let result = {
            let _guard = Flight::new(&self.in_flight);
            self.api.delete(id).await
        };
        match result {
            Ok(()) => {
                self.cache.lock().unwrap().retain(|r| r.id() != id);
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Fetches a single record by id from the service, bypassing the cache.
    pub async fn fetch(&self, id: &str) -> Result<ExpenseRecord> {
        self.begin();
        let result = {
            let _guard = Flight::new(&self.in_flight);
            self.api.get(id).await
        };
        match result {
            Ok(payload) => Ok(payload.normalize()),
            Err(err) => self.fail(err),
        }
    }

    /// Each operation clears the error slot when it starts.
    fn begin(&self) {
        self.last_error.lock().unwrap().take();
    }

    fn fail<T>(&self, err: Error) -> Result<T> {
        *self.last_error.lock().unwrap() = Some(err.to_string());
        Err(err)
    }
}

/// Keeps the in-flight counter balanced even when a call errors out.
struct Flight<'a>(&'a AtomicUsize);

impl<'a> Flight<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Flight(counter)
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
