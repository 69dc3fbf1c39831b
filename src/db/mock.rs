//! In-process `DocumentDb` double for tests
//!
//! Keeps documents in memory, counts calls per operation and can be told to
//! fail collection creation or inserts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use super::{DbError, DocumentDb};

#[derive(Default)]
pub struct MockDocumentDb {
    docs: Mutex<Vec<(String, String, Value)>>,
    fail_create: AtomicBool,
    fail_insert: AtomicBool,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockDocumentDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_collection` fail
    pub fn failing_create() -> Self {
        let mock = Self::new();
        mock.fail_create.store(true, Ordering::SeqCst);
        mock
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    /// Number of `create_collection` calls, successful or not
    pub fn create_calls(&self) -> usize {
        self.calls("create_collection")
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls
            .lock()
            .map(|c| c.get(op).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn record(&self, op: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(op).or_insert(0) += 1;
        }
    }

    fn oops() -> DbError {
        DbError::Backend("Ooops, something went wrong".to_string())
    }
}

impl DocumentDb for MockDocumentDb {
    fn create_collection(&self, _collection: &str) -> Result<(), DbError> {
        self.record("create_collection");
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::oops());
        }
        Ok(())
    }

    fn insert(&self, collection: &str, key: &str, document: &Value) -> Result<(), DbError> {
        self.record("insert");
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(Self::oops());
        }
        let mut docs = self.docs.lock().map_err(|_| DbError::LockPoisoned)?;
        if docs.iter().any(|(c, k, _)| c == collection && k == key) {
            return Err(DbError::DuplicateKey(key.to_string()));
        }
        docs.push((collection.to_string(), key.to_string(), document.clone()));
        Ok(())
    }

    fn fetch(&self, collection: &str, key: &str) -> Result<Option<Value>, DbError> {
        self.record("fetch");
        let docs = self.docs.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(docs
            .iter()
            .find(|(c, k, _)| c == collection && k == key)
            .map(|(_, _, v)| v.clone()))
    }

    fn replace(&self, collection: &str, key: &str, document: &Value) -> Result<(), DbError> {
        self.record("replace");
        let mut docs = self.docs.lock().map_err(|_| DbError::LockPoisoned)?;
        match docs.iter_mut().find(|(c, k, _)| c == collection && k == key) {
            Some(entry) => {
                entry.2 = document.clone();
                Ok(())
            }
            None => Err(DbError::MissingKey(key.to_string())),
        }
    }

    fn remove(&self, collection: &str, key: &str) -> Result<bool, DbError> {
        self.record("remove");
        let mut docs = self.docs.lock().map_err(|_| DbError::LockPoisoned)?;
        let before = docs.len();
        docs.retain(|(c, k, _)| !(c == collection && k == key));
        Ok(docs.len() != before)
    }

    fn keys(&self, collection: &str) -> Result<Vec<String>, DbError> {
        self.record("keys");
        let docs = self.docs.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(docs
            .iter()
            .filter(|(c, _, _)| c == collection)
            .map(|(_, k, _)| k.clone())
            .collect())
    }
}
