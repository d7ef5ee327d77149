//! In-memory mock of the storage connector for tests.
//!
//! [`MockConnector`] keeps buckets and objects in memory, records every call
//! in order, and supports per-operation failure injection. It backs the unit
//! tests of the provisioning and data-plane crates.
//!
//! Only available with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! portage-s3 = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use crate::connector::StorageConnector;
use crate::{Error, Result};

#[derive(Debug, Default)]
struct MockState {
    buckets: BTreeSet<String>,
    objects: BTreeMap<(String, String), Bytes>,
    calls: Vec<String>,
    failures: HashMap<String, Failures>,
}

#[derive(Debug, Clone, Copy)]
enum Failures {
    Times(u32),
    Always,
}

/// Scriptable in-memory [`StorageConnector`].
///
/// Clones share state, so tests can keep a handle for assertions after
/// moving a clone into the component under test.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    /// Creates an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an existing bucket.
    pub fn with_bucket(self, bucket: impl Into<String>) -> Self {
        self.state.lock().unwrap().buckets.insert(bucket.into());
        self
    }

    /// Adds an object (creating its bucket) with the given content.
    pub fn with_object(
        self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let bucket = bucket.into();
        {
            let mut state = self.state.lock().unwrap();
            state.buckets.insert(bucket.clone());
            state.objects.insert((bucket, key.into()), data.into());
        }
        self
    }

    /// Makes the next `times` invocations of `operation` fail with a
    /// retryable I/O error.
    pub fn failing_times(self, operation: &str, times: u32) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(operation.to_string(), Failures::Times(times));
        self
    }

    /// Makes every invocation of `operation` fail with a retryable I/O
    /// error.
    pub fn failing_always(self, operation: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(operation.to_string(), Failures::Always);
        self
    }

    /// Returns the operation names recorded so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Returns how many times `operation` was invoked.
    pub fn call_count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.as_str() == operation)
            .count()
    }

    /// Returns the stored content of an object, if present.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    fn record(&self, operation: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation.to_string());

        match state.failures.get_mut(operation) {
            Some(Failures::Always) => Err(Error::Io(std::io::Error::other(format!(
                "injected failure in {operation}"
            )))),
            Some(Failures::Times(remaining)) => {
                if *remaining > 0 {
                    *remaining -= 1;
                    Err(Error::Io(std::io::Error::other(format!(
                        "injected failure in {operation}"
                    ))))
                } else {
                    Ok(())
                }
            }
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl StorageConnector for MockConnector {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        self.record("bucket_exists")?;
        Ok(self.state.lock().unwrap().buckets.contains(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.record("create_bucket")?;
        self.state.lock().unwrap().buckets.insert(bucket.to_string());
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.record("delete_bucket")?;
        self.state.lock().unwrap().buckets.remove(bucket);
        Ok(())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        self.record("list_objects")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .objects
            .keys()
            .filter(|(b, key)| b == bucket && key.starts_with(prefix))
            .map(|(_, key)| key.clone())
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.record("get_object")?;
        self.object(bucket, key)
            .ok_or_else(|| Error::NotFound(format!("{bucket}/{key}")))
    }

    async fn get_object_range(
        &self,
        bucket: &str,
        key: &str,
        offset: u64,
        length: u64,
    ) -> Result<Bytes> {
        self.record("get_object_range")?;
        let data = self
            .object(bucket, key)
            .ok_or_else(|| Error::NotFound(format!("{bucket}/{key}")))?;

        let start = (offset as usize).min(data.len());
        let end = (start + length as usize).min(data.len());
        Ok(data.slice(start..end))
    }

    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<()> {
        self.record("delete_objects")?;
        let mut state = self.state.lock().unwrap();
        for key in keys {
            state.objects.remove(&(bucket.to_string(), key));
        }
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, data: Bytes) -> Result<()> {
        self.record("put_object")?;
        self.state
            .lock()
            .unwrap()
            .objects
            .insert((bucket.to_string(), key.to_string()), data);
        Ok(())
    }

    async fn get_object_size(&self, bucket: &str, key: &str) -> Result<u64> {
        self.record("get_object_size")?;
        self.object(bucket, key)
            .map(|data| data.len() as u64)
            .ok_or_else(|| Error::NotFound(format!("{bucket}/{key}")))
    }
}
