//! At most one in-flight operation per target key.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::error::NetError;

type Registry<K> = Arc<Mutex<HashMap<K, CancellationToken>>>;

/// Registry of running operations, keyed by target, each with a cancel token.
///
/// A second [`SingleFlight::begin`] for a key that is still running is
/// rejected with [`NetError::Busy`]. The key is released when the returned
/// guard is dropped.
pub struct SingleFlight<K> {
    inflight: Registry<K>,
}

impl<K> SingleFlight<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, CancellationToken>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn begin(&self, key: K) -> Result<FlightGuard<K>, NetError> {
        let mut inflight = self.lock();
        if inflight.contains_key(&key) {
            return Err(NetError::Busy(format!("{key:?}")));
        }

        let token = CancellationToken::new();
        inflight.insert(key.clone(), token.clone());
        tracing::debug!("Flight started: {key:?}");

        Ok(FlightGuard {
            key,
            token,
            registry: Arc::clone(&self.inflight),
        })
    }

    /// Cancel the operation for `key`. Returns false if nothing was running.
    pub fn cancel(&self, key: &K) -> bool {
        match self.lock().get(key) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel everything. Returns how many operations were signalled.
    pub fn cancel_all(&self) -> usize {
        let inflight = self.lock();
        for token in inflight.values() {
            token.cancel();
        }
        inflight.len()
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<K> Default for SingleFlight<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for SingleFlight<K> {
    fn clone(&self) -> Self {
        Self {
            inflight: Arc::clone(&self.inflight),
        }
    }
}

/// Holds a key in the registry until dropped.
pub struct FlightGuard<K>
where
    K: Eq + Hash,
{
    key: K,
    token: CancellationToken,
    registry: Registry<K>,
}

impl<K> FlightGuard<K>
where
    K: Eq + Hash,
{
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl<K> Drop for FlightGuard<K>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_busy() {
        let flights = SingleFlight::new();
        let _guard = flights.begin("cet4.json".to_string()).unwrap();

        let second = flights.begin("cet4.json".to_string());
        assert!(matches!(second, Err(NetError::Busy(_))));

        // other keys are independent
        assert!(flights.begin("cet6.json".to_string()).is_ok());
    }

    #[test]
    fn test_drop_releases_key() {
        let flights = SingleFlight::new();
        {
            let _guard = flights.begin("apple").unwrap();
            assert!(flights.is_in_flight(&"apple"));
        }
        assert!(!flights.is_in_flight(&"apple"));
        assert!(flights.begin("apple").is_ok());
    }

    #[test]
    fn test_cancel_signals_token() {
        let flights = SingleFlight::new();
        let guard = flights.begin(1u32).unwrap();

        assert!(flights.cancel(&1));
        assert!(guard.token().is_cancelled());
        assert!(!flights.cancel(&2));
    }

    #[test]
    fn test_cancel_all() {
        let flights = SingleFlight::new();
        let a = flights.begin("a").unwrap();
        let b = flights.begin("b").unwrap();

        assert_eq!(flights.cancel_all(), 2);
        assert!(a.token().is_cancelled());
        assert!(b.token().is_cancelled());
    }
}
