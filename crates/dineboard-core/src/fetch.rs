//! Cached fetch slots with stale-response suppression
//!
//! A `FetchSlot` is one logical data source of a panel (for example the
//! KPI metrics). Every `load` takes a new generation number; a response is
//! applied only while its generation is still the latest one issued for the
//! slot, so a request superseded by a filter change can never overwrite
//! newer data. Superseded requests are not cancelled on the wire.
//!
//! `DashboardSession` owns the client, the session cache and the slots.

use crate::cache::FetchCache;
use crate::client::ApiClient;
use crate::config::DashboardConfig;
use crate::error::CoreError;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Snapshot of a slot as seen by a view
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    /// Latest applied payload (shared with the cache)
    pub data: Option<Arc<Value>>,
    /// True while the latest request is in flight
    pub loading: bool,
    /// Failure message of the latest request
    pub error: Option<String>,
}

impl FetchState {
    pub fn is_ready(&self) -> bool {
        self.data.is_some() && !self.loading
    }
}

/// Inputs of the last evaluation, used to decide whether to re-run
#[derive(Debug, Default)]
struct SlotInputs {
    url: Option<String>,
    deps_hash: u64,
    retry_count: u64,
    fingerprint: Option<u64>,
}

fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// One cached, re-evaluable request slot
pub struct FetchSlot {
    name: String,
    client: ApiClient,
    cache: FetchCache,
    generation: AtomicU64,
    state: RwLock<FetchState>,
    inputs: Mutex<SlotInputs>,
}

impl FetchSlot {
    pub fn new(name: impl Into<String>, client: ApiClient, cache: FetchCache) -> Self {
        Self {
            name: name.into(),
            client,
            cache,
            generation: AtomicU64::new(0),
            state: RwLock::new(FetchState::default()),
            inputs: Mutex::new(SlotInputs::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state snapshot
    pub fn state(&self) -> FetchState {
        self.state.read().clone()
    }

    /// Latest generation issued
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Number of manual retries requested so far
    pub fn retry_count(&self) -> u64 {
        self.inputs.lock().retry_count
    }

    /// Load `url` into the slot
    ///
    /// - `None`: no request; `loading` becomes false and data is kept.
    /// - cache hit: data is applied immediately, no request.
    /// - miss: `loading` is set, the request runs, and its outcome is
    ///   applied only if no newer `load` started meanwhile.
    pub async fn load(&self, url: Option<&str>) -> FetchState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(url) = url else {
            self.state.write().loading = false;
            return self.state();
        };

        if let Some(hit) = self.cache.get(url) {
            let mut state = self.state.write();
            state.data = Some(hit);
            state.loading = false;
            state.error = None;
            return state.clone();
        }

        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }

        let result = self.client.get_json(url).await;

        // A late response is still valid for its own key
        let outcome = result.map(|payload| self.cache.set(url, payload));

        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(slot = %self.name, url, generation, "discarding stale response");
            return state.clone();
        }

        match outcome {
            Ok(payload) => {
                state.data = Some(payload);
                state.error = None;
            }
            Err(e) => {
                warn!(slot = %self.name, url, error = %e, "fetch failed");
                state.data = None;
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
        state.clone()
    }

    /// Re-evaluate the slot with new inputs
    ///
    /// Loads only when `(url, deps, retry_count)` differs from the previous
    /// evaluation; otherwise the current state is returned untouched.
    pub async fn refresh<D: Hash + ?Sized>(&self, url: Option<&str>, deps: &D) -> FetchState {
        let changed = {
            let mut inputs = self.inputs.lock();
            inputs.url = url.map(str::to_string);
            inputs.deps_hash = hash_of(deps);
            Self::take_fingerprint(&mut inputs)
        };

        if changed {
            self.load(url).await
        } else {
            self.state()
        }
    }

    /// Manual retry: bump the retry counter and re-evaluate the last inputs
    pub async fn retry(&self) -> FetchState {
        let url = {
            let mut inputs = self.inputs.lock();
            inputs.retry_count += 1;
            Self::take_fingerprint(&mut inputs);
            inputs.url.clone()
        };
        debug!(slot = %self.name, "manual retry");
        self.load(url.as_deref()).await
    }

    /// Store the fingerprint of the current inputs; true when it changed
    fn take_fingerprint(inputs: &mut SlotInputs) -> bool {
        let fingerprint = hash_of(&(&inputs.url, inputs.deps_hash, inputs.retry_count));
        let changed = inputs.fingerprint != Some(fingerprint);
        inputs.fingerprint = Some(fingerprint);
        changed
    }

    /// Current data decoded as `T`; None when absent or of another shape
    pub fn typed<T: DeserializeOwned>(&self) -> Option<T> {
        let data = self.state.read().data.clone()?;
        match T::deserialize(data.as_ref()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(slot = %self.name, error = %e, "unexpected payload shape");
                None
            }
        }
    }
}

impl std::fmt::Debug for FetchSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchSlot")
            .field("name", &self.name)
            .field("generation", &self.generation())
            .field("state", &*self.state.read())
            .finish()
    }
}

/// Per-session owner of the API client, response cache and fetch slots
#[derive(Debug)]
pub struct DashboardSession {
    client: ApiClient,
    cache: FetchCache,
    slots: DashMap<String, Arc<FetchSlot>>,
}

impl DashboardSession {
    pub fn new(client: ApiClient, cache: FetchCache) -> Self {
        Self {
            client,
            cache,
            slots: DashMap::new(),
        }
    }

    /// Session for the configured API with the configured cache TTL
    pub fn from_config(config: &DashboardConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let client = ApiClient::new(&config.api_base_url)?;
        Ok(Self::new(client, FetchCache::with_ttl(config.cache_ttl())))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Slot named `name`, created on first use
    pub fn slot(&self, name: &str) -> Arc<FetchSlot> {
        self.slots
            .entry(name.to_string())
            .or_insert_with(|| {
                Arc::new(FetchSlot::new(name, self.client.clone(), self.cache.clone()))
            })
            .clone()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Drop every cached response; slots keep their last state
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
