//! Model store
//!
//! Tracks loaded models by generated id. Entries live until explicitly
//! removed; there is no eviction and nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::engine::Executor;
use crate::error::{RegistryError, Result};
use crate::loader;
use crate::model::{LoadedModel, ModelMeta, Network, SequentialNetwork};

/// Concurrent registry of loaded models
///
/// Insert, lookup and removal go through a sharded map and need no outer
/// lock. Handles are reference counted, so a model removed while an
/// inference is running stays alive until that inference finishes.
pub struct ModelStore {
    /// Loaded models by id
    models: DashMap<String, Arc<LoadedModel>>,
    /// Inference adapter shared by all models
    executor: Executor,
    /// Seed for the sample network (None = entropy)
    sample_seed: Option<u64>,
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelStore {
    /// Create an empty store with a lenient executor
    pub fn new() -> Self {
        Self {
            models: DashMap::new(),
            executor: Executor::default(),
            sample_seed: None,
        }
    }

    /// Reject inference calls that omit a declared input
    pub fn with_strict_inputs(mut self, strict: bool) -> Self {
        self.executor = Executor::new(strict);
        self
    }

    /// Make sample networks reproducible
    pub fn with_sample_seed(mut self, seed: Option<u64>) -> Self {
        self.sample_seed = seed;
        self
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Deserialize and register a model.
    ///
    /// Tries a graph model first, then a sequential one. Nothing is inserted
    /// unless deserialization succeeds. Blocking; run it off the async
    /// runtime.
    pub fn load(&self, bytes: &[u8]) -> Result<Arc<LoadedModel>> {
        let network = loader::load_network(bytes)?;
        Ok(self.register(network, Some(bytes.len())))
    }

    /// Register a freshly initialized, untrained sample network
    pub fn create_sample(&self) -> Arc<LoadedModel> {
        let mut rng = match self.sample_seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };
        let network = SequentialNetwork::sample(&mut rng);
        self.register(Network::Sequential(network), None)
    }

    fn register(&self, network: Network, size_bytes: Option<usize>) -> Arc<LoadedModel> {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if let Entry::Vacant(slot) = self.models.entry(id.clone()) {
                let model = Arc::new(LoadedModel::new(id, network, size_bytes));
                slot.insert(Arc::clone(&model));
                tracing::info!(
                    id = %model.id(),
                    kind = ?model.kind(),
                    layers = model.num_layers(),
                    "Registered model"
                );
                return model;
            }
        }
    }

    /// Look up a model by id
    pub fn get(&self, id: &str) -> Result<Arc<LoadedModel>> {
        self.models
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Remove a model. Returns whether it was present; absent ids are a no-op.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.models.remove(id).is_some();
        if removed {
            tracing::info!(id = %id, "Removed model");
        }
        removed
    }

    /// Metadata for every registered model, oldest first
    pub fn list(&self) -> Vec<ModelMeta> {
        let mut metas: Vec<ModelMeta> = self
            .models
            .iter()
            .map(|entry| entry.value().meta())
            .collect();
        metas.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        metas
    }

    pub fn meta(&self, model: &LoadedModel) -> ModelMeta {
        model.meta()
    }

    /// Resolve `id` and run inference on it
    pub fn infer(&self, id: &str, inputs: &HashMap<String, Vec<f64>>) -> Result<Vec<f64>> {
        let model = self.get(id)?;
        Ok(self.executor.infer(&model, inputs)?)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    use crate::error::InferenceError;
    use crate::model::ModelKind;

    fn sample_bytes() -> Vec<u8> {
        SequentialNetwork::sample(&mut Xoshiro256PlusPlus::seed_from_u64(3))
            .to_json()
            .unwrap()
    }

    #[test]
    fn test_load_then_get_returns_same_handle() {
        let store = ModelStore::new();
        let bytes = sample_bytes();
        let loaded = store.load(&bytes).unwrap();
        let fetched = store.get(loaded.id()).unwrap();
        assert!(Arc::ptr_eq(&loaded, &fetched));
        assert_eq!(loaded.kind(), ModelKind::Sequential);
        assert_eq!(loaded.meta().size_bytes, Some(bytes.len()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_load_leaves_store_untouched() {
        let store = ModelStore::new();
        let err = store.load(b"\x00garbage").unwrap_err();
        assert!(matches!(err, RegistryError::Load(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = ModelStore::new();
        let model = store.create_sample();
        let id = model.id().to_string();

        assert!(store.remove(&id));
        assert!(matches!(store.get(&id), Err(RegistryError::NotFound(_))));
        assert!(!store.remove(&id));
        assert!(!store.remove("never-registered"));
        assert!(matches!(
            store.get("never-registered"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_removed_handle_stays_usable() {
        let store = ModelStore::new();
        let model = store.create_sample();
        store.remove(model.id());
        let mut inputs = HashMap::new();
        inputs.insert("input".to_string(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(store.executor().infer(&model, &inputs).unwrap().len(), 3);
    }

    #[test]
    fn test_sample_contract() {
        let store = ModelStore::new();
        let model = store.create_sample();
        assert_eq!(model.num_layers(), 2);
        assert_eq!(model.input_names(), ["input"]);
        assert_eq!(model.output_names(), ["output"]);
    }

    #[test]
    fn test_seeded_samples_are_reproducible() {
        let store = ModelStore::new().with_sample_seed(Some(11));
        let a = store.create_sample();
        let b = store.create_sample();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.weight_stats()[0].mean, b.weight_stats()[0].mean);
    }

    #[test]
    fn test_infer_by_id() {
        let store = ModelStore::new();
        let model = store.create_sample();
        let mut inputs = HashMap::new();
        inputs.insert("input".to_string(), vec![0.5, -0.5, 1.5, 2.0]);
        let out = store.infer(model.id(), &inputs).unwrap();
        assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        assert!(matches!(
            store.infer("missing", &inputs),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_strict_store_rejects_missing_input() {
        let store = ModelStore::new().with_strict_inputs(true);
        let model = store.create_sample();
        let err = store.infer(model.id(), &HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Inference(InferenceError::MissingInput(ref name)) if name == "input"
        ));
    }

    #[test]
    fn test_list_sorted_by_creation() {
        let store = ModelStore::new();
        let first = store.create_sample();
        let second = store.create_sample();
        let listed: Vec<String> = store.list().into_iter().map(|m| m.id).collect();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&first.id().to_string()));
        assert!(listed.contains(&second.id().to_string()));
        assert!(first.created_at() <= second.created_at());
    }

    #[test]
    fn test_concurrent_registration_produces_distinct_ids() {
        let store = Arc::new(ModelStore::new());
        let bytes = Arc::new(sample_bytes());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                let bytes = Arc::clone(&bytes);
                thread::spawn(move || {
                    (0..25)
                        .map(|_| {
                            if i % 2 == 0 {
                                store.load(&bytes).unwrap().id().to_string()
                            } else {
                                store.create_sample().id().to_string()
                            }
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let unique: HashSet<&String> = ids.iter().collect();

        assert_eq!(ids.len(), 200);
        assert_eq!(unique.len(), 200);
        assert_eq!(store.len(), 200);
        for id in &ids {
            assert_eq!(store.get(id).unwrap().id(), id);
        }
    }
}
