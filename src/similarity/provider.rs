//! Lazily initialized, shareable embedding model handle
//!
//! A [`ModelProvider`] is built once (usually at process start) and passed
//! into every summarizer that needs embeddings. The model is loaded on the
//! first call to [`ModelProvider::get`] and then served read-only for the
//! rest of the process lifetime. A failed load is reported to the caller
//! and retried on the next request.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{info, warn};

use super::embedder::Embedder;
use crate::error::{Error, Result};

type Loader = Box<dyn Fn() -> Result<Arc<dyn Embedder>> + Send + Sync>;

/// Scoped handle to a sentence-embedding model
pub struct ModelProvider {
    model: OnceLock<Arc<dyn Embedder>>,
    loader: Option<Loader>,
    init_lock: Mutex<()>,
}

impl fmt::Debug for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelProvider")
            .field("initialized", &self.is_initialized())
            .field("lazy", &self.loader.is_some())
            .finish()
    }
}

impl ModelProvider {
    /// Provider serving an already constructed embedder
    pub fn ready(embedder: Arc<dyn Embedder>) -> Self {
        let model = OnceLock::new();
        let _ = model.set(embedder);
        Self {
            model,
            loader: None,
            init_lock: Mutex::new(()),
        }
    }

    /// Provider that runs `loader` on first use
    pub fn lazy<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Embedder>> + Send + Sync + 'static,
    {
        Self {
            model: OnceLock::new(),
            loader: Some(Box::new(loader)),
            init_lock: Mutex::new(()),
        }
    }

    /// Provider for a BERT-family sentence encoder stored in `model_dir`
    #[cfg(feature = "candle")]
    pub fn bert(model_dir: impl Into<std::path::PathBuf>) -> Self {
        let model_dir = model_dir.into();
        Self::lazy(move || {
            let embedder = super::bert::BertEmbedder::load(&model_dir)?;
            Ok(Arc::new(embedder) as Arc<dyn Embedder>)
        })
    }

    /// Whether the model has been loaded
    pub fn is_initialized(&self) -> bool {
        self.model.get().is_some()
    }

    /// The shared embedder, loading it on first use
    pub fn get(&self) -> Result<Arc<dyn Embedder>> {
        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }

        let _guard = self
            .init_lock
            .lock()
            .map_err(|_| Error::Embedding("model initialization lock poisoned".to_string()))?;

        // another caller may have finished loading while we waited
        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }

        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| Error::Embedding("no embedding model configured".to_string()))?;

        match loader() {
            Ok(model) => {
                info!(dim = model.dim(), "embedding model loaded");
                let _ = self.model.set(Arc::clone(&model));
                Ok(model)
            }
            Err(e) => {
                warn!(error = %e, "embedding model failed to load");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::HashingEmbedder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_ready_provider() {
        let provider = ModelProvider::ready(Arc::new(HashingEmbedder::new(16)));
        assert!(provider.is_initialized());
        assert_eq!(provider.get().unwrap().dim(), 16);
    }

    #[test]
    fn test_lazy_provider_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let provider = ModelProvider::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(HashingEmbedder::new(8)) as Arc<dyn Embedder>)
        });

        assert!(!provider.is_initialized());
        provider.get().unwrap();
        provider.get().unwrap();
        assert!(provider.is_initialized());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let provider = ModelProvider::lazy(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::Embedding("model directory missing".to_string()))
            } else {
                Ok(Arc::new(HashingEmbedder::new(8)) as Arc<dyn Embedder>)
            }
        });

        assert!(matches!(provider.get(), Err(Error::Embedding(_))));
        assert!(!provider.is_initialized());
        assert!(provider.get().is_ok());
    }

    #[test]
    fn test_concurrent_first_use() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let provider = Arc::new(ModelProvider::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(HashingEmbedder::new(8)) as Arc<dyn Embedder>)
        }));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let provider = Arc::clone(&provider);
                std::thread::spawn(move || provider.get().map(|m| m.dim()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 8);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
