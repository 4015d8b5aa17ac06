//! Model client port
//!
//! Defines the interface for invoking a single model with a prompt.

use async_trait::async_trait;
use chorus_domain::CanonicalModel;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors a model client can report
#[derive(Error, Debug)]
pub enum ModelCallError {
    #[error("Model not available: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Transport closed")]
    TransportClosed,
}

/// One callable model.
///
/// This port defines how the application layer talks to a model backend.
/// Implementations (adapters) live outside this crate; the ensemble only
/// needs prompt-in, text-out.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// The model name this client answers for
    fn model_name(&self) -> &str;

    /// Send a prompt and wait for the full response text
    async fn invoke(&self, prompt: &str) -> Result<String, ModelCallError>;
}

/// Clients keyed by canonical model, so every spelling of a model name
/// resolves to the same client.
#[derive(Default)]
pub struct ClientRegistry {
    clients: HashMap<CanonicalModel, Arc<dyn ModelClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    /// Register a client under its canonical model name. A later client
    /// for the same canonical model replaces the earlier one.
    pub fn register(&mut self, client: Arc<dyn ModelClient>) {
        let key = CanonicalModel::normalize(client.model_name());
        self.clients.insert(key, client);
    }

    /// Look up the client for a model name in any spelling
    pub fn get(&self, model: &str) -> Option<Arc<dyn ModelClient>> {
        self.clients.get(&CanonicalModel::normalize(model)).cloned()
    }

    /// Canonical names of every registered model, sorted
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clients.keys().map(|m| m.to_string()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
