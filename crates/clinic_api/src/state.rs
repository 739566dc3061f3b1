//! Shared handler state.

use crate::gate::IdentityGate;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    /// `None` when no token secret is configured.
    pub gate: Option<Arc<dyn IdentityGate>>,
}

impl AppState {
    pub fn new(store: Store, gate: Option<Arc<dyn IdentityGate>>) -> Self {
        Self { store, gate }
    }
}
