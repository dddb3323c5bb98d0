//! Shared application state.

use rx_db::{Database, Ledger};

/// State handed to every handler through axum's `State` extractor.
///
/// Cloned per request; the pool and the ledger write gate inside
/// [`Database`] are shared by all clones.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }

    /// Ledger handle bound to the shared write gate.
    pub fn ledger(&self) -> Ledger {
        self.db.ledger()
    }
}
