//! Shared application state.
//!
//! One `AppState` is built at startup and cloned into every handler via
//! axum's `State` extractor. The catalog is immutable shared state, safe
//! for unlimited concurrent reads; everything else is a cheap handle.

use std::sync::Arc;

use crate::auth::JwtManager;
use canvass_core::{Catalog, SalesSettings};
use canvass_db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub catalog: Arc<Catalog>,
    pub settings: SalesSettings,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(
        db: Database,
        catalog: Catalog,
        settings: SalesSettings,
        jwt: JwtManager,
    ) -> Self {
        AppState {
            db,
            catalog: Arc::new(catalog),
            settings,
            jwt: Arc::new(jwt),
        }
    }
}
