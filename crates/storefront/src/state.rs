//! Application state shared by storefront operations.

use std::sync::Arc;

use crate::auth::Viewer;
use crate::cart::{CartView, LocalCartStore, QuantityController};
use crate::config::StorefrontConfig;
use crate::popup::PopupStore;
use crate::products::{ApiClient, ApiError};
use crate::storage::FileStore;

/// Application state: the product client, the viewer, and the two
/// client-local stores.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    api: ApiClient,
    local: FileStore,
    session: FileStore,
    viewer: Viewer,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let local = FileStore::new(&config.storage.data_dir);
        let session = FileStore::new(&config.storage.session_dir);
        let viewer = Viewer::from_config(config.identity.as_ref());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                api,
                local,
                session,
                viewer,
            }),
        })
    }

    /// Get a reference to the product API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// The signed-in or anonymous viewer.
    #[must_use]
    pub fn viewer(&self) -> &Viewer {
        &self.inner.viewer
    }

    /// Durable cart document store.
    #[must_use]
    pub fn cart_store(&self) -> LocalCartStore<&FileStore> {
        LocalCartStore::new(&self.inner.local)
    }

    /// Quantity controller over the durable cart.
    #[must_use]
    pub fn quantities(&self) -> QuantityController<&FileStore> {
        QuantityController::new(self.cart_store())
    }

    /// Session-scoped popup store.
    #[must_use]
    pub fn popups(&self) -> PopupStore<&FileStore> {
        PopupStore::new(&self.inner.session)
    }

    /// A fresh cart view backed by the product client.
    #[must_use]
    pub fn cart_view(&self) -> CartView<ApiClient> {
        CartView::new(self.inner.api.clone())
    }
}
