use std::sync::Arc;

use crate::admin::AdminConsole;
use crate::api::{RestClient, StorefrontApi};
use crate::cart::CartState;
use crate::catalog::Catalog;
use crate::checkout::CheckoutFlow;
use crate::config::ClientConfig;
use crate::events::EventBus;
use crate::orders::OrdersView;
use crate::session::{FsVault, MemoryVault, SessionStore, SessionVault};
use crate::wishlist::WishlistStore;

/// Composition root: wires the event bus, session store and REST gateway
/// together and hands out the per-view stores.
#[derive(Clone)]
pub struct AppState {
    pub bus: EventBus,
    pub session: Arc<SessionStore>,
    pub api: Arc<dyn StorefrontApi>,
}

impl AppState {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let bus = EventBus::new();
        let vault: Box<dyn SessionVault> = match &config.session_file {
            Some(path) => Box::new(FsVault::new(path.clone())),
            None => Box::new(MemoryVault::default()),
        };
        let session = Arc::new(SessionStore::new(vault, bus.clone()));
        session.restore();
        let api: Arc<dyn StorefrontApi> =
            Arc::new(RestClient::new(&config, Arc::clone(&session))?);
        Ok(Self { bus, session, api })
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(Arc::clone(&self.api))
    }

    pub fn cart(&self) -> CartState {
        CartState::new(Arc::clone(&self.api), self.bus.clone())
    }

    pub fn checkout(&self) -> CheckoutFlow {
        CheckoutFlow::new()
    }

    pub fn wishlist(&self) -> WishlistStore {
        WishlistStore::new(Arc::clone(&self.api), self.bus.clone())
    }

    pub fn orders(&self) -> OrdersView {
        OrdersView::new(Arc::clone(&self.api))
    }

    pub fn admin(&self) -> AdminConsole {
        AdminConsole::new(Arc::clone(&self.api))
    }
}
