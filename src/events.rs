use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    SignedIn,
    SignedOut,
    /// The backend answered 401; the session was cleared globally.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    ItemAdded,
    QuantityUpdated,
    LineRemoved,
    Cleared,
    OrderPlaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistChange {
    ItemAdded,
    ItemRemoved,
}

/// Cross-component notifications. Payloads are reason codes, not data:
/// consumers re-fetch from the backend rather than trusting the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    SessionChanged(SessionChange),
    CartChanged(CartChange),
    WishlistChanged(WishlistChange),
    OrderPlaced { order_id: i64 },
}

/// Fire-and-forget broadcast bus. Only currently subscribed receivers see an
/// event; there is no queue, retry, or ordering guarantee relative to the
/// re-fetch a consumer performs on receipt.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: AppEvent) {
        // An error only means nobody is subscribed right now.
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
