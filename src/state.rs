use std::sync::Arc;

use crate::backend::BackendService;
use crate::events::MessageBroker;

/// Read-only per-process state shared across requests. No component behind
/// it holds cross-request mutable state.
pub struct AppState<B: BackendService, M: MessageBroker> {
    pub backend: Arc<B>,
    pub broker: Arc<M>,
}
