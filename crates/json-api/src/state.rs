//! Shared request state injected into the router.

use std::sync::Arc;

use bodega_app::context::AppContext;

/// Application services available to every handler via the depot.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext) -> Self {
        Self { app }
    }

    /// Wrap the context for injection with salvo's affix-state middleware.
    #[must_use]
    pub(crate) fn shared(app: AppContext) -> Arc<Self> {
        Arc::new(Self::new(app))
    }
}
