//! Request State

use std::sync::Arc;

use gennessence_app::context::AppContext;

/// Services shared by every handler, injected into the depot by the root router.
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    #[must_use]
    pub(crate) fn shared(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }
}
