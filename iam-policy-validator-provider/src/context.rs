//! Per-invocation context handed down by the host.

use tokio_util::sync::CancellationToken;

/// Everything an entry point may consult besides its own arguments.
///
/// Cancelling the token aborts any in-flight remote call for this invocation.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    cancel: CancellationToken,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}
