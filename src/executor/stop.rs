use tokio_util::sync::CancellationToken;

/// Cooperative cancellation for a plan run.
///
/// Triggering the signal stops the executor from dispatching new nodes;
/// in-flight provisioning actions run to completion, and every node still
/// pending is marked skipped.
#[derive(Clone, Default)]
pub struct StopSignal {
    token: CancellationToken,
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
