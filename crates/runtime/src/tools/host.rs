//! Tool host trait.

use serde_json::{Map, Value};
use std::future::Future;

use super::{OperationDescriptor, ToolInvocationOutcome};

/// Trait for tool execution hosts.
///
/// This is the boundary between the orchestration loop and the remote tool
/// provider. `invoke` is total: transport and provider failures come back as
/// [`ToolInvocationOutcome::Failure`].
pub trait ToolHost: Send + Sync {
    /// Operation catalogue discovered at connect time.
    fn descriptors(&self) -> &[OperationDescriptor];

    /// Invoke the operation `name` with already-parsed arguments.
    fn invoke(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> impl Future<Output = ToolInvocationOutcome> + Send;
}
