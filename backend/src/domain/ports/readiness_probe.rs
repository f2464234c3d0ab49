//! Port the readiness probe uses to check backing services.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised when a dependency does not answer.
    pub enum ReadinessProbeError {
        /// The dependency could not be reached.
        Unavailable { message: String } => "dependency unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Succeed when the dependency can serve a request right now.
    async fn check(&self) -> Result<(), ReadinessProbeError>;
}
