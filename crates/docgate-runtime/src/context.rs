//! Process-wide context passed explicitly to every component.

use std::sync::Arc;

use docgate_types::InstanceType;

use crate::error::RegistryError;
use crate::registry::InstanceRegistry;
use crate::repository::DocumentRepository;

/// Shared store access, constructed once at startup.
#[derive(Debug, Clone)]
pub struct AppContext {
    registry: Arc<InstanceRegistry>,
}

impl AppContext {
    pub fn new(registry: InstanceRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    /// A repository bound to `instance_type`.
    pub fn repository(&self, instance_type: InstanceType) -> DocumentRepository {
        DocumentRepository::new(instance_type, Arc::clone(&self.registry))
    }

    /// Closes every instance.
    ///
    /// # Errors
    ///
    /// See [`InstanceRegistry::shutdown_all`].
    pub async fn shutdown(&self) -> Result<(), RegistryError> {
        self.registry.shutdown_all().await
    }
}
