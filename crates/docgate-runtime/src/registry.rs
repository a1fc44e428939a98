//! The fixed set of live instances, built once at startup.

use std::collections::HashMap;
use std::sync::Arc;

use docgate_store::StoreConnector;
use docgate_types::{DiagnosticError, InstanceCredentials, InstanceType};
use futures::future::join_all;
use tracing::{error, info, warn};

use crate::error::{InstanceError, RegistryError};
use crate::instance::StoreInstance;

/// Accumulates instances before the registry is frozen.
pub struct RegistryBuilder {
    connector: Arc<dyn StoreConnector>,
    instances: HashMap<InstanceType, Arc<StoreInstance>>,
}

impl RegistryBuilder {
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            connector,
            instances: HashMap::new(),
        }
    }

    /// Attempts to bring up the instance for `instance_type`.
    ///
    /// A failure is logged and the type stays absent; the caller may
    /// keep registering other types.
    ///
    /// # Errors
    ///
    /// Returns the `InstanceError` that excluded this type.
    pub async fn register(
        &mut self,
        instance_type: InstanceType,
        credentials: &InstanceCredentials,
    ) -> Result<(), InstanceError> {
        if self.instances.contains_key(&instance_type) {
            warn!(instance = %instance_type, "instance already registered, ignoring");
            return Ok(());
        }
        match StoreInstance::connect(instance_type, credentials, self.connector.as_ref()).await {
            Ok(instance) => {
                self.instances.insert(instance_type, Arc::new(instance));
                Ok(())
            }
            Err(e) => {
                error!(
                    instance = %instance_type,
                    error = %e,
                    hint = %e.hint().unwrap_or_default(),
                    "instance unavailable, skipping"
                );
                Err(e)
            }
        }
    }

    /// Adds an instance whose store is already open.
    pub fn insert(&mut self, instance: StoreInstance) -> &mut Self {
        self.instances
            .insert(instance.instance_type(), Arc::new(instance));
        self
    }

    /// Freezes the set. No instance can be added afterwards.
    pub fn build(self) -> InstanceRegistry {
        InstanceRegistry {
            instances: self.instances,
        }
    }
}

/// Read-only map from logical type to its live instance.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: HashMap<InstanceType, Arc<StoreInstance>>,
}

impl InstanceRegistry {
    /// Registers every known instance type, pulling credentials from
    /// `source`. Types that fail are left out.
    pub async fn connect_all<F>(source: F, connector: Arc<dyn StoreConnector>) -> Self
    where
        F: Fn(InstanceType) -> InstanceCredentials,
    {
        let mut builder = RegistryBuilder::new(connector);
        for instance_type in InstanceType::ALL {
            let credentials = source(instance_type);
            // Failures are already logged by `register`.
            let _ = builder.register(instance_type, &credentials).await;
        }
        let registry = builder.build();

        if registry.is_empty() {
            error!("no store instances were loaded; every document operation will fail");
        } else {
            info!(
                loaded = registry.len(),
                of = InstanceType::ALL.len(),
                "store instances loaded"
            );
        }
        registry
    }

    pub fn get(&self, instance_type: InstanceType) -> Option<Arc<StoreInstance>> {
        self.instances.get(&instance_type).cloned()
    }

    /// Like [`get`](Self::get), but absence is an error.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InstanceUnavailable` if the type failed
    /// to come up at startup.
    pub fn require(&self, instance_type: InstanceType) -> Result<Arc<StoreInstance>, RegistryError> {
        self.get(instance_type)
            .ok_or(RegistryError::InstanceUnavailable(instance_type))
    }

    pub fn contains(&self, instance_type: InstanceType) -> bool {
        self.instances.contains_key(&instance_type)
    }

    /// Loaded types, in `InstanceType::ALL` order.
    pub fn loaded_types(&self) -> Vec<InstanceType> {
        InstanceType::ALL
            .into_iter()
            .filter(|t| self.instances.contains_key(t))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Closes every loaded instance concurrently.
    ///
    /// Absent types are reported but never stop the others from closing.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ShutdownIncomplete` listing the types that
    /// had no instance to close.
    pub async fn shutdown_all(&self) -> Result<(), RegistryError> {
        let mut missing = Vec::new();
        let mut closing = Vec::new();
        for instance_type in InstanceType::ALL {
            match self.instances.get(&instance_type) {
                Some(instance) => closing.push(instance.shutdown()),
                None => {
                    error!(instance = %instance_type, "cannot shut down absent instance");
                    missing.push(instance_type);
                }
            }
        }
        join_all(closing).await;

        if missing.is_empty() {
            info!("all store instances shut down");
            Ok(())
        } else {
            Err(RegistryError::ShutdownIncomplete { missing })
        }
    }
}
