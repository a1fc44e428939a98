//! Integration tests for `InstanceRegistry` startup and shutdown.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use docgate_runtime::{InstanceError, InstanceRegistry, RegistryBuilder, RegistryError};
use docgate_store::{DocumentStore, StoreConnector, StoreError};
use docgate_store_sqlite::SqliteConnector;
use docgate_types::{CredentialsError, InstanceCredentials, InstanceType};

// ---------------------------------------------------------------------------
// Connector that refuses hosts named "down"
// ---------------------------------------------------------------------------

struct FlakyConnector {
    inner: SqliteConnector,
    attempts: AtomicUsize,
}

impl FlakyConnector {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: SqliteConnector::in_memory(),
            attempts: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl StoreConnector for FlakyConnector {
    fn backend(&self) -> &'static str {
        "flaky"
    }

    async fn connect(
        &self,
        credentials: &InstanceCredentials,
    ) -> Result<Arc<dyn DocumentStore>, StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if credentials.host == "down" {
            return Err(StoreError::connect("connection refused"));
        }
        self.inner.connect(credentials).await
    }
}

fn creds(identifier: &str, host: &str) -> InstanceCredentials {
    InstanceCredentials::new(identifier, host, 27017, "gateway", "p".repeat(24))
}

#[tokio::test]
async fn two_of_three_failing_leaves_one_serving() {
    let connector = FlakyConnector::new();
    let registry = InstanceRegistry::connect_all(
        |ty| match ty {
            InstanceType::Network => creds("network", "localhost"),
            other => creds(other.config_key(), "down"),
        },
        connector.clone(),
    )
    .await;

    assert_eq!(connector.attempts.load(Ordering::SeqCst), 3);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.loaded_types(), vec![InstanceType::Network]);

    let network = registry.require(InstanceType::Network).expect("network up");
    assert!(network.collection("user", "users").is_some());

    for ty in [InstanceType::Primary, InstanceType::Game] {
        assert!(matches!(
            registry.require(ty),
            Err(RegistryError::InstanceUnavailable(t)) if t == ty
        ));
    }
}

#[tokio::test]
async fn invalid_credentials_never_reach_the_connector() {
    let connector = FlakyConnector::new();
    let mut builder = RegistryBuilder::new(connector.clone());

    let weak = InstanceCredentials::new("game", "localhost", 27017, "gateway", "short");
    let err = builder
        .register(InstanceType::Game, &weak)
        .await
        .expect_err("weak password");
    assert!(matches!(
        err,
        InstanceError::InvalidCredentials {
            source: CredentialsError::WeakPassword,
            ..
        }
    ));
    assert_eq!(connector.attempts.load(Ordering::SeqCst), 0);
    assert!(builder.build().is_empty());
}

#[tokio::test]
async fn unconfigured_instances_are_skipped() {
    let connector = FlakyConnector::new();
    let registry = InstanceRegistry::connect_all(
        |_| InstanceCredentials::new("", "", 0, "", ""),
        connector.clone(),
    )
    .await;
    assert!(registry.is_empty());
    assert_eq!(connector.attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn connect_failure_is_typed() {
    let connector = FlakyConnector::new();
    let mut builder = RegistryBuilder::new(connector);
    let err = builder
        .register(InstanceType::Primary, &creds("primary", "down"))
        .await
        .expect_err("refused");
    assert!(matches!(
        err,
        InstanceError::Connect {
            instance: InstanceType::Primary,
            source: StoreError::Connect { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn shutdown_closes_present_and_reports_absent() {
    let connector = FlakyConnector::new();
    let mut builder = RegistryBuilder::new(connector);
    builder
        .register(InstanceType::Primary, &creds("primary", "localhost"))
        .await
        .expect("primary");
    builder
        .register(InstanceType::Game, &creds("game", "localhost"))
        .await
        .expect("game");
    let registry = builder.build();

    let result = registry.shutdown_all().await;
    match result {
        Err(RegistryError::ShutdownIncomplete { missing }) => {
            assert_eq!(missing, vec![InstanceType::Network]);
        }
        other => panic!("expected ShutdownIncomplete, got {other:?}"),
    }

    for ty in [InstanceType::Primary, InstanceType::Game] {
        let instance = registry.require(ty).expect("still registered");
        assert!(instance.is_shut_down());
        assert!(instance.collection("db", "coll").is_none());
    }
}

#[tokio::test]
async fn shutdown_twice_is_harmless() {
    let connector = FlakyConnector::new();
    let registry =
        InstanceRegistry::connect_all(|ty| creds(ty.config_key(), "localhost"), connector).await;
    assert_eq!(registry.len(), 3);
    registry.shutdown_all().await.expect("first shutdown");
    registry.shutdown_all().await.expect("second shutdown");
}

#[tokio::test]
async fn registering_a_type_twice_keeps_the_first() {
    let connector = FlakyConnector::new();
    let mut builder = RegistryBuilder::new(connector.clone());
    builder
        .register(InstanceType::Game, &creds("game-a", "localhost"))
        .await
        .expect("first");
    builder
        .register(InstanceType::Game, &creds("game-b", "localhost"))
        .await
        .expect("second is ignored");
    let registry = builder.build();
    assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
    let game = registry.require(InstanceType::Game).expect("game");
    assert_eq!(game.identifier(), "game-a");
}
