//! Per-resource route handlers.
//!
//! Each resource maps its query parameters onto `{database, collection,
//! filter}` and delegates to [`DocumentHandlers`].

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use docgate_types::{Filter, InstanceType};
use serde::Deserialize;
use serde_json::Value;

use crate::envelope::Envelope;
use crate::handlers::{body_document, DocumentHandlers};
use crate::router::AppState;

type Params<T> = Result<Query<T>, QueryRejection>;
type Body = Result<Json<Value>, JsonRejection>;

fn params<T>(params: Params<T>) -> Result<T, Envelope> {
    params
        .map(|Query(p)| p)
        .map_err(|e| Envelope::bad_request(e.body_text()))
}

fn body(body: Body) -> Result<docgate_types::Document, Envelope> {
    let Json(value) = body.map_err(|e| Envelope::bad_request(e.body_text()))?;
    body_document(value)
}

fn handlers(state: &AppState, instance: InstanceType) -> DocumentHandlers {
    DocumentHandlers::new(state.context.repository(instance))
}

fn required(value: Option<String>) -> Result<String, Envelope> {
    value.ok_or_else(Envelope::missing_parameters)
}

// ---------------------------------------------------------------------------
// /datastore/{game,network}
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct DatastoreParams {
    database: Option<String>,
    collection: Option<String>,
    identifier: Option<String>,
}

impl DatastoreParams {
    fn into_parts(self) -> Result<(String, String, String), Envelope> {
        Ok((
            required(self.database)?,
            required(self.collection)?,
            required(self.identifier)?,
        ))
    }
}

/// Free-form datastore routes for one instance type.
pub(crate) fn datastore_routes(instance: InstanceType) -> Router<AppState> {
    Router::new()
        .route("/create", post(datastore_create))
        .route("/update", put(datastore_update))
        .route("/delete", delete(datastore_delete))
        .route("/get", get(datastore_get))
        .layer(Extension(instance))
}

async fn datastore_create(
    State(state): State<AppState>,
    Extension(instance): Extension<InstanceType>,
    query: Params<DatastoreParams>,
    payload: Body,
) -> Result<Envelope, Envelope> {
    let (database, collection, identifier) = params(query)?.into_parts()?;
    let payload = body(payload)?;
    Ok(handlers(&state, instance)
        .create(&database, &collection, &identifier, &payload)
        .await)
}

async fn datastore_update(
    State(state): State<AppState>,
    Extension(instance): Extension<InstanceType>,
    query: Params<DatastoreParams>,
    payload: Body,
) -> Result<Envelope, Envelope> {
    let (database, collection, identifier) = params(query)?.into_parts()?;
    let changes = body(payload)?;
    Ok(handlers(&state, instance)
        .update(&database, &collection, &Filter::by_id(identifier), &changes)
        .await)
}

async fn datastore_delete(
    State(state): State<AppState>,
    Extension(instance): Extension<InstanceType>,
    query: Params<DatastoreParams>,
) -> Result<Envelope, Envelope> {
    let (database, collection, identifier) = params(query)?.into_parts()?;
    Ok(handlers(&state, instance)
        .delete(&database, &collection, &Filter::by_id(identifier))
        .await)
}

async fn datastore_get(
    State(state): State<AppState>,
    Extension(instance): Extension<InstanceType>,
    query: Params<DatastoreParams>,
) -> Result<Envelope, Envelope> {
    let (database, collection, identifier) = params(query)?.into_parts()?;
    Ok(handlers(&state, instance)
        .get(&database, &collection, &Filter::by_id(identifier))
        .await)
}

// ---------------------------------------------------------------------------
// /user
// ---------------------------------------------------------------------------

const USER_DATABASE: &str = "user";
const USER_COLLECTION: &str = "users";

#[derive(Debug, Deserialize)]
pub(crate) struct UserParams {
    uuid: Option<String>,
}

pub(crate) fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(user_create))
        .route("/update", put(user_update))
        .route("/get", get(user_get))
}

async fn user_create(
    State(state): State<AppState>,
    query: Params<UserParams>,
    payload: Body,
) -> Result<Envelope, Envelope> {
    let uuid = required(params(query)?.uuid)?;
    let payload = body(payload)?;
    Ok(handlers(&state, InstanceType::Network)
        .create(USER_DATABASE, USER_COLLECTION, &uuid, &payload)
        .await)
}

async fn user_update(
    State(state): State<AppState>,
    query: Params<UserParams>,
    payload: Body,
) -> Result<Envelope, Envelope> {
    let uuid = required(params(query)?.uuid)?;
    let changes = body(payload)?;
    Ok(handlers(&state, InstanceType::Network)
        .update(USER_DATABASE, USER_COLLECTION, &Filter::by_id(uuid), &changes)
        .await)
}

async fn user_get(
    State(state): State<AppState>,
    query: Params<UserParams>,
) -> Result<Envelope, Envelope> {
    let uuid = required(params(query)?.uuid)?;
    Ok(handlers(&state, InstanceType::Network)
        .get(USER_DATABASE, USER_COLLECTION, &Filter::by_id(uuid))
        .await)
}

// ---------------------------------------------------------------------------
// /server/{instance,proxy}
// ---------------------------------------------------------------------------

const SERVER_DATABASE: &str = "network";

/// Which server collection a route group serves.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ServerCollection(pub(crate) &'static str);

pub(crate) const INSTANCES: ServerCollection = ServerCollection("instances");
pub(crate) const PROXIES: ServerCollection = ServerCollection("proxies");

#[derive(Debug, Deserialize)]
pub(crate) struct ServerParams {
    identifier: Option<String>,
    port: Option<i64>,
}

impl ServerParams {
    /// `_id` match if given, else `port` match.
    fn filter(self) -> Result<Filter, Envelope> {
        match (self.identifier, self.port) {
            (Some(identifier), _) => Ok(Filter::by_id(identifier)),
            (None, Some(port)) => Ok(Filter::eq("port", port)),
            (None, None) => Err(Envelope::missing_parameters()),
        }
    }
}

pub(crate) fn server_routes(collection: ServerCollection) -> Router<AppState> {
    Router::new()
        .route("/create", post(server_create))
        .route("/update", put(server_update))
        .route("/delete", delete(server_delete))
        .route("/get", get(server_get))
        .route("/get/all", get(server_get_all))
        .layer(Extension(collection))
}

async fn server_create(
    State(state): State<AppState>,
    Extension(ServerCollection(collection)): Extension<ServerCollection>,
    query: Params<ServerParams>,
    payload: Body,
) -> Result<Envelope, Envelope> {
    let identifier = required(params(query)?.identifier)?;
    let payload = body(payload)?;
    Ok(handlers(&state, InstanceType::Primary)
        .create(SERVER_DATABASE, collection, &identifier, &payload)
        .await)
}

async fn server_update(
    State(state): State<AppState>,
    Extension(ServerCollection(collection)): Extension<ServerCollection>,
    query: Params<ServerParams>,
    payload: Body,
) -> Result<Envelope, Envelope> {
    let filter = params(query)?.filter()?;
    let changes = body(payload)?;
    Ok(handlers(&state, InstanceType::Primary)
        .update(SERVER_DATABASE, collection, &filter, &changes)
        .await)
}

async fn server_delete(
    State(state): State<AppState>,
    Extension(ServerCollection(collection)): Extension<ServerCollection>,
    query: Params<ServerParams>,
) -> Result<Envelope, Envelope> {
    let identifier = required(params(query)?.identifier)?;
    Ok(handlers(&state, InstanceType::Primary)
        .delete(SERVER_DATABASE, collection, &Filter::by_id(identifier))
        .await)
}

async fn server_get(
    State(state): State<AppState>,
    Extension(ServerCollection(collection)): Extension<ServerCollection>,
    query: Params<ServerParams>,
) -> Result<Envelope, Envelope> {
    let filter = params(query)?.filter()?;
    Ok(handlers(&state, InstanceType::Primary)
        .get(SERVER_DATABASE, collection, &filter)
        .await)
}

async fn server_get_all(
    State(state): State<AppState>,
    Extension(ServerCollection(collection)): Extension<ServerCollection>,
) -> Envelope {
    handlers(&state, InstanceType::Primary)
        .get_all(SERVER_DATABASE, collection)
        .await
}

// ---------------------------------------------------------------------------
// /configuration, /localization
// ---------------------------------------------------------------------------

/// Read-only catalog database served under a route group.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CatalogDatabase(pub(crate) &'static str);

pub(crate) const CONFIGURATION: CatalogDatabase = CatalogDatabase("configuration");
pub(crate) const LOCALIZATION: CatalogDatabase = CatalogDatabase("localization");

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogParams {
    identifier: Option<String>,
}

pub(crate) fn catalog_routes(database: CatalogDatabase) -> Router<AppState> {
    Router::new()
        .route("/get/{collection}", get(catalog_get))
        .route("/get/all/{collection}", get(catalog_get_all))
        .layer(Extension(database))
}

async fn catalog_get(
    State(state): State<AppState>,
    Extension(CatalogDatabase(database)): Extension<CatalogDatabase>,
    Path(collection): Path<String>,
    query: Params<CatalogParams>,
) -> Result<Envelope, Envelope> {
    let identifier = required(params(query)?.identifier)?;
    Ok(handlers(&state, InstanceType::Primary)
        .get(database, &collection, &Filter::by_id(identifier))
        .await)
}

async fn catalog_get_all(
    State(state): State<AppState>,
    Extension(CatalogDatabase(database)): Extension<CatalogDatabase>,
    Path(collection): Path<String>,
) -> Envelope {
    handlers(&state, InstanceType::Primary)
        .get_all(database, &collection)
        .await
}
