//! In-process Redfish management processor for HTTP integration tests.
//!
//! Every resource is a JSON document keyed by its request path. Reads answer
//! with a weak entity tag; writes honour `If-Match` and advance the tag.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Controllers collection served by default.
pub const COLLECTION_PATH: &str = "/redfish/v1/Systems/1/SmartStorageConfig";

/// A request observed by the fake processor.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub if_match: Option<String>,
    pub auth_token: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug)]
struct Resource {
    body: Value,
    version: u64,
}

#[derive(Debug, Default)]
struct BmcState {
    resources: HashMap<String, Resource>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<BmcState>>;

/// Handle to a running fake processor.
#[derive(Clone, Debug)]
pub struct FakeBmc {
    addr: SocketAddr,
    state: Shared,
}

impl FakeBmc {
    /// Binds an ephemeral port and starts serving.
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake management processor");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("serve fake management processor");
        });
        Self { addr, state }
    }

    /// Base URL clients should target.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BmcState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serves `body` at `path` with tag `W/"1"`.
    pub fn insert(&self, path: &str, body: Value) {
        self.lock()
            .resources
            .insert(path.to_owned(), Resource { body, version: 1 });
    }

    /// Serves a collection at [`COLLECTION_PATH`] listing each controller and
    /// serves the controllers themselves at their `@odata.id`.
    pub fn insert_controllers(&self, controllers: &[Value]) {
        let members: Vec<Value> = controllers
            .iter()
            .map(|controller| json!({ "@odata.id": controller["@odata.id"] }))
            .collect();
        self.insert(COLLECTION_PATH, json!({ "Members": members }));
        for controller in controllers {
            let path = controller["@odata.id"]
                .as_str()
                .expect("controller carries @odata.id");
            self.insert(path, controller.clone());
        }
    }

    /// Simulates another client modifying `path`.
    pub fn bump(&self, path: &str) {
        if let Some(resource) = self.lock().resources.get_mut(path) {
            resource.version += 1;
        }
    }

    /// Current body at `path`.
    pub fn body(&self, path: &str) -> Option<Value> {
        self.lock()
            .resources
            .get(path)
            .map(|resource| resource.body.clone())
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests with the given method.
    pub fn requests_with(&self, method: &Method) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == *method)
            .collect()
    }
}

fn etag(version: u64) -> String {
    format!("W/\"{version}\"")
}

fn header_text(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_owned();
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    state.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        if_match: header_text(&headers, header::IF_MATCH),
        auth_token: header_text(&headers, "x-auth-token"),
        authorization: header_text(&headers, header::AUTHORIZATION),
    });

    let Some(resource) = state.resources.get_mut(&path) else {
        return (StatusCode::NOT_FOUND, "no such resource").into_response();
    };

    match method {
        Method::GET => (
            [(header::ETAG, etag(resource.version))],
            axum::Json(resource.body.clone()),
        )
            .into_response(),
        Method::PUT => {
            let current = etag(resource.version);
            if header_text(&headers, header::IF_MATCH).is_some_and(|tag| tag != current) {
                return StatusCode::PRECONDITION_FAILED.into_response();
            }
            match serde_json::from_slice(&body) {
                Ok(value) => {
                    resource.body = value;
                    resource.version += 1;
                    StatusCode::OK.into_response()
                }
                Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
            }
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}
