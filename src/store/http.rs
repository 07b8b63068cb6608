//! Redfish HTTP implementation of [`ManagementStore`].

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use reqwest::header::{ETAG, IF_MATCH};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, info};

use super::{ManagementStore, StoreError, StoreFuture};
use crate::config::ManagementConfig;
use crate::inventory::Controller;

const MEMBERS_KEY: &str = "Members";
const ODATA_ID_KEY: &str = "@odata.id";
const SESSION_HEADER: &str = "X-Auth-Token";
const MAX_CONTROLLER_INSTANCES: u32 = 64;

#[derive(Clone, Debug)]
enum Credentials {
    Session(String),
    Basic { username: String, password: String },
}

/// Talks to a management processor over its Redfish REST interface.
///
/// Every successful read records the resource's `ETag` so commits can be
/// guarded with `If-Match`.
#[derive(Debug)]
pub struct HttpStore {
    client: Client,
    base: Url,
    controllers_path: String,
    credentials: Credentials,
    etags: Mutex<HashMap<String, String>>,
}

impl HttpStore {
    /// Builds a store from validated connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] when validation fails,
    /// [`StoreError::InvalidUrl`] when the base URL does not parse, and
    /// [`StoreError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: &ManagementConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let raw_url = config.base_url().unwrap_or_default();
        let base = Url::parse(raw_url).map_err(|err| StoreError::InvalidUrl {
            path: raw_url.to_owned(),
            message: err.to_string(),
        })?;

        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|err| StoreError::Transport {
                path: raw_url.to_owned(),
                message: err.to_string(),
            })?;

        let credentials = match config.session() {
            Some(key) => Credentials::Session(key.to_owned()),
            None => Credentials::Basic {
                username: config.username.clone().unwrap_or_default(),
                password: config.password.clone().unwrap_or_default(),
            },
        };

        Ok(Self {
            client,
            base,
            controllers_path: config.controllers_path.clone(),
            credentials,
            etags: Mutex::new(HashMap::new()),
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, StoreError> {
        self.base.join(path).map_err(|err| StoreError::InvalidUrl {
            path: path.to_owned(),
            message: err.to_string(),
        })
    }

    fn authorise(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Session(key) => request.header(SESSION_HEADER, key),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }

    fn remember(&self, path: &str, tag: Option<String>) {
        let mut etags = self.etags.lock().unwrap_or_else(PoisonError::into_inner);
        match tag {
            Some(value) => {
                etags.insert(path.to_owned(), value);
            }
            None => {
                etags.remove(path);
            }
        }
    }

    fn recorded(&self, path: &str) -> Option<String> {
        self.etags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    async fn fetch(&self, path: &str) -> Result<Value, StoreError> {
        let url = self.url_for(path)?;
        let response = self
            .authorise(self.client.get(url))
            .send()
            .await
            .map_err(|err| transport(path, &err))?;

        let status = response.status();
        let tag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|err| transport(path, &err))?;

        if !status.is_success() {
            return Err(StoreError::Status {
                path: path.to_owned(),
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        self.remember(path, tag);
        serde_json::from_slice(&body).map_err(|err| decode(path, &err))
    }

    async fn read_controllers(&self) -> Result<Vec<Controller>, StoreError> {
        let root = self.fetch(&self.controllers_path).await?;
        let Some(members) = root.get(MEMBERS_KEY).and_then(Value::as_array) else {
            return self.read_instances(root).await;
        };

        let paths = members
            .iter()
            .map(|member| {
                member
                    .get(ODATA_ID_KEY)
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .ok_or_else(|| StoreError::Decode {
                        path: self.controllers_path.clone(),
                        message: format!("collection member without {ODATA_ID_KEY}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut controllers = Vec::with_capacity(paths.len());
        for path in paths {
            let body = self.fetch(&path).await?;
            controllers.push(serde_json::from_value(body).map_err(|err| decode(&path, &err))?);
        }
        debug!(count = controllers.len(), "read controller inventory");
        Ok(controllers)
    }

    /// Reads numbered sibling resources (`SmartStorageConfig1`,
    /// `SmartStorageConfig2`, ...) after the first until one is missing.
    async fn read_instances(&self, first: Value) -> Result<Vec<Controller>, StoreError> {
        let mut controllers = vec![
            serde_json::from_value(first).map_err(|err| decode(&self.controllers_path, &err))?,
        ];
        for ordinal in 1..MAX_CONTROLLER_INSTANCES {
            let path = instance_path(&self.controllers_path, ordinal);
            match self.fetch(&path).await {
                Ok(body) => controllers
                    .push(serde_json::from_value(body).map_err(|err| decode(&path, &err))?),
                Err(StoreError::Status { status: 404, .. }) => break,
                Err(err) => return Err(err),
            }
        }
        debug!(count = controllers.len(), "read controller instances");
        Ok(controllers)
    }

    async fn put_controller(
        &self,
        path: &str,
        controller: &Controller,
        precondition: Option<&str>,
    ) -> Result<(), StoreError> {
        let url = self.url_for(path)?;
        let mut request = self.authorise(self.client.put(url)).json(controller);
        if let Some(tag) = precondition {
            request = request.header(IF_MATCH, tag);
        }
        let response = request.send().await.map_err(|err| transport(path, &err))?;

        let status = response.status();
        if status == StatusCode::PRECONDITION_FAILED {
            return Err(StoreError::PreconditionFailed {
                path: path.to_owned(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                path: path.to_owned(),
                status: status.as_u16(),
                message,
            });
        }

        self.remember(path, None);
        info!(path, "committed controller");
        Ok(())
    }
}

impl ManagementStore for HttpStore {
    type Error = StoreError;

    fn controllers(&self) -> StoreFuture<'_, Vec<Controller>, Self::Error> {
        Box::pin(self.read_controllers())
    }

    fn etag<'a>(&'a self, path: &'a str) -> StoreFuture<'a, Option<String>, Self::Error> {
        Box::pin(async move {
            if let Some(tag) = self.recorded(path) {
                return Ok(Some(tag));
            }
            self.fetch(path).await?;
            Ok(self.recorded(path))
        })
    }

    fn commit<'a>(
        &'a self,
        path: &'a str,
        controller: &'a Controller,
        precondition: Option<&'a str>,
    ) -> StoreFuture<'a, (), Self::Error> {
        Box::pin(self.put_controller(path, controller, precondition))
    }

    fn refresh<'a>(&'a self, path: &'a str) -> StoreFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.fetch(path).await?;
            debug!(path, "refreshed controller");
            Ok(())
        })
    }
}

fn instance_path(base: &str, ordinal: u32) -> String {
    match base.strip_suffix('/') {
        Some(stem) => format!("{stem}{ordinal}/"),
        None => format!("{base}{ordinal}"),
    }
}

fn transport(path: &str, err: &reqwest::Error) -> StoreError {
    StoreError::Transport {
        path: path.to_owned(),
        message: err.to_string(),
    }
}

fn decode(path: &str, err: &serde_json::Error) -> StoreError {
    StoreError::Decode {
        path: path.to_owned(),
        message: err.to_string(),
    }
}
