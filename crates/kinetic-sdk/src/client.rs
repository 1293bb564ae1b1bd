//! Clients for the Kinetic platform components
//!
//! Each client pairs one API root with the shared transport and credentials.
//! Clients are cheap to clone; resources returned by the accessors are
//! independent handles that may be moved into spawned tasks.

use crate::api::ApiClient;
use crate::config::{ConnectionConfig, SdkOptions};
use crate::error::Result;
use crate::resources::{Collection, Engine, Space, Submissions, Trees};
use kinetic_transport::headers::AuthProvider;
use kinetic_transport::{HttpTransport, Transport};
use std::sync::Arc;
use tracing::debug;

/// Request CE REST API, relative to the space URL
pub const REQUEST_CE_API: [&str; 3] = ["app", "api", "v1"];

/// Task REST API, relative to the task server URL
pub const TASK_API: [&str; 3] = ["app", "api", "v2"];

/// Bridgehub management API, relative to the bridgehub server URL
pub const BRIDGEHUB_API: [&str; 3] = ["app", "manage-api", "v1"];

/// Filehub REST API, relative to the filehub server URL
pub const FILEHUB_API: [&str; 3] = ["app", "api", "v1"];

fn http_transport(config: &ConnectionConfig) -> Result<Arc<dyn Transport>> {
    let transport = HttpTransport::with_config(config.options.transport_config())?;
    Ok(Arc::new(transport))
}

fn auth(config: &ConnectionConfig) -> Arc<dyn AuthProvider> {
    Arc::new(config.auth())
}

/// Client for a Request CE space.
///
/// # Example
///
/// ```rust,no_run
/// use kinetic_sdk::{ConnectionConfig, RequestCe};
///
/// # async fn example() -> kinetic_sdk::Result<()> {
/// let config = ConnectionConfig::new("https://kinetic.example.com", "admin", "secret")
///     .with_space_slug("acme");
/// let ce = RequestCe::new(&config)?;
///
/// let kapps = ce.kapps().find_all(&[("include", "details")]).await?;
/// println!("{}", kapps.status_code());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestCe {
    api: ApiClient,
    web: ApiClient,
    options: Arc<SdkOptions>,
}

impl RequestCe {
    /// Create a client over HTTP.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        Self::with_transport(config, http_transport(config)?)
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: &ConnectionConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let space = config.space_url()?;
        let auth = auth(config);
        let api = ApiClient::new(transport.clone(), auth.clone(), &space, &REQUEST_CE_API)?;
        let web = ApiClient::new(transport, auth, &space, &[])?;
        debug!(base_url = %api.base_url(), "Created Request CE client");
        Ok(Self {
            api,
            web,
            options: Arc::new(config.options.clone()),
        })
    }

    /// The REST API root
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Options the client was built with
    pub fn options(&self) -> &SdkOptions {
        &self.options
    }

    /// The space
    pub fn space(&self) -> Space {
        Space::new(self.api.clone())
    }

    /// Kapps of the space
    pub fn kapps(&self) -> Collection {
        Collection::new(self.api.clone(), ["kapps"])
    }

    /// Forms of a kapp
    pub fn forms(&self, kapp: &str) -> Collection {
        Collection::new(self.api.clone(), ["kapps", kapp, "forms"])
    }

    /// Categories of a kapp
    pub fn categories(&self, kapp: &str) -> Collection {
        Collection::new(self.api.clone(), ["kapps", kapp, "categories"])
    }

    /// Submissions
    pub fn submissions(&self) -> Submissions {
        Submissions::new(self.api.clone(), self.web.clone())
    }

    /// Users, addressed by username
    pub fn users(&self) -> Collection {
        Collection::new(self.api.clone(), ["users"])
    }

    /// Teams, addressed by slug
    pub fn teams(&self) -> Collection {
        Collection::new(self.api.clone(), ["teams"])
    }

    /// Webhooks of a kapp, or of the space when `kapp` is `None`.
    /// Addressed by name.
    pub fn webhooks(&self, kapp: Option<&str>) -> Collection {
        match kapp {
            Some(kapp) => Collection::new(self.api.clone(), ["kapps", kapp, "webhooks"]),
            None => Collection::new(self.api.clone(), ["webhooks"]),
        }
    }
}

/// Client for a Task server.
#[derive(Debug, Clone)]
pub struct Task {
    api: ApiClient,
}

impl Task {
    /// Create a client over HTTP.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        Self::with_transport(config, http_transport(config)?)
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: &ConnectionConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let api = ApiClient::new(transport, auth(config), &config.server_url()?, &TASK_API)?;
        debug!(base_url = %api.base_url(), "Created Task client");
        Ok(Self { api })
    }

    /// The REST API root
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Workflow trees
    pub fn trees(&self) -> Trees {
        Trees::new(self.api.clone())
    }

    /// Tree runs, addressed by run id
    pub fn runs(&self) -> Collection {
        Collection::new(self.api.clone(), ["runs"])
    }

    /// Installed handlers, addressed by definition id
    pub fn handlers(&self) -> Collection {
        Collection::new(self.api.clone(), ["handlers"])
    }

    /// Sources, addressed by name
    pub fn sources(&self) -> Collection {
        Collection::new(self.api.clone(), ["sources"])
    }

    /// The engine process
    pub fn engine(&self) -> Engine {
        Engine::new(self.api.clone())
    }
}

/// Client for a Bridgehub server.
#[derive(Debug, Clone)]
pub struct Bridgehub {
    api: ApiClient,
}

impl Bridgehub {
    /// Create a client over HTTP.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        Self::with_transport(config, http_transport(config)?)
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: &ConnectionConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let api = ApiClient::new(transport, auth(config), &config.server_url()?, &BRIDGEHUB_API)?;
        debug!(base_url = %api.base_url(), "Created Bridgehub client");
        Ok(Self { api })
    }

    /// The management API root
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Bridges, addressed by slug
    pub fn bridges(&self) -> Collection {
        Collection::new(self.api.clone(), ["bridges"])
    }

    /// Access keys of a bridge, addressed by id
    pub fn access_keys(&self, bridge: &str) -> Collection {
        Collection::new(self.api.clone(), ["bridges", bridge, "accessKeys"])
    }
}

/// Client for a Filehub server.
#[derive(Debug, Clone)]
pub struct Filehub {
    api: ApiClient,
}

impl Filehub {
    /// Create a client over HTTP.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        Self::with_transport(config, http_transport(config)?)
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: &ConnectionConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let api = ApiClient::new(transport, auth(config), &config.server_url()?, &FILEHUB_API)?;
        debug!(base_url = %api.base_url(), "Created Filehub client");
        Ok(Self { api })
    }

    /// The REST API root
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Filestores, addressed by slug
    pub fn filestores(&self) -> Collection {
        Collection::new(self.api.clone(), ["filestores"])
    }

    /// Access keys of a filestore, addressed by id
    pub fn access_keys(&self, filestore: &str) -> Collection {
        Collection::new(self.api.clone(), ["filestores", filestore, "accessKeys"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::resources::Resource;

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("https://kinetic.example.com", "admin", "secret")
            .with_space_slug("acme")
    }

    #[test]
    fn test_request_ce_roots() {
        let ce = RequestCe::new(&config()).unwrap();
        assert_eq!(
            ce.api().base_url().as_str(),
            "https://kinetic.example.com/acme/app/api/v1"
        );
        assert_eq!(
            ce.webhooks(None).api().url(ce.webhooks(None).path()).unwrap().as_str(),
            "https://kinetic.example.com/acme/app/api/v1/webhooks"
        );
        assert_eq!(ce.webhooks(Some("services")).path(), ["kapps", "services", "webhooks"]);
        assert_eq!(ce.forms("services").path(), ["kapps", "services", "forms"]);
    }

    #[test]
    fn test_request_ce_space_server() {
        let config = config().with_space_server_url("https://acme.example.com");
        let ce = RequestCe::new(&config).unwrap();
        assert_eq!(ce.api().base_url().as_str(), "https://acme.example.com/app/api/v1");
    }

    #[test]
    fn test_request_ce_requires_space() {
        let config = ConnectionConfig::new("https://kinetic.example.com", "admin", "secret");
        let err = RequestCe::new(&config).unwrap_err();
        assert!(matches!(err, Error::MissingConfig("space_slug")));
    }

    #[test]
    fn test_component_roots() {
        let task = Task::new(&ConnectionConfig::new(
            "https://kinetic.example.com/kinetic-task",
            "admin",
            "secret",
        ))
        .unwrap();
        assert_eq!(
            task.api().base_url().as_str(),
            "https://kinetic.example.com/kinetic-task/app/api/v2"
        );

        let bridgehub = Bridgehub::new(&ConnectionConfig::new(
            "https://kinetic.example.com/kinetic-bridgehub/",
            "admin",
            "secret",
        ))
        .unwrap();
        assert_eq!(
            bridgehub.api().base_url().as_str(),
            "https://kinetic.example.com/kinetic-bridgehub/app/manage-api/v1"
        );
        assert_eq!(bridgehub.access_keys("ad").path(), ["bridges", "ad", "accessKeys"]);

        let filehub = Filehub::new(&ConnectionConfig::new(
            "https://kinetic.example.com/kinetic-filehub",
            "admin",
            "secret",
        ))
        .unwrap();
        assert_eq!(
            filehub.api().base_url().as_str(),
            "https://kinetic.example.com/kinetic-filehub/app/api/v1"
        );
    }
}
