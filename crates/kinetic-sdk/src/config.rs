//! Connection settings for the Kinetic clients
//!
//! A [`ConnectionConfig`] can be built in code, read from a YAML file, or
//! loaded from `KINETIC_*` environment variables. It is passed to a client
//! once at construction; nothing here is global or mutable afterwards.

use crate::error::{Error, Result};
use kinetic_transport::headers::BasicAuth;
use kinetic_transport::{LogLevel, TlsMode, TransportConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// How HTTPS server certificates are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslVerifyMode {
    /// Verify the server certificate chain
    #[default]
    Peer,
    /// Accept any certificate
    None,
}

impl fmt::Display for SslVerifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SslVerifyMode::Peer => f.write_str("peer"),
            SslVerifyMode::None => f.write_str("none"),
        }
    }
}

impl FromStr for SslVerifyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peer" => Ok(SslVerifyMode::Peer),
            "none" => Ok(SslVerifyMode::None),
            other => Err(Error::Config(format!(
                "ssl_verify_mode must be 'peer' or 'none', got '{other}'"
            ))),
        }
    }
}

/// Tunables shared by every client.
///
/// Unknown keys in a YAML `options` block are ignored; missing keys take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkOptions {
    /// Request logging verbosity
    pub log_level: LogLevel,

    /// Redirects followed before a request fails
    pub max_redirects: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Certificate verification
    pub ssl_verify_mode: SslVerifyMode,

    /// Extra PEM bundle trusted when verifying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_ca_file: Option<PathBuf>,

    /// Root directory for exported definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_directory: Option<PathBuf>,
}

impl Default for SdkOptions {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Off,
            max_redirects: kinetic_transport::config::DEFAULT_MAX_REDIRECTS,
            timeout_secs: kinetic_transport::config::DEFAULT_TIMEOUT.as_secs(),
            ssl_verify_mode: SslVerifyMode::Peer,
            ssl_ca_file: None,
            export_directory: None,
        }
    }
}

impl SdkOptions {
    /// Transport settings derived from these options
    pub fn transport_config(&self) -> TransportConfig {
        let tls = match (self.ssl_verify_mode, &self.ssl_ca_file) {
            (SslVerifyMode::None, _) => TlsMode::AcceptInvalid,
            (SslVerifyMode::Peer, Some(path)) => TlsMode::VerifyWithCa(path.clone()),
            (SslVerifyMode::Peer, None) => TlsMode::Verify,
        };

        TransportConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            max_redirects: self.max_redirects,
            tls,
            log_level: self.log_level,
            user_agent: crate::USER_AGENT.to_string(),
            ..Default::default()
        }
    }
}

/// Server location, credentials and options for one Kinetic component.
///
/// `app_server_url` is the root of the component being addressed: the
/// Request CE web application, or the Task, Bridgehub or Filehub server.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Root URL of the component
    pub app_server_url: String,

    /// Space URL when the space is served from its own host
    pub space_server_url: Option<String>,

    /// Space slug, used when `space_server_url` is not set
    pub space_slug: Option<String>,

    /// Basic auth user
    pub username: String,

    /// Basic auth password
    pub password: SecretString,

    /// Tunables
    pub options: SdkOptions,
}

/// YAML layout of a connection file
#[derive(Deserialize)]
struct ConnectionFile {
    app_server_url: String,
    space_server_url: Option<String>,
    space_slug: Option<String>,
    username: String,
    password: String,
    #[serde(default)]
    options: SdkOptions,
}

impl From<ConnectionFile> for ConnectionConfig {
    fn from(file: ConnectionFile) -> Self {
        Self {
            app_server_url: file.app_server_url,
            space_server_url: file.space_server_url,
            space_slug: file.space_slug,
            username: file.username,
            password: SecretString::new(file.password.into_boxed_str()),
            options: file.options,
        }
    }
}

impl ConnectionConfig {
    /// Create a configuration with default options.
    pub fn new(
        app_server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            app_server_url: app_server_url.into(),
            space_server_url: None,
            space_slug: None,
            username: username.into(),
            password: SecretString::new(password.into().into_boxed_str()),
            options: SdkOptions::default(),
        }
    }

    /// Set the space slug.
    pub fn with_space_slug(mut self, slug: impl Into<String>) -> Self {
        self.space_slug = Some(slug.into());
        self
    }

    /// Set a dedicated space server URL.
    pub fn with_space_server_url(mut self, url: impl Into<String>) -> Self {
        self.space_server_url = Some(url.into());
        self
    }

    /// Replace the options.
    pub fn with_options(mut self, options: SdkOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ConnectionFile = serde_yaml::from_str(yaml)?;
        let config = Self::from(file);
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).context(format!("Failed to read {}", path.display())))?;
        Self::from_yaml_str(&yaml)
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `KINETIC_SERVER_URL` (required)
    /// - `KINETIC_USERNAME` and `KINETIC_PASSWORD` (required)
    /// - `KINETIC_SPACE_SLUG`, `KINETIC_SPACE_SERVER_URL`
    /// - `KINETIC_LOG_LEVEL`, `KINETIC_MAX_REDIRECTS`, `KINETIC_TIMEOUT_SECS`
    /// - `KINETIC_SSL_VERIFY_MODE`, `KINETIC_SSL_CA_FILE`
    /// - `KINETIC_EXPORT_DIR`
    ///
    /// Empty values count as unset.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|value| !value.trim().is_empty())
        }

        fn parsed<T: FromStr>(name: &'static str) -> Result<Option<T>>
        where
            T::Err: fmt::Display,
        {
            var(name)
                .map(|value| {
                    value
                        .trim()
                        .parse::<T>()
                        .map_err(|e| Error::Config(format!("{name}: {e}")))
                })
                .transpose()
        }

        let app_server_url =
            var("KINETIC_SERVER_URL").ok_or(Error::MissingConfig("KINETIC_SERVER_URL"))?;
        let username = var("KINETIC_USERNAME").ok_or(Error::MissingConfig("KINETIC_USERNAME"))?;
        let password = var("KINETIC_PASSWORD").ok_or(Error::MissingConfig("KINETIC_PASSWORD"))?;

        let mut options = SdkOptions::default();
        if let Some(level) = parsed::<LogLevel>("KINETIC_LOG_LEVEL")? {
            options.log_level = level;
        }
        if let Some(max_redirects) = parsed::<u32>("KINETIC_MAX_REDIRECTS")? {
            options.max_redirects = max_redirects;
        }
        if let Some(timeout_secs) = parsed::<u64>("KINETIC_TIMEOUT_SECS")? {
            options.timeout_secs = timeout_secs;
        }
        if let Some(mode) = parsed::<SslVerifyMode>("KINETIC_SSL_VERIFY_MODE")? {
            options.ssl_verify_mode = mode;
        }
        options.ssl_ca_file = var("KINETIC_SSL_CA_FILE").map(PathBuf::from);
        options.export_directory = var("KINETIC_EXPORT_DIR").map(PathBuf::from);

        let config = Self {
            app_server_url,
            space_server_url: var("KINETIC_SPACE_SERVER_URL"),
            space_slug: var("KINETIC_SPACE_SLUG"),
            username,
            password: SecretString::new(password.into_boxed_str()),
            options,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a `.env` file from the working directory (if any), then read the
    /// environment with [`from_env`](Self::from_env).
    #[cfg(feature = "env")]
    pub fn from_dotenv() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(err) if err.not_found() => {}
            Err(err) => return Err(Error::Config(format!(".env: {err}"))),
        }
        Self::from_env()
    }

    /// Check that the URLs parse and the options are usable.
    pub fn validate(&self) -> Result<()> {
        parse_server_url("app_server_url", &self.app_server_url)?;
        if let Some(url) = &self.space_server_url {
            parse_server_url("space_server_url", url)?;
        }
        if self.username.is_empty() {
            return Err(Error::MissingConfig("username"));
        }
        if self.options.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }

    /// Root URL of the configured space.
    ///
    /// `space_server_url` when set, otherwise `{app_server_url}/{space_slug}`.
    pub fn space_url(&self) -> Result<Url> {
        if let Some(url) = &self.space_server_url {
            return parse_server_url("space_server_url", url);
        }
        let slug = self
            .space_slug
            .as_deref()
            .filter(|slug| !slug.is_empty())
            .ok_or(Error::MissingConfig("space_slug"))?;
        let mut url = parse_server_url("app_server_url", &self.app_server_url)?;
        append_segments(&mut url, &[slug])?;
        Ok(url)
    }

    /// Root URL of the component, parsed
    pub fn server_url(&self) -> Result<Url> {
        parse_server_url("app_server_url", &self.app_server_url)
    }

    /// Basic auth credentials for this connection
    pub fn auth(&self) -> BasicAuth {
        BasicAuth::from_secret(self.username.clone(), self.password.clone())
    }
}

fn parse_server_url(field: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value.trim())
        .map_err(|e| Error::Config(format!("{field} '{value}' is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::Config(format!(
            "{field} must use http or https, got '{scheme}'"
        ))),
    }
}

/// Append percent-encoded path segments, ignoring a trailing slash on `url`.
pub(crate) fn append_segments<S: AsRef<str>>(url: &mut Url, segments: &[S]) -> Result<()> {
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("'{url}' cannot be used as a base URL")));
    }
    let mut path = url
        .path_segments_mut()
        .map_err(|_| Error::Config("URL cannot be used as a base".to_string()))?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment.as_ref());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    const FULL_YAML: &str = r#"
app_server_url: https://kinetic.example.com
space_server_url: https://acme.kinetic.example.com
space_slug: acme
username: admin
password: secret
options:
  log_level: debug
  max_redirects: 3
  timeout_secs: 15
  ssl_verify_mode: none
  ssl_ca_file: /etc/ssl/ca.pem
  export_directory: ./exports
"#;

    #[test]
    fn test_from_yaml_full() {
        let config = ConnectionConfig::from_yaml_str(FULL_YAML).unwrap();
        assert_eq!(config.app_server_url, "https://kinetic.example.com");
        assert_eq!(config.space_slug.as_deref(), Some("acme"));
        assert_eq!(config.username, "admin");
        assert_eq!(config.password.expose_secret(), "secret");
        assert_eq!(
            config.options,
            SdkOptions {
                log_level: LogLevel::Debug,
                max_redirects: 3,
                timeout_secs: 15,
                ssl_verify_mode: SslVerifyMode::None,
                ssl_ca_file: Some(PathBuf::from("/etc/ssl/ca.pem")),
                export_directory: Some(PathBuf::from("./exports")),
            }
        );
    }

    #[test]
    fn test_from_yaml_minimal_uses_defaults() {
        let config = ConnectionConfig::from_yaml_str(
            "app_server_url: http://localhost:8080\nusername: u\npassword: p\n",
        )
        .unwrap();
        assert_eq!(config.options, SdkOptions::default());
        assert!(config.space_slug.is_none());
    }

    #[test]
    fn test_options_yaml_round_trip() {
        let options = ConnectionConfig::from_yaml_str(FULL_YAML).unwrap().options;
        let yaml = serde_yaml::to_string(&options).unwrap();
        let back: SdkOptions = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_yaml_errors() {
        let err = ConnectionConfig::from_yaml_str("username: u\npassword: p\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));

        let err = ConnectionConfig::from_yaml_str(
            "app_server_url: ftp://files\nusername: u\npassword: p\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ConnectionConfig::from_yaml_str(
            "app_server_url: http://h\nusername: u\npassword: p\noptions:\n  log_level: loud\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kinetic.yaml");
        std::fs::write(&path, FULL_YAML).unwrap();
        let config = ConnectionConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.options.max_redirects, 3);

        let err = ConnectionConfig::from_yaml_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
    }

    #[test]
    fn test_transport_config_mapping() {
        let mut options = SdkOptions::default();
        let transport = options.transport_config();
        assert_eq!(transport.tls, TlsMode::Verify);
        assert_eq!(transport.timeout, Duration::from_secs(60));
        assert_eq!(transport.max_redirects, 5);
        assert_eq!(transport.user_agent, crate::USER_AGENT);

        options.ssl_ca_file = Some(PathBuf::from("/ca.pem"));
        assert_eq!(
            options.transport_config().tls,
            TlsMode::VerifyWithCa(PathBuf::from("/ca.pem"))
        );

        options.ssl_verify_mode = SslVerifyMode::None;
        assert_eq!(options.transport_config().tls, TlsMode::AcceptInvalid);
    }

    #[test]
    fn test_space_url() {
        let config = ConnectionConfig::new("https://kinetic.example.com/", "u", "p")
            .with_space_slug("acme");
        assert_eq!(config.space_url().unwrap().as_str(), "https://kinetic.example.com/acme");

        let config = config.with_space_server_url("https://acme.example.com");
        assert_eq!(config.space_url().unwrap().as_str(), "https://acme.example.com/");

        let err = ConnectionConfig::new("https://kinetic.example.com", "u", "p")
            .space_url()
            .unwrap_err();
        assert!(matches!(err, Error::MissingConfig("space_slug")));
    }

    #[test]
    fn test_append_segments() {
        let mut url = Url::parse("https://kinetic.example.com/acme/").unwrap();
        append_segments(&mut url, &["app", "api", "v1", "a b"]).unwrap();
        assert_eq!(url.as_str(), "https://kinetic.example.com/acme/app/api/v1/a%20b");

        let mut opaque = Url::parse("mailto:admin@example.com").unwrap();
        let err = append_segments(&mut opaque, &["x"]).unwrap_err();
        match err {
            Error::Config(message) => assert!(message.contains("mailto:admin@example.com")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate() {
        let mut config = ConnectionConfig::new("http://localhost", "u", "p");
        assert!(config.validate().is_ok());

        config.options.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = ConnectionConfig::new("http://localhost", "", "p");
        assert!(matches!(config.validate(), Err(Error::MissingConfig("username"))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ConnectionConfig::new("http://localhost", "admin", "hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_ssl_verify_mode_parse() {
        assert_eq!("PEER".parse::<SslVerifyMode>().unwrap(), SslVerifyMode::Peer);
        assert_eq!("none".parse::<SslVerifyMode>().unwrap(), SslVerifyMode::None);
        assert!("strict".parse::<SslVerifyMode>().is_err());
    }

    #[cfg(feature = "env")]
    mod env {
        use super::*;
        use pretty_assertions::assert_eq;

        const UNSET: [(&str, Option<&str>); 4] = [
            ("KINETIC_SPACE_SERVER_URL", None),
            ("KINETIC_TIMEOUT_SECS", None),
            ("KINETIC_SSL_VERIFY_MODE", None),
            ("KINETIC_SSL_CA_FILE", None),
        ];

        #[test]
        fn test_from_env() {
            let mut vars = UNSET.to_vec();
            vars.extend([
                ("KINETIC_SERVER_URL", Some("https://kinetic.example.com")),
                ("KINETIC_USERNAME", Some("admin")),
                ("KINETIC_PASSWORD", Some("secret")),
                ("KINETIC_SPACE_SLUG", Some("acme")),
                ("KINETIC_LOG_LEVEL", Some("trace")),
                ("KINETIC_MAX_REDIRECTS", Some("2")),
                ("KINETIC_EXPORT_DIR", Some("/tmp/exports")),
            ]);
            temp_env::with_vars(vars, || {
                let config = ConnectionConfig::from_env().unwrap();
                assert_eq!(config.app_server_url, "https://kinetic.example.com");
                assert_eq!(config.space_slug.as_deref(), Some("acme"));
                assert_eq!(config.options.log_level, LogLevel::Trace);
                assert_eq!(config.options.max_redirects, 2);
                assert_eq!(
                    config.options.export_directory,
                    Some(PathBuf::from("/tmp/exports"))
                );
            });
        }

        #[test]
        fn test_from_env_missing_server() {
            temp_env::with_vars(
                [
                    ("KINETIC_SERVER_URL", None::<&str>),
                    ("KINETIC_USERNAME", Some("admin")),
                    ("KINETIC_PASSWORD", Some("secret")),
                ],
                || {
                    let err = ConnectionConfig::from_env().unwrap_err();
                    assert!(matches!(err, Error::MissingConfig("KINETIC_SERVER_URL")));
                },
            );
        }

        #[test]
        fn test_from_env_bad_number() {
            let mut vars = UNSET.to_vec();
            vars.extend([
                ("KINETIC_SERVER_URL", Some("http://localhost")),
                ("KINETIC_USERNAME", Some("admin")),
                ("KINETIC_PASSWORD", Some("secret")),
                ("KINETIC_LOG_LEVEL", None),
                ("KINETIC_MAX_REDIRECTS", Some("many")),
            ]);
            temp_env::with_vars(vars, || {
                let err = ConnectionConfig::from_env().unwrap_err();
                assert!(matches!(err, Error::Config(ref msg) if msg.starts_with("KINETIC_MAX_REDIRECTS")));
            });
        }
    }
}
