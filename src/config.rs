use crate::cmd::CommandLineArgs;
use crate::debounce::DEFAULT_DELAY;
use crate::query::{ConnectionProfile, DEFAULT_ENDPOINT};

use anyhow::{anyhow, Context, Result};
use ini::{Ini, Properties};
use reqwest::Url;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_INI_FILE_PATH: &str = "~/.flagly";

const INI_ENDPOINT: &str = "endpoint";
const INI_DELAY_MS: &str = "delay_ms";
const INI_TIMEOUT_MS: &str = "timeout_ms";
const INI_INSECURE: &str = "insecure";
const INI_CA_CERT: &str = "ca_cert";
const INI_PAGE: &str = "page";
const INI_HEADER_PREFIX: &str = "@";

/// One section of the profile file. Every key is optional.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IniProfile {
    endpoint: Option<String>,
    delay_ms: Option<u64>,
    timeout_ms: Option<u64>,
    insecure: Option<bool>,
    ca_cert: Option<String>,
    page: Option<String>,
    headers: HashMap<String, String>,
}

impl IniProfile {
    /// `Ok(None)` when the file or the section does not exist.
    pub fn load(file_path: &str, name: &str) -> Result<Option<IniProfile>> {
        let extended_path = shellexpand::tilde(file_path).to_string();
        if !Path::new(&extended_path).exists() {
            debug!(path = %extended_path, "profile file not found");
            return Ok(None);
        }
        let ini = Ini::load_from_file(&extended_path)
            .with_context(|| format!("Failed to read profile file '{extended_path}'"))?;
        let Some(section) = ini.section(Some(name)) else {
            debug!(path = %extended_path, profile = name, "profile section not found");
            return Ok(None);
        };

        fn try_get<T>(section: &Properties, key: &str) -> Result<Option<T>>
        where
            T: FromStr,
            T::Err: std::fmt::Display,
        {
            section
                .get(key)
                .map(|s| {
                    s.trim()
                        .parse::<T>()
                        .map_err(|e| anyhow!("Invalid value '{}' for '{}': {}", s, key, e))
                })
                .transpose()
        }

        let headers = section
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(INI_HEADER_PREFIX)
                    .map(|k| (k.to_string(), value.to_string()))
            })
            .collect::<HashMap<String, String>>();

        Ok(Some(IniProfile {
            endpoint: try_get(section, INI_ENDPOINT)?,
            delay_ms: try_get(section, INI_DELAY_MS)?,
            timeout_ms: try_get(section, INI_TIMEOUT_MS)?,
            insecure: try_get(section, INI_INSECURE)?,
            ca_cert: try_get(section, INI_CA_CERT)?,
            page: try_get(section, INI_PAGE)?,
            headers,
        }))
    }
}

/// Effective settings: command line over profile over built-in defaults.
#[derive(Debug)]
pub struct Settings {
    endpoint: Url,
    delay: Duration,
    timeout: Option<Duration>,
    insecure: bool,
    ca_cert: Option<String>,
    page: Option<PathBuf>,
    headers: HashMap<String, String>,
}

impl Settings {
    pub fn resolve(args: &CommandLineArgs, profile: Option<IniProfile>) -> Result<Self> {
        let profile = profile.unwrap_or_default();

        let endpoint = args
            .endpoint()
            .cloned()
            .or(profile.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint =
            Url::parse(&endpoint).with_context(|| format!("Invalid endpoint '{endpoint}'"))?;

        let delay = args
            .delay_ms()
            .or(profile.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DELAY);
        let timeout = args
            .timeout_ms()
            .or(profile.timeout_ms)
            .map(Duration::from_millis);

        let insecure = args.insecure() || profile.insecure.unwrap_or(false);
        let ca_cert = args.ca_cert().cloned().or(profile.ca_cert);
        let page = args
            .page()
            .cloned()
            .or_else(|| profile.page.map(|p| PathBuf::from(shellexpand::tilde(&p).to_string())));

        let mut headers = profile.headers;
        headers.extend(
            args.headers()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        Ok(Settings {
            endpoint,
            delay,
            timeout,
            insecure,
            ca_cert,
            page,
            headers,
        })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn page(&self) -> Option<&PathBuf> {
        self.page.as_ref()
    }
}

impl ConnectionProfile for Settings {
    fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn insecure(&self) -> bool {
        self.insecure
    }

    fn ca_cert(&self) -> Option<&String> {
        self.ca_cert.as_ref()
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
