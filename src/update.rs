//! Startup update check.
//!
//! Fetches a small JSON manifest, compares its version with the running build
//! and, when the published release is strictly newer, produces an offer the
//! control panel can show. Every failure (network, HTTP status, malformed
//! JSON, missing fields, unparsable versions) ends the check quietly.

use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IkiflowError;

/// Version of the running build.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long the manifest request may take.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// The published manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManifest {
    pub latest_version: Option<String>,
    pub download_url: Option<String>,
}

/// A newer release the user can be offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOffer {
    pub current: String,
    pub latest: String,
    pub download_url: String,
}

/// Somewhere an update manifest can be fetched from.
#[cfg_attr(test, mockall::automock)]
pub trait ManifestSource {
    /// Fetch the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be retrieved or decoded.
    fn fetch(&self) -> Result<UpdateManifest, IkiflowError>;
}

/// Fetches the manifest over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpManifestSource {
    url: String,
}

impl HttpManifestSource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl ManifestSource for HttpManifestSource {
    fn fetch(&self) -> Result<UpdateManifest, IkiflowError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("ikiflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IkiflowError::Update(format!("Failed to build HTTP client: {e}")))?;

        client
            .get(&self.url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| IkiflowError::Update(format!("Request to {} failed: {e}", self.url)))?
            .json::<UpdateManifest>()
            .map_err(|e| IkiflowError::Update(format!("Invalid manifest: {e}")))
    }
}

fn parse_version(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    let raw = raw.strip_prefix('v').unwrap_or(raw);
    Version::parse(raw).ok()
}

/// Compare a manifest with the running version.
///
/// Returns an offer only when the manifest is complete and its version is
/// strictly newer than `current`.
#[must_use]
pub fn newer_release(manifest: &UpdateManifest, current: &str) -> Option<UpdateOffer> {
    let latest_raw = manifest.latest_version.as_deref()?;
    let download_url = manifest.download_url.as_deref()?.trim();
    if download_url.is_empty() {
        return None;
    }

    let latest = parse_version(latest_raw)?;
    let running = parse_version(current)?;
    (latest > running).then(|| UpdateOffer {
        current: running.to_string(),
        latest: latest.to_string(),
        download_url: download_url.to_string(),
    })
}

/// Run one check against `source`, swallowing every failure.
pub fn check_for_update(source: &dyn ManifestSource, current: &str) -> Option<UpdateOffer> {
    match source.fetch() {
        Ok(manifest) => {
            let offer = newer_release(&manifest, current);
            debug!(?manifest, offered = offer.is_some(), "update check finished");
            offer
        }
        Err(e) => {
            debug!(error = %e, "update check failed");
            None
        }
    }
}

/// Start a check on a background thread.
///
/// The receiver yields at most one offer; it is disconnected without a value
/// when there is nothing to offer.
#[must_use]
pub fn spawn_check(url: String) -> Receiver<UpdateOffer> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let source = HttpManifestSource::new(url);
        if let Some(offer) = check_for_update(&source, CURRENT_VERSION) {
            // The panel may already be gone
            tx.send(offer).ok();
        }
    });
    rx
}

/// Open the offer's download page with the system's default handler.
///
/// # Errors
///
/// Returns an error if no handler could be launched.
pub fn open_download(offer: &UpdateOffer) -> Result<(), IkiflowError> {
    open::that(&offer.download_url)?;
    Ok(())
}
