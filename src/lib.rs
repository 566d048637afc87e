use futures::future;
use std::fs::File;
use std::io;
use std::io::BufRead;
use std::time::Duration;

use crate::buffer::ResponseBuffer;
use crate::error::QueryResult;
use crate::hashing::LocalMod;
use crate::modrinth::{ModrinthApi, Version, VersionsByHash};
use crate::request::UpdateFilters;
use crate::vocab::HashFormat;

pub mod arguments;
pub mod buffer;
pub mod endpoint;
pub mod error;
pub mod hashing;
pub mod modrinth;
pub mod request;
pub mod sorting;
pub mod task;
pub mod transport;
pub mod vocab;

static APP_USER_AGENT: &str = concat!(
    "hwschieding/",
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/hwschieding/mcmodresolver)"
);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub fn create_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(APP_USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
}

/// Where one local file stands against the platform.
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub local: LocalMod,
    /// The version this exact file belongs to, if the platform knows it.
    pub current: Option<Version>,
    /// Newest version matching the filters.
    pub latest: Option<Version>,
}

/// Verdict for one [`UpdateReport`].
#[derive(Debug, Clone, Copy)]
pub enum UpdateStatus<'a> {
    /// Neither lookup knows the file.
    Unknown,
    /// The file is known but no version matches the filters.
    NoCompatibleVersion,
    UpToDate,
    UpdateAvailable(&'a Version),
}

impl UpdateReport {
    pub fn is_known(&self) -> bool {
        self.current.is_some() || self.latest.is_some()
    }

    pub fn status(&self, format: HashFormat) -> UpdateStatus<'_> {
        match &self.latest {
            Some(latest) if latest.has_file_hash(format, &self.local.hash) => {
                UpdateStatus::UpToDate
            }
            Some(latest) => UpdateStatus::UpdateAvailable(latest),
            None if self.current.is_some() => UpdateStatus::NoCompatibleVersion,
            None => UpdateStatus::Unknown,
        }
    }

    /// False when there is nothing compatible to compare against.
    pub fn is_up_to_date(&self, format: HashFormat) -> bool {
        matches!(self.status(format), UpdateStatus::UpToDate)
    }
}

/// Looks up every file's current version and latest compatible version in
/// two concurrent batch requests.
pub async fn check_for_updates(
    api: &ModrinthApi,
    mods: &[LocalMod],
    format: HashFormat,
    filters: &UpdateFilters,
) -> QueryResult<Vec<UpdateReport>> {
    if mods.is_empty() {
        return Ok(Vec::new());
    }
    let hashes: Vec<String> = mods.iter().map(|m| m.hash.clone()).collect();
    let current = api
        .current_versions(&hashes, format, ResponseBuffer::new())
        .spawn();
    let latest = api
        .latest_versions(&hashes, format, filters, ResponseBuffer::new())
        .spawn();
    let (current, latest) = future::join(current.wait(), latest.wait()).await;
    let current: VersionsByHash = current.into_json()?.unwrap_or_default();
    let latest: VersionsByHash = latest.into_json()?.unwrap_or_default();

    Ok(mods
        .iter()
        .map(|m| UpdateReport {
            local: m.clone(),
            current: current.get(&m.hash).cloned(),
            latest: latest.get(&m.hash).cloned(),
        })
        .collect())
}

pub fn vec_from_lines(filename: &str) -> io::Result<Vec<String>> {
    let mut out = Vec::new();
    let f_in = File::open(filename)?;
    for line in io::BufReader::new(f_in).lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            out.push(line.to_string())
        }
    }
    Ok(out)
}
