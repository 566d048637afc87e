use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Url;
use serde::Deserialize;

use crate::buffer::ResponseBuffer;
use crate::endpoint::{Endpoint, MODRINTH_URL};
use crate::error::{QueryError, QueryResult};
use crate::request::{self, UpdateFilters};
use crate::sorting::{self, SortingMethod};
use crate::task::{PreparedRequest, QueryTask};
use crate::transport::{ReqwestTransport, Transport};
use crate::vocab::HashFormat;

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    id: String,
    #[serde(default)]
    slug: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
}

impl Project {
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    id: String,
    project_id: String,
    name: String,
    version_number: String,
    #[serde(default)]
    game_versions: Vec<String>,
    #[serde(default)]
    loaders: Vec<String>,
    files: Vec<ModrinthFile>,
}

impl Version {
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn project_id(&self) -> &str {
        &self.project_id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn version_number(&self) -> &str {
        &self.version_number
    }
    pub fn game_versions(&self) -> &[String] {
        &self.game_versions
    }
    pub fn loaders(&self) -> &[String] {
        &self.loaders
    }
    pub fn files(&self) -> &[ModrinthFile] {
        &self.files
    }

    /// Whether any file of this version hashes to `hash`.
    pub fn has_file_hash(&self, format: HashFormat, hash: &str) -> bool {
        self.files.iter().any(|f| f.hashes.get(format) == Some(hash))
    }

    pub fn primary_file(&self) -> Option<&ModrinthFile> {
        search_for_primary_file(&self.files).map(|idx| &self.files[idx])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModrinthFile {
    url: String,
    filename: String,
    #[serde(default)]
    primary: bool,
    #[serde(default)]
    hashes: FileHashes,
}

impl ModrinthFile {
    pub fn url(&self) -> &str {
        &self.url
    }
    pub fn filename(&self) -> &str {
        &self.filename
    }
    pub fn primary(&self) -> bool {
        self.primary
    }
    pub fn hashes(&self) -> &FileHashes {
        &self.hashes
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileHashes {
    pub sha1: Option<String>,
    pub sha512: Option<String>,
}

impl FileHashes {
    pub fn get(&self, format: HashFormat) -> Option<&str> {
        match format {
            HashFormat::Sha1 => self.sha1.as_deref(),
            HashFormat::Sha512 => self.sha512.as_deref(),
        }
    }
}

/// Body of `/version_files` and `/version_files/update`: versions keyed by
/// the hash they were looked up with. Hashes the platform doesn't know are
/// missing from the map.
pub type VersionsByHash = HashMap<String, Version>;

pub fn search_for_primary_file(files: &[ModrinthFile]) -> Option<usize> {
    if files.is_empty() {
        return None;
    }
    for (i, file) in files.iter().enumerate() {
        if file.primary {
            return Some(i);
        }
    }
    Some(0) // If no file is marked primary, return 1st file
}

/// Entry point for every lookup against the platform.
///
/// Each operation only builds a [`QueryTask`]; nothing touches the network
/// until the task is executed or spawned.
#[derive(Clone)]
pub struct ModrinthApi {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

impl ModrinthApi {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new(client)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let base_url = Url::parse(MODRINTH_URL).expect("MODRINTH_URL is a valid URL");
        ModrinthApi {
            transport,
            base_url,
        }
    }

    /// Points the client at another deployment, e.g. the staging API.
    pub fn with_base_url(mut self, base_url: &str) -> QueryResult<Self> {
        self.base_url = Url::parse(base_url)
            .map_err(|_| QueryError::MalformedInput("base URL doesn't parse"))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn task(
        &self,
        name: &'static str,
        request: QueryResult<PreparedRequest>,
        buffer: ResponseBuffer,
    ) -> QueryTask {
        QueryTask::new(name, Arc::clone(&self.transport), request, buffer)
    }

    /// `GET /version_file/{hash}`: the version a single file belongs to.
    pub fn current_version(
        &self,
        hash: &str,
        format: HashFormat,
        buffer: ResponseBuffer,
    ) -> QueryTask {
        let request = PreparedRequest::new(
            Endpoint::CurrentVersion { hash, format },
            &self.base_url,
            None,
        );
        self.task("modrinth::current_version", request, buffer)
    }

    /// `POST /version_files`: versions for many files at once.
    pub fn current_versions(
        &self,
        hashes: &[String],
        format: HashFormat,
        buffer: ResponseBuffer,
    ) -> QueryTask {
        let request = request::current_versions_body(hashes, format).and_then(|body| {
            PreparedRequest::new(Endpoint::CurrentVersions, &self.base_url, Some(body))
        });
        self.task("modrinth::current_versions", request, buffer)
    }

    /// `POST /version_file/{hash}/update`: newest version compatible with
    /// `filters` of the project a file belongs to.
    pub fn latest_version(
        &self,
        hash: &str,
        format: HashFormat,
        filters: &UpdateFilters,
        buffer: ResponseBuffer,
    ) -> QueryTask {
        let request = request::latest_version_body(filters).and_then(|body| {
            PreparedRequest::new(
                Endpoint::LatestVersion { hash, format },
                &self.base_url,
                Some(body),
            )
        });
        self.task("modrinth::latest_version", request, buffer)
    }

    /// `POST /version_files/update`: batch form of [`latest_version`](Self::latest_version).
    pub fn latest_versions(
        &self,
        hashes: &[String],
        format: HashFormat,
        filters: &UpdateFilters,
        buffer: ResponseBuffer,
    ) -> QueryTask {
        let request = request::latest_versions_body(hashes, format, filters).and_then(|body| {
            PreparedRequest::new(Endpoint::LatestVersions, &self.base_url, Some(body))
        });
        self.task("modrinth::latest_versions", request, buffer)
    }

    /// `GET /projects?ids=[...]`. An empty list is sent as `[]`.
    pub fn get_projects(&self, ids: &[String], buffer: ResponseBuffer) -> QueryTask {
        let request = PreparedRequest::new(Endpoint::Projects { ids }, &self.base_url, None);
        self.task("modrinth::get_projects", request, buffer)
    }

    pub fn sorting_methods(&self) -> &'static [SortingMethod] {
        sorting::sorting_methods()
    }
}
