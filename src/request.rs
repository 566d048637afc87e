use serde::Serialize;

use crate::error::{QueryError, QueryResult};
use crate::vocab::{GameVersion, HashFormat, ModLoaderTypes};

/// Optional compatibility filters for "latest version" lookups.
///
/// An empty list or loader set is treated the same as an absent one: the
/// field is left out of the request body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateFilters {
    pub game_versions: Option<Vec<GameVersion>>,
    pub loaders: Option<ModLoaderTypes>,
}

impl UpdateFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_versions(mut self, versions: impl IntoIterator<Item = GameVersion>) -> Self {
        self.game_versions = Some(versions.into_iter().collect());
        self
    }

    pub fn loaders(mut self, loaders: impl Into<ModLoaderTypes>) -> Self {
        self.loaders = Some(loaders.into());
        self
    }

    fn loader_strings(&self) -> Option<Vec<&'static str>> {
        self.loaders
            .filter(|set| !set.is_empty())
            .map(|set| set.to_strings())
    }

    fn version_strings(&self) -> Option<Vec<&str>> {
        self.game_versions
            .as_deref()
            .filter(|versions| !versions.is_empty())
            .map(|versions| versions.iter().map(GameVersion::as_str).collect())
    }
}

// Field order here is the field order on the wire.
#[derive(Serialize)]
struct HashBatchBody<'a> {
    hashes: &'a [String],
    algorithm: HashFormat,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    hashes: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    algorithm: Option<HashFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loaders: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    game_versions: Option<Vec<&'a str>>,
}

fn encode<T: Serialize>(body: &T) -> QueryResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(QueryError::Encode)
}

fn require_hashes(hashes: &[String]) -> QueryResult<()> {
    if hashes.is_empty() {
        return Err(QueryError::MalformedInput("batch query needs at least one hash"));
    }
    Ok(())
}

/// Body for `POST /version_files`.
pub fn current_versions_body(hashes: &[String], format: HashFormat) -> QueryResult<Vec<u8>> {
    require_hashes(hashes)?;
    encode(&HashBatchBody {
        hashes,
        algorithm: format,
    })
}

/// Body for `POST /version_file/{hash}/update`. Serializes to `{}` when no
/// filter is set.
pub fn latest_version_body(filters: &UpdateFilters) -> QueryResult<Vec<u8>> {
    encode(&UpdateBody {
        hashes: None,
        algorithm: None,
        loaders: filters.loader_strings(),
        game_versions: filters.version_strings(),
    })
}

/// Body for `POST /version_files/update`.
pub fn latest_versions_body(
    hashes: &[String],
    format: HashFormat,
    filters: &UpdateFilters,
) -> QueryResult<Vec<u8>> {
    require_hashes(hashes)?;
    encode(&UpdateBody {
        hashes: Some(hashes),
        algorithm: Some(format),
        loaders: filters.loader_strings(),
        game_versions: filters.version_strings(),
    })
}
