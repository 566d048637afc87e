use reqwest::{Method, Url};

use crate::error::{QueryError, QueryResult};
use crate::vocab::HashFormat;

pub static MODRINTH_URL: &str = "https://api.modrinth.com/v2";

/// The five request shapes this client knows how to address.
#[derive(Debug, Clone, Copy)]
pub enum Endpoint<'a> {
    CurrentVersion { hash: &'a str, format: HashFormat },
    CurrentVersions,
    LatestVersion { hash: &'a str, format: HashFormat },
    LatestVersions,
    Projects { ids: &'a [String] },
}

impl Endpoint<'_> {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::CurrentVersion { .. } | Endpoint::Projects { .. } => Method::GET,
            Endpoint::CurrentVersions
            | Endpoint::LatestVersion { .. }
            | Endpoint::LatestVersions => Method::POST,
        }
    }

    /// Resolves the endpoint against `base`. Path parameters are pushed as
    /// single percent-encoded segments, so a hash can never add path levels.
    pub fn url(&self, base: &Url) -> QueryResult<Url> {
        let mut url = base.clone();
        url.set_query(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| QueryError::MalformedInput("base URL can't take a path"))?;
            segments.pop_if_empty();
            match self {
                Endpoint::CurrentVersion { hash, .. } => {
                    segments.extend(["version_file", require_hash(hash)?]);
                }
                Endpoint::CurrentVersions => {
                    segments.push("version_files");
                }
                Endpoint::LatestVersion { hash, .. } => {
                    segments.extend(["version_file", require_hash(hash)?, "update"]);
                }
                Endpoint::LatestVersions => {
                    segments.extend(["version_files", "update"]);
                }
                Endpoint::Projects { .. } => {
                    segments.push("projects");
                }
            }
        }
        match self {
            Endpoint::CurrentVersion { format, .. } | Endpoint::LatestVersion { format, .. } => {
                url.query_pairs_mut().append_pair("algorithm", format.as_str());
            }
            Endpoint::Projects { ids } => {
                let ids = serde_json::to_string(ids).map_err(QueryError::Encode)?;
                url.query_pairs_mut().append_pair("ids", &ids);
            }
            _ => {}
        }
        Ok(url)
    }
}

fn require_hash(hash: &str) -> QueryResult<&str> {
    if hash.is_empty() {
        return Err(QueryError::MalformedInput("hash must not be empty"));
    }
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse(MODRINTH_URL).unwrap()
    }

    #[test]
    fn batch_paths() {
        assert_eq!(
            Endpoint::CurrentVersions.url(&base()).unwrap().as_str(),
            "https://api.modrinth.com/v2/version_files"
        );
        assert_eq!(
            Endpoint::LatestVersions.url(&base()).unwrap().as_str(),
            "https://api.modrinth.com/v2/version_files/update"
        );
    }

    #[test]
    fn latest_version_path() {
        let endpoint = Endpoint::LatestVersion {
            hash: "abc123",
            format: HashFormat::Sha512,
        };
        assert_eq!(endpoint.method(), Method::POST);
        assert_eq!(
            endpoint.url(&base()).unwrap().as_str(),
            "https://api.modrinth.com/v2/version_file/abc123/update?algorithm=sha512"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let base = Url::parse("http://localhost:8080/v2/").unwrap();
        assert_eq!(
            Endpoint::CurrentVersions.url(&base).unwrap().as_str(),
            "http://localhost:8080/v2/version_files"
        );
    }

    #[test]
    fn empty_hash_is_rejected() {
        let endpoint = Endpoint::CurrentVersion {
            hash: "",
            format: HashFormat::Sha1,
        };
        assert!(matches!(
            endpoint.url(&base()),
            Err(QueryError::MalformedInput(_))
        ));
    }

    #[test]
    fn project_ids_are_a_json_array() {
        let ids = vec![String::from("P7dR8mSH"), String::from("AANobbMI")];
        let url = Endpoint::Projects { ids: &ids }.url(&base()).unwrap();
        assert_eq!(url.path(), "/v2/projects");
        let (key, value) = url.query_pairs().next().expect("ids pair");
        assert_eq!(key, "ids");
        assert_eq!(value, r#"["P7dR8mSH","AANobbMI"]"#);
    }
}
