use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use sha1::Sha1;
use sha2::{Digest, Sha512};
use tracing::debug;

use crate::vocab::HashFormat;

/// A mod jar found on disk together with its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMod {
    pub path: PathBuf,
    pub hash: String,
}

impl LocalMod {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

fn digest_reader<D: Digest>(reader: impl Read) -> io::Result<String> {
    let mut reader = BufReader::new(reader);
    let mut hasher = D::new();
    let mut chunk = [0u8; 8192];
    loop {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Lowercase hex digest of the file at `path`.
pub fn hash_file(path: &Path, format: HashFormat) -> io::Result<String> {
    let f_in = File::open(path)?;
    match format {
        HashFormat::Sha1 => digest_reader::<Sha1>(f_in),
        HashFormat::Sha512 => digest_reader::<Sha512>(f_in),
    }
}

/// Hashes every `.jar` directly inside `dir`, sorted by file name.
pub fn scan_mod_dir(dir: &Path, format: HashFormat) -> io::Result<Vec<LocalMod>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_jar = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"));
        if is_jar && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut mods = Vec::with_capacity(paths.len());
    for path in paths {
        let hash = hash_file(&path, format)?;
        debug!("{} {} {:?}", format, hash, path);
        mods.push(LocalMod { path, hash });
    }
    Ok(mods)
}
