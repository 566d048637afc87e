use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Hash algorithms Modrinth accepts for file lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashFormat {
    Sha1,
    #[default]
    Sha512,
}

impl HashFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashFormat::Sha1 => "sha1",
            HashFormat::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HashFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for HashFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(HashFormat::Sha1),
            "sha512" => Ok(HashFormat::Sha512),
            _ => Err("Invalid hash algorithm"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModLoaderType {
    Forge,
    NeoForge,
    Fabric,
    Quilt,
    LiteLoader,
}

impl ModLoaderType {
    /// Every loader, in declaration order.
    pub const ALL: [ModLoaderType; 5] = [
        ModLoaderType::Forge,
        ModLoaderType::NeoForge,
        ModLoaderType::Fabric,
        ModLoaderType::Quilt,
        ModLoaderType::LiteLoader,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModLoaderType::Forge => "forge",
            ModLoaderType::NeoForge => "neoforge",
            ModLoaderType::Fabric => "fabric",
            ModLoaderType::Quilt => "quilt",
            ModLoaderType::LiteLoader => "liteloader",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for ModLoaderType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModLoaderType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModLoaderType::ALL
            .into_iter()
            .find(|loader| loader.as_str() == s)
            .ok_or("Invalid loader")
    }
}

/// A set of loaders a query targets.
///
/// Iteration always follows [`ModLoaderType::ALL`] order regardless of the
/// order loaders were inserted in, so serialized bodies are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModLoaderTypes(u8);

impl ModLoaderTypes {
    pub fn empty() -> Self {
        ModLoaderTypes(0)
    }

    pub fn insert(&mut self, loader: ModLoaderType) {
        self.0 |= loader.bit();
    }

    pub fn contains(&self, loader: ModLoaderType) -> bool {
        self.0 & loader.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ModLoaderType> {
        ModLoaderType::ALL
            .into_iter()
            .filter(move |loader| self.contains(*loader))
    }

    /// Wire strings for every loader in the set.
    pub fn to_strings(&self) -> Vec<&'static str> {
        self.iter().map(|loader| loader.as_str()).collect()
    }
}

impl From<ModLoaderType> for ModLoaderTypes {
    fn from(loader: ModLoaderType) -> Self {
        ModLoaderTypes(loader.bit())
    }
}

impl BitOr<ModLoaderType> for ModLoaderType {
    type Output = ModLoaderTypes;

    fn bitor(self, rhs: ModLoaderType) -> ModLoaderTypes {
        ModLoaderTypes(self.bit() | rhs.bit())
    }
}

impl BitOr<ModLoaderType> for ModLoaderTypes {
    type Output = ModLoaderTypes;

    fn bitor(self, rhs: ModLoaderType) -> ModLoaderTypes {
        ModLoaderTypes(self.0 | rhs.bit())
    }
}

impl FromIterator<ModLoaderType> for ModLoaderTypes {
    fn from_iter<I: IntoIterator<Item = ModLoaderType>>(iter: I) -> Self {
        let mut set = ModLoaderTypes::empty();
        for loader in iter {
            set.insert(loader);
        }
        set
    }
}

/// A Minecraft version as the platform spells it, e.g. `1.20.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GameVersion(String);

impl GameVersion {
    pub fn new(version: impl Into<String>) -> Self {
        GameVersion(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameVersion {
    fn from(value: &str) -> Self {
        GameVersion(value.to_string())
    }
}
