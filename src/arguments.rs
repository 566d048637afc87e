use crate::request::UpdateFilters;
use crate::vocab::{GameVersion, HashFormat, ModLoaderType, ModLoaderTypes};

#[derive(Debug, PartialEq)]
pub enum AppMode {
    Check(String),
    Identify(String),
    Projects(Vec<String>),
    ProjectsFromFile(String),
    Sorts,
}

#[derive(Debug)]
pub struct Config {
    mode: AppMode,
    mcvs: Vec<GameVersion>,
    loaders: ModLoaderTypes,
    algorithm: HashFormat,
    api_url: Option<String>,
}

impl Config {
    pub fn build_from_args(args: &[String]) -> Result<Config, &'static str> {
        let mut mode: Result<AppMode, &'static str> = Err("No mode specified");
        let mut mcvs = Vec::new();
        let mut loaders = ModLoaderTypes::empty();
        let mut algorithm = HashFormat::default();
        let mut api_url = None;
        let mut args_iter = args.iter();
        args_iter.next();
        while let Some(arg) = args_iter.next() {
            match arg.as_str() {
                "--check" => mode = Ok(AppMode::Check(get_value(args_iter.next(), "Invalid directory")?)),
                "--identify" => mode = Ok(AppMode::Identify(get_value(args_iter.next(), "Invalid directory")?)),
                "-id" => mode = Ok(AppMode::Projects(get_ids(args_iter.next())?)),
                "--readfile" => mode = Ok(AppMode::ProjectsFromFile(get_value(args_iter.next(), "Invalid filename")?)),
                "--sorts" => mode = Ok(AppMode::Sorts),
                "-mcv" => mcvs = get_mcvs(args_iter.next())?,
                "-l" => loaders = get_loaders(args_iter.next())?,
                "-algo" => algorithm = get_value(args_iter.next(), "Invalid hash algorithm")?.parse()?,
                "-api" => api_url = Some(get_value(args_iter.next(), "Invalid API url")?),
                _ => eprintln!("arg '{arg}' not recognized"),
            }
        }
        let mode = mode?;
        Ok(Config { mode, mcvs, loaders, algorithm, api_url })
    }
    pub fn mode(&self) -> &AppMode {
        &self.mode
    }
    pub fn mcvs(&self) -> &[GameVersion] {
        &self.mcvs
    }
    pub fn loaders(&self) -> ModLoaderTypes {
        self.loaders
    }
    pub fn algorithm(&self) -> HashFormat {
        self.algorithm
    }
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }
    pub fn filters(&self) -> UpdateFilters {
        let mut filters = UpdateFilters::new();
        if !self.mcvs.is_empty() {
            filters = filters.game_versions(self.mcvs.iter().cloned());
        }
        if !self.loaders.is_empty() {
            filters = filters.loaders(self.loaders);
        }
        filters
    }
}

fn get_value(value: Option<&String>, err: &'static str) -> Result<String, &'static str> {
    match value {
        Some(v) => Ok(v.to_string()),
        None => Err(err),
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn get_mcvs(mcvs: Option<&String>) -> Result<Vec<GameVersion>, &'static str> {
    let mcvs: Vec<GameVersion> = split_list(mcvs.ok_or("Invalid mcv")?)
        .map(GameVersion::from)
        .collect();
    if mcvs.is_empty() {
        return Err("Invalid mcv");
    }
    Ok(mcvs)
}

fn get_loaders(loaders: Option<&String>) -> Result<ModLoaderTypes, &'static str> {
    let mut set = ModLoaderTypes::empty();
    for loader in split_list(loaders.ok_or("Invalid loader")?) {
        set.insert(loader.parse::<ModLoaderType>()?);
    }
    if set.is_empty() {
        return Err("Invalid loader");
    }
    Ok(set)
}

fn get_ids(ids: Option<&String>) -> Result<Vec<String>, &'static str> {
    Ok(split_list(ids.ok_or("Invalid ID")?)
        .map(String::from)
        .collect())
}
