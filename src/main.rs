use std::path::Path;
use std::{env, process};
use std::error::Error;

use tracing_subscriber::EnvFilter;

use mcmodresolver::arguments::{AppMode, Config};
use mcmodresolver::buffer::ResponseBuffer;
use mcmodresolver::hashing::scan_mod_dir;
use mcmodresolver::modrinth::{ModrinthApi, Project, VersionsByHash};
use mcmodresolver::{check_for_updates, create_client, vec_from_lines, UpdateStatus};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mcmodresolver=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let conf = Config::build_from_args(&args).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    if let Err(e) = run(conf).await {
        eprintln!("{e}");
        process::exit(1);
    }
}

async fn run(conf: Config) -> Result<(), Box<dyn Error>> {
    let mut api = ModrinthApi::new(create_client()?);
    if let Some(url) = conf.api_url() {
        api = api.with_base_url(url)?;
    }
    match conf.mode() {
        AppMode::Check(dir) => check(&api, &conf, dir).await,
        AppMode::Identify(dir) => identify(&api, &conf, dir).await,
        AppMode::Projects(ids) => print_projects(&api, ids).await,
        AppMode::ProjectsFromFile(filename) => {
            let ids = vec_from_lines(filename)?;
            print_projects(&api, &ids).await
        }
        AppMode::Sorts => {
            for method in api.sorting_methods() {
                println!("{}. {} ({})", method.priority, method.display_label, method.wire_key);
            }
            Ok(())
        }
    }
}

async fn check(api: &ModrinthApi, conf: &Config, dir: &str) -> Result<(), Box<dyn Error>> {
    let format = conf.algorithm();
    let mods = scan_mod_dir(Path::new(dir), format)?;
    println!("Checking {} mods in '{dir}'...", mods.len());
    let reports = check_for_updates(api, &mods, format, &conf.filters()).await?;
    for report in reports {
        let name = report.local.file_name();
        match report.status(format) {
            UpdateStatus::UpdateAvailable(latest) => {
                let file = latest.primary_file().map(|f| f.filename()).unwrap_or("?");
                println!("{name}: update available -> {} [{}] ({file})",
                    latest.name(),
                    latest.version_number()
                );
            }
            UpdateStatus::UpToDate => println!("{name}: up to date"),
            UpdateStatus::NoCompatibleVersion => println!("{name}: no compatible version"),
            UpdateStatus::Unknown => println!("{name}: unknown to Modrinth"),
        }
    }
    Ok(())
}

async fn identify(api: &ModrinthApi, conf: &Config, dir: &str) -> Result<(), Box<dyn Error>> {
    let format = conf.algorithm();
    let mods = scan_mod_dir(Path::new(dir), format)?;
    if mods.is_empty() {
        println!("No mods found in '{dir}'");
        return Ok(());
    }
    let hashes: Vec<String> = mods.iter().map(|m| m.hash.clone()).collect();
    let outcome = api
        .current_versions(&hashes, format, ResponseBuffer::new())
        .spawn()
        .wait()
        .await;
    let versions: VersionsByHash = outcome.into_json()?.unwrap_or_default();
    for m in &mods {
        match versions.get(&m.hash) {
            Some(v) => println!("{}: {} [{}] (project {})",
                m.file_name(),
                v.name(),
                v.version_number(),
                v.project_id()
            ),
            None => println!("{}: unknown to Modrinth", m.file_name()),
        }
    }
    Ok(())
}

async fn print_projects(api: &ModrinthApi, ids: &[String]) -> Result<(), Box<dyn Error>> {
    println!("Getting {} projects...", ids.len());
    let outcome = api
        .get_projects(ids, ResponseBuffer::new())
        .spawn()
        .wait()
        .await;
    let projects: Vec<Project> = outcome.into_json()?.unwrap_or_default();
    for project in projects {
        println!("{} ({}): {}", project.title(), project.id(), project.description());
    }
    Ok(())
}
