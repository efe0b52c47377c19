use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RetitlePaths {
    pub home: PathBuf,
    pub logs_dir: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<RetitlePaths> {
    let home = required_home_dir()?;
    let retitle_home = env_or_default_path("RETITLE_HOME", home.join(".retitle"));
    let logs_dir = env_or_default_path("RETITLE_LOGS_DIR", retitle_home.join("logs"));

    Ok(RetitlePaths {
        home: retitle_home,
        logs_dir,
    })
}
