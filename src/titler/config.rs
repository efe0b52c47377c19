use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct TitleRules {
    #[serde(default)]
    pub lower_case: bool,
    #[serde(default)]
    pub accept_subtitles: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RetitleConfig {
    pub titles: TitleRules,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialRetitleConfig {
    titles: Option<TitleRules>,
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => {
            let trimmed = v.trim();
            match trimmed {
                "1" | "true" | "TRUE" | "yes" | "on" => true,
                "0" | "false" | "FALSE" | "no" | "off" => false,
                _ => fallback,
            }
        }
        Err(_) => fallback,
    }
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("RETITLE_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".retitle").join("retitle.toml"))
}

fn merge_file_config(base: &mut RetitleConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialRetitleConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    if let Some(titles) = parsed.titles {
        base.titles = titles;
    }
    Ok(())
}

/// Load configuration as defaults, then the optional TOML file, then
/// environment overrides. API keys never live in the file; they come from
/// the environment alone.
pub fn load_config() -> Result<RetitleConfig> {
    let mut cfg = RetitleConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.titles.lower_case = env_or_bool("RETITLE_LOWERCASE", cfg.titles.lower_case);
    cfg.titles.accept_subtitles = env_or_bool("RETITLE_SUBTITLES", cfg.titles.accept_subtitles);

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::{PartialRetitleConfig, RetitleConfig, env_or_bool};

    #[test]
    fn defaults_leave_both_rules_off() {
        let cfg = RetitleConfig::default();
        assert!(!cfg.titles.lower_case);
        assert!(!cfg.titles.accept_subtitles);
    }

    #[test]
    fn partial_file_merges_section_wise() {
        let parsed: PartialRetitleConfig =
            toml::from_str("[titles]\nlower_case = true\n").expect("parse");
        let titles = parsed.titles.expect("titles section");
        assert!(titles.lower_case);
        assert!(!titles.accept_subtitles);
    }

    #[test]
    fn env_or_bool_accepts_common_spellings() {
        unsafe {
            std::env::set_var("RETITLE_TEST_BOOL", "yes");
        }
        assert!(env_or_bool("RETITLE_TEST_BOOL", false));
        unsafe {
            std::env::set_var("RETITLE_TEST_BOOL", "off");
        }
        assert!(!env_or_bool("RETITLE_TEST_BOOL", true));
        unsafe {
            std::env::remove_var("RETITLE_TEST_BOOL");
        }
        assert!(env_or_bool("RETITLE_TEST_BOOL", true));
    }
}
