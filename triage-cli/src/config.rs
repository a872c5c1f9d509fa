use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use triage_core::{Calendar, DEFAULT_SUGGESTION_COUNT, Strategy, parse_holiday};

use crate::state::ensure_triage_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub calendar: CalendarSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Strategy used when `--strategy` is not given. Unknown names fall back
    /// to smart_balance with a warning, same as a bad request value.
    pub strategy: String,
    pub working_days: bool,
    pub suggestion_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSection {
    /// IANA timezone used to decide what "today" is.
    pub timezone: String,
    /// Recurring holidays as "MM-DD".
    pub holidays: Vec<String>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            strategy: Strategy::default().name().to_string(),
            working_days: true,
            suggestion_count: DEFAULT_SUGGESTION_COUNT,
        }
    }
}

impl Default for CalendarSection {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            holidays: vec!["01-01".into(), "07-04".into(), "12-25".into()],
        }
    }
}

impl CalendarSection {
    pub fn to_calendar(&self) -> Result<Calendar> {
        let days = self
            .holidays
            .iter()
            .map(|h| parse_holiday(h))
            .collect::<Result<Vec<_>>>()
            .context("parse [calendar].holidays")?;
        Ok(Calendar::with_holidays(days))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_triage_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
