//! Config file location, login input checks and token persistence.

use std::{
  path::{Path, PathBuf},
  sync::LazyLock,
};

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};

static LOGIN_EMAIL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

const MIN_PASSWORD_LEN: usize = 8;

/// Shape of the TOML config file.
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ConfigFile {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub url:   String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub token: String,
}

/// `$HOME/.config/enrol/config.toml`, or `None` without a home directory.
pub fn default_config_path() -> Option<PathBuf> {
  std::env::var("HOME")
    .ok()
    .map(|home| PathBuf::from(home).join(".config/enrol/config.toml"))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

/// Read the config file at `path`. A missing file reads as empty unless
/// `required` is set.
pub fn read_config(path: &Path, required: bool) -> Result<ConfigFile> {
  if !required && !path.exists() {
    return Ok(ConfigFile::default());
  }
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading config file {}", path.display()))?;
  toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
}

/// Store `token` in the config file at `path`, keeping any other settings.
pub fn save_token(path: &Path, token: &str) -> Result<()> {
  let mut config = read_config(path, false)?;
  config.token = token.to_owned();

  if let Some(dir) = path.parent() {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("creating config directory {}", dir.display()))?;
  }
  let raw = toml::to_string(&config).context("serialising config")?;
  std::fs::write(path, raw).with_context(|| format!("writing config file {}", path.display()))
}

/// Reject credentials the backend would refuse anyway.
pub fn check_login(email: &str, password: &str) -> Result<()> {
  if email.trim().is_empty() {
    bail!("Email address is required");
  }
  if !LOGIN_EMAIL.is_match(email) {
    bail!("Email address is invalid");
  }
  if password.is_empty() {
    bail!("Password is required");
  }
  if password.chars().count() < MIN_PASSWORD_LEN {
    bail!("Password must be at least {MIN_PASSWORD_LEN} characters");
  }
  Ok(())
}

/// Read a password from stdin.
pub fn read_password() -> Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir()
      .join(format!("enrol-session-{}-{name}", std::process::id()))
      .join("config.toml")
  }

  #[test]
  fn login_input_is_checked_in_order() {
    let cases = [
      ("", "hunter22", "Email address is required"),
      ("ann", "hunter22", "Email address is invalid"),
      ("ann@x.com", "", "Password is required"),
      ("ann@x.com", "short", "Password must be at least 8 characters"),
    ];
    for (email, password, expected) in cases {
      let err = check_login(email, password).unwrap_err();
      assert_eq!(err.to_string(), expected, "{email:?} / {password:?}");
    }
    check_login("ann@x.com", "hunter22").unwrap();
  }

  #[test]
  fn saved_token_keeps_existing_url() {
    let path = scratch("keep-url");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "url = \"http://backend/api\"\ntoken = \"old\"\n").unwrap();

    save_token(&path, "fresh").unwrap();

    let config = read_config(&path, true).unwrap();
    assert_eq!(config, ConfigFile {
      url:   "http://backend/api".into(),
      token: "fresh".into(),
    });
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
  }

  #[test]
  fn saving_creates_missing_config_directory() {
    let path = scratch("fresh-dir");
    std::fs::remove_dir_all(path.parent().unwrap()).ok();

    save_token(&path, "abc").unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.trim(), "token = \"abc\"");
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
  }

  #[test]
  fn missing_optional_config_reads_empty() {
    let path = scratch("absent");
    assert_eq!(read_config(&path, false).unwrap(), ConfigFile::default());
    assert!(read_config(&path, true).is_err());
  }

  #[test]
  fn tilde_expands_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/a.toml")), PathBuf::from(home).join("a.toml"));
    assert_eq!(expand_tilde(Path::new("/etc/a.toml")), PathBuf::from("/etc/a.toml"));
  }
}
