//! `enrol` — terminal console for managing users and their subjects.
//!
//! # Usage
//!
//! ```
//! enrol login --email ann@example.com
//! enrol --url http://localhost:8000/api --token <bearer> users
//! enrol show 3
//! enrol edit 3 --name "Ann Lee" --add 11 --remove 10
//! enrol delete 3
//! enrol subject add --name Music --description "Scales and chords"
//! enrol --config ~/.config/enrol/config.toml subjects
//! ```
//!
//! Without `--config` the file at `~/.config/enrol/config.toml` is used if it
//! exists; `login` writes its token there.

mod catalogue;
mod commands;
mod operator;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use enrol_client::{ApiClient, ApiConfig};
use enrol_core::console::Console;
use operator::TerminalOperator;
use session::ConfigFile;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8000/api";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "enrol", version, about = "Manage users and their subject assignments")]
struct Cli {
  /// Path to a TOML config file (url, token). Defaults to
  /// `~/.config/enrol/config.toml`.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the backend API (default: http://localhost:8000/api).
  #[arg(long, env = "ENROL_URL")]
  url: Option<String>,

  /// Bearer token sent with every request.
  #[arg(long, env = "ENROL_TOKEN", hide_env_values = true)]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Log in and store the access token in the config file.
  Login {
    #[arg(long)]
    email:    String,
    /// Read from stdin when omitted.
    #[arg(long, env = "ENROL_PASSWORD", hide_env_values = true)]
    password: Option<String>,
  },
  /// List users with their assigned subjects.
  Users,
  /// Show one user and their subjects, fetched fresh from the backend.
  Show { user_id: u64 },
  /// List the subject catalogue.
  Subjects,
  /// Edit a user's name, email or subjects and save if anything changed.
  Edit(EditArgs),
  /// Delete a user's assignment record.
  Delete {
    user_id: u64,
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
  },
  /// Maintain the subject catalogue.
  #[command(subcommand)]
  Subject(SubjectCommand),
}

#[derive(Subcommand, Debug)]
enum SubjectCommand {
  /// Create a subject.
  Add {
    #[arg(long)]
    name:        String,
    #[arg(long, default_value = "")]
    description: String,
  },
  /// Change a subject's name or description.
  Edit {
    subject_id:  u64,
    #[arg(long)]
    name:        Option<String>,
    #[arg(long)]
    description: Option<String>,
  },
  /// Delete a subject.
  Rm {
    subject_id: u64,
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes:        bool,
  },
}

#[derive(Args, Debug)]
pub(crate) struct EditArgs {
  pub user_id: u64,

  #[arg(long)]
  pub name: Option<String>,

  #[arg(long)]
  pub email: Option<String>,

  /// Replace the whole selection, e.g. `--subjects 10,11`.
  #[arg(long, value_delimiter = ',', num_args = 0..)]
  pub subjects: Option<Vec<u64>>,

  /// Add a subject to the selection. Repeatable.
  #[arg(long = "add", value_name = "SUBJECT_ID")]
  pub add: Vec<u64>,

  /// Remove a subject from the selection. Repeatable.
  #[arg(long = "remove", value_name = "SUBJECT_ID")]
  pub remove: Vec<u64>,

  /// Show the resulting draft without saving.
  #[arg(long)]
  pub dry_run: bool,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// The config file in use: `--config` if given, else the default location.
fn config_path(cli: &Cli) -> Option<PathBuf> {
  cli
    .config
    .as_deref()
    .map(session::expand_tilde)
    .or_else(session::default_config_path)
}

fn load_config(cli: &Cli) -> Result<ApiConfig> {
  let file_cfg = match config_path(cli) {
    Some(path) => session::read_config(&path, cli.config.is_some())?,
    None => ConfigFile::default(),
  };
  Ok(resolve(cli.url.clone(), cli.token.clone(), file_cfg))
}

/// Flags and env override the config file, which overrides defaults.
fn resolve(url: Option<String>, token: Option<String>, file_cfg: ConfigFile) -> ApiConfig {
  let non_empty = |s: String| (!s.is_empty()).then_some(s);
  ApiConfig {
    base_url: url
      .or_else(|| non_empty(file_cfg.url))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    token:    token.or_else(|| non_empty(file_cfg.token)).unwrap_or_default(),
  }
}

async fn login(cli: &Cli, client: &ApiClient, email: &str, password: Option<&str>) -> Result<()> {
  let password = match password {
    Some(p) => p.to_owned(),
    None => session::read_password()?,
  };
  session::check_login(email, &password)?;

  let token = client.login(email.trim(), &password).await.context("logging in")?;
  let path = config_path(cli).context("no config path: pass --config or set HOME")?;
  session::save_token(&path, &token)?;
  info!(path = %path.display(), "token saved");
  println!("✓ Logged in. Token saved to {}", path.display());
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config = load_config(&cli)?;
  tracing::debug!(base_url = %config.base_url, "using backend");

  let client = ApiClient::new(config).context("building HTTP client")?;
  let assume_yes = matches!(
    cli.command,
    Command::Delete { yes: true, .. } | Command::Subject(SubjectCommand::Rm { yes: true, .. })
  );
  let operator = TerminalOperator::new(assume_yes);

  // These run against the backend directly, without loading the console.
  match &cli.command {
    Command::Login { email, password } => {
      return login(&cli, &client, email, password.as_deref()).await;
    }
    Command::Show { user_id } => return catalogue::show(&client, &operator, *user_id).await,
    Command::Subject(cmd) => {
      return match cmd {
        SubjectCommand::Add { name, description } => {
          catalogue::add_subject(&client, &operator, name, description).await
        }
        SubjectCommand::Edit {
          subject_id,
          name,
          description,
        } => {
          catalogue::edit_subject(
            &client,
            &operator,
            *subject_id,
            name.as_deref(),
            description.as_deref(),
          )
          .await
        }
        SubjectCommand::Rm { subject_id, .. } => {
          catalogue::remove_subject(&client, &operator, *subject_id).await
        }
      };
    }
    _ => {}
  }

  let mut console = Console::new(client, operator);

  console.reload().await.context("loading users and subjects")?;

  match cli.command {
    Command::Users => commands::list_users(&console),
    Command::Subjects => commands::list_subjects(&console),
    Command::Edit(args) => commands::edit(&mut console, args).await,
    Command::Delete { user_id, .. } => commands::delete(&mut console, user_id).await,
    Command::Login { .. } | Command::Show { .. } | Command::Subject(_) => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_override_file_which_overrides_defaults() {
    let file = ConfigFile {
      url:   "http://file/api".into(),
      token: "file-token".into(),
    };
    let cfg = resolve(Some("http://flag/api".into()), None, file);
    assert_eq!(cfg.base_url, "http://flag/api");
    assert_eq!(cfg.token, "file-token");

    let cfg = resolve(None, None, ConfigFile::default());
    assert_eq!(cfg.base_url, DEFAULT_URL);
    assert_eq!(cfg.token, "");
  }

  #[test]
  fn cli_parses_login_and_subject_commands() {
    let cli = Cli::try_parse_from([
      "enrol",
      "login",
      "--email",
      "ann@x.com",
      "--password",
      "hunter22",
    ])
    .unwrap();
    assert!(matches!(cli.command, Command::Login { password: Some(_), .. }));

    let cli = Cli::try_parse_from(["enrol", "subject", "rm", "12", "--yes"]).unwrap();
    assert!(matches!(
      cli.command,
      Command::Subject(SubjectCommand::Rm { subject_id: 12, yes: true })
    ));

    let cli = Cli::try_parse_from(["enrol", "show", "3"]).unwrap();
    assert!(matches!(cli.command, Command::Show { user_id: 3 }));
  }
}
