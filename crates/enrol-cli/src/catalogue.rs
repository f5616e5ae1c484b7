//! Subcommands that talk to the backend directly rather than through the
//! console: the single-user view and subject catalogue maintenance.

use anyhow::{Result, anyhow, bail};
use enrol_client::ApiClient;
use enrol_core::{
  entity::{Subject, SubjectId, UserId},
  service::{NoticeKind, Operator},
};
use tracing::{info, warn};

// ─── Show ─────────────────────────────────────────────────────────────────────

pub async fn show<O: Operator>(client: &ApiClient, operator: &O, user_id: u64) -> Result<()> {
  let user_id = UserId(user_id);
  let Some(user) = client.fetch_user_subjects(user_id).await? else {
    operator.notify(NoticeKind::Error, "User not found.");
    bail!("user {user_id} not found");
  };

  println!("id:       {}", user.id);
  println!("name:     {}", user.name);
  println!("email:    {}", user.email);
  if user.subjects.is_empty() {
    println!("subjects: none");
  }
  for s in &user.subjects {
    println!("subjects: {:>5}  {}", s.id, s.name);
  }
  Ok(())
}

// ─── Subject catalogue ────────────────────────────────────────────────────────

/// The name and description to send for an edit, or `None` when neither
/// differs from `current` after trimming.
fn subject_edit(
  current: &Subject,
  name: Option<&str>,
  description: Option<&str>,
) -> Result<Option<(String, String)>> {
  let name = name.unwrap_or(current.name.as_str()).trim();
  let description = description.unwrap_or(current.description.as_str()).trim();
  if name.is_empty() {
    bail!("Subject name is required");
  }
  if name == current.name.trim() && description == current.description.trim() {
    return Ok(None);
  }
  Ok(Some((name.to_owned(), description.to_owned())))
}

async fn find_subject(client: &ApiClient, subject_id: SubjectId) -> Result<Subject> {
  client
    .list_subjects()
    .await?
    .into_iter()
    .find(|s| s.id == subject_id)
    .ok_or_else(|| anyhow!("unknown subject id {subject_id}"))
}

pub async fn add_subject<O: Operator>(
  client: &ApiClient,
  operator: &O,
  name: &str,
  description: &str,
) -> Result<()> {
  let name = name.trim();
  if name.is_empty() {
    bail!("Subject name is required");
  }
  match client.create_subject(name, description.trim()).await {
    Ok(subject) => {
      info!(subject_id = %subject.id, "subject created");
      operator.notify(NoticeKind::Success, "Subject added successfully!");
      println!("{:>5}  {}", subject.id, subject.name);
      Ok(())
    }
    Err(e) => {
      warn!(error = %e, "subject create failed");
      operator.notify(NoticeKind::Error, "Failed to add subject.");
      Err(e.into())
    }
  }
}

pub async fn edit_subject<O: Operator>(
  client: &ApiClient,
  operator: &O,
  subject_id: u64,
  name: Option<&str>,
  description: Option<&str>,
) -> Result<()> {
  let subject_id = SubjectId(subject_id);
  let current = find_subject(client, subject_id).await?;
  let Some((name, description)) = subject_edit(&current, name, description)? else {
    println!("No changes to save.");
    return Ok(());
  };

  if let Err(e) = client.update_subject(subject_id, &name, &description).await {
    warn!(%subject_id, error = %e, "subject update failed");
    operator.notify(NoticeKind::Error, "Failed to update subject.");
    return Err(e.into());
  }
  info!(%subject_id, "subject updated");
  operator.notify(NoticeKind::Success, "Subject has been updated.");
  Ok(())
}

pub async fn remove_subject<O: Operator>(
  client: &ApiClient,
  operator: &O,
  subject_id: u64,
) -> Result<()> {
  let subject_id = SubjectId(subject_id);
  let subject = find_subject(client, subject_id).await?;

  let prompt = format!("Delete {}? This action cannot be undone!", subject.name);
  if !operator.confirm_destructive(&prompt).await {
    println!("Cancelled.");
    return Ok(());
  }

  if let Err(e) = client.delete_subject(subject_id).await {
    warn!(%subject_id, error = %e, "subject delete failed");
    operator.notify(NoticeKind::Error, "Failed to delete subject.");
    return Err(e.into());
  }
  info!(%subject_id, "subject deleted");
  operator.notify(NoticeKind::Success, "Subject has been deleted.");
  Ok(())
}
