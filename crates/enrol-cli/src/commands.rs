//! Subcommand handlers. Each one drives the shared [`Console`].

use anyhow::{Result, anyhow, bail};
use enrol_core::{
  Error,
  cache::EntityCache,
  console::{Console, DeleteOutcome},
  draft::Draft,
  entity::{SubjectId, SubjectRef, User, UserId},
  service::{AssignmentService, Operator},
};

use crate::EditArgs;

// ─── Listing ──────────────────────────────────────────────────────────────────

pub fn list_users<S, O>(console: &Console<S, O>) -> Result<()>
where
  S: AssignmentService,
  O: Operator,
{
  let users = console.cache().users();
  if users.is_empty() {
    println!("No users found.");
    return Ok(());
  }
  for user in users {
    println!("{}", user_row(user));
  }
  Ok(())
}

pub fn list_subjects<S, O>(console: &Console<S, O>) -> Result<()>
where
  S: AssignmentService,
  O: Operator,
{
  let subjects = console.cache().subjects();
  if subjects.is_empty() {
    println!("No subjects found.");
    return Ok(());
  }
  for s in subjects {
    println!("{:>5}  {:<24} {}", s.id, s.name, s.description);
  }
  Ok(())
}

fn user_row(user: &User) -> String {
  let subjects = user
    .subjects
    .iter()
    .map(|s| s.name.as_str())
    .collect::<Vec<_>>()
    .join(", ");
  format!("{:>5}  {:<24} {:<32} {}", user.id, user.name, user.email, subjects)
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// Resolve a subject id against the catalogue so the draft carries names.
fn subject_ref(cache: &EntityCache, id: u64) -> Result<SubjectRef> {
  cache
    .subject(SubjectId(id))
    .map(SubjectRef::from)
    .ok_or_else(|| anyhow!("unknown subject id {id}"))
}

fn apply_edits(draft: &mut Draft, cache: &EntityCache, args: &EditArgs) -> Result<()> {
  if let Some(name) = &args.name {
    draft.set_name(name.as_str());
  }
  if let Some(email) = &args.email {
    draft.set_email(email.as_str());
  }
  if let Some(ids) = &args.subjects {
    let selection = ids
      .iter()
      .map(|id| subject_ref(cache, *id))
      .collect::<Result<Vec<_>>>()?;
    draft.set_subjects(selection);
  }
  for id in &args.add {
    draft.add_subject(subject_ref(cache, *id)?);
  }
  for id in &args.remove {
    draft.remove_subject(SubjectId(*id));
  }
  Ok(())
}

fn print_draft(draft: &Draft) {
  let fields = draft.fields();
  let subjects = fields
    .subjects
    .iter()
    .map(|s| format!("{} ({})", s.name, s.id))
    .collect::<Vec<_>>()
    .join(", ");
  println!("name:     {}", fields.name);
  println!("email:    {}", fields.email);
  println!("subjects: {subjects}");
  println!("changed:  {}", if draft.is_dirty() { "yes" } else { "no" });
  for (field, message) in draft.validate().iter() {
    println!("  {field}: {message}");
  }
}

pub async fn edit<S, O>(console: &mut Console<S, O>, args: EditArgs) -> Result<()>
where
  S: AssignmentService,
  O: Operator,
{
  let user_id = UserId(args.user_id);
  // The catalogue is cloned so the draft can be edited while it is consulted.
  let cache = console.cache().clone();
  let draft = console
    .open_editor(user_id)
    .map_err(|_| anyhow!("user {user_id} not found"))?;
  apply_edits(draft, &cache, &args)?;
  print_draft(draft);

  if args.dry_run {
    console.close_editor();
    return Ok(());
  }

  match console.commit().await {
    Ok(()) => Ok(()),
    Err(Error::Unchanged) => {
      println!("No changes to save.");
      console.close_editor();
      Ok(())
    }
    Err(Error::Validation(errors)) => bail!("not saved: {errors}"),
    Err(e) => Err(e.into()),
  }
}

// ─── Delete ───────────────────────────────────────────────────────────────────

pub async fn delete<S, O>(console: &mut Console<S, O>, user_id: u64) -> Result<()>
where
  S: AssignmentService,
  O: Operator,
{
  match console.delete_user(UserId(user_id)).await? {
    DeleteOutcome::Deleted => {}
    DeleteOutcome::Cancelled => println!("Cancelled."),
  }
  Ok(())
}
