//! [`Console`] — ties the cache, the draft editor and the collaborators
//! together and coordinates commits and deletes.
//!
//! Every operation takes `&mut self`, so at most one network call is in
//! flight per console. A commit or delete cannot be started twice while the
//! first is pending.
//!
//! ```text
//! Closed ──open──▶ Open ──commit──▶ Committing ──ok──▶ Closed (cache reloaded)
//!   ▲               │                    └──err──▶ Open (draft kept)
//!   └────close──────┘
//! ```

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  cache::EntityCache,
  draft::{Draft, DraftEditor},
  entity::UserId,
  service::{AssignmentService, NoticeKind, Operator},
  validate::ValidationErrors,
};

/// Editing-session phase as seen between operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Closed,
  Open,
}

/// Result of a delete request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
  Deleted,
  /// The operator declined the confirmation; nothing was sent.
  Cancelled,
}

pub struct Console<S, O> {
  service:  S,
  operator: O,
  cache:    EntityCache,
  editor:   DraftEditor,
}

impl<S, O> Console<S, O>
where
  S: AssignmentService,
  O: Operator,
{
  /// Create a console with an empty cache. Call [`Console::reload`] next.
  pub fn new(service: S, operator: O) -> Self {
    Self {
      service,
      operator,
      cache: EntityCache::new(),
      editor: DraftEditor::new(),
    }
  }

  pub fn service(&self) -> &S { &self.service }

  pub fn operator(&self) -> &O { &self.operator }

  pub fn cache(&self) -> &EntityCache { &self.cache }

  pub fn phase(&self) -> Phase {
    if self.editor.is_open() { Phase::Open } else { Phase::Closed }
  }

  // ── Cache ─────────────────────────────────────────────────────────────

  /// Fetch users and subjects concurrently and replace the cache with them.
  ///
  /// On failure the previous cache is kept and an error notice is emitted.
  pub async fn reload(&mut self) -> Result<()> {
    let fetched = futures::try_join!(
      self.service.fetch_users_with_subjects(),
      self.service.fetch_all_subjects(),
    );

    match fetched {
      Ok((users, subjects)) => {
        debug!(users = users.len(), subjects = subjects.len(), "cache reloaded");
        self.cache.replace(users, subjects);
        Ok(())
      }
      Err(e) => {
        warn!(error = %e, "reload failed, keeping previous cache");
        self
          .operator
          .notify(NoticeKind::Error, "Failed to load users and subjects.");
        Err(Error::network(e))
      }
    }
  }

  // ── Draft session ─────────────────────────────────────────────────────

  /// Open an editor for `user_id`, replacing any open draft.
  pub fn open_editor(&mut self, user_id: UserId) -> Result<&mut Draft> {
    let Some(user) = self.cache.user(user_id) else {
      warn!(%user_id, "open refused: user no longer present");
      self.operator.notify(NoticeKind::Error, "User not found.");
      return Err(Error::StaleReference(user_id));
    };
    Ok(self.editor.open(user))
  }

  /// Discard the open draft without saving.
  pub fn close_editor(&mut self) { self.editor.close(); }

  pub fn draft(&self) -> Option<&Draft> { self.editor.draft() }

  pub fn draft_mut(&mut self) -> Option<&mut Draft> { self.editor.draft_mut() }

  /// Current validation errors; empty when no draft is open.
  pub fn validation_errors(&self) -> ValidationErrors {
    self.editor.draft().map(Draft::validate).unwrap_or_default()
  }

  /// Whether the save action should be enabled.
  pub fn can_commit(&self) -> bool { self.editor.draft().is_some_and(Draft::is_committable) }

  // ── Commit ────────────────────────────────────────────────────────────

  /// Submit the open draft as a full replace of the user's fields.
  ///
  /// Refuses without any network call when no draft is open, the user has
  /// left the cache, validation fails, or nothing changed. On success the
  /// draft is closed and the cache reloaded; on failure the draft is kept.
  pub async fn commit(&mut self) -> Result<()> {
    let draft = self.editor.draft().ok_or(Error::NoDraft)?;
    let user_id = draft.user_id();

    if !self.cache.contains_user(user_id) {
      warn!(%user_id, "commit refused: user no longer present");
      self.operator.notify(NoticeKind::Error, "User not found.");
      return Err(Error::StaleReference(user_id));
    }

    let errors = draft.validate();
    if !errors.is_empty() {
      debug!(%user_id, %errors, "commit refused: invalid draft");
      return Err(Error::Validation(errors));
    }
    if !draft.is_dirty() {
      debug!(%user_id, "commit refused: draft unchanged");
      return Err(Error::Unchanged);
    }

    let update = draft.to_update();
    info!(
      %user_id,
      subjects = update.subject_ids.len(),
      "committing user assignment"
    );

    if let Err(e) = self.service.update_user_assignment(user_id, update).await {
      warn!(%user_id, error = %e, "commit failed, draft kept");
      self.operator.notify(NoticeKind::Error, "Failed to update user.");
      return Err(Error::network(e));
    }

    self.editor.close();
    self
      .operator
      .notify(NoticeKind::Success, "User has been updated.");

    // The update itself succeeded; a failed refresh only leaves the cache
    // stale and is reported by `reload`.
    if let Err(e) = self.reload().await {
      warn!(%user_id, error = %e, "post-commit reload failed");
    }
    Ok(())
  }

  // ── Delete ────────────────────────────────────────────────────────────

  /// Delete a user's assignment after operator confirmation.
  ///
  /// On success the user is removed from the cache without a reload. On
  /// failure the cache is left as-is, so the row may be stale.
  pub async fn delete_user(&mut self, user_id: UserId) -> Result<DeleteOutcome> {
    let Some(user) = self.cache.user(user_id) else {
      warn!(%user_id, "delete refused: user no longer present");
      self.operator.notify(NoticeKind::Error, "User not found.");
      return Err(Error::StaleReference(user_id));
    };

    let prompt = format!("Delete {}? This action cannot be undone!", user.name);
    if !self.operator.confirm_destructive(&prompt).await {
      debug!(%user_id, "delete cancelled by operator");
      return Ok(DeleteOutcome::Cancelled);
    }

    info!(%user_id, "deleting user assignment");
    if let Err(e) = self.service.delete_user_assignment(user_id).await {
      warn!(%user_id, error = %e, "delete failed, cache left unchanged");
      self.operator.notify(
        NoticeKind::Error,
        "Failed to delete user. The list may be out of date.",
      );
      return Err(Error::network(e));
    }

    self.cache.remove_user(user_id);
    if self.editor.draft().is_some_and(|d| d.user_id() == user_id) {
      self.editor.close();
    }
    self
      .operator
      .notify(NoticeKind::Success, "User has been deleted.");
    Ok(DeleteOutcome::Deleted)
  }
}
