//! Change detection between a draft and its baseline.

use crate::draft::Draft;

/// `true` when the draft's current values differ from the baseline.
///
/// Names and emails are compared after trimming. Subject assignments are
/// compared as sets of identities, so reordering alone is not a change.
/// The result depends only on the current fields, never on edit history.
pub fn is_dirty(draft: &Draft) -> bool {
  let (live, base) = (draft.fields(), draft.baseline());
  live.name.trim() != base.name.trim()
    || live.email.trim() != base.email.trim()
    || live.subject_id_set() != base.subject_id_set()
}
