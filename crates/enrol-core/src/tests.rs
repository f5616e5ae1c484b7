//! Console tests against an in-memory service and a scripted operator.

use std::sync::Mutex;

use crate::{
  Error,
  console::{Console, DeleteOutcome, Phase},
  entity::{Subject, SubjectId, SubjectRef, User, UserId},
  service::{AssignmentService, NoticeKind, Operator, UserUpdate},
  validate::Field,
};

// ─── Fakes ───────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("backend unavailable")]
struct Unavailable;

#[derive(Default)]
struct Calls {
  fetch_users:    usize,
  fetch_subjects: usize,
  updates:        Vec<(UserId, UserUpdate)>,
  deletes:        Vec<UserId>,
}

#[derive(Default)]
struct FakeService {
  users:        Mutex<Vec<User>>,
  subjects:     Vec<Subject>,
  calls:        Mutex<Calls>,
  fail_fetch:   Mutex<bool>,
  fail_catalog: Mutex<bool>,
  fail_update:  Mutex<bool>,
  fail_delete:  Mutex<bool>,
}

impl FakeService {
  fn seeded() -> Self {
    Self {
      users: Mutex::new(vec![
        User {
          id:       UserId(1),
          name:     "Ann".into(),
          email:    "ann@x.com".into(),
          subjects: vec![SubjectRef::new(SubjectId(10), "Math")],
        },
        User {
          id:       UserId(2),
          name:     "Bob".into(),
          email:    "bob@x.com".into(),
          subjects: vec![],
        },
      ]),
      subjects: vec![
        Subject {
          id:          SubjectId(10),
          name:        "Math".into(),
          description: "Numbers".into(),
        },
        Subject {
          id:          SubjectId(11),
          name:        "Art".into(),
          description: "Paint".into(),
        },
      ],
      ..Default::default()
    }
  }

  fn fetch_users_calls(&self) -> usize { self.calls.lock().unwrap().fetch_users }

  fn updates(&self) -> Vec<(UserId, UserUpdate)> { self.calls.lock().unwrap().updates.clone() }

  fn deletes(&self) -> Vec<UserId> { self.calls.lock().unwrap().deletes.clone() }

  fn set(flag: &Mutex<bool>, value: bool) { *flag.lock().unwrap() = value; }
}

impl AssignmentService for FakeService {
  type Error = Unavailable;

  async fn fetch_users_with_subjects(&self) -> Result<Vec<User>, Unavailable> {
    self.calls.lock().unwrap().fetch_users += 1;
    if *self.fail_fetch.lock().unwrap() {
      return Err(Unavailable);
    }
    Ok(self.users.lock().unwrap().clone())
  }

  async fn fetch_all_subjects(&self) -> Result<Vec<Subject>, Unavailable> {
    self.calls.lock().unwrap().fetch_subjects += 1;
    if *self.fail_fetch.lock().unwrap() || *self.fail_catalog.lock().unwrap() {
      return Err(Unavailable);
    }
    Ok(self.subjects.clone())
  }

  async fn update_user_assignment(
    &self,
    user_id: UserId,
    update: UserUpdate,
  ) -> Result<(), Unavailable> {
    self
      .calls
      .lock()
      .unwrap()
      .updates
      .push((user_id, update.clone()));
    if *self.fail_update.lock().unwrap() {
      return Err(Unavailable);
    }

    let mut users = self.users.lock().unwrap();
    if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
      user.name = update.name;
      user.email = update.email;
      user.subjects = update
        .subject_ids
        .iter()
        .map(|id| {
          self
            .subjects
            .iter()
            .find(|s| s.id == *id)
            .map(Subject::to_ref)
            .unwrap_or_else(|| SubjectRef::bare(*id))
        })
        .collect();
    }
    Ok(())
  }

  async fn delete_user_assignment(&self, user_id: UserId) -> Result<(), Unavailable> {
    self.calls.lock().unwrap().deletes.push(user_id);
    if *self.fail_delete.lock().unwrap() {
      return Err(Unavailable);
    }
    self.users.lock().unwrap().retain(|u| u.id != user_id);
    Ok(())
  }
}

struct ScriptedOperator {
  confirm: bool,
  prompts: Mutex<Vec<String>>,
  notices: Mutex<Vec<(NoticeKind, String)>>,
}

impl ScriptedOperator {
  fn answering(confirm: bool) -> Self {
    Self {
      confirm,
      prompts: Mutex::new(Vec::new()),
      notices: Mutex::new(Vec::new()),
    }
  }

  fn notices(&self) -> Vec<(NoticeKind, String)> { self.notices.lock().unwrap().clone() }

  fn last_notice(&self) -> Option<(NoticeKind, String)> { self.notices().last().cloned() }
}

impl Operator for ScriptedOperator {
  async fn confirm_destructive(&self, prompt: &str) -> bool {
    self.prompts.lock().unwrap().push(prompt.to_owned());
    self.confirm
  }

  fn notify(&self, kind: NoticeKind, message: &str) {
    self.notices.lock().unwrap().push((kind, message.to_owned()));
  }
}

async fn console() -> Console<FakeService, ScriptedOperator> {
  console_with(FakeService::seeded(), ScriptedOperator::answering(true)).await
}

async fn console_with(
  service: FakeService,
  operator: ScriptedOperator,
) -> Console<FakeService, ScriptedOperator> {
  let mut c = Console::new(service, operator);
  c.reload().await.expect("initial load");
  c
}

// ─── Loading ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reload_populates_cache() {
  let c = console().await;
  assert!(c.cache().is_loaded());
  assert_eq!(c.cache().users().len(), 2);
  assert_eq!(c.cache().subjects().len(), 2);
  assert_eq!(c.service().calls.lock().unwrap().fetch_subjects, 1);
  assert_eq!(c.phase(), Phase::Closed);
}

#[tokio::test]
async fn failed_reload_keeps_previous_cache() {
  let mut c = console().await;
  FakeService::set(&c.service().fail_fetch, true);

  let err = c.reload().await.unwrap_err();
  assert!(matches!(err, Error::Network(_)));
  assert_eq!(c.cache().users().len(), 2);
  assert_eq!(
    c.operator().last_notice().map(|n| n.0),
    Some(NoticeKind::Error)
  );
}

#[tokio::test]
async fn reload_issues_both_fetches_and_keeps_cache_if_catalogue_fails() {
  let mut c = console().await;
  c.service().users.lock().unwrap().clear();
  FakeService::set(&c.service().fail_catalog, true);

  let err = c.reload().await.unwrap_err();
  assert!(matches!(err, Error::Network(_)));
  // The user fetch succeeded but is discarded along with the failed one.
  assert_eq!(c.cache().users().len(), 2);
  assert_eq!(c.cache().subjects().len(), 2);
  let calls = c.service().calls.lock().unwrap();
  assert_eq!((calls.fetch_users, calls.fetch_subjects), (2, 2));
}

// ─── Editing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_then_close_leaves_cache_alone() {
  let mut c = console().await;
  let before = c.cache().users().to_vec();

  c.open_editor(UserId(1)).unwrap();
  assert_eq!(c.phase(), Phase::Open);
  c.close_editor();

  assert_eq!(c.phase(), Phase::Closed);
  assert_eq!(c.cache().users(), before.as_slice());
  assert_eq!(c.service().fetch_users_calls(), 1);
}

#[tokio::test]
async fn open_unknown_user_is_stale() {
  let mut c = console().await;
  let err = c.open_editor(UserId(42)).unwrap_err();
  assert!(matches!(err, Error::StaleReference(UserId(42))));
  assert_eq!(c.phase(), Phase::Closed);
  assert_eq!(
    c.operator().last_notice(),
    Some((NoticeKind::Error, "User not found.".into()))
  );
}

#[tokio::test]
async fn subject_edit_scenario_tracks_dirtiness() {
  let mut c = console().await;

  let draft = c.open_editor(UserId(1)).unwrap();
  assert!(!draft.is_dirty());

  draft.set_subjects(vec![
    SubjectRef::bare(SubjectId(10)),
    SubjectRef::new(SubjectId(11), "Art"),
  ]);
  assert!(draft.is_dirty());

  draft.set_subjects(vec![SubjectRef::bare(SubjectId(10))]);
  assert!(!draft.is_dirty());
  assert!(!c.can_commit());
}

#[tokio::test]
async fn opening_second_editor_discards_first() {
  let mut c = console().await;
  c.open_editor(UserId(1)).unwrap().set_name("Changed");
  c.open_editor(UserId(2)).unwrap();

  let draft = c.draft().unwrap();
  assert_eq!(draft.user_id(), UserId(2));
  assert!(!draft.is_dirty());
}

// ─── Commit ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn commit_with_empty_name_is_refused() {
  let mut c = console().await;
  c.open_editor(UserId(1)).unwrap().set_name("");

  assert_eq!(
    c.validation_errors().get(Field::Name),
    Some("Name is required")
  );
  assert!(!c.can_commit());

  match c.commit().await {
    Err(Error::Validation(errors)) => {
      assert_eq!(errors.get(Field::Name), Some("Name is required"));
    }
    other => panic!("expected validation error, got {other:?}"),
  }
  assert!(c.service().updates().is_empty());
  assert_eq!(c.phase(), Phase::Open);
}

#[tokio::test]
async fn commit_of_clean_draft_is_refused() {
  let mut c = console().await;
  c.open_editor(UserId(1)).unwrap();

  let err = c.commit().await.unwrap_err();
  assert!(matches!(err, Error::Unchanged));
  assert!(c.service().updates().is_empty());
}

#[tokio::test]
async fn commit_without_draft_is_refused() {
  let mut c = console().await;
  assert!(matches!(c.commit().await, Err(Error::NoDraft)));
  assert!(c.service().updates().is_empty());
}

#[tokio::test]
async fn successful_commit_sends_full_replace_and_reloads_once() {
  let mut c = console().await;
  let draft = c.open_editor(UserId(1)).unwrap();
  draft.set_email("ann.lee@x.com");
  draft.add_subject(SubjectRef::new(SubjectId(11), "Art"));
  assert!(c.can_commit());

  c.commit().await.unwrap();

  assert_eq!(
    c.service().updates(),
    vec![(
      UserId(1),
      UserUpdate {
        name:        "Ann".into(),
        email:       "ann.lee@x.com".into(),
        subject_ids: vec![SubjectId(10), SubjectId(11)],
      }
    )]
  );
  // One initial load plus exactly one post-commit reload.
  assert_eq!(c.service().fetch_users_calls(), 2);
  assert_eq!(c.phase(), Phase::Closed);
  assert!(c.draft().is_none());

  let ann = c.cache().user(UserId(1)).unwrap();
  assert_eq!(ann.email, "ann.lee@x.com");
  assert!(ann.has_subject(SubjectId(11)));
  assert_eq!(
    c.operator().last_notice(),
    Some((NoticeKind::Success, "User has been updated.".into()))
  );
}

#[tokio::test]
async fn failed_commit_keeps_draft_for_retry() {
  let mut c = console().await;
  c.open_editor(UserId(1)).unwrap().set_name("Annie");
  FakeService::set(&c.service().fail_update, true);

  let err = c.commit().await.unwrap_err();
  assert!(matches!(err, Error::Network(_)));
  assert_eq!(c.phase(), Phase::Open);
  assert_eq!(c.draft().unwrap().fields().name, "Annie");
  assert_eq!(c.service().fetch_users_calls(), 1);
  assert_eq!(
    c.operator().last_notice(),
    Some((NoticeKind::Error, "Failed to update user.".into()))
  );

  FakeService::set(&c.service().fail_update, false);
  c.commit().await.unwrap();
  assert_eq!(c.service().updates().len(), 2);
  assert_eq!(c.cache().user(UserId(1)).unwrap().name, "Annie");
}

#[tokio::test]
async fn commit_succeeds_even_if_refresh_fails() {
  let mut c = console().await;
  c.open_editor(UserId(2)).unwrap().set_name("Robert");
  FakeService::set(&c.service().fail_fetch, true);

  c.commit().await.unwrap();

  assert_eq!(c.phase(), Phase::Closed);
  // Stale cache until the next successful load.
  assert_eq!(c.cache().user(UserId(2)).unwrap().name, "Bob");
  let kinds: Vec<_> = c.operator().notices().into_iter().map(|n| n.0).collect();
  assert_eq!(kinds, vec![NoticeKind::Success, NoticeKind::Error]);
}

#[tokio::test]
async fn commit_for_user_gone_from_cache_is_stale() {
  let mut c = console().await;
  c.open_editor(UserId(2)).unwrap().set_name("Robert");

  // Bob disappears server-side and the cache picks that up.
  c.service().users.lock().unwrap().retain(|u| u.id != UserId(2));
  c.reload().await.unwrap();

  let err = c.commit().await.unwrap_err();
  assert!(matches!(err, Error::StaleReference(UserId(2))));
  assert!(c.service().updates().is_empty());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn confirmed_delete_removes_row_without_reload() {
  let mut c = console().await;

  let outcome = c.delete_user(UserId(2)).await.unwrap();
  assert_eq!(outcome, DeleteOutcome::Deleted);
  assert_eq!(c.service().deletes(), vec![UserId(2)]);
  assert!(!c.cache().contains_user(UserId(2)));
  assert_eq!(c.service().fetch_users_calls(), 1);

  let prompts = c.operator().prompts.lock().unwrap().clone();
  assert_eq!(prompts.len(), 1);
  assert!(prompts[0].contains("Bob"));
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
  let mut c =
    console_with(FakeService::seeded(), ScriptedOperator::answering(false)).await;

  let outcome = c.delete_user(UserId(1)).await.unwrap();
  assert_eq!(outcome, DeleteOutcome::Cancelled);
  assert!(c.service().deletes().is_empty());
  assert!(c.cache().contains_user(UserId(1)));
}

#[tokio::test]
async fn failed_delete_leaves_stale_row() {
  let mut c = console().await;
  FakeService::set(&c.service().fail_delete, true);

  let err = c.delete_user(UserId(1)).await.unwrap_err();
  assert!(matches!(err, Error::Network(_)));
  assert!(c.cache().contains_user(UserId(1)));
  assert_eq!(c.operator().last_notice().map(|n| n.0), Some(NoticeKind::Error));
}

#[tokio::test]
async fn delete_of_unknown_user_is_stale_and_unprompted() {
  let mut c = console().await;

  let err = c.delete_user(UserId(9)).await.unwrap_err();
  assert!(matches!(err, Error::StaleReference(UserId(9))));
  assert!(c.operator().prompts.lock().unwrap().is_empty());
  assert!(c.service().deletes().is_empty());
}

#[tokio::test]
async fn deleting_edited_user_closes_its_draft() {
  let mut c = console().await;
  c.open_editor(UserId(1)).unwrap().set_name("Annie");

  c.delete_user(UserId(1)).await.unwrap();
  assert_eq!(c.phase(), Phase::Closed);

  c.open_editor(UserId(2)).unwrap();
  c.delete_user(UserId(1)).await.unwrap_err();
  assert_eq!(c.phase(), Phase::Open, "unrelated draft survives");
}
