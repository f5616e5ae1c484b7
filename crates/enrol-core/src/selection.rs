//! Multi-select normalisation.

use std::collections::HashSet;

use crate::entity::SubjectRef;

/// Deduplicate `selection` by subject identity.
///
/// The first occurrence of each id wins and keeps its position; later
/// duplicates are dropped. Applying this twice yields the same result as
/// applying it once.
pub fn normalize<I>(selection: I) -> Vec<SubjectRef>
where
  I: IntoIterator<Item = SubjectRef>,
{
  let mut seen = HashSet::new();
  selection
    .into_iter()
    .filter(|s| seen.insert(s.id))
    .collect()
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;
  use crate::entity::SubjectId;

  fn r(id: u64) -> SubjectRef { SubjectRef::bare(SubjectId(id)) }

  fn ids(refs: &[SubjectRef]) -> Vec<u64> { refs.iter().map(|s| s.id.0).collect() }

  #[test]
  fn drops_later_duplicates() {
    let out = normalize(vec![r(5), r(5), r(7)]);
    assert_eq!(out, vec![r(5), r(7)]);
  }

  #[test]
  fn keeps_first_seen_order() {
    let out = normalize(vec![r(1), r(2), r(1), r(3)]);
    assert_eq!(ids(&out), vec![1, 2, 3]);
  }

  #[test]
  fn first_occurrence_keeps_its_display_data() {
    let out = normalize(vec![
      SubjectRef::new(SubjectId(10), "Math"),
      SubjectRef::new(SubjectId(10), "Maths (dup)"),
    ]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "Math");
  }

  #[test]
  fn empty_selection_stays_empty() {
    assert!(normalize(Vec::new()).is_empty());
  }

  proptest! {
    #[test]
    fn normalize_is_idempotent(raw in proptest::collection::vec(0u64..8, 0..24)) {
      let once = normalize(raw.iter().copied().map(r));
      let twice = normalize(once.clone());
      prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_yields_unique_first_occurrences(
      raw in proptest::collection::vec(0u64..8, 0..24),
    ) {
      let out = ids(&normalize(raw.iter().copied().map(r)));

      let mut expected = Vec::new();
      for id in &raw {
        if !expected.contains(id) {
          expected.push(*id);
        }
      }
      prop_assert_eq!(out, expected);
    }
  }
}
