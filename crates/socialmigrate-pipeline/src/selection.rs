use std::collections::HashSet;

use socialmigrate_core::Post;

/// Post ids chosen for migration.
///
/// Membership only; order comes from the candidate list when the selection is
/// resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.ids.extend(ids.into_iter().map(str::to_string));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Select every id in `ids`, unless all of them are already selected, in
    /// which case deselect them all.
    pub fn toggle_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str> + Clone) {
        let all_selected = ids.clone().into_iter().all(|id| self.ids.contains(id));
        if all_selected {
            for id in ids {
                self.ids.remove(id);
            }
        } else {
            self.select_all(ids);
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected posts, cloned, in `candidates` order.
    #[must_use]
    pub fn resolve(&self, candidates: &[Post]) -> Vec<Post> {
        candidates
            .iter()
            .filter(|p| self.ids.contains(&p.id))
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            content: format!("content {id}"),
            date: "2020-01-01".to_string(),
            like_count: 0,
            image_url: None,
            original_author: "Alex Doe".to_string(),
        }
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let mut set = SelectionSet::new();
        assert!(set.toggle("p1"));
        assert!(set.contains("p1"));
        assert!(!set.toggle("p1"));
        assert!(set.is_empty());
    }

    #[test]
    fn select_all_then_clear() {
        let mut set = SelectionSet::new();
        set.select_all(["p1", "p2", "p2"]);
        assert_eq!(set.len(), 2);
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn toggle_all_selects_missing_before_deselecting() {
        let mut set: SelectionSet = ["p1"].into_iter().collect();
        set.toggle_all(["p1", "p2"]);
        assert!(set.contains("p1") && set.contains("p2"));

        set.toggle_all(["p1", "p2"]);
        assert!(set.is_empty());
    }

    #[test]
    fn toggle_all_leaves_other_ids_alone() {
        let mut set: SelectionSet = ["p1", "p9"].into_iter().collect();
        set.toggle_all(["p1"]);
        assert!(!set.contains("p1"));
        assert!(set.contains("p9"));
    }

    #[test]
    fn resolve_follows_candidate_order() {
        let candidates = vec![post("p3"), post("p1"), post("p2")];
        let set: SelectionSet = ["p2", "p3"].into_iter().collect();
        let ids: Vec<String> = set.resolve(&candidates).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p3", "p2"]);
    }

    #[test]
    fn resolve_ignores_ids_without_candidates() {
        let set: SelectionSet = ["gone"].into_iter().collect();
        assert!(set.resolve(&[post("p1")]).is_empty());
    }
}
