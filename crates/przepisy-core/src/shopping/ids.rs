//! Recipe Id Set Helpers
//!
//! Pure set transitions, kept apart from the network-triggering operations.

use std::collections::BTreeSet;

use crate::models::RecipeId;

pub type RecipeIds = BTreeSet<RecipeId>;

pub fn apply_add(ids: &RecipeIds, id: RecipeId) -> RecipeIds {
    let mut next = ids.clone();
    next.insert(id);
    next
}

pub fn apply_remove(ids: &RecipeIds, id: RecipeId) -> RecipeIds {
    let mut next = ids.clone();
    next.remove(&id);
    next
}

/// Authoritative set from a server answer; duplicates collapse.
pub fn replace_ids(server: Vec<RecipeId>) -> RecipeIds {
    server.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[RecipeId]) -> RecipeIds {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_apply_add_is_idempotent() {
        let once = apply_add(&set(&[1]), 5);
        assert_eq!(once, set(&[1, 5]));
        assert_eq!(apply_add(&once, 5), once);
    }

    #[test]
    fn test_apply_remove_leaves_input_untouched() {
        let ids = set(&[1, 2]);
        assert_eq!(apply_remove(&ids, 2), set(&[1]));
        assert_eq!(apply_remove(&ids, 9), ids);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_replace_ids_dedups() {
        assert_eq!(replace_ids(vec![3, 1, 3]), set(&[1, 3]));
    }
}
