//! Checklist View-State
//!
//! Ephemeral "already in the basket" marks for one open panel. Keys are
//! positional (`category::index`), so the set is wiped whenever the aggregate
//! is recomputed.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checklist {
    checked: BTreeSet<String>,
}

impl Checklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `key`; returns whether it is checked afterwards
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.checked.remove(key) {
            false
        } else {
            self.checked.insert(key.to_string());
            true
        }
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.checked.contains(key)
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    pub fn reset(&mut self) {
        self.checked.clear();
    }

    /// Whole percent of `total_items` checked
    pub fn progress(&self, total_items: usize) -> u32 {
        progress_percent(self.checked.len(), total_items)
    }
}

/// `round(checked / total * 100)`, 0 for an empty list
pub fn progress_percent(checked: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let percent = (checked as f64 / total as f64 * 100.0).round() as u32;
    percent.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(3, 4), 75);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(1, 8), 13);
    }

    #[test]
    fn test_toggle_twice_unchecks() {
        let mut checklist = Checklist::new();
        assert!(checklist.toggle("Nabiał::0"));
        assert!(checklist.is_checked("Nabiał::0"));
        assert!(!checklist.toggle("Nabiał::0"));
        assert!(!checklist.is_checked("Nabiał::0"));
        assert_eq!(checklist, Checklist::new());
    }

    #[test]
    fn test_progress_of_checklist() {
        let mut checklist = Checklist::new();
        for key in ["Inne::0", "Inne::1", "Nabiał::0"] {
            checklist.toggle(key);
        }
        assert_eq!(checklist.progress(4), 75);
        checklist.reset();
        assert_eq!(checklist.progress(4), 0);
    }
}
