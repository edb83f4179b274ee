//! Name matching between tested and documented controls.
//!
//! Matching is first-come: among several documented names that satisfy a
//! candidate, the one inserted first wins. Pool order is the store's listing
//! order and is never sorted.

/// Insertion-ordered map from display name to payload.
#[derive(Debug, Clone)]
pub struct NamePool<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for NamePool<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> NamePool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Find the entry matching `candidate`.
    ///
    /// Pass 1: trimmed, case-insensitive equality. Pass 2: the trimmed,
    /// lowercased pool key contains the trimmed, lowercased candidate.
    /// A blank candidate never matches.
    pub fn find(&self, candidate: &str) -> Option<(&str, &T)> {
        let needle = normalize(candidate);
        if needle.is_empty() {
            return None;
        }

        self.iter()
            .find(|(k, _)| normalize(k) == needle)
            .or_else(|| self.iter().find(|(k, _)| normalize(k).contains(&needle)))
    }
}

impl<T, S: Into<String>> FromIterator<(S, T)> for NamePool<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut pool = Self::new();
        for (k, v) in iter {
            pool.insert(k, v);
        }
        pool
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_match() {
        let pool: NamePool<&str> = [("ACCESS REVIEW_DOC", "r1")].into_iter().collect();
        assert_eq!(pool.find("ACCESS REVIEW").map(|(_, v)| *v), Some("r1"));
    }

    #[test]
    fn no_match() {
        let pool: NamePool<&str> = [("Y", "r1")].into_iter().collect();
        assert!(pool.find("X").is_none());
    }

    #[test]
    fn exact_beats_earlier_containment() {
        let pool: NamePool<&str> = [("payroll_2023", "r1"), ("  PAYROLL ", "r2")]
            .into_iter()
            .collect();
        let (name, value) = pool.find("payroll").unwrap();
        assert_eq!(*value, "r2");
        assert_eq!(name, "  PAYROLL ");
    }

    #[test]
    fn first_containment_in_insertion_order_wins() {
        let pool: NamePool<&str> = [("ZZ PAYROLL B", "b"), ("AA PAYROLL A", "a")]
            .into_iter()
            .collect();
        assert_eq!(pool.find("payroll").map(|(_, v)| *v), Some("b"));
    }

    #[test]
    fn candidate_containing_key_does_not_match() {
        let pool: NamePool<&str> = [("PAY", "r1")].into_iter().collect();
        assert!(pool.find("PAYROLL").is_none());
    }

    #[test]
    fn blank_candidate_never_matches() {
        let pool: NamePool<&str> = [("", "r1"), ("anything", "r2")].into_iter().collect();
        assert!(pool.find("   ").is_none());
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut pool = NamePool::new();
        pool.insert("A PAY", 1);
        pool.insert("B PAY", 2);
        pool.insert("A PAY", 3);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.find("pay").map(|(_, v)| *v), Some(3));
        assert_eq!(pool.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["A PAY", "B PAY"]);
    }
}
