use std::collections::BTreeSet;

/// Registry of identifiers already handed out within one scope.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    used: BTreeSet<String>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_available(&self, name: &str) -> bool {
        !self.used.contains(name)
    }

    /// Mark a name as used. Reserving an already used name is a no-op.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.used.insert(name.into());
    }

    /// Return `base` if unused, otherwise the first of `base1`, `base2`, ...
    /// that is unused. The returned name is not reserved.
    pub fn next_available(&self, base: &str) -> String {
        if self.is_available(base) {
            return base.to_string();
        }

        (1usize..)
            .map(|suffix| format!("{base}{suffix}"))
            .find(|candidate| self.is_available(candidate))
            .unwrap_or_else(|| unreachable!("integer suffixes are unbounded"))
    }

    /// Resolve `base` to a free name and reserve it.
    pub fn claim(&mut self, base: &str) -> String {
        let name = self.next_available(base);
        self.reserve(name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_out_base_when_free() {
        let index = NameIndex::new();
        assert!(index.is_available("Name"));
        assert_eq!(index.next_available("Name"), "Name");
    }

    #[test]
    fn probes_numeric_suffixes_in_order() {
        let mut index = NameIndex::new();
        index.reserve("Name");
        assert_eq!(index.next_available("Name"), "Name1");

        index.reserve("Name1");
        index.reserve("Name3");
        assert_eq!(index.next_available("Name"), "Name2");
    }

    #[test]
    fn next_available_does_not_reserve() {
        let mut index = NameIndex::new();
        index.reserve("Name");
        assert_eq!(index.next_available("Name"), "Name1");
        assert_eq!(index.next_available("Name"), "Name1");
        assert!(index.is_available("Name1"));
    }

    #[test]
    fn reserve_is_idempotent() {
        let mut index = NameIndex::new();
        index.reserve("ID");
        index.reserve("ID");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn claim_reserves_resolved_name() {
        let mut index = NameIndex::new();
        assert_eq!(index.claim("User"), "User");
        assert_eq!(index.claim("User"), "User1");
        assert_eq!(index.claim("User"), "User2");
        assert!(!index.is_available("User2"));
    }
}
