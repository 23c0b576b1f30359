//! # Edge firing policy.
//!
//! Decides which edges of a burst run the action:
//!
//! | leading | trailing | start of burst | quiet period elapsed   |
//! |---------|----------|----------------|------------------------|
//! | false   | true     | -              | fire                   |
//! | true    | false    | fire           | -                      |
//! | true    | true     | fire           | fire if `pending > 0`  |
//! | false   | false    | -              | -                      |
//!
//! `pending` counts invokes received after the one that started the burst,
//! so a lone invoke with both edges enabled fires exactly once.
//! Deadline expiry never fires on any row.

/// Which edges of a burst fire the action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EdgePolicy {
    pub(crate) leading: bool,
    pub(crate) trailing: bool,
}

impl EdgePolicy {
    pub(crate) fn new(leading: bool, trailing: bool) -> Self {
        Self { leading, trailing }
    }

    #[inline]
    pub(crate) fn fires_leading(&self) -> bool {
        self.leading
    }

    /// Whether the quiet-period branch fires, given invokes seen after burst start.
    #[inline]
    pub(crate) fn fires_trailing(&self, pending: u64) -> bool {
        match (self.leading, self.trailing) {
            (true, true) => pending > 0,
            (false, true) => true,
            (_, false) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_only_always_fires() {
        let p = EdgePolicy::new(false, true);
        assert!(!p.fires_leading());
        assert!(p.fires_trailing(0));
        assert!(p.fires_trailing(5));
    }

    #[test]
    fn test_leading_and_trailing_needs_second_invoke() {
        let p = EdgePolicy::new(true, true);
        assert!(p.fires_leading());
        assert!(!p.fires_trailing(0));
        assert!(p.fires_trailing(1));
    }

    #[test]
    fn test_leading_only_never_trails() {
        let p = EdgePolicy::new(true, false);
        assert!(p.fires_leading());
        assert!(!p.fires_trailing(10));
    }

    #[test]
    fn test_no_edges_is_silent() {
        let p = EdgePolicy::new(false, false);
        assert!(!p.fires_leading());
        assert!(!p.fires_trailing(3));
    }
}
