//! Two-phase optimistic value: pending → confirmed | reverted.
//!
//! The view displays the presumed value immediately, then either settles on
//! the authoritative value once the backend responds or reverts to the
//! prior value and surfaces an error.

/// An optimistically updated value.
#[derive(Debug, Clone, PartialEq)]
pub enum Optimistic<T> {
    Settled(T),
    Pending { prior: T, presumed: T },
}

impl<T: Clone> Optimistic<T> {
    pub fn new(value: T) -> Self {
        Optimistic::Settled(value)
    }

    /// What the view should display right now.
    pub fn value(&self) -> &T {
        match self {
            Optimistic::Settled(v) => v,
            Optimistic::Pending { presumed, .. } => presumed,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Optimistic::Pending { .. })
    }

    /// Begin an update: display `presumed` while the operation is in
    /// flight. A second `apply` while pending keeps the original prior, so
    /// a revert lands back where the user started.
    pub fn apply(&mut self, presumed: T) {
        let prior = match self {
            Optimistic::Settled(v) => v.clone(),
            Optimistic::Pending { prior, .. } => prior.clone(),
        };
        *self = Optimistic::Pending { prior, presumed };
    }

    /// The operation succeeded: settle on the authoritative value, or on
    /// the presumed one when the backend echoes nothing back.
    pub fn confirm(&mut self, authoritative: Option<T>) {
        let settled = match (&*self, authoritative) {
            (_, Some(v)) => v,
            (Optimistic::Pending { presumed, .. }, None) => presumed.clone(),
            (Optimistic::Settled(v), None) => v.clone(),
        };
        *self = Optimistic::Settled(settled);
    }

    /// The operation failed: restore the prior value.
    pub fn revert(&mut self) -> &T {
        if let Optimistic::Pending { prior, .. } = self {
            *self = Optimistic::Settled(prior.clone());
        }
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_settles_on_authoritative_value() {
        let mut count = Optimistic::new(3);
        count.apply(4);
        assert_eq!(*count.value(), 4);
        assert!(count.is_pending());

        count.confirm(Some(5)); // another client raced us
        assert_eq!(*count.value(), 5);
        assert!(!count.is_pending());
    }

    #[test]
    fn confirm_without_echo_keeps_the_presumed_value() {
        let mut avatar = Optimistic::new("old.png".to_string());
        avatar.apply("preview.png".to_string());
        avatar.confirm(None);
        assert_eq!(avatar.value(), "preview.png");
    }

    #[test]
    fn revert_restores_the_prior_value() {
        let mut avatar = Optimistic::new("old.png".to_string());
        avatar.apply("preview.png".to_string());
        assert_eq!(avatar.revert(), "old.png");
        assert!(!avatar.is_pending());
    }

    #[test]
    fn reapply_while_pending_keeps_the_original_prior() {
        let mut count = Optimistic::new(3);
        count.apply(4);
        count.apply(5);
        assert_eq!(*count.revert(), 3);
    }
}
