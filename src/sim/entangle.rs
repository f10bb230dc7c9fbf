//! Quantum entanglement pairs
//!
//! Links live in a side table keyed by particle id, so removing a particle
//! can never leave a dangling reference. Every link is stored in both
//! directions and is only ever inserted or removed as a pair.

use std::collections::BTreeMap;

use super::particle::ParticleId;

#[derive(Debug, Clone, Default)]
pub struct Entanglements {
    partners: BTreeMap<ParticleId, ParticleId>,
}

impl Entanglements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `a` and `b`, first breaking any pair either was already in
    pub fn link(&mut self, a: ParticleId, b: ParticleId) {
        if a == b {
            return;
        }
        self.release(a);
        self.release(b);
        self.partners.insert(a, b);
        self.partners.insert(b, a);
    }

    /// Break the `a`-`b` pair; a no-op if they are no longer paired
    pub fn unlink(&mut self, a: ParticleId, b: ParticleId) -> bool {
        if self.partner(a) == Some(b) {
            self.partners.remove(&a);
            self.partners.remove(&b);
            true
        } else {
            false
        }
    }

    fn release(&mut self, id: ParticleId) {
        if let Some(old) = self.partners.remove(&id) {
            self.partners.remove(&old);
        }
    }

    pub fn partner(&self, id: ParticleId) -> Option<ParticleId> {
        self.partners.get(&id).copied()
    }

    /// Each pair once, lower id first
    pub fn pairs(&self) -> impl Iterator<Item = (ParticleId, ParticleId)> + '_ {
        self.partners
            .iter()
            .filter(|(a, b)| a < b)
            .map(|(&a, &b)| (a, b))
    }

    pub fn len(&self) -> usize {
        self.partners.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// True when every link has a matching back-link
    pub fn is_symmetric(&self) -> bool {
        self.partners
            .iter()
            .all(|(a, b)| self.partners.get(b) == Some(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_is_symmetric() {
        let mut e = Entanglements::new();
        e.link(1, 2);
        assert_eq!(e.partner(1), Some(2));
        assert_eq!(e.partner(2), Some(1));
        assert_eq!(e.pairs().collect::<Vec<_>>(), vec![(1, 2)]);
        assert!(e.is_symmetric());
    }

    #[test]
    fn test_relink_breaks_old_pair() {
        let mut e = Entanglements::new();
        e.link(1, 2);
        e.link(1, 3);
        assert_eq!(e.partner(1), Some(3));
        assert_eq!(e.partner(2), None);
        assert_eq!(e.len(), 1);
        assert!(e.is_symmetric());

        // The stale timer for the first pair must not break the new one
        assert!(!e.unlink(1, 2));
        assert_eq!(e.partner(3), Some(1));
    }

    #[test]
    fn test_unlink_clears_both_sides() {
        let mut e = Entanglements::new();
        e.link(4, 9);
        assert!(e.unlink(9, 4));
        assert_eq!(e.partner(4), None);
        assert_eq!(e.partner(9), None);
        assert!(e.is_empty());
    }

    #[test]
    fn test_self_link_ignored() {
        let mut e = Entanglements::new();
        e.link(5, 5);
        assert!(e.is_empty());
    }
}
