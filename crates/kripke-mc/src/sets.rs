//! Set algebra over ordered sets, used pervasively by both engines.
//!
//! All operations are pure and deterministic. `difference` has a subset
//! precondition; violating it is a bug in the caller, not a recoverable
//! error, and panics.

use std::collections::BTreeSet;

/// True iff every element of `sub` is in `sup`.
pub fn subset<T: Ord>(sub: &BTreeSet<T>, sup: &BTreeSet<T>) -> bool {
    sub.is_subset(sup)
}

/// `sup \ sub`. Requires `sub ⊆ sup`.
pub fn difference<T: Ord + Copy>(sup: &BTreeSet<T>, sub: &BTreeSet<T>) -> BTreeSet<T> {
    assert!(subset(sub, sup), "difference: subtrahend is not a subset");
    sup.difference(sub).copied().collect()
}

/// `a ∩ b`.
pub fn intersect<T: Ord + Copy>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.intersection(b).copied().collect()
}

/// `a ∪ b`.
pub fn union<T: Ord + Copy>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.union(b).copied().collect()
}

/// True iff `a ∩ b` is non-empty. Stops at the first common element.
pub fn intersects<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> bool {
    !a.is_disjoint(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(xs: &[u32]) -> BTreeSet<u32> {
        xs.iter().copied().collect()
    }

    #[test]
    fn subset_and_difference() {
        let a = set(&[1, 2, 3]);
        let b = set(&[2, 3]);
        assert!(subset(&b, &a));
        assert!(!subset(&a, &b));
        assert!(subset(&set(&[]), &a));
        assert_eq!(difference(&a, &b), set(&[1]));
        assert_eq!(difference(&a, &set(&[])), a);
    }

    #[test]
    #[should_panic(expected = "not a subset")]
    fn difference_requires_subset() {
        difference(&set(&[1, 2]), &set(&[2, 4]));
    }

    #[test]
    fn intersection_union() {
        let a = set(&[1, 2, 3]);
        let b = set(&[2, 3, 4]);
        assert_eq!(intersect(&a, &b), set(&[2, 3]));
        assert_eq!(union(&a, &b), set(&[1, 2, 3, 4]));
        assert!(intersects(&a, &b));
        assert!(!intersects(&a, &set(&[4, 5])));
        assert!(!intersects(&a, &set(&[])));
    }
}
