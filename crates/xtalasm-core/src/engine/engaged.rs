use bit_set::BitSet;
use std::cmp::Ordering;
use std::fmt;

/// The interface clusters switched on for a candidate assembly.
///
/// A fixed-size bit vector over cluster indices `0..size`; an element of the power
/// set of interface clusters. Sets compare first by the number of engaged clusters,
/// then lexicographically by the engaged indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngagedSet {
    size: usize,
    bits: BitSet,
}

impl EngagedSet {
    /// The empty set over `size` interface clusters.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            bits: BitSet::with_capacity(size),
        }
    }

    /// # Panics
    ///
    /// Panics if any index is not below `size`.
    pub fn from_indices<I>(size: usize, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut set = Self::new(size);
        for index in indices {
            set.switch_on(index);
        }
        set
    }

    pub fn full(size: usize) -> Self {
        Self::from_indices(size, 0..size)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of engaged clusters.
    pub fn count(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_on(&self, index: usize) -> bool {
        self.check_index(index);
        self.bits.contains(index)
    }

    pub fn switch_on(&mut self, index: usize) {
        self.check_index(index);
        self.bits.insert(index);
    }

    pub fn switch_off(&mut self, index: usize) {
        self.check_index(index);
        self.bits.remove(index);
    }

    /// Engaged cluster indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter()
    }

    pub fn is_subset_of(&self, other: &EngagedSet) -> bool {
        self.bits.is_subset(&other.bits)
    }

    pub fn is_superset_of(&self, other: &EngagedSet) -> bool {
        self.bits.is_superset(&other.bits)
    }

    /// The sets with exactly one more cluster engaged.
    ///
    /// Children containing any of `invalid` are skipped: a superset of an invalid
    /// combination is invalid as well and never needs evaluating.
    pub fn children(&self, invalid: &[EngagedSet]) -> Vec<EngagedSet> {
        (0..self.size)
            .filter(|&index| !self.bits.contains(index))
            .map(|index| {
                let mut child = self.clone();
                child.bits.insert(index);
                child
            })
            .filter(|child| !invalid.iter().any(|bad| bad.is_subset_of(child)))
            .collect()
    }

    /// The sets with exactly one engaged cluster switched off.
    pub fn parents(&self) -> Vec<EngagedSet> {
        self.bits
            .iter()
            .map(|index| {
                let mut parent = self.clone();
                parent.bits.remove(index);
                parent
            })
            .collect()
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.size,
            "interface cluster index {index} out of range for {} clusters",
            self.size
        );
    }
}

impl Ord for EngagedSet {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count()
            .cmp(&other.count())
            .then_with(|| self.bits.iter().cmp(other.bits.iter()))
            .then_with(|| self.size.cmp(&other.size))
    }
}

impl PartialOrd for EngagedSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EngagedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices: Vec<String> = self.bits.iter().map(|i| i.to_string()).collect();
        write!(f, "{{{}}}", indices.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn switch_on_and_off_toggle_bits() {
        let mut set = EngagedSet::new(4);
        assert!(set.is_empty());
        set.switch_on(2);
        set.switch_on(0);
        assert!(set.is_on(2));
        assert_eq!(set.count(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 2]);
        set.switch_off(2);
        assert!(!set.is_on(2));
        assert_eq!(set.to_string(), "{0}");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn switch_on_out_of_range_panics() {
        EngagedSet::new(3).switch_on(3);
    }

    #[test]
    fn subset_relations_follow_inclusion() {
        let small = EngagedSet::from_indices(4, [1]);
        let large = EngagedSet::from_indices(4, [1, 3]);
        assert!(small.is_subset_of(&large));
        assert!(large.is_superset_of(&small));
        assert!(!large.is_subset_of(&small));
        assert!(EngagedSet::new(4).is_subset_of(&small));
    }

    #[test]
    fn equal_bit_patterns_hash_identically() {
        let mut a = EngagedSet::new(3);
        a.switch_on(1);
        a.switch_on(2);
        let b = EngagedSet::from_indices(3, [2, 1]);
        let set: HashSet<EngagedSet> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn children_engage_one_more_cluster() {
        let set = EngagedSet::from_indices(3, [1]);
        let children = set.children(&[]);
        assert_eq!(
            children,
            vec![
                EngagedSet::from_indices(3, [0, 1]),
                EngagedSet::from_indices(3, [1, 2])
            ]
        );
    }

    #[test]
    fn children_skip_supersets_of_invalid_sets() {
        let set = EngagedSet::from_indices(4, [0]);
        let invalid = vec![EngagedSet::from_indices(4, [2]), EngagedSet::from_indices(4, [0, 3])];
        let children = set.children(&invalid);
        assert_eq!(children, vec![EngagedSet::from_indices(4, [0, 1])]);
    }

    #[test]
    fn parents_disengage_one_cluster() {
        let set = EngagedSet::from_indices(3, [0, 2]);
        assert_eq!(
            set.parents(),
            vec![EngagedSet::from_indices(3, [2]), EngagedSet::from_indices(3, [0])]
        );
        assert!(EngagedSet::new(3).parents().is_empty());
    }

    #[test]
    fn ordering_is_by_count_then_lexicographic() {
        let mut sets = vec![
            EngagedSet::from_indices(3, [1, 2]),
            EngagedSet::from_indices(3, [2]),
            EngagedSet::new(3),
            EngagedSet::from_indices(3, [0, 2]),
            EngagedSet::from_indices(3, [0]),
        ];
        sets.sort();
        let rendered: Vec<String> = sets.iter().map(|s| s.to_string()).collect();
        assert_eq!(rendered, vec!["{}", "{0}", "{2}", "{0,2}", "{1,2}"]);
    }

    #[test]
    fn full_engages_every_cluster() {
        assert_eq!(EngagedSet::full(3).count(), 3);
        assert_eq!(EngagedSet::full(0).count(), 0);
    }
}
