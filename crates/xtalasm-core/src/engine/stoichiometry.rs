use crate::core::models::structure::Entity;
use std::collections::BTreeSet;

/// Copy counts per entity within one connected component of an assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Stoichiometry {
    counts: Vec<usize>,
}

impl Stoichiometry {
    pub fn new(num_entities: usize) -> Self {
        Self {
            counts: vec![0; num_entities],
        }
    }

    pub(crate) fn add(&mut self, entity: usize) {
        self.counts[entity] += 1;
    }

    pub fn count_for(&self, entity: usize) -> usize {
        self.counts.get(entity).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of chain copies.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Whether at least one copy of every entity is present.
    pub fn covers_all_entities(&self) -> bool {
        !self.counts.is_empty() && self.counts.iter().all(|&count| count > 0)
    }

    /// Formula such as `A2B`, using each entity's label; absent entities are omitted.
    pub fn formula(&self, entities: &[Entity]) -> String {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(index, &count)| {
                let label = entities
                    .get(index)
                    .map(|entity| entity.label.clone())
                    .unwrap_or_else(|| format!("#{index}"));
                if count == 1 {
                    label
                } else {
                    format!("{label}{count}")
                }
            })
            .collect()
    }
}

/// The stoichiometries of all connected components of an assembly, in component order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoichiometrySet {
    components: Vec<Stoichiometry>,
}

impl StoichiometrySet {
    pub fn new(components: Vec<Stoichiometry>) -> Self {
        Self { components }
    }

    pub fn components(&self) -> &[Stoichiometry] {
        &self.components
    }

    pub fn first(&self) -> Option<&Stoichiometry> {
        self.components.first()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The distinct stoichiometries, sorted.
    pub fn distinct(&self) -> Vec<&Stoichiometry> {
        self.components
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether every component has the same composition.
    pub fn is_even(&self) -> bool {
        self.distinct().len() <= 1
    }

    /// Whether the components together contain every entity of the structure.
    ///
    /// Unengaged chain copies are components of their own, so the union over all
    /// components is complete by construction; the test is therefore applied to each
    /// component, which coincides with the union for the even assemblies a crystal
    /// produces.
    pub fn is_fully_covering(&self) -> bool {
        !self.components.is_empty()
            && self
                .components
                .iter()
                .all(Stoichiometry::covers_all_entities)
    }

    /// Formulas of the distinct stoichiometries joined with `+`, e.g. `A2+B`.
    pub fn formula(&self, entities: &[Entity]) -> String {
        self.distinct()
            .iter()
            .map(|stoichiometry| stoichiometry.formula(entities))
            .collect::<Vec<_>>()
            .join("+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stoichiometry(counts: &[usize]) -> Stoichiometry {
        let mut sto = Stoichiometry::new(counts.len());
        for (entity, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                sto.add(entity);
            }
        }
        sto
    }

    fn entities() -> Vec<Entity> {
        vec![Entity::new("A"), Entity::new("B")]
    }

    #[test]
    fn formula_omits_unit_counts_and_absent_entities() {
        assert_eq!(stoichiometry(&[2, 1]).formula(&entities()), "A2B");
        assert_eq!(stoichiometry(&[0, 3]).formula(&entities()), "B3");
    }

    #[test]
    fn total_and_coverage() {
        let sto = stoichiometry(&[2, 2]);
        assert_eq!(sto.total(), 4);
        assert!(sto.covers_all_entities());
        assert!(!stoichiometry(&[1, 0]).covers_all_entities());
    }

    #[test]
    fn set_is_fully_covering_only_when_every_component_covers() {
        let covering = StoichiometrySet::new(vec![stoichiometry(&[1, 1]), stoichiometry(&[1, 1])]);
        assert!(covering.is_fully_covering());
        assert!(covering.is_even());

        let split = StoichiometrySet::new(vec![stoichiometry(&[1, 0]), stoichiometry(&[0, 1])]);
        assert!(!split.is_fully_covering());
        assert!(!split.is_even());
        assert_eq!(split.formula(&entities()), "B+A");

        assert!(!StoichiometrySet::new(vec![]).is_fully_covering());
    }
}
