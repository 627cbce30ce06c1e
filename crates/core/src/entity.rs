//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Index of the entity with `id` in an ordered collection.
pub fn position_of<E: Entity>(items: &[E], id: &E::Id) -> Option<usize> {
    items.iter().position(|e| e.id() == id)
}

/// First entity with a duplicated identifier, if any.
pub fn first_duplicate<E: Entity>(items: &[E]) -> Option<&E::Id> {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items.iter().map(Entity::id).find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(u32);

    impl Entity for Row {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.0
        }
    }

    #[test]
    fn position_of_finds_first_match() {
        let rows = [Row(3), Row(7), Row(9)];
        assert_eq!(position_of(&rows, &7), Some(1));
        assert_eq!(position_of(&rows, &8), None);
    }

    #[test]
    fn first_duplicate_reports_repeated_id() {
        assert_eq!(first_duplicate(&[Row(1), Row(2), Row(1)]), Some(&1));
        assert_eq!(first_duplicate(&[Row(1), Row(2)]), None);
    }
}
