use crate::domain::model::{DominationMap, Front, Relation};

/// Ids with an empty domination set, ascending by numeric ordinal.
pub fn extract_front(map: &DominationMap, relation: Relation) -> Front {
    let mut members: Vec<_> = map
        .iter()
        .filter(|(_, dominators)| dominators.is_empty())
        .map(|(id, _)| *id)
        .collect();
    // Ascending by ordinal regardless of map iteration order.
    members.sort_unstable();

    Front { relation, members }
}
