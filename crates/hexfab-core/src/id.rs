use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a placed factory instance in the grid.
    pub struct FactoryId;
}

/// Opaque handle owned by a presentation layer (a mesh, a scene node, ...).
/// The core stores it next to a factory and never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalHandle(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ExternalHandle(7), "mine_mesh");
        assert_eq!(map[&ExternalHandle(7)], "mine_mesh");
    }

    #[test]
    fn factory_ids_are_distinct() {
        let mut sm = slotmap::SlotMap::<FactoryId, ()>::with_key();
        let a = sm.insert(());
        let b = sm.insert(());
        assert_ne!(a, b);
    }
}
