use std::collections::HashMap;

use glam::Vec3;

use crate::{TransformId, TransformRegistry};

/// Host-owned world positions keyed by [`TransformId`].
#[derive(Debug, Default, Clone)]
pub struct TransformTable {
    positions: HashMap<TransformId, Vec3>,
    next_id: u32,
}

impl TransformTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: Vec3) -> TransformId {
        let id = TransformId(self.next_id);
        self.next_id += 1;
        self.positions.insert(id, position);
        id
    }

    /// Returns false if the transform no longer exists.
    pub fn set_position(&mut self, id: TransformId, position: Vec3) -> bool {
        match self.positions.get_mut(&id) {
            Some(slot) => {
                *slot = position;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: TransformId) -> Option<Vec3> {
        self.positions.remove(&id)
    }
}

impl TransformRegistry for TransformTable {
    fn position(&self, id: TransformId) -> Option<Vec3> {
        self.positions.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut table = TransformTable::new();
        let a = table.insert(Vec3::X);
        table.remove(a);
        let b = table.insert(Vec3::Y);
        assert_ne!(a, b);
        assert_eq!(table.position(a), None);
        assert!(!table.set_position(a, Vec3::Z));
        assert!(table.set_position(b, Vec3::Z));
        assert_eq!(table.position(b), Some(Vec3::Z));
    }
}
