use crate::model::EntityId;

/// Record ids for every collection in a store come from one counter, so an
/// entity, job, attack and war never share an id.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Record an id restored from elsewhere; later ids will be larger.
    pub fn observe(&mut self, id: EntityId) {
        self.next = self.next.max(id.saturating_add(1));
    }

    /// Counter positioned after every id in `ids`.
    pub fn after(ids: impl IntoIterator<Item = u64>) -> Self {
        let mut generator = Self::new();
        for id in ids {
            generator.observe(id);
        }
        generator
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }

    #[test]
    fn restored_ids_are_never_reissued() {
        let mut ids = IdGenerator::after([4, 17, 9]);
        assert_eq!(ids.next_id(), 18);
        ids.observe(3);
        assert_eq!(ids.next_id(), 19);
    }

    #[test]
    fn empty_restore_starts_fresh() {
        assert_eq!(IdGenerator::after([]).next_id(), 1);
    }
}
