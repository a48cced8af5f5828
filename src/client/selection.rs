use crate::models::join_ids;

/// Item ids picked on a screen, in the order they were picked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemSelection(Vec<i32>);

impl ItemSelection {
    /// Select `id`, or deselect it when it is already selected (wherever it sits in the list).
    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: i32) -> bool {
        match self.0.iter().position(|&i| i == id) {
            Some(index) => {
                self.0.remove(index);
                false
            }
            None => {
                self.0.push(id);
                true
            }
        }
    }

    pub fn contains(&self, id: i32) -> bool {
        self.0.contains(&id)
    }

    pub fn ids(&self) -> &[i32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `1,2,3`, the wire form of `itens`.
    pub fn joined(&self) -> String {
        join_ids(&self.0)
    }
}
