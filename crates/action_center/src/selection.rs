use serde::{Deserialize, Serialize};
use shared::domain::ActionId;

/// The set of action ids a user has picked, in pick order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    ids: Vec<ActionId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the id when absent, removes it when present. Returns whether the id
    /// is selected afterwards.
    pub fn toggle(&mut self, id: impl Into<ActionId>) -> bool {
        let id = id.into();
        match self.ids.iter().position(|selected| *selected == id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id);
                true
            }
        }
    }

    pub fn contains(&self, id: &ActionId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[ActionId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<I: Into<ActionId>> FromIterator<I> for Selection {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut selection = Selection::new();
        for id in iter {
            let id = id.into();
            if !selection.contains(&id) {
                selection.ids.push(id);
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = Selection::new();
        assert!(selection.toggle("remote_work"));
        assert!(selection.contains(&ActionId::from("remote_work")));
        assert!(!selection.toggle("remote_work"));
        assert!(selection.is_empty());
    }

    #[test]
    fn keeps_pick_order_and_drops_duplicates() {
        let selection: Selection = ["b", "a", "b", "c"].into_iter().collect();
        let ids: Vec<&str> = selection.ids().iter().map(ActionId::as_str).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
