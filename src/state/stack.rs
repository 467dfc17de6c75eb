use serde::{Deserialize, Serialize};

/// Paint order of visible windows; the last id is the top window
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackingOrder {
    ids: Vec<String>,
}

impl StackingOrder {
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Move `id` to the top, inserting it if absent
    pub fn focus(&mut self, id: &str) {
        self.remove(id);
        self.ids.push(id.to_string());
    }

    /// Remove `id` wherever it sits. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|x| x == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn top_id(&self) -> Option<&str> {
        self.ids.last().map(String::as_str)
    }

    /// Index in paint order; absent windows have no rank and must not render
    pub fn z_rank(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.z_rank(id).is_some()
    }

    pub fn is_top(&self, id: &str) -> bool {
        self.top_id() == Some(id)
    }

    /// Bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keep only ids accepted by `keep`, dropping duplicates (first occurrence wins)
    pub fn retain_unique<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        let mut seen = std::collections::HashSet::new();
        self.ids.retain(|id| keep(id.as_str()) && seen.insert(id.clone()));
    }
}

impl<S: Into<String>> FromIterator<S> for StackingOrder {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
