use crate::model::ItemId;
use rustc_hash::FxHashMap;

/// Live marker and line handles of one visualization, keyed by item id.
///
/// The rendering layer registers handles when it mounts an item and unregisters them when it
/// unmounts it. One registry belongs to exactly one animator and is emptied on teardown.
#[derive(Debug)]
pub struct HandleRegistry<N, L> {
    nodes: FxHashMap<ItemId, N>,
    lines: FxHashMap<ItemId, L>,
}

impl<N, L> Default for HandleRegistry<N, L> {
    fn default() -> Self {
        Self {
            nodes: FxHashMap::default(),
            lines: FxHashMap::default(),
        }
    }
}

impl<N, L> HandleRegistry<N, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle previously registered for `id`, if any.
    pub fn register_node(&mut self, id: ItemId, node: N) -> Option<N> {
        self.nodes.insert(id, node)
    }

    pub fn register_line(&mut self, id: ItemId, line: L) -> Option<L> {
        self.lines.insert(id, line)
    }

    /// Drops both handles of `id`.
    pub fn unregister(&mut self, id: ItemId) -> (Option<N>, Option<L>) {
        (self.nodes.remove(&id), self.lines.remove(&id))
    }

    pub fn node(&self, id: ItemId) -> Option<&N> {
        self.nodes.get(&id)
    }

    pub fn line(&self, id: ItemId) -> Option<&L> {
        self.lines.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.nodes.contains_key(&id) || self.lines.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len().max(self.lines.len())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.lines.clear();
    }
}
