/// A payload paired with the `since` it becomes valid from.
///
/// Immutable once staged; the queue owns it until the upload layer drains it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferItem<T> {
    payload: T,
    since: u64,
}

impl<T> TransferItem<T> {
    pub fn new(payload: T, since: u64) -> Self {
        Self { payload, since }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn since(&self) -> u64 {
        self.since
    }

    pub fn into_parts(self) -> (T, u64) {
        (self.payload, self.since)
    }
}

/// Outgoing items awaiting commit, in staging order.
#[derive(Debug, Clone)]
pub struct TransferQueue<T> {
    items: Vec<TransferItem<T>>,
}

impl<T> Default for TransferQueue<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> TransferQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item and return a reference to it
    pub fn push(&mut self, item: TransferItem<T>) -> &TransferItem<T> {
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&TransferItem<T>> {
        self.items.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransferItem<T>> {
        self.items.iter()
    }

    /// Hand every queued item to the caller, leaving the queue empty
    pub fn drain(&mut self) -> Vec<TransferItem<T>> {
        std::mem::take(&mut self.items)
    }
}
