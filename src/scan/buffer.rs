/// Payloads collected during one scanning flow, in scan order, without duplicates.
#[derive(Debug, Default, Clone)]
pub struct ScanBuffer {
    items: Vec<String>,
}

impl ScanBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payload. Empty or already-buffered payloads are ignored.
    pub fn add(&mut self, text: &str) -> bool {
        if text.is_empty() || self.contains(text) {
            return false;
        }
        self.items.push(text.to_string());
        true
    }

    /// Remove a payload; returns whether it was present
    pub fn remove(&mut self, text: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item != text);
        self.items.len() != before
    }

    pub fn contains(&self, text: &str) -> bool {
        self.items.iter().any(|item| item == text)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
