//! Cyclical non-zero object id issuance

/// Largest id issued before the sequence wraps back to 1
pub const MAX_OBJECT_ID: u32 = 0xFFFF_FFFE;

/// Issues `1, 2, ..., MAX_OBJECT_ID, 1, 2, ...`; never zero
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u32,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Start the sequence at `id` (0 and values past `MAX_OBJECT_ID` map to 1)
    pub fn starting_at(id: u32) -> Self {
        let next = if id == 0 || id > MAX_OBJECT_ID { 1 } else { id };
        Self { next }
    }

    #[inline]
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = if id >= MAX_OBJECT_ID { 1 } else { id + 1 };
        id
    }

    /// Id the next call will return
    pub fn peek(&self) -> u32 {
        self.next
    }
}
