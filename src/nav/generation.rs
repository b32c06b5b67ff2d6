/// Identity of one asynchronous request.
///
/// A ticket stays valid only while it is the most recent one issued by its
/// guard; anything that settles later than a newer issue is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket<K> {
    pub key: K,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct GenerationGuard<K> {
    generation: u64,
    current: Option<K>,
}

impl<K> Default for GenerationGuard<K> {
    fn default() -> Self {
        Self {
            generation: 0,
            current: None,
        }
    }
}

impl<K> GenerationGuard<K>
where
    K: Copy + PartialEq,
{
    pub fn issue(&mut self, key: K) -> Ticket<K> {
        self.generation = self.generation.saturating_add(1);
        self.current = Some(key);
        Ticket {
            key,
            generation: self.generation,
        }
    }

    /// Makes every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.saturating_add(1);
        self.current = None;
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        self.generation == ticket.generation && self.current == Some(ticket.key)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
