//! Request generations
//!
//! Listing fetches are not cancelable, so a slow response can arrive after a
//! newer one. Each fetch takes a [`Generation`] ticket and its response is only
//! applied while that ticket is still the newest.

/// Ticket identifying one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Raw sequence number.
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Hands out generation tickets and remembers the newest.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    latest: u64,
}

impl Generations {
    /// Start a new fetch, superseding every earlier ticket.
    pub fn begin(&mut self) -> Generation {
        self.latest = self.latest.saturating_add(1);

        Generation(self.latest)
    }

    /// Whether `ticket` belongs to the newest fetch.
    pub fn is_current(&self, ticket: Generation) -> bool {
        ticket.0 == self.latest
    }

    /// Invalidate every outstanding ticket without starting a fetch.
    pub fn invalidate(&mut self) {
        self.latest = self.latest.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut generations = Generations::default();

        let first = generations.begin();
        let second = generations.begin();

        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn invalidate_makes_every_ticket_stale() {
        let mut generations = Generations::default();
        let ticket = generations.begin();

        generations.invalidate();

        assert!(!generations.is_current(ticket));
    }
}
