use crate::core::event::Event;
use crate::core::types::{ObjectId, Timestamp};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct ScheduledEvent<P> {
    pub sequence_num: u64,
    pub event: Event<P>,
}

impl<P> ScheduledEvent<P> {
    fn key(&self) -> (Timestamp, ObjectId, ObjectId, u64) {
        let (timestamp, sender, receiver) = self.event.order_key();
        (timestamp, sender, receiver, self.sequence_num)
    }
}

impl<P> PartialEq for ScheduledEvent<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<P> Eq for ScheduledEvent<P> {}

impl<P> PartialOrd for ScheduledEvent<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for ScheduledEvent<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other.key().cmp(&self.key())
    }
}

/// Global pending-event queue ordered by (timestamp, sender, receiver, sequence)
pub struct EventScheduler<P> {
    event_queue: BinaryHeap<ScheduledEvent<P>>,
    sequence_counter: u64,
}

impl<P> EventScheduler<P> {
    /// Create a new EventScheduler
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Insert an event, stamping it with the next sequence number
    pub fn schedule(&mut self, event: Event<P>) {
        let scheduled_event = ScheduledEvent {
            sequence_num: self.sequence_counter,
            event,
        };

        self.event_queue.push(scheduled_event);
        self.sequence_counter += 1;
    }

    /// Insert a batch in iteration order
    pub fn schedule_all<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = Event<P>>,
    {
        for event in events {
            self.schedule(event);
        }
    }

    /// Remove all events sharing the minimal timestamp, in queue order
    pub fn pop_next_batch(&mut self) -> Vec<Event<P>> {
        let mut events = Vec::new();

        if let Some(next_time) = self.peek_next_time() {
            while self
                .event_queue
                .peek()
                .is_some_and(|scheduled| scheduled.event.timestamp() == next_time)
            {
                if let Some(scheduled) = self.event_queue.pop() {
                    events.push(scheduled.event);
                }
            }
        }

        events
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.event_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_queue.is_empty()
    }

    /// Timestamp of the earliest pending event
    pub fn peek_next_time(&self) -> Option<Timestamp> {
        self.event_queue.peek().map(|scheduled| scheduled.event.timestamp())
    }
}

impl<P> Default for EventScheduler<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(timestamp: Timestamp, sender: usize, receiver: usize, payload: &'static str) -> Event<&'static str> {
        Event::new(timestamp, ObjectId(sender), ObjectId(receiver), payload)
    }

    #[test]
    fn test_pop_next_batch_groups_by_time() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(event(5, 0, 1, "late"));
        scheduler.schedule(event(2, 0, 1, "a"));
        scheduler.schedule(event(2, 0, 2, "b"));

        assert_eq!(scheduler.peek_next_time(), Some(2));
        let batch: Vec<&str> = scheduler.pop_next_batch().iter().map(|e| *e.payload()).collect();
        assert_eq!(batch, vec!["a", "b"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.peek_next_time(), Some(5));
    }

    #[test]
    fn test_ties_follow_sender_then_receiver() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(event(1, 3, 0, "s3"));
        scheduler.schedule(event(1, 1, 4, "s1r4"));
        scheduler.schedule(event(1, 1, 2, "s1r2"));

        let batch: Vec<&str> = scheduler.pop_next_batch().iter().map(|e| *e.payload()).collect();
        assert_eq!(batch, vec!["s1r2", "s1r4", "s3"]);
    }

    #[test]
    fn test_identical_keys_keep_insertion_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_all(vec![event(1, 0, 0, "first"), event(1, 0, 0, "second")]);

        let batch: Vec<&str> = scheduler.pop_next_batch().iter().map(|e| *e.payload()).collect();
        assert_eq!(batch, vec!["first", "second"]);
    }

    #[test]
    fn test_empty_scheduler() {
        let mut scheduler: EventScheduler<()> = EventScheduler::new();
        assert!(!scheduler.has_events());
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.peek_next_time(), None);
        assert!(scheduler.pop_next_batch().is_empty());
    }
}
