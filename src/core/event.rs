use super::types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};

/// A timestamped message from one simulation object to another.
///
/// Fields are private so an event cannot change once it has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event<P> {
    timestamp: Timestamp,
    sender: ObjectId,
    receiver: ObjectId,
    payload: P,
}

impl<P> Event<P> {
    pub fn new(timestamp: Timestamp, sender: ObjectId, receiver: ObjectId, payload: P) -> Self {
        Self {
            timestamp,
            sender,
            receiver,
            payload,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn sender(&self) -> ObjectId {
        self.sender
    }

    pub fn receiver(&self) -> ObjectId {
        self.receiver
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Key the scheduler orders events by, before sequence numbers
    pub fn order_key(&self) -> (Timestamp, ObjectId, ObjectId) {
        (self.timestamp, self.sender, self.receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let event = Event::new(10, ObjectId(2), ObjectId(5), "X");
        assert_eq!(event.timestamp(), 10);
        assert_eq!(event.sender(), ObjectId(2));
        assert_eq!(event.receiver(), ObjectId(5));
        assert_eq!(*event.payload(), "X");
    }

    #[test]
    fn test_order_key_prefers_timestamp() {
        let early = Event::new(3, ObjectId(9), ObjectId(9), ());
        let late = Event::new(4, ObjectId(0), ObjectId(0), ());
        assert!(early.order_key() < late.order_key());

        let a = Event::new(4, ObjectId(1), ObjectId(7), ());
        let b = Event::new(4, ObjectId(1), ObjectId(8), ());
        assert!(a.order_key() < b.order_key());
    }
}
