use super::error::SimError;
use super::event::Event;
use super::execution::event_scheduler::EventScheduler;
use super::types::ObjectId;
use std::marker::PhantomData;

/// Routing strategy that decides how a freshly produced event becomes visible.
pub trait SendWrapper<P> {
    fn send(&mut self, destination: ObjectId, event: Event<P>);
}

/// Appends every event to a caller-owned buffer.
///
/// The destination is dropped; the scheduler resolves delivery after the
/// collected events have been globally sorted.
pub struct SendToList<'a, C, P> {
    container: &'a mut C,
    _payload: PhantomData<fn(P)>,
}

impl<'a, C, P> SendToList<'a, C, P>
where
    C: Extend<Event<P>>,
{
    pub fn new(container: &'a mut C) -> Self {
        Self {
            container,
            _payload: PhantomData,
        }
    }
}

impl<C, P> SendWrapper<P> for SendToList<'_, C, P>
where
    C: Extend<Event<P>>,
{
    fn send(&mut self, _destination: ObjectId, event: Event<P>) {
        self.container.extend(std::iter::once(event));
    }
}

/// Schedules every event into the global queue as soon as it is produced.
///
/// Delivery follows the event's receiver. Each event must pass `admit` before
/// it is scheduled; the first rejection is kept and every later send dropped.
pub struct ImmediateDelivery<'a, P> {
    scheduler: &'a mut EventScheduler<P>,
    admit: &'a dyn Fn(&Event<P>) -> Result<(), SimError>,
    rejected: Option<SimError>,
}

impl<'a, P> ImmediateDelivery<'a, P> {
    pub fn new(
        scheduler: &'a mut EventScheduler<P>,
        admit: &'a dyn Fn(&Event<P>) -> Result<(), SimError>,
    ) -> Self {
        Self {
            scheduler,
            admit,
            rejected: None,
        }
    }

    /// Report the first rejected event, if any
    pub fn finish(self) -> Result<(), SimError> {
        match self.rejected {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl<P> SendWrapper<P> for ImmediateDelivery<'_, P> {
    fn send(&mut self, _destination: ObjectId, event: Event<P>) {
        if self.rejected.is_some() {
            return;
        }
        match (self.admit)(&event) {
            Ok(()) => self.scheduler.schedule(event),
            Err(error) => self.rejected = Some(error),
        }
    }
}
