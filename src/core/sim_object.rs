use super::error::SimError;
use super::event::Event;
use super::execution::config::CheckPolicy;
use super::graph::{DependencyGraph, OutEdge};
use super::send_wrapper::SendWrapper;
use super::types::{NodeId, ObjectId};
use log::{error, trace};

/// Identity and port capacities of a simulation object, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimObjectInfo {
    pub id: ObjectId,
    pub num_outputs: usize,
    pub num_inputs: usize,
}

/// Model-specific event handling.
///
/// Implementations decide which events, if any, an incoming event produces and
/// emit each of them through `sink`. `out_edges` enumerates this object's
/// outgoing edges from the first one.
pub trait SimModel {
    type Payload;

    fn run_model_logic(
        &mut self,
        info: &SimObjectInfo,
        event: &Event<Self::Payload>,
        sink: &mut dyn SendWrapper<Self::Payload>,
        out_edges: &mut dyn Iterator<Item = OutEdge>,
    );
}

/// Generic simulation object: identity plus the model that reacts to events.
#[derive(Debug, Clone)]
pub struct BaseSimObject<M> {
    info: SimObjectInfo,
    check_policy: CheckPolicy,
    model: M,
}

impl<M: SimModel> BaseSimObject<M> {
    pub fn new(id: ObjectId, num_outputs: usize, num_inputs: usize, model: M) -> Self {
        Self {
            info: SimObjectInfo {
                id,
                num_outputs,
                num_inputs,
            },
            check_policy: CheckPolicy::default(),
            model,
        }
    }

    pub fn info(&self) -> &SimObjectInfo {
        &self.info
    }

    pub fn id(&self) -> ObjectId {
        self.info.id
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn check_policy(&self) -> CheckPolicy {
        self.check_policy
    }

    pub fn set_check_policy(&mut self, policy: CheckPolicy) {
        self.check_policy = policy;
    }

    /// Verify that `event` is addressed to this object
    pub fn check_receiver(&self, event: &Event<M::Payload>) -> Result<(), SimError> {
        if !self.check_policy.is_active() || event.receiver() == self.info.id {
            return Ok(());
        }
        error!(
            "[{}] rejected event at t={} from {} addressed to {}",
            self.info.id,
            event.timestamp(),
            event.sender(),
            event.receiver()
        );
        Err(SimError::MisroutedEvent {
            timestamp: event.timestamp(),
            receiver: event.receiver(),
            object: self.info.id,
        })
    }

    /// Execute `event` with an explicit routing strategy
    pub fn exec_event_with<G: DependencyGraph>(
        &mut self,
        event: &Event<M::Payload>,
        graph: &G,
        node: NodeId,
        sink: &mut dyn SendWrapper<M::Payload>,
    ) -> Result<(), SimError> {
        self.check_receiver(event)?;

        let mut edges = graph.out_edges(node)?;
        trace!("[{}] executing event at t={} from {}", self.info.id, event.timestamp(), event.sender());
        self.model
            .run_model_logic(&self.info, event, sink, &mut edges);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::AdjacencyGraph;
    use crate::core::send_wrapper::SendToList;

    /// Forwards the incoming payload along every outgoing edge
    struct Broadcast;

    impl SimModel for Broadcast {
        type Payload = u32;

        fn run_model_logic(
            &mut self,
            info: &SimObjectInfo,
            event: &Event<u32>,
            sink: &mut dyn SendWrapper<u32>,
            out_edges: &mut dyn Iterator<Item = OutEdge>,
        ) {
            for edge in out_edges {
                let dst = ObjectId(edge.dst.index());
                sink.send(dst, Event::new(event.timestamp() + 1, info.id, dst, *event.payload()));
            }
        }
    }

    fn fan_out() -> AdjacencyGraph {
        let mut graph = AdjacencyGraph::new(3);
        graph.add_edge(NodeId(0), NodeId(1)).unwrap();
        graph.add_edge(NodeId(0), NodeId(2)).unwrap();
        graph
    }

    #[test]
    fn test_exec_event_with_visits_every_edge() {
        let graph = fan_out();
        let mut object = BaseSimObject::new(ObjectId(0), 2, 0, Broadcast);
        let mut out: Vec<Event<u32>> = Vec::new();
        let event = Event::new(0, ObjectId(0), ObjectId(0), 42);

        object
            .exec_event_with(&event, &graph, NodeId(0), &mut SendToList::new(&mut out))
            .unwrap();

        let receivers: Vec<ObjectId> = out.iter().map(|e| e.receiver()).collect();
        assert_eq!(receivers, vec![ObjectId(1), ObjectId(2)]);
        assert!(out.iter().all(|e| e.timestamp() == 1 && *e.payload() == 42));
    }

    #[test]
    fn test_unknown_node_propagates() {
        let graph = fan_out();
        let mut object = BaseSimObject::new(ObjectId(0), 2, 0, Broadcast);
        let mut out: Vec<Event<u32>> = Vec::new();
        let event = Event::new(0, ObjectId(0), ObjectId(0), 1);

        let result = object.exec_event_with(&event, &graph, NodeId(8), &mut SendToList::new(&mut out));
        assert_eq!(result, Err(SimError::UnknownNode(NodeId(8))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_misrouted_event_rejected() {
        let object = BaseSimObject::new(ObjectId(0), 2, 0, Broadcast);
        let event = Event::new(3, ObjectId(1), ObjectId(2), 0);
        assert_eq!(
            object.check_receiver(&event),
            Err(SimError::MisroutedEvent {
                timestamp: 3,
                receiver: ObjectId(2),
                object: ObjectId(0),
            })
        );
    }
}
