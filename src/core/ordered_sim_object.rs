use super::error::SimError;
use super::event::Event;
use super::execution::config::CheckPolicy;
use super::graph::DependencyGraph;
use super::send_wrapper::SendToList;
use super::sim_object::{BaseSimObject, SimModel, SimObjectInfo};
use super::types::{NodeId, ObjectId};

/// Simulation object for the ordered discipline.
///
/// Events produced while executing an event are appended to a buffer owned by
/// the caller instead of being delivered. The scheduler sorts the collected
/// events and merges them into the global order once the whole time step has
/// been executed.
#[derive(Debug, Clone)]
pub struct OrderedSimObject<M> {
    base: BaseSimObject<M>,
}

impl<M: SimModel> OrderedSimObject<M> {
    pub fn new(id: ObjectId, num_outputs: usize, num_inputs: usize, model: M) -> Self {
        Self {
            base: BaseSimObject::new(id, num_outputs, num_inputs, model),
        }
    }

    /// Set the receiver check policy for standalone use.
    ///
    /// `SimulationEngine::new` overwrites it with the engine's configured policy.
    pub fn with_check_policy(mut self, policy: CheckPolicy) -> Self {
        self.base.set_check_policy(policy);
        self
    }

    pub fn id(&self) -> ObjectId {
        self.base.id()
    }

    pub fn info(&self) -> &SimObjectInfo {
        self.base.info()
    }

    pub fn model(&self) -> &M {
        self.base.model()
    }

    pub fn base(&self) -> &BaseSimObject<M> {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut BaseSimObject<M> {
        &mut self.base
    }

    /// Execute `event` on `node` of `graph`, appending produced events to `new_events`.
    ///
    /// `event` must be addressed to this object. `node` is trusted to be the node
    /// hosting this object. `new_events` only ever grows; its prior content is
    /// left untouched and never read.
    pub fn exec_event<G, C>(
        &mut self,
        event: &Event<M::Payload>,
        graph: &G,
        node: NodeId,
        new_events: &mut C,
    ) -> Result<(), SimError>
    where
        G: DependencyGraph,
        C: Extend<Event<M::Payload>>,
    {
        let mut add_list = SendToList::<C, M::Payload>::new(new_events);
        self.base.exec_event_with(event, graph, node, &mut add_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::{AdjacencyGraph, OutEdge};
    use crate::core::send_wrapper::SendWrapper;

    /// Emits one event per outgoing edge, counting how many edges it saw
    #[derive(Default)]
    struct EdgeCounter {
        seen: Vec<usize>,
    }

    impl SimModel for EdgeCounter {
        type Payload = ();

        fn run_model_logic(
            &mut self,
            info: &SimObjectInfo,
            event: &Event<()>,
            sink: &mut dyn SendWrapper<()>,
            out_edges: &mut dyn Iterator<Item = OutEdge>,
        ) {
            let mut count = 0;
            for edge in out_edges {
                count += 1;
                let dst = ObjectId(edge.dst.index());
                sink.send(dst, Event::new(event.timestamp() + 1, info.id, dst, ()));
                // Stop partway on the first call
                if self.seen.is_empty() {
                    break;
                }
            }
            self.seen.push(count);
        }
    }

    #[test]
    fn test_each_call_restarts_edge_traversal() {
        let mut graph = AdjacencyGraph::new(4);
        for dst in 1..4 {
            graph.add_edge(NodeId(0), NodeId(dst)).unwrap();
        }
        let mut object = OrderedSimObject::new(ObjectId(0), 3, 0, EdgeCounter::default());
        let event = Event::new(0, ObjectId(1), ObjectId(0), ());

        let mut first: Vec<Event<()>> = Vec::new();
        object.exec_event(&event, &graph, NodeId(0), &mut first).unwrap();
        let mut second: Vec<Event<()>> = Vec::new();
        object.exec_event(&event, &graph, NodeId(0), &mut second).unwrap();

        assert_eq!(object.model().seen, vec![1, 3]);
        assert_eq!(first.len(), 1);
        let receivers: Vec<ObjectId> = second.iter().map(|e| e.receiver()).collect();
        assert_eq!(receivers, vec![ObjectId(1), ObjectId(2), ObjectId(3)]);
    }

    #[test]
    fn test_debug_only_policy_follows_build() {
        let graph = AdjacencyGraph::new(2);
        let mut object = OrderedSimObject::new(ObjectId(0), 0, 0, EdgeCounter::default())
            .with_check_policy(CheckPolicy::DebugOnly);
        let stray = Event::new(0, ObjectId(1), ObjectId(1), ());
        let mut out: Vec<Event<()>> = Vec::new();

        let result = object.exec_event(&stray, &graph, NodeId(0), &mut out);
        assert_eq!(result.is_err(), cfg!(debug_assertions));
        assert!(out.is_empty());
    }
}
