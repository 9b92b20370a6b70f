use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rsim_ordered::core::execution::config::ConcurrencyMode;
use rsim_ordered::{
    AdjacencyGraph, Event, NodeId, ObjectId, OrderedSimObject, OutEdge, SendWrapper, SimError,
    SimModel, SimObjectInfo, SimulationConfig, SimulationEngine, Timestamp,
};
use std::time::Instant;

const RING_SIZE: usize = 64;
const TOKENS: usize = 16;
const HOPS: u32 = 500;

/// Token station: forwards each token to its successor after a random delay
struct Station {
    rng: StdRng,
    tokens_seen: u64,
}

impl SimModel for Station {
    type Payload = u32;

    fn run_model_logic(
        &mut self,
        info: &SimObjectInfo,
        event: &Event<u32>,
        sink: &mut dyn SendWrapper<u32>,
        out_edges: &mut dyn Iterator<Item = OutEdge>,
    ) {
        self.tokens_seen += 1;
        let hops_left = *event.payload();
        if hops_left == 0 {
            return;
        }
        for edge in out_edges {
            let dst = ObjectId(edge.dst.index());
            let delay: Timestamp = self.rng.gen_range(1..=5);
            sink.send(dst, Event::new(event.timestamp() + delay, info.id, dst, hops_left - 1));
        }
    }
}

fn build_ring() -> Result<(AdjacencyGraph, Vec<OrderedSimObject<Station>>), SimError> {
    let mut graph = AdjacencyGraph::new(RING_SIZE);
    for i in 0..RING_SIZE {
        graph.add_edge(NodeId(i), NodeId((i + 1) % RING_SIZE))?;
    }
    let objects = (0..RING_SIZE)
        .map(|i| {
            let station = Station {
                rng: StdRng::seed_from_u64(i as u64),
                tokens_seen: 0,
            };
            OrderedSimObject::new(ObjectId(i), 1, 1, station)
        })
        .collect();
    Ok((graph, objects))
}

fn run(mode: ConcurrencyMode) -> Result<(), SimError> {
    let (graph, objects) = build_ring()?;
    let config = SimulationConfig::new().with_concurrency(mode);
    let mut engine = SimulationEngine::new(graph, objects, config)?;

    for token in 0..TOKENS {
        let station = ObjectId(token * RING_SIZE / TOKENS);
        engine.schedule_initial(Event::new(0, station, station, HOPS))?;
    }

    let start = Instant::now();
    let summary = engine.run()?;
    let busiest = (0..RING_SIZE)
        .filter_map(|i| engine.object(ObjectId(i)))
        .map(|object| object.model().tokens_seen)
        .max()
        .unwrap_or(0);

    info!(
        "{:?}: {} events in {} steps, final time {}, busiest station saw {} tokens ({:?})",
        mode,
        summary.events_processed,
        summary.steps,
        summary.final_time,
        busiest,
        start.elapsed()
    );
    Ok(())
}

fn main() -> Result<(), SimError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(ConcurrencyMode::Sequential)?;
    run(ConcurrencyMode::Rayon)?;
    Ok(())
}
