use crate::core::error::SimError;
use crate::core::event::Event;
use crate::core::execution::config::{ConcurrencyMode, SchedulingDiscipline, SimulationConfig};
use crate::core::execution::event_scheduler::EventScheduler;
use crate::core::graph::DependencyGraph;
use crate::core::ordered_sim_object::OrderedSimObject;
use crate::core::send_wrapper::ImmediateDelivery;
use crate::core::sim_object::SimModel;
use crate::core::types::{NodeId, ObjectId, Timestamp};
use log::{debug, info, trace};
use rayon::prelude::*;
use std::collections::HashMap;

/// Observer trait for simulation progress
pub trait SimulationObserver {
    /// Called when simulation time advances
    fn on_time_advance(&mut self, old_time: Timestamp, new_time: Timestamp);

    /// Called when a simulation step completes
    fn on_step_complete(&mut self, time: Timestamp, events_processed: usize);
}

/// Outcome of [`SimulationEngine::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub final_time: Timestamp,
    pub events_processed: u64,
    pub steps: u64,
}

/// Drives a set of ordered simulation objects over a dependency graph.
///
/// Each step removes every pending event with the earliest timestamp, executes
/// them on their receivers and then schedules what they produced.
pub struct SimulationEngine<M: SimModel, G> {
    graph: G,
    objects: Vec<OrderedSimObject<M>>,
    nodes: Vec<NodeId>,
    index: HashMap<ObjectId, usize>,
    scheduler: EventScheduler<M::Payload>,
    config: SimulationConfig,
    pool: Option<rayon::ThreadPool>,
    current_time: Timestamp,
    events_processed: u64,
    steps: u64,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl<M, G> SimulationEngine<M, G>
where
    M: SimModel + Send,
    M::Payload: Send + Sync,
    G: DependencyGraph + Sync,
{
    /// Create an engine, binding every object to its graph node
    ///
    /// Objects are stored in id order. Every object's check policy is replaced
    /// by `config.check_policy`.
    pub fn new(
        graph: G,
        mut objects: Vec<OrderedSimObject<M>>,
        config: SimulationConfig,
    ) -> Result<Self, SimError> {
        // Buffers are merged in position order, so positions follow ids
        objects.sort_by_key(|object| object.id());
        let mut nodes = Vec::with_capacity(objects.len());
        let mut index = HashMap::with_capacity(objects.len());

        for (position, object) in objects.iter_mut().enumerate() {
            let id = object.id();
            let node = graph.node_of(id)?;
            if index.insert(id, position).is_some() {
                return Err(SimError::DuplicateObject(id));
            }

            if config.verify_degrees {
                let info = object.info();
                let graph_outputs = graph.out_degree(node)?;
                let graph_inputs = graph.in_degree(node)?;
                if info.num_outputs != graph_outputs || info.num_inputs != graph_inputs {
                    return Err(SimError::DegreeMismatch {
                        object: id,
                        declared_outputs: info.num_outputs,
                        declared_inputs: info.num_inputs,
                        graph_outputs,
                        graph_inputs,
                    });
                }
            }

            object.base_mut().set_check_policy(config.check_policy);
            nodes.push(node);
        }

        let pool = match (config.concurrency_mode, config.thread_pool_size) {
            (ConcurrencyMode::Rayon, Some(size)) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(size)
                    .build()
                    .map_err(|e| SimError::ThreadPool(e.to_string()))?,
            ),
            _ => None,
        };

        info!(
            "Simulation engine ready: {} objects, {:?} discipline, {:?} execution",
            objects.len(),
            config.discipline,
            config.concurrency_mode
        );

        Ok(Self {
            graph,
            objects,
            nodes,
            index,
            scheduler: EventScheduler::new(),
            config,
            pool,
            current_time: 0,
            events_processed: 0,
            steps: 0,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Schedule an event to start the simulation
    pub fn schedule_initial(&mut self, event: Event<M::Payload>) -> Result<(), SimError> {
        Self::admit(&self.index, self.current_time, &event)?;
        self.scheduler.schedule(event);
        Ok(())
    }

    /// Run until no events remain or the next event lies beyond `max_time`
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        while self.has_pending_events() {
            if self.step()? == 0 {
                break;
            }
        }
        Ok(RunSummary {
            final_time: self.current_time,
            events_processed: self.events_processed,
            steps: self.steps,
        })
    }

    /// Process every event of the next timestamp, returning how many were executed
    ///
    /// An `Err` aborts the simulation: the failing batch is already removed from
    /// the queue and the clock already advanced, so the engine must not be
    /// stepped again.
    pub fn step(&mut self) -> Result<usize, SimError> {
        let Some(next_time) = self.scheduler.peek_next_time() else {
            return Ok(0);
        };
        if self.config.max_time.is_some_and(|max| next_time > max) {
            debug!("Next event at t={} is beyond max time, stopping", next_time);
            return Ok(0);
        }

        let batch = self.scheduler.pop_next_batch();
        if let Some(early) = batch.iter().find(|e| e.timestamp() < self.current_time) {
            return Err(SimError::CausalityViolation {
                sender: early.sender(),
                timestamp: early.timestamp(),
                now: self.current_time,
            });
        }

        let old_time = self.current_time;
        self.current_time = next_time;
        if old_time != self.current_time {
            self.notify_time_advance(old_time, self.current_time);
        }

        debug!("=== Simulation Time {} ({} events) ===", self.current_time, batch.len());

        let count = batch.len();
        match self.config.discipline {
            SchedulingDiscipline::Ordered => self.step_ordered(batch)?,
            SchedulingDiscipline::Immediate => self.step_immediate(batch)?,
        }

        self.events_processed += count as u64;
        self.steps += 1;
        self.notify_step_complete(self.current_time, count);

        Ok(count)
    }

    /// Execute a batch with per-object buffers, then sort and schedule the output
    fn step_ordered(&mut self, batch: Vec<Event<M::Payload>>) -> Result<(), SimError> {
        let mut work: Vec<Vec<Event<M::Payload>>> = (0..self.objects.len()).map(|_| Vec::new()).collect();
        for event in batch {
            let position = self.position_of(event.receiver())?;
            work[position].push(event);
        }

        let graph = &self.graph;
        let nodes = &self.nodes;
        let objects = &mut self.objects;

        let buffers: Vec<Vec<Event<M::Payload>>> = match self.config.concurrency_mode {
            ConcurrencyMode::Sequential => objects
                .iter_mut()
                .zip(nodes.iter())
                .zip(work)
                .filter(|(_, events)| !events.is_empty())
                .map(|((object, node), events)| Self::execute_all(object, graph, *node, &events))
                .collect::<Result<Vec<_>, SimError>>()?,
            ConcurrencyMode::Rayon => {
                let run = || {
                    objects
                        .par_iter_mut()
                        .zip(nodes.par_iter())
                        .zip(work.into_par_iter())
                        .filter(|(_, events)| !events.is_empty())
                        .map(|((object, node), events)| Self::execute_all(object, graph, *node, &events))
                        .collect::<Result<Vec<_>, _>>()
                };
                match &self.pool {
                    Some(pool) => pool.install(run)?,
                    None => run()?,
                }
            }
        };

        let mut new_events: Vec<Event<M::Payload>> = buffers.into_iter().flatten().collect();
        for event in &new_events {
            Self::admit(&self.index, self.current_time, event)?;
        }

        new_events.sort_by_key(|e| e.order_key());
        trace!("Scheduling {} new events", new_events.len());
        self.scheduler.schedule_all(new_events);
        Ok(())
    }

    /// Execute one object's share of a batch into a fresh buffer
    fn execute_all(
        object: &mut OrderedSimObject<M>,
        graph: &G,
        node: NodeId,
        events: &[Event<M::Payload>],
    ) -> Result<Vec<Event<M::Payload>>, SimError> {
        let mut buffer = Vec::new();
        for event in events {
            object.exec_event(event, graph, node, &mut buffer)?;
        }
        Ok(buffer)
    }

    /// Execute a batch in queue order, delivering each produced event at once
    fn step_immediate(&mut self, batch: Vec<Event<M::Payload>>) -> Result<(), SimError> {
        // Receivers are checked up front so a bad event cannot leave half a batch applied
        let positions = batch
            .iter()
            .map(|event| self.position_of(event.receiver()))
            .collect::<Result<Vec<_>, _>>()?;

        let now = self.current_time;
        let index = &self.index;
        let admit = |event: &Event<M::Payload>| Self::admit(index, now, event);

        for (event, position) in batch.iter().zip(positions) {
            let node = self.nodes[position];
            let mut delivery = ImmediateDelivery::new(&mut self.scheduler, &admit);
            self.objects[position]
                .base_mut()
                .exec_event_with(event, &self.graph, node, &mut delivery)?;
            delivery.finish()?;
        }
        Ok(())
    }

    /// Check that an event may enter the queue at time `now`
    fn admit(
        index: &HashMap<ObjectId, usize>,
        now: Timestamp,
        event: &Event<M::Payload>,
    ) -> Result<(), SimError> {
        if !index.contains_key(&event.receiver()) {
            return Err(SimError::UnknownObject(event.receiver()));
        }
        if event.timestamp() < now {
            return Err(SimError::CausalityViolation {
                sender: event.sender(),
                timestamp: event.timestamp(),
                now,
            });
        }
        Ok(())
    }

    fn position_of(&self, id: ObjectId) -> Result<usize, SimError> {
        self.index.get(&id).copied().ok_or(SimError::UnknownObject(id))
    }

    /// Notify all observers of a time advance
    fn notify_time_advance(&mut self, old_time: Timestamp, new_time: Timestamp) {
        for observer in &mut self.observers {
            observer.on_time_advance(old_time, new_time);
        }
    }

    /// Notify all observers of step completion
    fn notify_step_complete(&mut self, time: Timestamp, events_processed: usize) {
        for observer in &mut self.observers {
            observer.on_step_complete(time, events_processed);
        }
    }

    /// Get current simulation time
    pub fn current_time(&self) -> Timestamp {
        self.current_time
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Check if there are pending events in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.has_events()
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    pub fn object(&self, id: ObjectId) -> Option<&OrderedSimObject<M>> {
        self.index.get(&id).map(|&position| &self.objects[position])
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
