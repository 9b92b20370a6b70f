use super::error::SimError;
use super::types::{NodeId, ObjectId};

/// A directed edge leaving a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutEdge {
    pub src: NodeId,
    pub dst: NodeId,
}

/// Static communication structure between simulation objects.
///
/// Every call to [`DependencyGraph::out_edges`] must hand out a fresh cursor
/// starting at the first edge. Implementations never share iteration state
/// between calls.
pub trait DependencyGraph {
    type Edges<'a>: Iterator<Item = OutEdge> + Clone
    where
        Self: 'a;

    fn node_count(&self) -> usize;

    /// Outgoing edges of `node`, from the start
    fn out_edges(&self, node: NodeId) -> Result<Self::Edges<'_>, SimError>;

    fn out_degree(&self, node: NodeId) -> Result<usize, SimError>;

    fn in_degree(&self, node: NodeId) -> Result<usize, SimError>;

    /// Simulation object living on `node`
    fn object_of(&self, node: NodeId) -> Result<ObjectId, SimError>;

    /// Graph node hosting `object`
    fn node_of(&self, object: ObjectId) -> Result<NodeId, SimError>;
}

/// Adjacency-list graph with one node per simulation object.
///
/// Node `i` hosts object `i`.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    out_edges: Vec<Vec<NodeId>>,
    in_degrees: Vec<usize>,
}

impl AdjacencyGraph {
    /// Create a graph with `node_count` nodes and no edges
    pub fn new(node_count: usize) -> Self {
        Self {
            out_edges: vec![Vec::new(); node_count],
            in_degrees: vec![0; node_count],
        }
    }

    /// Add a directed edge; parallel edges are kept
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId) -> Result<(), SimError> {
        self.check(src)?;
        self.check(dst)?;
        self.out_edges[src.index()].push(dst);
        self.in_degrees[dst.index()] += 1;
        Ok(())
    }

    fn check(&self, node: NodeId) -> Result<(), SimError> {
        if node.index() < self.out_edges.len() {
            Ok(())
        } else {
            Err(SimError::UnknownNode(node))
        }
    }
}

/// Begin/end cursor pair over one node's outgoing edges
#[derive(Debug, Clone)]
pub struct OutEdges<'a> {
    src: NodeId,
    targets: &'a [NodeId],
    begin: usize,
    end: usize,
}

impl<'a> Iterator for OutEdges<'a> {
    type Item = OutEdge;

    fn next(&mut self) -> Option<OutEdge> {
        if self.begin == self.end {
            return None;
        }
        let dst = self.targets[self.begin];
        self.begin += 1;
        Some(OutEdge { src: self.src, dst })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.begin;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for OutEdges<'_> {}

impl DependencyGraph for AdjacencyGraph {
    type Edges<'a> = OutEdges<'a>;

    fn node_count(&self) -> usize {
        self.out_edges.len()
    }

    fn out_edges(&self, node: NodeId) -> Result<OutEdges<'_>, SimError> {
        self.check(node)?;
        let targets = self.out_edges[node.index()].as_slice();
        Ok(OutEdges {
            src: node,
            targets,
            begin: 0,
            end: targets.len(),
        })
    }

    fn out_degree(&self, node: NodeId) -> Result<usize, SimError> {
        self.check(node)?;
        Ok(self.out_edges[node.index()].len())
    }

    fn in_degree(&self, node: NodeId) -> Result<usize, SimError> {
        self.check(node)?;
        Ok(self.in_degrees[node.index()])
    }

    fn object_of(&self, node: NodeId) -> Result<ObjectId, SimError> {
        self.check(node)?;
        Ok(ObjectId(node.index()))
    }

    fn node_of(&self, object: ObjectId) -> Result<NodeId, SimError> {
        let node = NodeId(object.index());
        self.check(node)?;
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> AdjacencyGraph {
        let mut graph = AdjacencyGraph::new(4);
        graph.add_edge(NodeId(0), NodeId(1)).unwrap();
        graph.add_edge(NodeId(0), NodeId(2)).unwrap();
        graph.add_edge(NodeId(1), NodeId(3)).unwrap();
        graph.add_edge(NodeId(2), NodeId(3)).unwrap();
        graph
    }

    #[test]
    fn test_degrees() {
        let graph = diamond();
        assert_eq!(graph.out_degree(NodeId(0)).unwrap(), 2);
        assert_eq!(graph.in_degree(NodeId(0)).unwrap(), 0);
        assert_eq!(graph.in_degree(NodeId(3)).unwrap(), 2);
        assert_eq!(graph.out_degree(NodeId(3)).unwrap(), 0);
    }

    #[test]
    fn test_out_edges_restart_on_each_call() {
        let graph = diamond();
        let mut first = graph.out_edges(NodeId(0)).unwrap();
        assert_eq!(first.next().map(|e| e.dst), Some(NodeId(1)));

        // A second cursor is independent of how far the first one got
        let second: Vec<NodeId> = graph.out_edges(NodeId(0)).unwrap().map(|e| e.dst).collect();
        assert_eq!(second, vec![NodeId(1), NodeId(2)]);
        assert_eq!(first.next().map(|e| e.dst), Some(NodeId(2)));
        assert_eq!(first.next(), None);
    }

    #[test]
    fn test_unknown_node() {
        let mut graph = diamond();
        assert_eq!(graph.out_edges(NodeId(9)).unwrap_err(), SimError::UnknownNode(NodeId(9)));
        assert!(graph.add_edge(NodeId(0), NodeId(4)).is_err());
        assert!(graph.node_of(ObjectId(4)).is_err());
    }

    #[test]
    fn test_object_node_mapping() {
        let graph = diamond();
        assert_eq!(graph.node_of(ObjectId(2)).unwrap(), NodeId(2));
        assert_eq!(graph.object_of(NodeId(3)).unwrap(), ObjectId(3));
    }
}
