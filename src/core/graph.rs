//! Word graph: first-order transition counts between word tokens and
//! the frozen sampling tables used for weighted random walks.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("cannot build a word graph from an empty corpus")]
    EmptyCorpus,
    #[error("graph must be frozen before sampling")]
    Unfrozen,
    #[error("vertex {0:?} does not belong to this graph")]
    UnknownVertex(VertexId),
}

/// Stable handle for a vertex owned by a [`WordGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(u32);

impl VertexId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Outcome of [`WordGraph::get_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The token already had a vertex.
    Found(VertexId),
    /// A fresh vertex with no edges was registered for the token.
    Created(VertexId),
}

impl Lookup {
    pub fn id(self) -> VertexId {
        match self {
            Lookup::Found(id) | Lookup::Created(id) => id,
        }
    }

    pub fn was_created(self) -> bool {
        matches!(self, Lookup::Created(_))
    }
}

/// Result of one step of a random walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextWord {
    Next(VertexId),
    /// The vertex never had a successor in the corpus.
    DeadEnd,
}

/// Parallel (neighbor, weight) sequences materialized by [`WordGraph::freeze`].
#[derive(Debug, Clone, Default)]
pub struct SamplingTable {
    neighbors: Vec<VertexId>,
    weights: Vec<u32>,
    index: Option<WeightedIndex<u32>>,
}

impl SamplingTable {
    fn from_outgoing(outgoing: &FxHashMap<VertexId, u32>) -> Self {
        let mut pairs: Vec<(VertexId, u32)> = outgoing.iter().map(|(id, w)| (*id, *w)).collect();
        pairs.sort_unstable_by_key(|(id, _)| *id);

        let (neighbors, weights): (Vec<VertexId>, Vec<u32>) = pairs.into_iter().unzip();
        // Weights are transition counts, so every entry is >= 1 and this only
        // fails for an empty table.
        let index = WeightedIndex::new(&weights).ok();

        Self {
            neighbors,
            weights,
            index,
        }
    }

    pub fn neighbors(&self) -> &[VertexId] {
        &self.neighbors
    }

    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

/// A distinct token and its outgoing transition counts.
#[derive(Debug, Clone)]
pub struct Vertex {
    token: String,
    outgoing: FxHashMap<VertexId, u32>,
    table: SamplingTable,
}

impl Vertex {
    fn new(token: String) -> Self {
        Self {
            token,
            outgoing: FxHashMap::default(),
            table: SamplingTable::default(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn outgoing(&self) -> &FxHashMap<VertexId, u32> {
        &self.outgoing
    }

    /// The table built at the last freeze. Stale if the graph was mutated since.
    pub fn sampling_table(&self) -> &SamplingTable {
        &self.table
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn total_weight(&self) -> u64 {
        self.outgoing.values().map(|w| u64::from(*w)).sum()
    }
}

/// Directed weighted graph keyed by distinct word tokens.
///
/// Vertices live in an arena and are addressed by [`VertexId`]; the token
/// index maps each distinct token to its single vertex. Edge weights only
/// ever grow. Sampling requires a [`freeze`](WordGraph::freeze) after the
/// last mutation.
#[derive(Debug, Clone, Default)]
pub struct WordGraph {
    vertices: Vec<Vertex>,
    index: FxHashMap<String, VertexId>,
    frozen: bool,
}

impl WordGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and freeze a graph from an ordered token sequence.
    ///
    /// Every consecutive pair `(previous, current)` contributes one unit of
    /// weight to the edge `previous -> current`.
    pub fn build<S: AsRef<str>>(tokens: &[S]) -> Result<WordGraph, GraphError> {
        if tokens.is_empty() {
            return Err(GraphError::EmptyCorpus);
        }

        let mut graph = WordGraph::new();
        let mut previous: Option<VertexId> = None;
        for token in tokens {
            let current = graph.get_or_create(token.as_ref()).id();
            if let Some(prev) = previous {
                graph.record_transition(prev, current)?;
            }
            previous = Some(current);
        }
        graph.freeze();

        debug!(
            tokens = tokens.len(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "built word graph"
        );
        Ok(graph)
    }

    /// Return the vertex for `token`, registering an empty one if absent.
    pub fn get_or_create(&mut self, token: &str) -> Lookup {
        if let Some(id) = self.index.get(token) {
            return Lookup::Found(*id);
        }

        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex::new(token.to_string()));
        self.index.insert(token.to_string(), id);
        self.frozen = false;
        Lookup::Created(id)
    }

    /// Look up a token without creating anything.
    pub fn get(&self, token: &str) -> Option<VertexId> {
        self.index.get(token).copied()
    }

    /// Add one observation of `from -> to`.
    pub fn record_transition(&mut self, from: VertexId, to: VertexId) -> Result<(), GraphError> {
        self.add_weight(from, to, 1)
    }

    fn add_weight(&mut self, from: VertexId, to: VertexId, weight: u32) -> Result<(), GraphError> {
        if to.index() >= self.vertices.len() {
            return Err(GraphError::UnknownVertex(to));
        }
        let vertex = self
            .vertices
            .get_mut(from.index())
            .ok_or(GraphError::UnknownVertex(from))?;
        *vertex.outgoing.entry(to).or_insert(0) += weight;
        self.frozen = false;
        Ok(())
    }

    /// Materialize every vertex's sampling table from its current edges.
    ///
    /// Safe to call again after further mutation; tables are rebuilt from
    /// scratch each time.
    pub fn freeze(&mut self) {
        for vertex in &mut self.vertices {
            vertex.table = SamplingTable::from_outgoing(&vertex.outgoing);
        }
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Draw a successor of `vertex` with probability proportional to edge weight.
    pub fn sample_next<R: Rng + ?Sized>(
        &self,
        vertex: VertexId,
        rng: &mut R,
    ) -> Result<NextWord, GraphError> {
        if !self.frozen {
            return Err(GraphError::Unfrozen);
        }
        let table = &self.vertex(vertex).ok_or(GraphError::UnknownVertex(vertex))?.table;
        match &table.index {
            Some(dist) => Ok(NextWord::Next(table.neighbors[dist.sample(rng)])),
            None => Ok(NextWord::DeadEnd),
        }
    }

    /// Fold another graph's transition counts into this one, matching by token.
    ///
    /// Summing is order-independent, so merging partial graphs in any order
    /// yields the same weights. The result is left unfrozen.
    pub fn merge(&mut self, other: &WordGraph) -> Result<(), GraphError> {
        let mapped: Vec<VertexId> = other
            .vertices
            .iter()
            .map(|v| self.get_or_create(&v.token).id())
            .collect();

        for (from, vertex) in mapped.iter().zip(&other.vertices) {
            let mut edges: Vec<(VertexId, u32)> =
                vertex.outgoing.iter().map(|(to, w)| (*to, *w)).collect();
            edges.sort_unstable_by_key(|(to, _)| *to);
            for (to, weight) in edges {
                self.add_weight(*from, mapped[to.index()], weight)?;
            }
        }
        self.frozen = false;
        Ok(())
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    pub fn token(&self, id: VertexId) -> Option<&str> {
        self.vertex(id).map(Vertex::token)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i as u32), v))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.vertices.iter().map(Vertex::out_degree).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Weight of `from -> to` by token, zero if either token or the edge is missing.
    pub fn edge_weight(&self, from: &str, to: &str) -> u32 {
        match (self.get(from), self.get(to)) {
            (Some(f), Some(t)) => self.vertices[f.index()]
                .outgoing
                .get(&t)
                .copied()
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// All edges as `(from, to, weight)`, ordered by vertex creation then target.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, u32)> + '_ {
        self.vertices.iter().flat_map(move |vertex| {
            let mut targets: Vec<(VertexId, u32)> =
                vertex.outgoing.iter().map(|(to, w)| (*to, *w)).collect();
            targets.sort_unstable_by_key(|(to, _)| *to);
            targets.into_iter().map(move |(to, weight)| {
                (
                    vertex.token.as_str(),
                    self.vertices[to.index()].token.as_str(),
                    weight,
                )
            })
        })
    }
}
