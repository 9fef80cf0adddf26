// The move graph is computed by the server for the current position: nodes are squares, edges
// are legal moves. The client never validates moves on its own, it only looks edges up.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coord::Coord;


#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveGraph {
    // Keys are start squares. Squares without moves may be present with an empty list.
    edges: BTreeMap<Coord, Vec<Coord>>,
}

impl MoveGraph {
    pub fn new() -> Self { MoveGraph::default() }

    pub fn from_edges(edges: impl IntoIterator<Item = (Coord, Coord)>) -> Self {
        let mut graph = MoveGraph::new();
        for (from, to) in edges {
            let destinations = graph.edges.entry(from).or_default();
            if !destinations.contains(&to) {
                destinations.push(to);
            }
        }
        graph
    }

    pub fn destinations(&self, start: Coord) -> &[Coord] {
        self.edges.get(&start).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, start: Coord, end: Coord) -> bool {
        self.destinations(start).contains(&end)
    }

    pub fn has_moves_from(&self, start: Coord) -> bool { !self.destinations(start).is_empty() }

    pub fn sources(&self) -> impl Iterator<Item = Coord> + '_ {
        self.edges.iter().filter(|(_, to)| !to.is_empty()).map(|(&from, _)| from)
    }

    pub fn num_moves(&self) -> usize { self.edges.values().map(Vec::len).sum() }

    pub fn is_empty(&self) -> bool { self.num_moves() == 0 }
}
