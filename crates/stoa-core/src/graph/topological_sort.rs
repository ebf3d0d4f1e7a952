// Copyright 2025 stoa contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A stable variant of Kahn's algorithm for topological sorting.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::hash::Hash;

/// An error indicating that a cycle was detected in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError<T> {
    /// The nodes left unordered when resolution stalled: every member of
    /// every cycle, plus any node downstream of one.
    pub remaining: Vec<T>,
}

/// Performs a deterministic topological sort on a directed graph.
///
/// The graph is defined by a collection of nodes and a set of directed edges
/// `(dependency, dependent)`: the dependency must appear before the
/// dependent in the result.
///
/// Determinism: among the nodes whose dependencies are all satisfied, the
/// one given earliest in `nodes` is emitted first. Nodes with no ordering
/// constraint between them therefore keep their declaration order, and the
/// result is reproducible across runs.
///
/// Edges mentioning a node not present in `nodes` are ignored; callers that
/// need to report unknown endpoints check them beforehand.
///
/// # Returns
///
/// * `Ok(Vec<T>)`: the nodes in stable topological order.
/// * `Err(CycleError)`: the graph contains one or more cycles; the error
///   carries the nodes that could not be ordered, in declaration order.
pub fn stable_topological_sort<T>(
    nodes: impl IntoIterator<Item = T>,
    edges: impl IntoIterator<Item = (T, T)>,
) -> Result<Vec<T>, CycleError<T>>
where
    T: Copy + Eq + Hash,
{
    let node_list: Vec<T> = nodes.into_iter().collect();
    if node_list.is_empty() {
        return Ok(Vec::new());
    }

    let position: HashMap<T, usize> = node_list
        .iter()
        .enumerate()
        .map(|(index, node)| (*node, index))
        .collect();

    // 1. Build adjacency and in-degree tables over declaration positions.
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); node_list.len()];
    let mut in_degree: Vec<usize> = vec![0; node_list.len()];
    for (dependency, dependent) in edges {
        let (Some(&from), Some(&to)) = (position.get(&dependency), position.get(&dependent))
        else {
            continue;
        };
        adjacency[from].push(to);
        in_degree[to] += 1;
    }

    // 2. Seed the ready set with every root. A min-heap over positions
    //    keeps emission in declaration order among ready nodes.
    let mut ready: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    for (index, &degree) in in_degree.iter().enumerate() {
        if degree == 0 {
            ready.push(Reverse(index));
        }
    }

    // 3. Emit the earliest-declared ready node until none remain.
    let mut sorted = Vec::with_capacity(node_list.len());
    while let Some(Reverse(index)) = ready.pop() {
        sorted.push(node_list[index]);
        for &dependent in &adjacency[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    // 4. Anything not emitted sits on or behind a cycle.
    if sorted.len() != node_list.len() {
        let emitted: HashSet<T> = sorted.iter().copied().collect();
        let remaining = node_list
            .iter()
            .copied()
            .filter(|node| !emitted.contains(node))
            .collect();
        Err(CycleError { remaining })
    } else {
        Ok(sorted)
    }
}
