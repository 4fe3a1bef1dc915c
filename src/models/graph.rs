//! Process graph of one study or assay table.
//!
//! Turns a process sequence back into table rows: every row is a maximal
//! path `node -> process -> node ...`, enumerated backwards from the terminal
//! items so that rows come out grouped per terminal node.

use super::process::Process;
use std::collections::{HashMap, HashSet};

/// One cell-producing item of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphItem<'a> {
    /// A node, by identifier.
    Node(&'a str),
    /// A process, by index into the process sequence.
    Process(usize),
}

/// Read-only adjacency view over a process sequence.
#[derive(Debug)]
pub struct ProcessGraph<'a> {
    processes: &'a [Process],
    by_id: HashMap<&'a str, usize>,
    /// Processes producing each node, in sequence order.
    producers: HashMap<&'a str, Vec<usize>>,
    /// Nodes consumed by at least one process.
    consumed: HashSet<&'a str>,
}

/// Upper bound on enumerated rows, guarding against pathological pooling.
pub const MAX_ROWS: usize = 1_000_000;

impl<'a> ProcessGraph<'a> {
    /// Builds the graph view.
    #[must_use]
    pub fn new(processes: &'a [Process]) -> Self {
        let mut by_id = HashMap::new();
        let mut producers: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut consumed = HashSet::new();

        for (index, process) in processes.iter().enumerate() {
            by_id.insert(process.id.as_str(), index);
            for output in &process.outputs {
                producers.entry(output.id.as_str()).or_default().push(index);
            }
            for input in &process.inputs {
                consumed.insert(input.id.as_str());
            }
        }

        Self {
            processes,
            by_id,
            producers,
            consumed,
        }
    }

    /// Returns the process at `index`.
    #[must_use]
    pub fn process(&self, index: usize) -> &'a Process {
        &self.processes[index]
    }

    /// Returns the terminal items in row order.
    ///
    /// Terminals are nodes no process consumes and processes with neither
    /// outputs nor a successor. `isolated` lists nodes that take part in no
    /// process (single-column tables); they are appended last.
    #[must_use]
    pub fn terminals(&self, isolated: &[&'a str]) -> Vec<GraphItem<'a>> {
        let mut seen = HashSet::new();
        let mut terminals = Vec::new();

        for (index, process) in self.processes.iter().enumerate() {
            for output in &process.outputs {
                let id = output.id.as_str();
                if !self.consumed.contains(id) && seen.insert(GraphItem::Node(id)) {
                    terminals.push(GraphItem::Node(id));
                }
            }
            if process.outputs.is_empty() && self.successor(index).is_none() {
                terminals.push(GraphItem::Process(index));
            }
        }

        for id in isolated {
            if !self.consumed.contains(id)
                && !self.producers.contains_key(id)
                && seen.insert(GraphItem::Node(id))
            {
                terminals.push(GraphItem::Node(id));
            }
        }

        terminals
    }

    /// Enumerates all rows as paths from a start item to a terminal.
    ///
    /// Returns `None` when the graph contains a cycle or more than
    /// [`MAX_ROWS`] rows.
    #[must_use]
    pub fn rows(&self, isolated: &[&'a str]) -> Option<Vec<Vec<GraphItem<'a>>>> {
        let mut rows = Vec::new();
        for terminal in self.terminals(isolated) {
            let mut visiting = HashSet::new();
            for path in self.paths_to(terminal, &mut visiting)? {
                rows.push(path);
                if rows.len() > MAX_ROWS {
                    return None;
                }
            }
        }
        Some(rows)
    }

    fn successor(&self, index: usize) -> Option<usize> {
        self.processes[index]
            .next_process
            .as_ref()
            .and_then(|next| self.by_id.get(next.id.as_str()).copied())
    }

    fn predecessors(&self, item: GraphItem<'a>) -> Vec<GraphItem<'a>> {
        match item {
            GraphItem::Node(id) => self
                .producers
                .get(id)
                .map(|indices| indices.iter().map(|&i| GraphItem::Process(i)).collect())
                .unwrap_or_default(),
            GraphItem::Process(index) => {
                let process = &self.processes[index];
                if let Some(previous) = process
                    .previous_process
                    .as_ref()
                    .and_then(|prev| self.by_id.get(prev.id.as_str()))
                {
                    vec![GraphItem::Process(*previous)]
                } else {
                    process
                        .inputs
                        .iter()
                        .map(|input| GraphItem::Node(input.id.as_str()))
                        .collect()
                }
            },
        }
    }

    fn paths_to(
        &self,
        item: GraphItem<'a>,
        visiting: &mut HashSet<GraphItem<'a>>,
    ) -> Option<Vec<Vec<GraphItem<'a>>>> {
        if !visiting.insert(item) {
            return None;
        }
        let predecessors = self.predecessors(item);
        let mut paths = Vec::new();
        if predecessors.is_empty() {
            paths.push(vec![item]);
        } else {
            for predecessor in predecessors {
                for mut path in self.paths_to(predecessor, visiting)? {
                    path.push(item);
                    paths.push(path);
                    if paths.len() > MAX_ROWS {
                        return None;
                    }
                }
            }
        }
        visiting.remove(&item);
        Some(paths)
    }
}
