// Metagen
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Metrics collection for incremental runs

use super::NodeState;
use super::cache::Evaluation;
use serde::Serialize;
use std::time::Duration;

/// Lifetime counters of one memo cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub evaluations: u64,
    pub cache_hits: u64,
    pub last_duration: Duration,
}

/// One node's outcome in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub node: &'static str,
    pub state: NodeState,
    pub duration: Duration,
}

/// Per-node outcomes of the latest run, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub nodes: Vec<NodeRecord>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<O>(&mut self, evaluation: &Evaluation<O>) {
        self.nodes.push(NodeRecord {
            node: evaluation.node,
            state: evaluation.state,
            duration: evaluation.duration,
        });
    }

    pub fn state_of(&self, node: &str) -> Option<NodeState> {
        self.nodes.iter().find(|record| record.node == node).map(|record| record.state)
    }

    /// Nodes whose compute function ran
    pub fn recomputed(&self) -> Vec<&'static str> {
        self.nodes.iter().filter(|record| record.state.recomputed()).map(|record| record.node).collect()
    }

    pub fn total_duration(&self) -> Duration {
        self.nodes.iter().map(|record| record.duration).sum()
    }
}
