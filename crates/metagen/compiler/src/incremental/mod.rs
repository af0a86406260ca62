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

//! Incremental evaluation primitives
//!
//! Every node of the generator DAG is a [`Memo`] cell that remembers its last input and
//! output. A node is skipped when its input is value-equal to the previous one, and a
//! recomputed node that produces a value-equal output hands back the previous `Arc`, so
//! downstream nodes see an unchanged input and are skipped in turn.
//!
//! Nodes that query the symbol table are [`TrackedMemo`] cells instead: they are keyed on
//! the answers they received rather than on the snapshot, so they are skipped whenever
//! those answers survive an edit.

pub mod cache;
pub mod metrics;
pub mod tracking;

pub use cache::{Evaluation, Memo};
pub use metrics::{NodeRecord, NodeStats, RunReport};
pub use tracking::{ReadLog, RecordingTable, TrackedMemo};

use serde::Serialize;
use std::fmt;

/// What happened to a node during one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// First evaluation of the node
    New,
    /// Recomputed and produced a different value
    Modified,
    /// Recomputed and produced a value-equal result; the previous value was kept
    Unchanged,
    /// Inputs were equal, nothing was computed
    Cached,
}

impl NodeState {
    /// Whether the node's compute function ran
    pub fn recomputed(self) -> bool {
        !matches!(self, NodeState::Cached)
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeState::New => "new",
            NodeState::Modified => "modified",
            NodeState::Unchanged => "unchanged",
            NodeState::Cached => "cached",
        };
        f.pad(name)
    }
}
