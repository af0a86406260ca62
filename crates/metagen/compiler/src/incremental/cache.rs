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

//! Memo cells

use super::NodeState;
use super::metrics::NodeStats;
use crate::error::GeneratorResult;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of evaluating a [`Memo`]
#[derive(Debug)]
pub struct Evaluation<O> {
    pub node: &'static str,
    pub value: Arc<O>,
    pub state: NodeState,
    pub duration: Duration,
}

/// A cached DAG node keyed by value equality of its input.
///
/// Only successful evaluations are remembered. A failing input is recomputed on
/// every evaluation until it changes or starts succeeding.
#[derive(Debug)]
pub struct Memo<I, O> {
    node: &'static str,
    last: Option<(I, Arc<O>)>,
    stats: NodeStats,
}

impl<I, O> Memo<I, O>
where
    I: PartialEq,
    O: PartialEq,
{
    pub fn new(node: &'static str) -> Self {
        Self {
            node,
            last: None,
            stats: NodeStats::default(),
        }
    }

    pub fn node(&self) -> &'static str {
        self.node
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    /// Last successfully computed value
    pub fn current(&self) -> Option<&Arc<O>> {
        self.last.as_ref().map(|(_, value)| value)
    }

    /// Forget the remembered input and output
    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Evaluate the node for `input`.
    ///
    /// With `caching` disabled the node is recomputed unconditionally and nothing is
    /// remembered, so every evaluation reports [`NodeState::New`].
    pub fn evaluate<F>(&mut self, input: I, caching: bool, compute: F) -> GeneratorResult<Evaluation<O>>
    where
        F: FnOnce(&I) -> GeneratorResult<O>,
    {
        if caching {
            if let Some((last_input, last_value)) = &self.last {
                if *last_input == input {
                    self.stats.cache_hits += 1;
                    debug!(node = self.node, state = %NodeState::Cached, "evaluated node");
                    return Ok(Evaluation {
                        node: self.node,
                        value: Arc::clone(last_value),
                        state: NodeState::Cached,
                        duration: Duration::ZERO,
                    });
                }
            }
        }

        let start = Instant::now();
        let output = compute(&input)?;
        let duration = start.elapsed();
        self.stats.evaluations += 1;
        self.stats.last_duration = duration;

        let (value, state) = match self.last.take() {
            Some((_, previous)) if *previous == output => (previous, NodeState::Unchanged),
            Some(_) => (Arc::new(output), NodeState::Modified),
            None => (Arc::new(output), NodeState::New),
        };
        if caching {
            self.last = Some((input, Arc::clone(&value)));
        }

        debug!(node = self.node, state = %state, elapsed_us = duration.as_micros() as u64, "evaluated node");
        Ok(Evaluation {
            node: self.node,
            value,
            state,
            duration,
        })
    }
}
