//! Flow storage keyed by unordered host pair.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Serialize, Serializer};

use super::Flow;

/// Order-independent identifier for a host pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowKey {
    low: IpAddr,
    high: IpAddr,
}

impl FlowKey {
    pub fn new(a: IpAddr, b: IpAddr) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}

/// All flows of one trace.
#[derive(Debug, Clone, Default)]
pub struct FlowTable {
    flows: BTreeMap<FlowKey, Flow>,
}

impl FlowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the flow for `(a, b)` in either order, creating it on first sight.
    pub fn lookup_or_create(&mut self, a: IpAddr, b: IpAddr) -> &mut Flow {
        let key = FlowKey::new(a, b);
        self.flows.entry(key).or_insert_with(|| {
            tracing::trace!(low = %key.low, high = %key.high, "new flow");
            Flow::new(a, b)
        })
    }

    pub fn get(&self, a: IpAddr, b: IpAddr) -> Option<&Flow> {
        self.flows.get(&FlowKey::new(a, b))
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Flows in key order.
    pub fn flows(&self) -> impl Iterator<Item = &Flow> {
        self.flows.values()
    }

    /// Completed chunks across all flows.
    pub fn chunk_count(&self) -> usize {
        self.flows.values().map(|f| f.chunks.len()).sum()
    }

    /// Drop flows that never completed a chunk. Returns how many were removed.
    pub fn retain_nonempty(&mut self) -> usize {
        let before = self.flows.len();
        self.flows.retain(|_, flow| !flow.chunks.is_empty());
        before - self.flows.len()
    }

    /// Classify the chunks of every flow.
    pub fn classify(&mut self) {
        for flow in self.flows.values_mut() {
            flow.classify();
        }
    }

    /// Post-pass after the last packet: prune empty flows, classify the rest.
    /// Returns the number of pruned flows.
    pub fn finish(&mut self) -> usize {
        let pruned = self.retain_nonempty();
        self.classify();
        pruned
    }
}

impl Serialize for FlowTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.flows.values())
    }
}
