//! Pairing of component messages into per-timestep samples.

use std::collections::BTreeMap;

use tracing::warn;

use wind_common::{MonthKey, TimeKey};

use crate::message::{Component, RawMessage};

/// A complete U/V pair for one timestep.
#[derive(Debug, Clone)]
pub struct SamplePair {
    pub u: RawMessage,
    pub v: RawMessage,
}

/// Groups raw messages by time key and yields only complete pairs,
/// in ascending key order.
#[derive(Debug, Default)]
pub struct MessageIndex {
    slots: BTreeMap<TimeKey, Slot>,
    /// Messages rejected before pairing (bad keys, inconsistent axes,
    /// duplicate components).
    pub rejected: usize,
}

#[derive(Debug, Default)]
struct Slot {
    u: Option<RawMessage>,
    v: Option<RawMessage>,
}

impl MessageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one message. A second message for a component already seen
    /// at the same key is rejected; the first one wins.
    pub fn add(&mut self, message: RawMessage) {
        let key = match message.time_key() {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "Message with invalid time key rejected");
                self.rejected += 1;
                return;
            }
        };
        if !message.is_consistent() {
            warn!(key = %key, component = %message.component, "Message field does not match its axes, rejected");
            self.rejected += 1;
            return;
        }

        let slot = self.slots.entry(key).or_default();
        let target = match message.component {
            Component::U => &mut slot.u,
            Component::V => &mut slot.v,
        };
        if target.is_some() {
            warn!(key = %key, component = %message.component, "Duplicate component message rejected");
            self.rejected += 1;
        } else {
            *target = Some(message);
        }
    }

    pub fn add_all(&mut self, messages: impl IntoIterator<Item = RawMessage>) {
        for message in messages {
            self.add(message);
        }
    }

    /// Consume the index, yielding complete pairs in ascending key
    /// order. Timesteps with only one component are dropped and
    /// reported in the returned count, alongside earlier rejections.
    pub fn into_pairs(self) -> (Vec<(TimeKey, SamplePair)>, usize) {
        let mut dropped = self.rejected;
        let mut pairs = Vec::with_capacity(self.slots.len());
        for (key, slot) in self.slots {
            match (slot.u, slot.v) {
                (Some(u), Some(v)) => pairs.push((key, SamplePair { u, v })),
                (u, v) => {
                    let present = if u.is_some() { Component::U } else { Component::V };
                    debug_assert!(u.is_some() || v.is_some());
                    warn!(key = %key, present = %present, "Timestep missing its counterpart component, dropped");
                    dropped += 1;
                }
            }
        }
        (pairs, dropped)
    }

    /// Like [`MessageIndex::into_pairs`], but grouped by the month of
    /// each key's date. The month always derives from the message
    /// itself; archive file or directory names play no part.
    pub fn into_month_groups(self) -> (BTreeMap<MonthKey, Vec<(TimeKey, SamplePair)>>, usize) {
        let (pairs, dropped) = self.into_pairs();
        let mut groups: BTreeMap<MonthKey, Vec<(TimeKey, SamplePair)>> = BTreeMap::new();
        for (key, pair) in pairs {
            groups.entry(key.month_key()).or_default().push((key, pair));
        }
        (groups, dropped)
    }

    /// Number of timesteps currently holding at least one component.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
