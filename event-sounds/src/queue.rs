//! Ordered buffer of records awaiting coalescing.

use std::collections::VecDeque;
use std::rc::Rc;
use tracing::trace;

use crate::errors::{Result, SoundEventError};
use crate::events::{AuxValue, EventRecord, InputEvent, SignalKind};
use crate::widget::Widget;

/// FIFO of [`EventRecord`]s. Sequence numbers are assigned on push and keep
/// increasing across drains; the queue is emptied but never reset.
#[derive(Debug)]
pub struct PendingQueue {
    records: VecDeque<EventRecord>,
    next_sequence: u64,
    capacity: usize,
}

impl PendingQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            next_sequence: 0,
            capacity,
        }
    }

    /// Builds a record and appends it. Fails without touching the queue when
    /// the payload is malformed or the queue is at capacity.
    pub fn push(
        &mut self,
        signal: SignalKind,
        source: Rc<dyn Widget>,
        aux: Option<AuxValue>,
        input_event: Option<InputEvent>,
    ) -> Result<u64> {
        let sequence = self.next_sequence;
        let record = EventRecord::new(signal, source, aux, input_event, sequence)?;

        if self.records.len() >= self.capacity {
            return Err(SoundEventError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.next_sequence += 1;

        trace!("Queued {:?}", record);
        self.records.push_back(record);
        Ok(sequence)
    }

    pub fn pop_front(&mut self) -> Option<EventRecord> {
        self.records.pop_front()
    }

    pub fn get(&self, index: usize) -> Option<&EventRecord> {
        self.records.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<EventRecord> {
        self.records.remove(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Drops every queued record, releasing their source references.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
