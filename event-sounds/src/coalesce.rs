//! Merge and drop rules applied to a record before it is dispatched.
//!
//! A candidate taken from the head of the queue is compared against every
//! record still queued behind it. Depending on the pair, the later record is
//! dropped, the candidate is replaced by the later record, or both vanish.
//! Whenever the candidate is replaced the scan starts over, because the new
//! candidate has not been compared against anything yet.

use tracing::debug;

use crate::errors::SoundEventError;
use crate::events::{EventRecord, SignalKind};
use crate::queue::PendingQueue;
use crate::widget::Capabilities;

/// Outcome of comparing the candidate with one queued record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// No relationship, keep scanning.
    Keep,
    /// Show immediately undone by hide: neither produces a sound.
    DropBoth,
    /// The queued record supersedes the candidate.
    AdoptEntry,
    /// The queued record is redundant with the candidate.
    DropEntry,
}

/// Result of one coalescing pass.
#[derive(Debug)]
pub struct Coalesced {
    /// The record left to dispatch, if any.
    pub survivor: Option<EventRecord>,
    /// Records eliminated by merge rules, the original candidate included.
    pub eliminated: usize,
    /// Records dropped because their source was destroyed.
    pub stale: usize,
}

/// Decides how `candidate` and a later record `entry` combine.
pub fn merge_rule(candidate: &EventRecord, entry: &EventRecord) -> Merge {
    use SignalKind::*;

    let (c, e) = (candidate.signal(), entry.signal());

    if candidate.same_source(entry) {
        if c == WidgetShow && e == WidgetHide {
            return Merge::DropBoth;
        }

        // Hide superseded by a dialog response; window state superseded by
        // show/hide.
        if matches!(
            (c, e),
            (WidgetHide, DialogResponse)
                | (WindowStateChanged, WidgetHide)
                | (WindowStateChanged, WidgetShow)
        ) {
            return Merge::AdoptEntry;
        }

        if c == e
            || matches!(
                (c, e),
                (DialogResponse, WidgetHide)
                    | (WidgetShow, WindowStateChanged)
                    | (WidgetHide, WindowStateChanged)
            )
        {
            return Merge::DropEntry;
        }

        return Merge::Keep;
    }

    if is_menu_window(candidate) && is_menu_window(entry) {
        match (c, e) {
            (WidgetHide, WidgetShow) => return Merge::AdoptEntry,
            (WidgetShow, WidgetHide) => return Merge::DropEntry,
            _ => {}
        }
    }

    Merge::Keep
}

fn is_menu_window(record: &EventRecord) -> bool {
    let source = record.source();
    source.has(Capabilities::WINDOW) && source.type_hint().is_menu()
}

/// Runs the merge rules for `candidate` against everything in `queue`.
///
/// Records are only ever removed from `queue`, never reordered.
pub fn coalesce(candidate: EventRecord, queue: &mut PendingQueue) -> Coalesced {
    let mut candidate = candidate;
    let mut eliminated = 0;
    let mut stale = 0;

    'scan: loop {
        let mut index = 0;

        while let Some(entry) = queue.get(index) {
            if !entry.is_alive() {
                let err = SoundEventError::StaleReference(entry.object_id());
                debug!("Dropping queued {:?}: {}", entry, err);
                queue.remove(index);
                stale += 1;
                continue;
            }

            match merge_rule(&candidate, entry) {
                Merge::Keep => index += 1,
                Merge::DropEntry => {
                    if let Some(dropped) = queue.remove(index) {
                        debug!("Coalesced {:?} into {:?}", dropped, candidate);
                        eliminated += 1;
                    }
                }
                Merge::AdoptEntry => {
                    if let Some(adopted) = queue.remove(index) {
                        debug!("Replacing {:?} with later {:?}", candidate, adopted);
                        candidate = adopted;
                        eliminated += 1;
                    }
                    continue 'scan;
                }
                Merge::DropBoth => {
                    if let Some(hide) = queue.remove(index) {
                        debug!("Show {:?} cancelled by {:?}", candidate, hide);
                    }
                    return Coalesced {
                        survivor: None,
                        eliminated: eliminated + 2,
                        stale,
                    };
                }
            }
        }

        return Coalesced {
            survivor: Some(candidate),
            eliminated,
            stale,
        };
    }
}
