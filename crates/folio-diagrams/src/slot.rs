//! Per-diagram display slots with generation tracking.
//!
//! Renders for the same slot may finish out of order. Each invocation takes a
//! [`Generation`] from [`DiagramSlot::begin`]; its result is applied only if no
//! later generation has been issued for that slot since.
//!
//! [`DiagramSlots`] draws generations from one counter shared by all its slots,
//! so a slot that is dropped and later re-created never reissues a generation
//! still held by a render in flight.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::result::DiagramRenderResult;

/// Monotonic tag of one render invocation within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Display state of one diagram.
#[derive(Debug, Default, Clone)]
pub struct DiagramSlot {
    issued: u64,
    result: Option<DiagramRenderResult>,
}

impl DiagramSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next generation, superseding any render still in flight.
    pub fn begin(&mut self) -> Generation {
        self.supersede(Generation(self.issued + 1))
    }

    fn supersede(&mut self, generation: Generation) -> Generation {
        self.issued = generation.0;
        generation
    }

    /// Apply `result` if `generation` is the latest issued.
    ///
    /// Returns `false` and drops the result when a newer render has started.
    pub fn complete(&mut self, generation: Generation, result: DiagramRenderResult) -> bool {
        if generation.0 != self.issued {
            return false;
        }
        self.result = Some(result);
        true
    }

    /// Latest generation issued so far.
    #[must_use]
    pub fn latest(&self) -> Option<Generation> {
        (self.issued > 0).then_some(Generation(self.issued))
    }

    /// Currently displayed result.
    #[must_use]
    pub fn result(&self) -> Option<&DiagramRenderResult> {
        self.result.as_ref()
    }
}

/// Shared set of slots keyed by diagram position.
#[derive(Debug, Default)]
pub struct DiagramSlots {
    state: Mutex<SlotsState>,
}

#[derive(Debug, Default)]
struct SlotsState {
    /// Last generation issued to any slot; never reset.
    issued: u64,
    slots: HashMap<usize, DiagramSlot>,
}

impl DiagramSlots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a generation for `slot`, creating the slot on first use.
    pub fn begin(&self, slot: usize) -> Generation {
        let mut state = self.lock();
        state.issued += 1;
        let generation = Generation(state.issued);
        state.slots.entry(slot).or_default().supersede(generation)
    }

    /// Apply a finished render to `slot`. See [`DiagramSlot::complete`].
    pub fn complete(&self, slot: usize, generation: Generation, result: DiagramRenderResult) -> bool {
        self.lock()
            .slots
            .get_mut(&slot)
            .is_some_and(|s| s.complete(generation, result))
    }

    /// Clone of the result currently displayed in `slot`.
    #[must_use]
    pub fn result(&self, slot: usize) -> Option<DiagramRenderResult> {
        self.lock().slots.get(&slot).and_then(|s| s.result().cloned())
    }

    /// Drop every slot not in `keep`, e.g. after an edit removed diagrams.
    pub fn retain(&self, keep: impl Fn(usize) -> bool) {
        self.lock().slots.retain(|slot, _| keep(*slot));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, SlotsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::engine::DiagramImage;
    use crate::result::DiagramFailure;

    fn rendered(svg: &str) -> DiagramRenderResult {
        DiagramRenderResult::Rendered(DiagramImage {
            svg: svg.to_owned(),
        })
    }

    #[test]
    fn test_generations_increase() {
        let mut slot = DiagramSlot::new();
        assert_eq!(slot.latest(), None);

        let first = slot.begin();
        let second = slot.begin();

        assert!(second > first);
        assert_eq!(slot.latest(), Some(second));
    }

    #[test]
    fn test_stale_result_discarded() {
        let mut slot = DiagramSlot::new();
        let old = slot.begin();
        let new = slot.begin();

        assert!(slot.complete(new, rendered("new")));
        assert!(!slot.complete(old, rendered("old")));

        assert_eq!(slot.result(), Some(&rendered("new")));
    }

    #[test]
    fn test_in_order_completion_applies_latest() {
        let mut slot = DiagramSlot::new();
        let old = slot.begin();
        let new = slot.begin();

        assert!(!slot.complete(old, rendered("old")));
        assert_eq!(slot.result(), None);
        assert!(slot.complete(new, rendered("new")));
        assert_eq!(slot.result(), Some(&rendered("new")));
    }

    #[test]
    fn test_success_replaces_failure() {
        let mut slot = DiagramSlot::new();
        let first = slot.begin();
        slot.complete(
            first,
            DiagramRenderResult::Failed(DiagramFailure {
                source: "A -->".to_owned(),
                message: "bad".to_owned(),
            }),
        );

        let second = slot.begin();
        assert!(slot.complete(second, rendered("ok")));

        assert!(slot.result().unwrap().failure().is_none());
    }

    #[test]
    fn test_slots_are_independent() {
        let slots = DiagramSlots::new();
        let a = slots.begin(0);
        let b = slots.begin(1);
        slots.begin(0);

        assert!(!slots.complete(0, a, rendered("a")));
        assert!(slots.complete(1, b, rendered("b")));

        assert_eq!(slots.result(0), None);
        assert_eq!(slots.result(1), Some(rendered("b")));
    }

    #[test]
    fn test_complete_unknown_slot() {
        let slots = DiagramSlots::new();
        let generation = DiagramSlot::new().begin();

        assert!(!slots.complete(7, generation, rendered("x")));
        assert!(slots.is_empty());
    }

    #[test]
    fn test_retain() {
        let slots = DiagramSlots::new();
        for slot in 0..4 {
            slots.begin(slot);
        }

        slots.retain(|slot| slot % 2 == 1);

        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_recreated_slot_rejects_earlier_generation() {
        let slots = DiagramSlots::new();
        let before_removal = slots.begin(0);
        slots.retain(|_| false);

        let after_readd = slots.begin(0);

        assert!(after_readd > before_removal);
        assert!(slots.complete(0, after_readd, rendered("fast")));
        assert!(!slots.complete(0, before_removal, rendered("old")));
        assert_eq!(slots.result(0), Some(rendered("fast")));
    }
}
