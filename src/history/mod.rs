mod snapshot;

use std::collections::VecDeque;

use log::debug;

pub use snapshot::{SNAPSHOT_VERSION, SceneSnapshot, SnapshotCodec, SnapshotPurpose};

use crate::error::EditorResult;

/// Whether a snapshot is currently being applied to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryState {
    #[default]
    Idle,
    Replaying,
}

/// Snapshot-based undo/redo.
///
/// The undo stack's top is always the current scene; its bottom entry is the
/// baseline and is never popped. `cap` counts undo steps, so the stack holds
/// at most `cap + 1` entries. Entries are encoded JSON snapshots.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    /// Committed snapshots, oldest first
    undo_stack: VecDeque<String>,
    /// Snapshots undone since the last commit, most recent last
    redo_stack: Vec<String>,
    cap: usize,
    state: HistoryState,
}

impl HistoryManager {
    /// Creates a history whose only entry is `baseline`
    pub fn new(cap: usize, baseline: String) -> Self {
        let mut undo_stack = VecDeque::with_capacity(cap.max(1) + 1);
        undo_stack.push_back(baseline);
        Self {
            undo_stack,
            redo_stack: Vec::new(),
            cap: cap.max(1),
            state: HistoryState::Idle,
        }
    }

    /// Drop every entry and start over from `baseline`
    pub fn reset(&mut self, baseline: String) {
        self.undo_stack.clear();
        self.undo_stack.push_back(baseline);
        self.redo_stack.clear();
        self.state = HistoryState::Idle;
    }

    pub fn state(&self) -> HistoryState {
        self.state
    }

    pub fn is_replaying(&self) -> bool {
        self.state == HistoryState::Replaying
    }

    /// Push a committed snapshot. Ignored while replaying.
    pub fn record(&mut self, snapshot: String) -> bool {
        if self.is_replaying() {
            debug!("Ignoring snapshot captured during replay");
            return false;
        }
        self.push_undo(snapshot);
        self.redo_stack.clear();
        true
    }

    fn push_undo(&mut self, snapshot: String) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.cap + 1 {
            self.undo_stack.pop_front();
        }
    }

    /// Step back one entry, handing the new current snapshot to `apply`.
    ///
    /// Returns `Ok(false)` when only the baseline is left. If `apply` fails
    /// the stacks are left as they were.
    pub fn undo<F>(&mut self, apply: F) -> EditorResult<bool>
    where
        F: FnOnce(&str) -> EditorResult<()>,
    {
        if !self.can_undo() {
            return Ok(false);
        }
        let Some(current) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        let Some(target) = self.undo_stack.back() else {
            self.undo_stack.push_back(current);
            return Ok(false);
        };

        self.state = HistoryState::Replaying;
        let result = apply(target);
        self.state = HistoryState::Idle;

        match result {
            Ok(()) => {
                self.redo_stack.push(current);
                Ok(true)
            }
            Err(e) => {
                self.undo_stack.push_back(current);
                Err(e)
            }
        }
    }

    /// Re-apply the most recently undone entry
    pub fn redo<F>(&mut self, apply: F) -> EditorResult<bool>
    where
        F: FnOnce(&str) -> EditorResult<()>,
    {
        let Some(entry) = self.redo_stack.pop() else {
            return Ok(false);
        };

        self.state = HistoryState::Replaying;
        let result = apply(&entry);
        self.state = HistoryState::Idle;

        match result {
            Ok(()) => {
                self.push_undo(entry);
                Ok(true)
            }
            Err(e) => {
                self.redo_stack.push(entry);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The snapshot matching the live scene
    pub fn current(&self) -> Option<&str> {
        self.undo_stack.back().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    fn entry(n: usize) -> String {
        format!("{{\"n\":{n}}}")
    }

    #[test]
    fn test_baseline_is_never_popped() {
        let mut history = HistoryManager::new(50, entry(0));
        assert!(!history.can_undo());
        assert!(!history.undo(|_| Ok(())).unwrap());
        assert_eq!(history.current(), Some(entry(0).as_str()));
    }

    #[test]
    fn test_undo_applies_previous_entry() {
        let mut history = HistoryManager::new(50, entry(0));
        history.record(entry(1));
        history.record(entry(2));

        let mut applied = String::new();
        assert!(history.undo(|s| {
            applied = s.to_owned();
            Ok(())
        }).unwrap());
        assert_eq!(applied, entry(1));
        assert!(history.can_redo());

        history.redo(|s| {
            applied = s.to_owned();
            Ok(())
        }).unwrap();
        assert_eq!(applied, entry(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_commit_clears_redo() {
        let mut history = HistoryManager::new(50, entry(0));
        history.record(entry(1));
        history.undo(|_| Ok(())).unwrap();
        history.record(entry(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_failed_apply_restores_stacks() {
        let mut history = HistoryManager::new(50, entry(0));
        history.record(entry(1));
        let result = history.undo(|_| Err(EditorError::InvalidSource("bad".into())));
        assert!(result.is_err());
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.state(), HistoryState::Idle);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = HistoryManager::new(3, entry(0));
        for n in 1..=5 {
            history.record(entry(n));
        }
        assert_eq!(history.undo_len(), 4);
        assert_eq!(history.current(), Some(entry(5).as_str()));
    }

    #[test]
    fn test_cap_counts_undo_steps() {
        let mut history = HistoryManager::new(3, entry(0));
        for n in 1..=5 {
            history.record(entry(n));
        }
        let mut steps = 0;
        while history.undo(|_| Ok(())).unwrap() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(history.current(), Some(entry(2).as_str()));
    }
}
