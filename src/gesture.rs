use std::time::Duration;

/// How long a press must be held before it becomes an edit gesture.
pub const HOLD_DELAY: Duration = Duration::from_millis(1000);

/// Classifies a pointer-down stream into tap (toggle) or long-press (edit).
///
/// One tracker per card instance, so at most one hold timer is ever live:
/// `Idle -> Pressing` arms the timer, and the press either cancels back to
/// `Idle` or fires into `Editing`. `Editing` is left only when the edit
/// commits.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PressState {
    Idle,
    Pressing(String),
    Editing(String),
}

/// What the host should do with the click that follows a pointer-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// Released before the hold fired: treat the click as a status toggle.
    Tap(String),
    /// The hold already fired for this gesture: swallow the click.
    Suppressed,
    /// No press was in progress.
    None,
}

#[derive(Debug, Clone)]
pub struct PressTracker {
    state: PressState,
}

impl Default for PressTracker {
    fn default() -> Self {
        Self {
            state: PressState::Idle,
        }
    }
}

impl PressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer-down on an item. Returns true when the hold timer should be
    /// armed; a press that overlaps an existing gesture is a no-op.
    pub fn press_started(&mut self, item_id: &str) -> bool {
        match self.state {
            PressState::Idle => {
                self.state = PressState::Pressing(item_id.to_string());
                true
            }
            _ => false,
        }
    }

    /// Pointer-up. Before the hold fires this ends the gesture as a tap;
    /// after it fired, the pending click is suppressed.
    pub fn press_released(&mut self) -> PressOutcome {
        match std::mem::replace(&mut self.state, PressState::Idle) {
            PressState::Pressing(id) => PressOutcome::Tap(id),
            PressState::Editing(id) => {
                self.state = PressState::Editing(id);
                PressOutcome::Suppressed
            }
            PressState::Idle => PressOutcome::None,
        }
    }

    /// Pointer-leave/cancel. Returns true when an armed timer must be
    /// cleared by the host.
    pub fn press_cancelled(&mut self) -> bool {
        match self.state {
            PressState::Pressing(_) => {
                self.state = PressState::Idle;
                true
            }
            _ => false,
        }
    }

    /// The hold timer fired. Returns the pressed item id exactly once; a
    /// stale fire after a cancel is inert.
    pub fn hold_elapsed(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, PressState::Idle) {
            PressState::Pressing(id) => {
                self.state = PressState::Editing(id.clone());
                Some(id)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// The inline edit committed; the gesture cycle is complete.
    pub fn edit_committed(&mut self) {
        if matches!(self.state, PressState::Editing(_)) {
            self.state = PressState::Idle;
        }
    }

    /// Id of the item a hold gesture put into edit mode, if any.
    pub fn editing_item(&self) -> Option<&str> {
        match &self.state {
            PressState::Editing(id) => Some(id),
            _ => None,
        }
    }
}
