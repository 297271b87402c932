/// Messages the host runtime dispatches into the card.
///
/// Gestures carry the item id; the card resolves it against its owned
/// collection when the message is handled, so no per-render handler state
/// is needed on the host side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardMessage {
    /// Reload the full list from the remote service.
    Refresh,
    /// The tracked entity's state changed; its value may carry the list
    /// payload to seed the card from.
    EntityStateChanged(String),

    // Creation input
    InputChanged(String),
    InputSubmit,

    // Press gesture stream
    PressStarted(String),
    PressReleased,
    PressCancelled,
    HoldElapsed,

    // Inline edit
    EditInputChanged(String, String),
    EditSubmit(String),

    DeleteItem(String),
}

/// Side effects the host applies after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEffect {
    /// Start the single-shot hold timer for this item; deliver
    /// `HoldElapsed` if it fires.
    ArmHoldTimer(String),
    /// Clear the pending hold timer.
    CancelHoldTimer,
    /// Ask the host to refresh this entity's state after a mutation.
    RefreshEntity(String),
}
