use crate::config::{CardConfig, ConfigError};
use crate::core::item::ShoppingListItem;
use crate::gesture::{PressOutcome, PressTracker};
use crate::host::parse_entity_state;
use crate::message::{CardEffect, CardMessage};
use crate::sync::graphql::GraphqlListClient;
use crate::sync::{AddOutcome, ListService, ListSynchronizer, SyncStatus};

/// The shopping list card: configuration, synchronizer, and gesture
/// classifier behind a single message-driven entry point. The host renders
/// from the grouped state accessors and applies the returned effects.
pub struct ShoppingListCard<S> {
    config: CardConfig,
    sync: ListSynchronizer<S>,
    press: PressTracker,
    input: String,
}

impl ShoppingListCard<GraphqlListClient> {
    /// Build a card against the real GraphQL backend. Invalid
    /// configuration aborts initialization.
    pub fn from_config(config: CardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = GraphqlListClient::new(&config.api_url).map_err(ConfigError::ClientInit)?;
        Self::new(config, client)
    }
}

impl<S: ListService> ShoppingListCard<S> {
    pub fn new(config: CardConfig, service: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            sync: ListSynchronizer::new(service),
            press: PressTracker::new(),
            input: String::new(),
        })
    }

    /// Handle one host message; returns the effects the host must apply.
    pub async fn update(&mut self, message: CardMessage) -> Vec<CardEffect> {
        let mut effects = Vec::new();

        match message {
            CardMessage::Refresh => {
                self.sync.load().await;
            }
            CardMessage::EntityStateChanged(raw) => {
                if let Some(list) = parse_entity_state(&raw) {
                    self.sync.seed(list);
                }
            }
            CardMessage::InputChanged(value) => {
                self.input = value;
            }
            CardMessage::InputSubmit => {
                let raw = std::mem::take(&mut self.input);
                match self.sync.add_or_reactivate(&raw).await {
                    AddOutcome::Added(_) => effects.push(self.refresh_effect()),
                    AddOutcome::Failed => self.input = raw,
                    AddOutcome::Reactivated(_) | AddOutcome::Ignored => {}
                }
            }
            CardMessage::PressStarted(id) => {
                if self.press.press_started(&id) {
                    effects.push(CardEffect::ArmHoldTimer(id));
                }
            }
            CardMessage::PressReleased => match self.press.press_released() {
                PressOutcome::Tap(id) => {
                    effects.push(CardEffect::CancelHoldTimer);
                    if let Some(item) = self.sync.get(&id).cloned() {
                        if self.sync.toggle_status(&item).await {
                            effects.push(self.refresh_effect());
                        }
                    }
                }
                PressOutcome::Suppressed | PressOutcome::None => {}
            },
            CardMessage::PressCancelled => {
                if self.press.press_cancelled() {
                    effects.push(CardEffect::CancelHoldTimer);
                }
            }
            CardMessage::HoldElapsed => {
                if let Some(id) = self.press.hold_elapsed() {
                    self.sync.set_edit_mode(&id, true).await;
                }
            }
            CardMessage::EditInputChanged(id, value) => {
                self.sync.rename(&id, &value);
            }
            CardMessage::EditSubmit(id) => {
                let committed = self.sync.set_edit_mode(&id, false).await;
                self.press.edit_committed();
                if committed {
                    effects.push(self.refresh_effect());
                }
            }
            CardMessage::DeleteItem(id) => {
                if let Some(item) = self.sync.get(&id).cloned() {
                    if self.sync.delete(&item).await {
                        effects.push(self.refresh_effect());
                    }
                }
            }
        }

        effects
    }

    fn refresh_effect(&self) -> CardEffect {
        CardEffect::RefreshEntity(self.config.entity.clone())
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn sync_status(&self) -> &SyncStatus {
        self.sync.status()
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.sync.is_editing(id)
    }

    /// Render-ready state: active items first, then completed.
    pub fn items_by_status(&self) -> (Vec<&ShoppingListItem>, Vec<&ShoppingListItem>) {
        self.sync.items_by_status()
    }
}
