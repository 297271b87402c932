use std::collections::HashMap;

use crate::CARD_VERSION;
use crate::config::CardConfig;
use crate::core::item::ShoppingList;

/// Read access to the host's entity state store.
pub trait StateStore {
    fn entity_state(&self, entity_id: &str) -> Option<String>;
}

/// One field of a card's configuration, as shown by the host's editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigField {
    pub key: &'static str,
    pub required: bool,
}

/// A card type the host can offer in its picker.
#[derive(Debug, Clone)]
pub struct CardDescriptor {
    pub type_name: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Starter config for the host's card picker.
    pub stub_config: fn() -> CardConfig,
    /// Fields the host's config editor should render.
    pub config_fields: fn() -> Vec<ConfigField>,
}

/// Host-wide card registry. Cards are registered explicitly during host
/// bootstrap, never as an import-time side effect.
#[derive(Debug, Default)]
pub struct CardRegistry {
    cards: HashMap<&'static str, CardDescriptor>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card type. A duplicate type name is rejected.
    pub fn register(&mut self, descriptor: CardDescriptor) -> Result<(), String> {
        if self.cards.contains_key(descriptor.type_name) {
            return Err(format!(
                "card type '{}' is already registered",
                descriptor.type_name
            ));
        }
        log::info!("Registered card {} v{}", descriptor.type_name, CARD_VERSION);
        self.cards.insert(descriptor.type_name, descriptor);
        Ok(())
    }

    pub fn lookup(&self, type_name: &str) -> Option<&CardDescriptor> {
        self.cards.get(type_name)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &CardDescriptor> {
        self.cards.values()
    }
}

/// Descriptor for the shopping list card.
pub fn descriptor() -> CardDescriptor {
    CardDescriptor {
        type_name: "shopping-list-card",
        name: "Shopping List Card",
        description: "A shopping list card backed by a GraphQL list service",
        stub_config: || CardConfig::new("", ""),
        config_fields: || {
            vec![
                ConfigField { key: "entity", required: true },
                ConfigField { key: "api_url", required: true },
                ConfigField { key: "name", required: false },
            ]
        },
    }
}

/// Decode a list payload from the host's entity state. The store keeps a
/// JSON-ish string with single quotes where JSON wants double quotes;
/// anything that still fails to parse yields None.
pub fn parse_entity_state(raw: &str) -> Option<ShoppingList> {
    let json = raw.replace('\'', "\"");
    match serde_json::from_str(&json) {
        Ok(list) => Some(list),
        Err(e) => {
            log::debug!("Entity state is not a list payload: {}", e);
            None
        }
    }
}
