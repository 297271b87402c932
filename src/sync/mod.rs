pub mod graphql;

use std::collections::HashMap;

use crate::core::item::{ItemStatus, ShoppingList, ShoppingListItem, normalize_value};
use graphql::DeletedItem;

/// Remote operations the synchronizer needs from the list service.
/// Adding an item is an update carrying an id-less item; the server
/// assigns the id and echoes it back.
#[allow(async_fn_in_trait)]
pub trait ListService {
    async fn fetch_list(&self) -> Result<ShoppingList, String>;
    async fn update_items(
        &self,
        items: &[ShoppingListItem],
    ) -> Result<Vec<ShoppingListItem>, String>;
    async fn delete_items(&self, items: &[ShoppingListItem]) -> Result<Vec<DeletedItem>, String>;
}

/// Current sync status displayed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Syncing,
    Error(String),
    LastSynced(String), // formatted timestamp
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// What `add_or_reactivate` did with the submitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Input was empty after normalization.
    Ignored,
    /// An existing item with the same normalized value was set active
    /// locally; no remote call was made.
    Reactivated(String),
    /// A new item was created remotely and inserted under its server id.
    Added(String),
    /// The remote add failed; nothing changed.
    Failed,
}

/// Keeps a local item collection consistent with the remote list service
/// and serializes each item's edits through it.
///
/// Every remote call is fire-and-forget: no retries, no offline queue. A
/// failed write leaves local and remote state diverged until the next
/// full `load`.
pub struct ListSynchronizer<S> {
    service: S,
    list_id: Option<String>,
    /// Invariant: every key equals its value's id.
    items: HashMap<String, ShoppingListItem>,
    /// Item ids currently in inline-edit mode.
    editing: HashMap<String, bool>,
    status: SyncStatus,
}

impl<S: ListService> ListSynchronizer<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            list_id: None,
            items: HashMap::new(),
            editing: HashMap::new(),
            status: SyncStatus::Idle,
        }
    }

    /// One remote read of the full list. On success the result replaces the
    /// entire local collection, keyed by item id; on failure local state is
    /// left as it was (empty on first load). No retry.
    pub async fn load(&mut self) -> bool {
        self.status = SyncStatus::Syncing;

        match self.service.fetch_list().await {
            Ok(list) => {
                self.items.clear();
                for item in list.items {
                    match item.id.clone() {
                        Some(id) => {
                            self.items.insert(id, item);
                        }
                        None => log::warn!("Skipping remote item without id: {}", item.value),
                    }
                }
                self.editing.retain(|id, _| self.items.contains_key(id));
                self.list_id = Some(list.id);
                self.status =
                    SyncStatus::LastSynced(chrono::Local::now().format("%H:%M").to_string());
                log::info!("Loaded shopping list with {} items", self.items.len());
                true
            }
            Err(e) => {
                log::warn!("Failed to load shopping list: {}", e);
                self.status = SyncStatus::Error(e);
                false
            }
        }
    }

    /// Replace local state from a host-provided list payload (no remote
    /// call), e.g. the entity state cached by the host.
    pub fn seed(&mut self, list: ShoppingList) {
        self.items.clear();
        for item in list.items {
            match item.id.clone() {
                Some(id) => {
                    self.items.insert(id, item);
                }
                None => log::warn!("Skipping seeded item without id: {}", item.value),
            }
        }
        self.editing.retain(|id, _| self.items.contains_key(id));
        self.list_id = Some(list.id);
    }

    /// Normalize `raw` and either reactivate a matching existing item
    /// (local-only) or add a new one remotely. Empty input is a no-op.
    pub async fn add_or_reactivate(&mut self, raw: &str) -> AddOutcome {
        let value = normalize_value(raw);
        if value.is_empty() {
            return AddOutcome::Ignored;
        }

        // Same normalized value already on the list: flip it back to active
        // instead of creating a duplicate. First match wins.
        if let Some((id, item)) = self
            .items
            .iter_mut()
            .find(|(_, item)| normalize_value(&item.value) == value)
        {
            item.status = ItemStatus::Active;
            log::debug!("Reactivated existing item: {}", item.value);
            return AddOutcome::Reactivated(id.clone());
        }

        let new_item = ShoppingListItem {
            id: None,
            value: value.clone(),
            status: ItemStatus::Active,
        };

        match self.service.update_items(std::slice::from_ref(&new_item)).await {
            Ok(returned) => {
                for item in returned {
                    if let Some(id) = item.id.clone() {
                        self.items.insert(id.clone(), item);
                        return AddOutcome::Added(id);
                    }
                }
                log::warn!("Add of '{}' returned no item with an id", value);
                AddOutcome::Failed
            }
            Err(e) => {
                log::warn!("Failed to add '{}': {}", value, e);
                AddOutcome::Failed
            }
        }
    }

    /// Flip active/completed and push the full new item. On success the
    /// local entry becomes the server echo. Items mid-edit are excluded.
    pub async fn toggle_status(&mut self, item: &ShoppingListItem) -> bool {
        let Some(id) = item.id.clone() else {
            log::debug!("Ignoring status toggle for unsaved item: {}", item.value);
            return false;
        };
        if self.is_editing(&id) {
            log::debug!("Ignoring status toggle while editing: {}", item.value);
            return false;
        }

        let mut updated = item.clone();
        updated.status = updated.status.toggled();

        match self.service.update_items(std::slice::from_ref(&updated)).await {
            Ok(returned) => {
                let echoed = returned
                    .into_iter()
                    .find(|e| e.id.as_deref() == Some(id.as_str()))
                    .unwrap_or(updated);
                self.items.insert(id, echoed);
                true
            }
            Err(e) => {
                log::warn!("Failed to toggle '{}': {}", item.value, e);
                false
            }
        }
    }

    /// Write a new value into the local entry immediately. Optimistic: the
    /// remote update happens when the edit commits. Empty values and
    /// unknown ids are no-ops.
    pub fn rename(&mut self, id: &str, new_value: &str) {
        let value = normalize_value(new_value);
        if value.is_empty() {
            return;
        }
        if let Some(item) = self.items.get_mut(id) {
            item.value = value;
        }
    }

    /// Exit edit mode for `id` and push the current (possibly renamed)
    /// item. A failed push is not rolled back; local state stays ahead of
    /// remote until the next full load.
    pub async fn commit_edit(&mut self, id: &str) -> bool {
        self.editing.remove(id);

        let Some(item) = self.items.get(id).cloned() else {
            return false;
        };

        match self.service.update_items(std::slice::from_ref(&item)).await {
            Ok(returned) => {
                let echoed = returned
                    .into_iter()
                    .find(|e| e.id.as_deref() == Some(id))
                    .unwrap_or(item);
                self.items.insert(id.to_string(), echoed);
                true
            }
            Err(e) => {
                log::warn!("Failed to commit edit of '{}': {}", item.value, e);
                false
            }
        }
    }

    /// Remote delete; on success the entry is removed locally regardless
    /// of the response payload's contents. Unsaved items are a no-op.
    pub async fn delete(&mut self, item: &ShoppingListItem) -> bool {
        let Some(id) = item.id.as_deref() else {
            log::debug!("Ignoring delete for unsaved item: {}", item.value);
            return false;
        };

        match self.service.delete_items(std::slice::from_ref(item)).await {
            Ok(_) => {
                self.items.remove(id);
                self.editing.remove(id);
                true
            }
            Err(e) => {
                log::warn!("Failed to delete '{}': {}", item.value, e);
                false
            }
        }
    }

    /// Local toggle of the editable-set. Disabling implicitly commits the
    /// edit; the returned flag reports whether a remote update succeeded.
    pub async fn set_edit_mode(&mut self, id: &str, enabled: bool) -> bool {
        if enabled {
            if self.items.contains_key(id) {
                self.editing.insert(id.to_string(), true);
            }
            false
        } else {
            self.commit_edit(id).await
        }
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.editing.get(id).copied().unwrap_or(false)
    }

    pub fn get(&self, id: &str) -> Option<&ShoppingListItem> {
        self.items.get(id)
    }

    pub fn items(&self) -> &HashMap<String, ShoppingListItem> {
        &self.items
    }

    pub fn list_id(&self) -> Option<&str> {
        self.list_id.as_deref()
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    /// Items regrouped for rendering: active first, then completed, each
    /// section sorted by value.
    pub fn items_by_status(&self) -> (Vec<&ShoppingListItem>, Vec<&ShoppingListItem>) {
        let mut active: Vec<&ShoppingListItem> = Vec::new();
        let mut completed: Vec<&ShoppingListItem> = Vec::new();
        for item in self.items.values() {
            if item.status.is_completed() {
                completed.push(item);
            } else {
                active.push(item);
            }
        }
        active.sort_by(|a, b| a.value.cmp(&b.value));
        completed.sort_by(|a, b| a.value.cmp(&b.value));
        (active, completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fetch,
        Update(Vec<ShoppingListItem>),
        Delete(Vec<ShoppingListItem>),
    }

    /// In-memory stand-in for the remote service. Records every call and
    /// echoes updates back with server-assigned ids, like the backend does.
    #[derive(Default)]
    struct FakeService {
        list: RefCell<Option<ShoppingList>>,
        calls: RefCell<Vec<Call>>,
        fail: Cell<bool>,
    }

    impl FakeService {
        fn with_items(items: Vec<ShoppingListItem>) -> Self {
            let service = Self::default();
            *service.list.borrow_mut() = Some(ShoppingList {
                id: "list-1".to_string(),
                name: Some("Groceries".to_string()),
                items,
            });
            service
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl ListService for &FakeService {
        async fn fetch_list(&self) -> Result<ShoppingList, String> {
            self.calls.borrow_mut().push(Call::Fetch);
            if self.fail.get() {
                return Err("network down".to_string());
            }
            self.list
                .borrow()
                .clone()
                .ok_or_else(|| "no list".to_string())
        }

        async fn update_items(
            &self,
            items: &[ShoppingListItem],
        ) -> Result<Vec<ShoppingListItem>, String> {
            self.calls.borrow_mut().push(Call::Update(items.to_vec()));
            if self.fail.get() {
                return Err("network down".to_string());
            }
            Ok(items
                .iter()
                .map(|item| {
                    let mut echoed = item.clone();
                    if echoed.id.is_none() {
                        echoed.id = Some(Uuid::new_v4().to_string());
                    }
                    echoed
                })
                .collect())
        }

        async fn delete_items(
            &self,
            items: &[ShoppingListItem],
        ) -> Result<Vec<DeletedItem>, String> {
            self.calls.borrow_mut().push(Call::Delete(items.to_vec()));
            if self.fail.get() {
                return Err("network down".to_string());
            }
            Ok(items
                .iter()
                .filter_map(|item| item.id.clone().map(|id| DeletedItem { id }))
                .collect())
        }
    }

    fn item(id: &str, value: &str, status: ItemStatus) -> ShoppingListItem {
        ShoppingListItem {
            id: Some(id.to_string()),
            value: value.to_string(),
            status,
        }
    }

    #[tokio::test]
    async fn load_keys_collection_by_item_id() {
        let service = FakeService::with_items(vec![
            item("1", "Milk", ItemStatus::Active),
            item("2", "Bread", ItemStatus::Completed),
        ]);
        let mut sync = ListSynchronizer::new(&service);

        assert!(sync.load().await);
        assert_eq!(sync.list_id(), Some("list-1"));
        assert_eq!(sync.items().len(), 2);
        for (key, item) in sync.items() {
            assert_eq!(item.id.as_deref(), Some(key.as_str()));
        }
        assert!(matches!(sync.status(), SyncStatus::LastSynced(_)));
    }

    #[tokio::test]
    async fn load_failure_leaves_collection_unchanged() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        assert!(sync.load().await);

        service.fail.set(true);
        assert!(!sync.load().await);
        assert_eq!(sync.items().len(), 1);
        assert!(matches!(sync.status(), SyncStatus::Error(_)));
    }

    #[tokio::test]
    async fn add_empty_input_is_a_no_op() {
        let service = FakeService::with_items(vec![]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        assert_eq!(sync.add_or_reactivate("").await, AddOutcome::Ignored);
        assert_eq!(sync.add_or_reactivate("   ").await, AddOutcome::Ignored);
        assert!(sync.items().is_empty());
        assert_eq!(service.calls(), vec![Call::Fetch]);
    }

    #[tokio::test]
    async fn add_reactivates_matching_item_without_remote_call() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Completed)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        let outcome = sync.add_or_reactivate("milk").await;
        assert_eq!(outcome, AddOutcome::Reactivated("1".to_string()));
        assert_eq!(sync.get("1").unwrap().status, ItemStatus::Active);
        assert_eq!(sync.items().len(), 1);
        // Only the initial fetch; reactivation is local.
        assert_eq!(service.calls(), vec![Call::Fetch]);
    }

    #[tokio::test]
    async fn add_issues_one_remote_call_with_normalized_value() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        let outcome = sync.add_or_reactivate("  orange juice ").await;
        let AddOutcome::Added(id) = outcome else {
            panic!("expected Added, got {:?}", outcome);
        };

        let added = sync.get(&id).unwrap();
        assert_eq!(added.value, "Orange Juice");
        assert_eq!(added.status, ItemStatus::Active);
        assert_eq!(added.id.as_deref(), Some(id.as_str()));

        let calls = service.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            Call::Update(vec![ShoppingListItem::new("Orange Juice")])
        );
    }

    #[tokio::test]
    async fn add_failure_changes_nothing() {
        let service = FakeService::with_items(vec![]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        service.fail.set(true);
        assert_eq!(sync.add_or_reactivate("eggs").await, AddOutcome::Failed);
        assert!(sync.items().is_empty());
    }

    #[tokio::test]
    async fn toggle_pushes_flip_and_takes_server_echo() {
        let service = FakeService::with_items(vec![item("2", "Bread", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        let bread = sync.get("2").unwrap().clone();
        assert!(sync.toggle_status(&bread).await);

        assert_eq!(
            sync.get("2").unwrap(),
            &item("2", "Bread", ItemStatus::Completed)
        );
        assert_eq!(
            service.calls()[1],
            Call::Update(vec![item("2", "Bread", ItemStatus::Completed)])
        );
    }

    #[tokio::test]
    async fn toggle_skips_unsaved_and_editing_items() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        assert!(!sync.toggle_status(&ShoppingListItem::new("Milk")).await);

        sync.set_edit_mode("1", true).await;
        let milk = sync.get("1").unwrap().clone();
        assert!(!sync.toggle_status(&milk).await);
        assert_eq!(sync.get("1").unwrap().status, ItemStatus::Active);
        assert_eq!(service.calls(), vec![Call::Fetch]);
    }

    #[tokio::test]
    async fn toggle_failure_keeps_local_entry() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        service.fail.set(true);
        let milk = sync.get("1").unwrap().clone();
        assert!(!sync.toggle_status(&milk).await);
        assert_eq!(sync.get("1").unwrap().status, ItemStatus::Active);
    }

    #[tokio::test]
    async fn rename_is_optimistic_and_local() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        sync.rename("1", "oat milk");
        assert_eq!(sync.get("1").unwrap().value, "Oat Milk");
        // No remote call until the edit commits.
        assert_eq!(service.calls(), vec![Call::Fetch]);

        sync.rename("1", "  ");
        assert_eq!(sync.get("1").unwrap().value, "Oat Milk");
        sync.rename("nope", "Cheese");
        assert!(sync.get("nope").is_none());
    }

    #[tokio::test]
    async fn commit_edit_pushes_renamed_item_and_exits_edit_mode() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        sync.set_edit_mode("1", true).await;
        assert!(sync.is_editing("1"));
        sync.rename("1", "oat milk");

        assert!(sync.commit_edit("1").await);
        assert!(!sync.is_editing("1"));
        assert_eq!(
            service.calls()[1],
            Call::Update(vec![item("1", "Oat Milk", ItemStatus::Active)])
        );
    }

    #[tokio::test]
    async fn commit_failure_keeps_local_rename() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        sync.set_edit_mode("1", true).await;
        sync.rename("1", "oat milk");
        service.fail.set(true);

        assert!(!sync.commit_edit("1").await);
        // No rollback: local stays ahead of remote until the next load.
        assert_eq!(sync.get("1").unwrap().value, "Oat Milk");
        assert!(!sync.is_editing("1"));
    }

    #[tokio::test]
    async fn disabling_edit_mode_commits() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        sync.set_edit_mode("1", true).await;
        assert!(sync.set_edit_mode("1", false).await);
        assert!(!sync.is_editing("1"));
        assert_eq!(service.calls().len(), 2);
    }

    #[tokio::test]
    async fn delete_unsaved_item_is_a_no_op() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        assert!(!sync.delete(&ShoppingListItem::new("Milk")).await);
        assert_eq!(sync.items().len(), 1);
        assert_eq!(service.calls(), vec![Call::Fetch]);
    }

    #[tokio::test]
    async fn delete_removes_entry_on_success() {
        let service = FakeService::with_items(vec![item("1", "Milk", ItemStatus::Active)]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        let milk = sync.get("1").unwrap().clone();
        assert!(sync.delete(&milk).await);
        assert!(sync.items().is_empty());

        service.fail.set(true);
        assert!(!sync.delete(&milk).await);
    }

    #[tokio::test]
    async fn items_by_status_groups_and_sorts() {
        let service = FakeService::with_items(vec![
            item("1", "Milk", ItemStatus::Active),
            item("2", "Bread", ItemStatus::Completed),
            item("3", "Apples", ItemStatus::Active),
        ]);
        let mut sync = ListSynchronizer::new(&service);
        sync.load().await;

        let (active, completed) = sync.items_by_status();
        let active: Vec<&str> = active.iter().map(|i| i.value.as_str()).collect();
        let completed: Vec<&str> = completed.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(active, vec!["Apples", "Milk"]);
        assert_eq!(completed, vec!["Bread"]);
    }

    #[test]
    fn seed_replaces_collection_without_remote_call() {
        let service = FakeService::default();
        let mut sync = ListSynchronizer::new(&service);

        sync.seed(ShoppingList {
            id: "list-9".to_string(),
            name: None,
            items: vec![item("1", "Milk", ItemStatus::Active)],
        });

        assert_eq!(sync.list_id(), Some("list-9"));
        assert_eq!(sync.items().len(), 1);
        assert!(service.calls().is_empty());
    }
}
