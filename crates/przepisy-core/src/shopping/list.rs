//! Shopping List Store
//!
//! Session-wide set of recipe ids on the list. One instance is shared by the
//! recipe list page, the navbar badge and the panel. The server's answer to
//! every add/remove is authoritative and replaces the local set.

use log::{debug, info, warn};
use std::cell::Cell;
use std::collections::BTreeSet;

use super::ids::{apply_add, apply_remove, replace_ids, RecipeIds};
use crate::api::ApiGateway;
use crate::error::ApiResult;
use crate::models::RecipeId;
use crate::observable::Observable;

pub const ALREADY_ON_LIST: &str = "Ten przepis jest już na liście zakupów";

#[derive(Debug, Clone, PartialEq)]
pub enum ListNotice {
    AlreadyOnList(RecipeId),
    Failed(String),
}

impl ListNotice {
    pub fn message(&self) -> &str {
        match self {
            ListNotice::AlreadyOnList(_) => ALREADY_ON_LIST,
            ListNotice::Failed(msg) => msg,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListSnapshot {
    pub recipe_ids: RecipeIds,
    pub is_open: bool,
    /// Ids with an add/remove in flight
    pub loading: BTreeSet<RecipeId>,
    pub clearing: bool,
    pub notice: Option<ListNotice>,
}

impl ListSnapshot {
    pub fn contains(&self, id: RecipeId) -> bool {
        self.recipe_ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.recipe_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipe_ids.is_empty()
    }

    pub fn is_loading(&self, id: RecipeId) -> bool {
        self.loading.contains(&id)
    }
}

/// What an add/remove/clear ended in
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    Applied,
    /// Add of an id already on the list; no call was made
    AlreadyListed,
    /// Remove of an id not on the list; no call was made
    NotListed,
    /// Another action for the same id (or a clear) is in flight
    Busy,
    Failed(String),
    /// The session ended before the response arrived
    Stale,
}

enum Gate {
    Go,
    Stop(ListAction),
}

#[derive(Default)]
pub struct ShoppingList {
    state: Observable<ListSnapshot>,
    // Bumped on sign-in/out; responses from an older session are dropped.
    epoch: Cell<u64>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Observable<ListSnapshot> {
        &self.state
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.state.get()
    }

    pub fn is_in_list(&self, id: RecipeId) -> bool {
        self.state.with(|s| s.contains(id))
    }

    pub fn len(&self) -> usize {
        self.state.with(ListSnapshot::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================
    // Session
    // ========================

    /// Load the persisted list after authentication.
    pub async fn sign_in(&self, api: &dyn ApiGateway) -> ListAction {
        let epoch = self.next_epoch();
        self.state.set(ListSnapshot::default());
        let result = api.shopping_list_ids().await;
        if self.epoch.get() != epoch {
            return ListAction::Stale;
        }
        match result {
            Ok(ids) => {
                info!("Shopping list loaded with {} recipes", ids.len());
                self.state.update(|s| s.recipe_ids = replace_ids(ids));
                ListAction::Applied
            }
            Err(e) => {
                warn!("Failed to load shopping list: {}", e);
                let msg = e.message();
                self.state.update(|s| s.notice = Some(ListNotice::Failed(msg.clone())));
                ListAction::Failed(msg)
            }
        }
    }

    /// Empty the list and close the panel; in-flight responses are dropped.
    pub fn sign_out(&self) {
        self.next_epoch();
        self.state.set(ListSnapshot::default());
    }

    fn next_epoch(&self) -> u64 {
        self.epoch.set(self.epoch.get() + 1);
        self.epoch.get()
    }

    // ========================
    // Panel visibility
    // ========================

    pub fn open_panel(&self) {
        self.state.update(|s| s.is_open = true);
    }

    pub fn close_panel(&self) {
        self.state.update(|s| s.is_open = false);
    }

    pub fn toggle_panel(&self) {
        self.state.update(|s| s.is_open = !s.is_open);
    }

    pub fn dismiss_notice(&self) {
        self.state.update(|s| s.notice = None);
    }

    // ========================
    // Membership
    // ========================

    pub async fn add_recipe(&self, api: &dyn ApiGateway, id: RecipeId) -> ListAction {
        let gate = self.state.update(|s| {
            if s.is_loading(id) || s.clearing {
                return Gate::Stop(ListAction::Busy);
            }
            if s.contains(id) {
                s.notice = Some(ListNotice::AlreadyOnList(id));
                return Gate::Stop(ListAction::AlreadyListed);
            }
            s.loading.insert(id);
            s.notice = None;
            Gate::Go
        });
        if let Gate::Stop(action) = gate {
            return action;
        }
        debug!("Adding recipe {} to shopping list", id);
        let epoch = self.epoch.get();
        let result = api.add_to_list(id).await;
        self.settle(epoch, id, result, apply_add)
    }

    pub async fn remove_recipe(&self, api: &dyn ApiGateway, id: RecipeId) -> ListAction {
        let gate = self.state.update(|s| {
            if s.is_loading(id) || s.clearing {
                return Gate::Stop(ListAction::Busy);
            }
            if !s.contains(id) {
                return Gate::Stop(ListAction::NotListed);
            }
            s.loading.insert(id);
            s.notice = None;
            Gate::Go
        });
        if let Gate::Stop(action) = gate {
            return action;
        }
        debug!("Removing recipe {} from shopping list", id);
        let epoch = self.epoch.get();
        let result = api.remove_from_list(id).await;
        self.settle(epoch, id, result, apply_remove)
    }

    // `expect` is the local transition the server answer should agree with.
    fn settle(
        &self,
        epoch: u64,
        id: RecipeId,
        result: ApiResult<Vec<RecipeId>>,
        expect: fn(&RecipeIds, RecipeId) -> RecipeIds,
    ) -> ListAction {
        if self.epoch.get() != epoch {
            return ListAction::Stale;
        }
        self.state.update(|s| {
            s.loading.remove(&id);
            match result {
                Ok(server) => {
                    let expected = expect(&s.recipe_ids, id);
                    let next = replace_ids(server);
                    if next != expected {
                        info!("Shopping list drifted from server: local {:?}, server {:?}", expected, next);
                    }
                    s.recipe_ids = next;
                    ListAction::Applied
                }
                Err(e) => {
                    warn!("Shopping list update for recipe {} failed: {}", id, e);
                    let msg = e.message();
                    s.notice = Some(ListNotice::Failed(msg.clone()));
                    ListAction::Failed(msg)
                }
            }
        })
    }

    pub async fn clear(&self, api: &dyn ApiGateway) -> ListAction {
        let busy = self.state.update(|s| {
            if s.clearing || !s.loading.is_empty() {
                return true;
            }
            s.clearing = true;
            s.notice = None;
            false
        });
        if busy {
            return ListAction::Busy;
        }
        let epoch = self.epoch.get();
        let result = api.clear_list().await;
        if self.epoch.get() != epoch {
            return ListAction::Stale;
        }
        self.state.update(|s| {
            s.clearing = false;
            match result {
                Ok(()) => {
                    info!("Shopping list cleared");
                    s.recipe_ids.clear();
                    ListAction::Applied
                }
                Err(e) => {
                    warn!("Failed to clear shopping list: {}", e);
                    let msg = e.message();
                    s.notice = Some(ListNotice::Failed(msg.clone()));
                    ListAction::Failed(msg)
                }
            }
        })
    }

    /// Drop a deleted recipe locally; the server already forgot it.
    pub fn evict(&self, id: RecipeId) {
        self.state.update(|s| s.recipe_ids = apply_remove(&s.recipe_ids, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::testing::{Call, MockGateway};

    fn ids(list: &ShoppingList) -> Vec<RecipeId> {
        list.snapshot().recipe_ids.into_iter().collect()
    }

    async fn signed_in(api: &MockGateway, initial: &[RecipeId]) -> ShoppingList {
        api.list_ids.borrow_mut().extend(initial.iter().copied());
        let list = ShoppingList::new();
        assert_eq!(list.sign_in(api).await, ListAction::Applied);
        list
    }

    #[tokio::test]
    async fn test_sign_in_loads_ids() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[3, 1]).await;
        assert_eq!(ids(&list), vec![1, 3]);
        assert!(!list.snapshot().is_open);
    }

    #[tokio::test]
    async fn test_add_duplicate_makes_no_call() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[5]).await;

        assert_eq!(list.add_recipe(&api, 5).await, ListAction::AlreadyListed);
        assert_eq!(api.count(|c| matches!(c, Call::Add(_))), 0);
        let snapshot = list.snapshot();
        assert_eq!(snapshot.notice, Some(ListNotice::AlreadyOnList(5)));
        assert_eq!(snapshot.notice.unwrap().message(), ALREADY_ON_LIST);
        assert_eq!(ids(&list), vec![5]);
    }

    #[tokio::test]
    async fn test_add_adopts_server_set() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[1]).await;
        // Another device added 2 in the meantime
        api.list_ids.borrow_mut().insert(2);

        assert_eq!(list.add_recipe(&api, 7).await, ListAction::Applied);
        assert_eq!(ids(&list), vec![1, 2, 7]);
        assert!(!list.snapshot().is_loading(7));
    }

    #[tokio::test]
    async fn test_concurrent_add_issues_one_request() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[]).await;
        let gate = api.hold("add");

        let (first, second) = tokio::join!(list.add_recipe(&api, 7), async {
            while api.parked() == 0 {
                tokio::task::yield_now().await;
            }
            assert!(list.snapshot().is_loading(7));
            let second = list.add_recipe(&api, 7).await;
            let _ = gate.send(());
            second
        });

        assert_eq!(first, ListAction::Applied);
        assert_eq!(second, ListAction::Busy);
        assert_eq!(api.count(|c| *c == Call::Add(7)), 1);
        assert_eq!(ids(&list), vec![7]);
    }

    #[tokio::test]
    async fn test_failed_add_leaves_set_and_sets_notice() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[1]).await;
        api.fail_next("add", ApiError::Transport("offline".into()));

        let outcome = list.add_recipe(&api, 2).await;
        assert_eq!(outcome, ListAction::Failed(crate::error::CONNECTION_FAILED.into()));
        assert_eq!(ids(&list), vec![1]);
        assert!(list.snapshot().loading.is_empty());
        assert!(matches!(list.snapshot().notice, Some(ListNotice::Failed(_))));
    }

    #[tokio::test]
    async fn test_remove() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[1, 2]).await;

        assert_eq!(list.remove_recipe(&api, 2).await, ListAction::Applied);
        assert_eq!(ids(&list), vec![1]);
        assert_eq!(list.remove_recipe(&api, 2).await, ListAction::NotListed);
        assert_eq!(api.count(|c| matches!(c, Call::Remove(_))), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_list() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[1, 2, 3]).await;
        assert_eq!(list.clear(&api).await, ListAction::Applied);
        assert!(list.is_empty());
        assert!(!list.snapshot().clearing);
    }

    #[tokio::test]
    async fn test_evict_is_synchronous() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[4, 5]).await;
        let calls_before = api.calls().len();

        list.evict(4);
        assert!(!list.is_in_list(4));
        assert_eq!(list.len(), 1);
        list.evict(42);
        assert_eq!(list.len(), 1);
        assert_eq!(api.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_sign_out_drops_late_response() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[1]).await;
        list.open_panel();
        let gate = api.hold("add");

        let (outcome, _) = tokio::join!(list.add_recipe(&api, 2), async {
            while api.parked() == 0 {
                tokio::task::yield_now().await;
            }
            list.sign_out();
            let _ = gate.send(());
        });

        assert_eq!(outcome, ListAction::Stale);
        assert_eq!(list.snapshot(), ListSnapshot::default());
    }

    #[tokio::test]
    async fn test_sign_in_after_sign_out_fetches_fresh_ids() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[1, 2]).await;
        list.sign_out();
        assert!(list.is_empty());

        // The next user's list lives on the server
        *api.list_ids.borrow_mut() = [9].into_iter().collect();
        assert_eq!(list.sign_in(&api).await, ListAction::Applied);
        assert_eq!(ids(&list), vec![9]);
        assert_eq!(api.count(|c| *c == Call::ListIds), 2);
    }

    #[tokio::test]
    async fn test_panel_visibility_and_badge_share_state() {
        let api = MockGateway::new();
        let list = signed_in(&api, &[]).await;
        let badge = std::rc::Rc::new(Cell::new(0usize));
        let sink = badge.clone();
        list.state().subscribe(move |s| sink.set(s.len()));

        list.add_recipe(&api, 8).await;
        assert_eq!(badge.get(), 1);
        list.toggle_panel();
        assert!(list.snapshot().is_open);
        list.close_panel();
        assert!(!list.snapshot().is_open);
    }
}
