//! Shopping Panel Store
//!
//! Holds the aggregated ingredient list for the open panel, the checklist over
//! it, and the email action. It follows the list store: opening the panel or
//! changing the number of listed recipes while open triggers a fresh
//! aggregate and wipes the checklist.

use log::{debug, info, warn};
use std::cell::Cell;

use super::checklist::Checklist;
use super::list::ListSnapshot;
use crate::api::ApiGateway;
use crate::config::ClientConfig;
use crate::flash::{FlashStatus, RevertTicket};
use crate::models::Aggregate;
use crate::observable::Observable;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    /// Last aggregate that resolved; `None` before the first one
    pub aggregate: Option<Aggregate>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PanelState {
    pub fn total_items(&self) -> usize {
        self.aggregate.as_ref().map_or(0, Aggregate::total_items)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EmailStatus {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed(String),
}

impl EmailStatus {
    pub fn label(&self) -> &str {
        match self {
            EmailStatus::Idle => "Wyślij emailem",
            EmailStatus::Sending => "Wysyłanie...",
            EmailStatus::Sent => "Wysłano!",
            EmailStatus::Failed(msg) => msg,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    Applied,
    Failed(String),
    /// Panel is closed or nothing relevant changed
    Skipped,
    /// Panel closed while the request was out
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmailSend {
    Sent(RevertTicket),
    Failed(String, RevertTicket),
    /// A send is already running or the list is still loading
    Refused,
}

pub struct ShoppingPanel {
    state: Observable<PanelState>,
    checklist: Observable<Checklist>,
    email: FlashStatus<EmailStatus>,
    // Number of listed recipes last seen while open; `None` while closed.
    tracked: Cell<Option<usize>>,
    // Bumped on every close so responses for an earlier opening are dropped.
    generation: Cell<u64>,
    in_flight: Cell<usize>,
    config: ClientConfig,
}

impl ShoppingPanel {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            state: Observable::default(),
            checklist: Observable::default(),
            email: FlashStatus::new(),
            tracked: Cell::new(None),
            generation: Cell::new(0),
            in_flight: Cell::new(0),
            config,
        }
    }

    pub fn state(&self) -> &Observable<PanelState> {
        &self.state
    }

    pub fn snapshot(&self) -> PanelState {
        self.state.get()
    }

    pub fn checklist(&self) -> &Observable<Checklist> {
        &self.checklist
    }

    pub fn email_status(&self) -> &FlashStatus<EmailStatus> {
        &self.email
    }

    pub fn is_open(&self) -> bool {
        self.tracked.get().is_some()
    }

    // ========================
    // Aggregate
    // ========================

    /// Feed a list snapshot. Returns whether a new aggregate is needed, in
    /// which case the checklist has already been reset.
    pub fn observe(&self, list: &ListSnapshot) -> bool {
        if !list.is_open {
            if self.tracked.take().is_some() {
                self.generation.set(self.generation.get() + 1);
                self.in_flight.set(0);
                self.state.update(|s| s.loading = false);
            }
            return false;
        }
        let size = list.len();
        if self.tracked.replace(Some(size)) == Some(size) {
            return false;
        }
        self.checklist.update(Checklist::reset);
        true
    }

    /// `observe` then fetch when it asks for it
    pub async fn sync(&self, api: &dyn ApiGateway, list: &ListSnapshot) -> Fetch {
        if self.observe(list) {
            self.fetch_aggregate(api).await
        } else {
            Fetch::Skipped
        }
    }

    /// Request the aggregate. Responses apply in resolve order, so the last
    /// one to arrive is what the panel shows.
    pub async fn fetch_aggregate(&self, api: &dyn ApiGateway) -> Fetch {
        if !self.is_open() {
            return Fetch::Skipped;
        }
        let generation = self.generation.get();
        self.in_flight.set(self.in_flight.get() + 1);
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });
        debug!("Fetching shopping list aggregate");

        let result = api.aggregate().await;
        if self.generation.get() != generation {
            return Fetch::Discarded;
        }
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
        let still_loading = self.in_flight.get() > 0;
        match result {
            Ok(aggregate) => {
                // Keys are positional; marks on the previous shape mean nothing here
                self.checklist.update(Checklist::reset);
                self.state.update(|s| {
                    s.loading = still_loading;
                    s.aggregate = Some(aggregate);
                    s.error = None;
                });
                Fetch::Applied
            }
            Err(e) => {
                warn!("Failed to aggregate shopping list: {}", e);
                let msg = e.message();
                self.state.update(|s| {
                    s.loading = still_loading;
                    s.error = Some(msg.clone());
                });
                Fetch::Failed(msg)
            }
        }
    }

    // ========================
    // Checklist
    // ========================

    /// Flip one row of the shown aggregate; returns whether it is checked
    /// afterwards. Refused while a new aggregate is loading and for keys the
    /// shown aggregate does not have.
    pub fn toggle_item(&self, key: &str) -> bool {
        let known = self.state.with(|s| {
            !s.loading && s.aggregate.as_ref().is_some_and(|a| a.keys().iter().any(|k| k == key))
        });
        if !known {
            debug!("Ignoring checklist toggle for {}", key);
            return false;
        }
        self.checklist.update(|c| c.toggle(key))
    }

    pub fn progress(&self) -> u32 {
        let total = self.state.with(PanelState::total_items);
        self.checklist.with(|c| c.progress(total))
    }

    // ========================
    // Print & Email
    // ========================

    /// Hand the rendered list to `sink` (the host's print dialog). Refused
    /// while the aggregate is loading.
    pub fn print(&self, sink: impl FnOnce()) -> bool {
        if self.state.with(|s| s.loading) {
            return false;
        }
        sink();
        true
    }

    /// Ask the server to mail the list. The outcome stays visible for the
    /// ticket's window.
    pub async fn send_email(&self, api: &dyn ApiGateway) -> EmailSend {
        if self.email.get() == EmailStatus::Sending || self.state.with(|s| s.loading) {
            return EmailSend::Refused;
        }
        self.email.set(EmailStatus::Sending);
        match api.email_list().await {
            Ok(()) => {
                info!("Shopping list emailed");
                EmailSend::Sent(self.email.show_for(EmailStatus::Sent, self.config.email_sent_window()))
            }
            Err(e) => {
                warn!("Failed to email shopping list: {}", e);
                let msg = e.message();
                let ticket = self
                    .email
                    .show_for(EmailStatus::Failed(msg.clone()), self.config.email_error_window());
                EmailSend::Failed(msg, ticket)
            }
        }
    }
}
