use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

use crate::api::{ApiResult, StoreApi};
use crate::detail::{self, DetailOutcome, RequestTicket};
use crate::model::{Feedback, FeedbackDraft, Product};

/// Settlement of a background request, delivered to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    CatalogLoaded {
        mount: u64,
        result: ApiResult<Vec<Product>>,
    },
    DetailLoaded {
        ticket: RequestTicket,
        outcome: DetailOutcome,
    },
    FeedbackSubmitted {
        ticket: RequestTicket,
        result: ApiResult<Vec<Feedback>>,
    },
}

/// Launches network work on the runtime and reports each result as exactly one event.
#[derive(Clone)]
pub struct TaskRunner {
    api: Arc<dyn StoreApi>,
    events_tx: UnboundedSender<AppEvent>,
}

impl TaskRunner {
    pub fn new(api: Arc<dyn StoreApi>) -> (Self, UnboundedReceiver<AppEvent>) {
        let (events_tx, events_rx) = unbounded_channel();
        (Self { api, events_tx }, events_rx)
    }

    pub fn load_catalog(&self, mount: u64) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.list_products().await;
            send(&tx, AppEvent::CatalogLoaded { mount, result });
        });
    }

    pub fn load_detail(&self, ticket: RequestTicket) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = detail::fetch_detail(api.as_ref(), &ticket.product_id).await;
            send(&tx, AppEvent::DetailLoaded { ticket, outcome });
        });
    }

    pub fn submit_feedback(&self, ticket: RequestTicket, draft: FeedbackDraft) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = detail::submit_and_refresh(api.as_ref(), &draft).await;
            send(&tx, AppEvent::FeedbackSubmitted { ticket, result });
        });
    }
}

fn send(tx: &UnboundedSender<AppEvent>, event: AppEvent) {
    // The receiver is gone once the UI loop has exited.
    if tx.send(event).is_err() {
        debug!("UI loop closed, dropping task result");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeStoreApi, product};

    #[tokio::test]
    async fn test_catalog_task_reports_once() {
        let api = Arc::new(FakeStoreApi::with_products(vec![product("1", "Honey", "X", "Honey")]));
        let (tasks, mut rx) = TaskRunner::new(api.clone());

        tasks.load_catalog(7);
        match rx.recv().await {
            Some(AppEvent::CatalogLoaded { mount, result }) => {
                assert_eq!(mount, 7);
                assert_eq!(result.unwrap().len(), 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(FakeStoreApi::calls(&api.list_products_calls), 1);
    }

    #[tokio::test]
    async fn test_detail_task_carries_ticket() {
        let api = Arc::new(FakeStoreApi::with_products(vec![product("1", "Honey", "X", "Honey")]));
        let (tasks, mut rx) = TaskRunner::new(api);
        let ticket = RequestTicket {
            generation: 3,
            product_id: "1".to_string(),
        };

        tasks.load_detail(ticket.clone());
        match rx.recv().await {
            Some(AppEvent::DetailLoaded { ticket: got, outcome }) => {
                assert_eq!(got, ticket);
                let (product, feedback) = outcome.unwrap();
                assert_eq!(product.id, "1");
                assert!(feedback.is_empty());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_task_posts_before_refetching() {
        let api = Arc::new(FakeStoreApi::default());
        let (tasks, mut rx) = TaskRunner::new(api.clone());
        let ticket = RequestTicket {
            generation: 1,
            product_id: "1".to_string(),
        };
        let draft = FeedbackDraft::new("1", "Ann", "Great!").unwrap();

        tasks.submit_feedback(ticket, draft);
        match rx.recv().await {
            Some(AppEvent::FeedbackSubmitted { result, .. }) => {
                let feedback = result.unwrap();
                assert_eq!(feedback.len(), 1);
                assert_eq!(feedback[0].message, "Great!");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(FakeStoreApi::calls(&api.submit_calls), 1);
        assert_eq!(FakeStoreApi::calls(&api.list_feedback_calls), 1);
    }
}
