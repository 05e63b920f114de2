use chrono::Utc;
use tracing::{debug, warn};

use crate::api::{ApiError, ApiResult, StoreApi};
use crate::fallback;
use crate::model::{Feedback, FeedbackDraft, Product};

/// Identifies one request issued for one detail mount.
///
/// A ticket is current only while its generation matches the controller's;
/// every `begin_load` and `deactivate` moves the generation forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub generation: u64,
    pub product_id: String,
}

pub type DetailOutcome = ApiResult<(Product, Vec<Feedback>)>;

/// Fetch product and feedback concurrently; both settle before returning.
pub async fn fetch_detail(api: &dyn StoreApi, product_id: &str) -> DetailOutcome {
    let (product, feedback) = tokio::join!(api.get_product(product_id), api.list_feedback(product_id));
    Ok((product?, feedback?))
}

/// Post the draft, then refetch. The refetch only starts once the post has succeeded.
pub async fn submit_and_refresh(api: &dyn StoreApi, draft: &FeedbackDraft) -> ApiResult<Vec<Feedback>> {
    api.submit_feedback(draft).await?;
    api.list_feedback(draft.product_id()).await
}

/// State behind the product detail screen.
#[derive(Debug, Default)]
pub struct DetailController {
    product_id: Option<String>,
    product: Option<Product>,
    feedback: Vec<Feedback>,
    loading: bool,
    submitting: bool,
    error: Option<String>,
    generation: u64,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.generation
            && self.product_id.as_deref() == Some(ticket.product_id.as_str())
    }

    /// Mount the view for `product_id`, invalidating anything still in flight.
    pub fn begin_load(&mut self, product_id: &str) -> RequestTicket {
        self.generation += 1;
        self.product_id = Some(product_id.to_string());
        self.product = None;
        self.feedback.clear();
        self.loading = true;
        self.submitting = false;
        self.error = None;
        self.ticket()
    }

    /// Unmount. Results for the previous product will be discarded.
    pub fn deactivate(&mut self) {
        self.generation += 1;
        self.product_id = None;
        self.loading = false;
        self.submitting = false;
    }

    /// Apply a settled load. Returns `false` when the ticket is stale.
    pub fn finish_load(&mut self, ticket: &RequestTicket, outcome: DetailOutcome) -> bool {
        if !self.is_current(ticket) {
            debug!(
                product_id = %ticket.product_id,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale detail response"
            );
            return false;
        }
        match outcome {
            Ok((product, feedback)) => {
                self.product = Some(product);
                self.feedback = feedback;
                self.error = None;
            }
            Err(e) => {
                warn!(product_id = %ticket.product_id, error = %e, "Detail fetch failed, showing sample content");
                self.product = Some(fallback::product(&ticket.product_id));
                self.feedback = fallback::feedback(&ticket.product_id, Utc::now());
                self.error = Some(fallback::DETAIL_NOTICE.to_string());
            }
        }
        self.loading = false;
        true
    }

    /// Validate the form and enter the submitting state.
    ///
    /// Fails without side effects if nothing is mounted or still loading,
    /// if a submission is already running, or if a field is blank after trimming.
    pub fn begin_submit(&mut self, name: &str, message: &str) -> ApiResult<(RequestTicket, FeedbackDraft)> {
        let product_id = self
            .product_id
            .as_deref()
            .ok_or_else(|| ApiError::Validation("No product selected".to_string()))?;
        // A pending load would overwrite the refreshed list when it settles.
        if self.loading || self.product.is_none() {
            return Err(ApiError::Validation("Product is still loading".to_string()));
        }
        if self.submitting {
            return Err(ApiError::Validation("A submission is already in progress".to_string()));
        }
        let draft = FeedbackDraft::new(product_id, name, message)?;
        self.submitting = true;
        Ok((self.ticket(), draft))
    }

    /// Apply a settled submission.
    ///
    /// `None` means the ticket was stale and nothing changed. Otherwise the
    /// feedback list is replaced on success and left untouched on failure,
    /// and the error is handed back to the form.
    pub fn finish_submit(
        &mut self,
        ticket: &RequestTicket,
        result: ApiResult<Vec<Feedback>>,
    ) -> Option<ApiResult<()>> {
        if !self.is_current(ticket) {
            debug!(product_id = %ticket.product_id, "Discarding stale submission result");
            return None;
        }
        self.submitting = false;
        Some(result.map(|feedback| {
            self.feedback = feedback;
        }))
    }

    /// Load inline.
    pub async fn load(&mut self, api: &dyn StoreApi, product_id: &str) {
        let ticket = self.begin_load(product_id);
        let outcome = fetch_detail(api, product_id).await;
        self.finish_load(&ticket, outcome);
    }

    /// Submit inline. Validation failures return before any network call.
    pub async fn submit(&mut self, api: &dyn StoreApi, name: &str, message: &str) -> ApiResult<()> {
        let (ticket, draft) = self.begin_submit(name, message)?;
        let result = submit_and_refresh(api, &draft).await;
        self.finish_submit(&ticket, result).unwrap_or(Ok(()))
    }

    fn ticket(&self) -> RequestTicket {
        RequestTicket {
            generation: self.generation,
            product_id: self.product_id.clone().unwrap_or_default(),
        }
    }
}
