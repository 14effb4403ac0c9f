//! Batch validation for publish requests.
//!
//! A batch is accepted or rejected as a whole: the first item that fails to
//! parse or validate is reported as `failed` and every other item as
//! `aborted`, so nothing from a bad batch is appended.

use serde::Serialize;
use serde_json::Value;

use crate::validation::orchestrator::EventTypeValidator;
use crate::{log_info, log_warn};

use super::context::PublishContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishingStatus {
    /// Passed the gate; ready to be appended.
    Validated,
    Failed,
    Aborted,
}

/// Step at which processing of an item stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    None,
    Validating,
}

/// Outcome for one event of the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItemResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eid: Option<String>,
    pub publishing_status: PublishingStatus,
    pub step: Step,
    pub detail: String,
}

impl BatchItemResponse {
    fn new(eid: Option<String>, publishing_status: PublishingStatus, step: Step, detail: String) -> Self {
        Self {
            eid,
            publishing_status,
            step,
            detail,
        }
    }
}

/// Result of validating a batch.
#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub flow_id: String,
    pub received_count: usize,
    pub accepted: bool,
    pub items: Vec<BatchItemResponse>,
}

/// Validate every event of a publish batch.
pub fn process_batch(
    ctx: &PublishContext,
    validator: &EventTypeValidator,
    events: Vec<String>,
) -> BatchResult {
    let log_ctx = ctx.log_context();
    let mut items = Vec::with_capacity(events.len());
    let mut failure: Option<usize> = None;

    for (index, raw) in events.iter().enumerate() {
        if failure.is_some() {
            items.push(BatchItemResponse::new(
                peek_eid(raw),
                PublishingStatus::Aborted,
                Step::None,
                String::new(),
            ));
            continue;
        }

        let (eid, error) = match serde_json::from_str::<Value>(raw) {
            Ok(event) => (eid_of(&event), validator.validate(&event).map(|e| e.to_string())),
            Err(e) => (None, Some(format!("failed to parse event: {}", e))),
        };

        match error {
            Some(detail) => {
                log_warn!(
                    log_ctx,
                    "EVENT_REJECTED",
                    index = index,
                    eid = eid.as_deref().unwrap_or("unknown"),
                    detail = detail,
                );
                items.push(BatchItemResponse::new(
                    eid,
                    PublishingStatus::Failed,
                    Step::Validating,
                    detail,
                ));
                failure = Some(index);
            }
            None => items.push(BatchItemResponse::new(
                eid,
                PublishingStatus::Validated,
                Step::Validating,
                String::new(),
            )),
        }
    }

    // Items validated before the failure are aborted along with the rest.
    if let Some(failed_index) = failure {
        for item in items.iter_mut().take(failed_index) {
            item.publishing_status = PublishingStatus::Aborted;
            item.step = Step::None;
        }
    }

    log_info!(
        log_ctx,
        "BATCH_VALIDATED",
        received = events.len(),
        accepted = failure.is_none(),
        failed_index = failure,
    );

    BatchResult {
        flow_id: ctx.flow_id.clone(),
        received_count: events.len(),
        accepted: failure.is_none(),
        items,
    }
}

fn eid_of(event: &Value) -> Option<String> {
    event
        .pointer("/metadata/eid")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

/// Best-effort eid of an item that is not going to be validated.
fn peek_eid(raw: &str) -> Option<String> {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|event| eid_of(&event))
}
