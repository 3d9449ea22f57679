//! In-memory [`DeckApi`] for unit tests.

use crate::query::{add_query_params, DeckQuery};
use crate::traits::*;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;

/// Echoes its inputs back as JSON and records every call as
/// `"<op>:<guid>:<query>"` (create has no guid segment).
pub struct FakeDeckApi {
    create_body: Option<Value>,
    open_fails: bool,
    draw_status: Option<u16>,
    delay: Option<(String, Duration)>,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeDeckApi {
    fn default() -> Self {
        Self {
            create_body: None,
            open_fails: false,
            draw_status: None,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeDeckApi {
    pub fn with_create_body(mut self, body: Value) -> Self {
        self.create_body = Some(body);
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.open_fails = true;
        self
    }

    pub fn with_draw_status(mut self, status: u16) -> Self {
        self.draw_status = Some(status);
        self
    }

    /// Sleep before answering any call whose guid equals `guid`.
    pub fn with_delay(mut self, guid: &str, delay: Duration) -> Self {
        self.delay = Some((guid.to_string(), delay));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String, guid: &str) {
        self.calls.lock().unwrap().push(call);
        if let Some((slow, delay)) = &self.delay {
            if slow == guid {
                tokio::time::sleep(*delay).await;
            }
        }
    }
}

#[async_trait::async_trait]
impl DeckApi for FakeDeckApi {
    async fn create(&self, query: &DeckQuery) -> ApiResult<Value> {
        let q = add_query_params("", query);
        self.enter(format!("create:{}", q), "").await;
        Ok(self.create_body.clone().unwrap_or_else(|| {
            json!({
                "deck_id": "00000000-0000-0000-0000-000000000001",
                "shuffled": query.shuffled,
                "remaining": 52,
            })
        }))
    }

    async fn open(&self, guid: &str) -> ApiResult<Value> {
        self.enter(format!("open:{}", guid), guid).await;
        if self.open_fails {
            return Err(ApiError::Network(format!(
                "GET http://localhost:8000/open/{}: connection refused",
                guid
            )));
        }
        Ok(json!({ "deck_id": guid, "cards": [] }))
    }

    async fn draw(&self, guid: &str, query: &DeckQuery) -> ApiResult<Value> {
        let q = add_query_params("", query);
        self.enter(format!("draw:{}:{}", guid, q), guid).await;
        if let Some(status) = self.draw_status {
            return Err(ApiError::Status {
                status,
                body: Value::String("deck not found".into()),
            });
        }
        Ok(json!({ "deck_id": guid, "query": q }))
    }
}
