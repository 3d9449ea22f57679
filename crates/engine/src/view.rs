//! Headless view model: three actions, three response fields.
//!
//! Each action writes only its own field, whatever the outcome. Success
//! stores the compact JSON body; failure stores the serialized
//! [`ErrorInfo`](crate::types::ErrorInfo). Overlapping calls on the same
//! field resolve as last-completed-wins.

use crate::query::DeckQuery;
use crate::traits::{ApiResult, DeckApi};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tokio::task::JoinHandle;

/// Which response field an action owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Create,
    Open,
    Draw,
}

/// Editable inputs bound to the three actions. `guid` is shared by open
/// and draw; `query` belongs to create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewInputs {
    #[serde(default)]
    pub guid: String,
    #[serde(flatten)]
    pub query: DeckQuery,
    #[serde(default)]
    pub draw_count: u32,
}

impl ViewInputs {
    pub fn draw_query(&self) -> DeckQuery {
        DeckQuery::with_count(self.draw_count)
    }
}

/// Point-in-time copy of the three response fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub create: Option<String>,
    pub open: Option<String>,
    pub draw: Option<String>,
}

#[derive(Default)]
struct ResponseSlot(RwLock<Option<String>>);

impl ResponseSlot {
    fn set(&self, text: String) {
        let mut guard = self.0.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(text);
    }

    fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[derive(Default)]
struct Slots {
    create: ResponseSlot,
    open: ResponseSlot,
    draw: ResponseSlot,
}

/// Cheap to clone; clones share the same response fields.
#[derive(Clone)]
pub struct DeckView {
    api: Arc<dyn DeckApi>,
    slots: Arc<Slots>,
}

impl DeckView {
    pub fn new(api: Arc<dyn DeckApi>) -> Self {
        Self {
            api,
            slots: Arc::new(Slots::default()),
        }
    }

    pub async fn create(&self, query: &DeckQuery) -> ApiResult<Value> {
        let result = self.api.create(query).await;
        self.record(Field::Create, &result);
        result
    }

    /// `guid` is sent exactly as given.
    pub async fn open(&self, guid: &str) -> ApiResult<Value> {
        let result = self.api.open(guid).await;
        self.record(Field::Open, &result);
        result
    }

    pub async fn draw(&self, guid: &str, query: &DeckQuery) -> ApiResult<Value> {
        let result = self.api.draw(guid, query).await;
        self.record(Field::Draw, &result);
        result
    }

    // -----------------------------------------------------------------------
    // Fire-and-forget dispatch
    // -----------------------------------------------------------------------

    pub fn spawn_create(&self, query: DeckQuery) -> JoinHandle<()> {
        let view = self.clone();
        tokio::spawn(async move {
            let _ = view.create(&query).await;
        })
    }

    pub fn spawn_open(&self, guid: String) -> JoinHandle<()> {
        let view = self.clone();
        tokio::spawn(async move {
            let _ = view.open(&guid).await;
        })
    }

    pub fn spawn_draw(&self, guid: String, query: DeckQuery) -> JoinHandle<()> {
        let view = self.clone();
        tokio::spawn(async move {
            let _ = view.draw(&guid, &query).await;
        })
    }

    // -----------------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------------

    pub fn response(&self, field: Field) -> Option<String> {
        self.slot(field).get()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            create: self.slots.create.get(),
            open: self.slots.open.get(),
            draw: self.slots.draw.get(),
        }
    }

    fn slot(&self, field: Field) -> &ResponseSlot {
        match field {
            Field::Create => &self.slots.create,
            Field::Open => &self.slots.open,
            Field::Draw => &self.slots.draw,
        }
    }

    fn record(&self, field: Field, result: &ApiResult<Value>) {
        let text = match result {
            Ok(body) => body.to_string(),
            Err(e) => {
                tracing::debug!(?field, error = %e, "action failed");
                serde_json::to_string(&e.to_error_info()).unwrap_or_else(|_| e.to_string())
            }
        };
        self.slot(field).set(text);
    }
}
