//! Named actions – `create`, `open`, `draw` addressed by name with JSON args.
//!
//! Used wherever actions arrive as data rather than as typed calls
//! (scenario files, the daemon socket).

use crate::query::DeckQuery;
use crate::types::*;
use crate::view::DeckView;
use serde_json::Value;
use std::time::Instant;

/// Every action name, sorted.
pub const ACTION_NAMES: [&str; 3] = ["create", "draw", "open"];

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown action: {0} (available: create, open, draw)")]
    UnknownAction(String),
}

impl CommandError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CommandError::InvalidInput(_) | CommandError::UnknownAction(_) => {
                ErrorCode::InvalidInput
            }
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        error_info(self.error_code(), self.to_string())
    }
}

/// A fully parsed action, ready to run against a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create(DeckQuery),
    Open { guid: String },
    Draw { guid: String, query: DeckQuery },
}

impl Action {
    /// Parse an action from its name and JSON args.
    ///
    /// Args: `create` takes `{cards?, shuffled?, count?}`, `open` takes
    /// `{guid}`, `draw` takes `{guid, cards?, shuffled?, count?}`. A null
    /// args value counts as `{}`.
    pub fn from_call(name: &str, args: &Value) -> Result<Action, CommandError> {
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args.clone()
        };

        match name {
            "create" => Ok(Action::Create(parse_query(&args)?)),
            "open" => Ok(Action::Open {
                guid: required_guid(&args)?,
            }),
            "draw" => Ok(Action::Draw {
                guid: required_guid(&args)?,
                query: parse_query(&args)?,
            }),
            other => Err(CommandError::UnknownAction(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Create(_) => "create",
            Action::Open { .. } => "open",
            Action::Draw { .. } => "draw",
        }
    }

    pub fn guid(&self) -> &str {
        match self {
            Action::Create(_) => "",
            Action::Open { guid } | Action::Draw { guid, .. } => guid,
        }
    }
}

fn parse_query(args: &Value) -> Result<DeckQuery, CommandError> {
    serde_json::from_value(args.clone())
        .map_err(|e| CommandError::InvalidInput(format!("bad deck parameters: {}", e)))
}

fn required_guid(args: &Value) -> Result<String, CommandError> {
    args.get("guid")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| CommandError::InvalidInput("missing 'guid' string field".into()))
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Front door for name-addressed actions.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActionRegistry;

impl ActionRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> Vec<&'static str> {
        ACTION_NAMES.to_vec()
    }

    /// Parse and run an action by name, returning a full ActionResult.
    /// Parse failures never reach the backend or the view.
    pub async fn execute(&self, name: &str, args: &Value, view: &DeckView) -> ActionResult {
        match Action::from_call(name, args) {
            Ok(action) => run_action(&action, view).await,
            Err(e) => result_err(name, "", &new_run_id(), 0, e.to_error_info()),
        }
    }
}

/// Run `action` through `view` so its response field is updated, and time it.
pub async fn run_action(action: &Action, view: &DeckView) -> ActionResult {
    let run_id = new_run_id();
    let start = Instant::now();

    let outcome = match action {
        Action::Create(query) => view.create(query).await,
        Action::Open { guid } => view.open(guid).await,
        Action::Draw { guid, query } => view.draw(guid, query).await,
    };
    let total_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(body) => {
            let mut r = result_ok(action.name(), action.guid(), &run_id, total_ms);
            r.data = Some(body);
            r
        }
        Err(e) => result_err(action.name(), action.guid(), &run_id, total_ms, e.to_error_info()),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDeckApi;
    use crate::view::Field;
    use serde_json::json;
    use std::sync::Arc;

    fn view() -> DeckView {
        DeckView::new(Arc::new(FakeDeckApi::default()))
    }

    #[test]
    fn test_parse_create_with_partial_args() {
        let action = Action::from_call("create", &json!({ "shuffled": true })).unwrap();
        assert_eq!(
            action,
            Action::Create(DeckQuery {
                cards: String::new(),
                shuffled: true,
                count: 0,
            })
        );
        assert_eq!(Action::from_call("create", &Value::Null).unwrap().guid(), "");
    }

    #[test]
    fn test_parse_draw_requires_guid() {
        let err = Action::from_call("draw", &json!({ "count": 2 })).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidInput);

        let action = Action::from_call("draw", &json!({ "guid": "abc", "count": 2 })).unwrap();
        assert_eq!(
            action,
            Action::Draw {
                guid: "abc".into(),
                query: DeckQuery::with_count(2),
            }
        );
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(Action::from_call("create", &json!({ "count": "three" })).is_err());
    }

    #[tokio::test]
    async fn test_execute_updates_view_and_returns_body() {
        let view = view();
        let reg = ActionRegistry::new();

        let r = reg.execute("open", &json!({ "guid": "abc" }), &view).await;

        assert_eq!(r.status, Status::Pass);
        assert_eq!(r.target, "abc");
        assert_eq!(r.data.unwrap()["deck_id"], "abc");
        assert!(view.response(Field::Open).is_some());
    }

    #[tokio::test]
    async fn test_execute_backend_error() {
        let view = DeckView::new(Arc::new(FakeDeckApi::default().with_draw_status(404)));
        let r = ActionRegistry::new()
            .execute("draw", &json!({ "guid": "gone" }), &view)
            .await;

        assert_eq!(r.status, Status::Error);
        assert_eq!(r.error.unwrap().code, ErrorCode::HttpStatus);
        assert!(view.response(Field::Draw).unwrap().contains("HTTP_STATUS"));
    }

    #[tokio::test]
    async fn test_unknown_action_skips_view() {
        let view = view();
        let r = ActionRegistry::new().execute("shuffle", &json!({}), &view).await;

        assert_eq!(r.status, Status::Error);
        assert_eq!(r.error.unwrap().code, ErrorCode::InvalidInput);
        assert_eq!(view.snapshot(), Default::default());
    }

    #[test]
    fn test_list_actions() {
        let names = ActionRegistry::new().list();
        assert_eq!(names, vec!["create", "draw", "open"]);
    }
}
