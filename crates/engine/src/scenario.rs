//! Scenario runner – execute scripted create/open/draw flows from YAML.

use crate::commands::{run_action, Action};
use crate::types::*;
use crate::view::DeckView;
use serde_json::Value;

/// Placeholder guid replaced by the `deck_id` of the last successful create.
pub const LAST_DECK: &str = "$last_deck";

/// Load a scenario from a YAML string.
pub fn load_scenario(yaml: &str) -> Result<Scenario, String> {
    serde_yaml::from_str(yaml).map_err(|e| format!("failed to parse scenario YAML: {}", e))
}

/// Execute a scenario step by step against `view` and return the overall
/// result. Steps run sequentially; a failing step does not stop the run.
pub async fn run_scenario(scenario: &Scenario, view: &DeckView) -> ScenarioResult {
    let mut step_results = Vec::new();
    let mut overall = Status::Pass;
    let mut last_deck: Option<String> = None;

    for (i, step) in scenario.steps.iter().enumerate() {
        let result = match resolve_args(&step.args, last_deck.as_deref())
            .and_then(|args| Action::from_call(&step.call, &args).map_err(|e| e.to_error_info()))
        {
            Ok(action) => run_action(&action, view).await,
            Err(info) => result_err(&step.call, "", &new_run_id(), 0, info),
        };

        if result.status == Status::Pass && step.call == "create" {
            if let Some(id) = result
                .data
                .as_ref()
                .and_then(|d| d.get("deck_id"))
                .and_then(|v| v.as_str())
            {
                last_deck = Some(id.to_string());
            }
        }

        let actual_status = result.status.as_str();
        if actual_status != step.expect_status {
            tracing::warn!(
                step = i,
                expected = %step.expect_status,
                actual = %actual_status,
                "scenario step status mismatch"
            );
            overall = Status::Fail;
        }
        step_results.push(result);
    }

    ScenarioResult {
        name: scenario.name.clone(),
        overall_status: overall,
        step_results,
    }
}

fn resolve_args(args: &Value, last_deck: Option<&str>) -> Result<Value, ErrorInfo> {
    if args.get("guid").and_then(|v| v.as_str()) != Some(LAST_DECK) {
        return Ok(args.clone());
    }
    let Some(id) = last_deck else {
        return Err(error_info(
            ErrorCode::InvalidInput,
            format!("{} used before any successful create", LAST_DECK),
        ));
    };
    let mut resolved = args.clone();
    resolved["guid"] = Value::String(id.to_string());
    Ok(resolved)
}
