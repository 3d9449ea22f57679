//! Query-string construction shared by `create` and `draw`.

use serde::{Deserialize, Serialize};

/// Optional deck parameters, as typed by the user.
///
/// Nothing here is validated: `cards` is passed through verbatim and the
/// backend decides what a valid selection or count is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckQuery {
    #[serde(default)]
    pub cards: String,
    #[serde(default)]
    pub shuffled: bool,
    #[serde(default)]
    pub count: u32,
}

impl DeckQuery {
    pub fn with_count(count: u32) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }
}

/// Append the non-default parameters of `query` to `path`.
///
/// Order is always `cards`, `shuffled`, `count`. Values are not
/// percent-encoded.
pub fn add_query_params(path: &str, query: &DeckQuery) -> String {
    let mut params: Vec<String> = Vec::with_capacity(3);
    if !query.cards.is_empty() {
        params.push(format!("cards={}", query.cards));
    }
    if query.shuffled {
        params.push("shuffled=true".to_string());
    }
    if query.count > 0 {
        params.push(format!("count={}", query.count));
    }

    if params.is_empty() {
        return path.to_string();
    }
    format!("{}?{}", path, params.join("&"))
}
