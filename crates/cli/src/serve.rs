//! Daemon mode – minimal JSON-RPC-ish protocol over Unix socket.
//!
//! One request per line: `{"id": "1", "method": "draw", "params": {"guid": "..."}}`.
//! `method` is any action name; `params` are its JSON args. All connections
//! share one view, so the response fields persist across clients.

use deck_engine::types::*;
use deck_engine::{ActionRegistry, DeckView};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_daemon(socket_path: PathBuf, view: DeckView, registry: ActionRegistry) -> anyhow::Result<()> {
    // Remove stale socket if it exists
    let _ = std::fs::remove_file(&socket_path);

    let listener = UnixListener::bind(&socket_path)
        .map_err(|e| anyhow::anyhow!("cannot bind socket {}: {}", socket_path.display(), e))?;

    tracing::info!(socket = %socket_path.display(), "deckctl daemon listening");

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let (reader, mut writer) = stream.into_split();
                let mut lines = BufReader::new(reader).lines();

                while let Ok(Some(line)) = lines.next_line().await {
                    let response = handle_request(&line, &view, &registry).await;
                    let mut resp_json =
                        serde_json::to_string(&response).unwrap_or_else(|_| "{}".into());
                    resp_json.push('\n');
                    if writer.write_all(resp_json.as_bytes()).await.is_err() {
                        break;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "accept error");
            }
        }
    }
}

pub(crate) async fn handle_request(
    line: &str,
    view: &DeckView,
    registry: &ActionRegistry,
) -> DaemonResponse {
    let req: DaemonRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return DaemonResponse {
                id: "unknown".into(),
                result: None,
                error: Some(error_info(
                    ErrorCode::InvalidInput,
                    format!("invalid JSON request: {}", e),
                )),
            };
        }
    };

    if !registry.list().contains(&req.method.as_str()) {
        return DaemonResponse {
            id: req.id,
            result: None,
            error: Some(error_info(
                ErrorCode::InvalidInput,
                format!("unknown method: {}", req.method),
            )),
        };
    }

    let result = registry.execute(&req.method, &req.params, view).await;
    DaemonResponse {
        id: req.id,
        result: Some(result),
        error: None,
    }
}
