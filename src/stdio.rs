//! Stdio transport
//!
//! Serves a single long-lived session over newline-delimited JSON-RPC: one
//! message per line on stdin, replies and notifications one per line on
//! stdout. The session lives until stdin reaches end of file.

use crate::mcp::helpers::rpc_error;
use crate::mcp::models::PARSE_ERROR;
use crate::mcp::ProtocolEngine;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast::error::RecvError, mpsc};

/// Drives `engine` from `input` until end of file, writing to `output`.
///
/// Replies and engine notifications share one writer task so lines never
/// interleave.
pub async fn serve<R, W>(engine: ProtocolEngine, input: R, output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();

    let writer = tokio::spawn(async move {
        let mut output = output;
        while let Some(message) = rx.recv().await {
            let mut line = message.to_string();
            line.push('\n');
            output.write_all(line.as_bytes()).await?;
            output.flush().await?;
        }
        Ok::<(), std::io::Error>(())
    });

    engine.listen_for_catalog_changes();
    let mut notifications = engine.subscribe();
    let pushed = tx.clone();
    tokio::spawn(async move {
        loop {
            match notifications.recv().await {
                Ok(notification) => {
                    if pushed.send(notification).is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "stdio notification stream lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    tracing::info!("stdio session started");
    let mut lines = input.lines();
    let result = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Value>(&line) {
            Ok(message) => engine.handle(message).await,
            Err(e) => {
                tracing::warn!(error = %e, "stdio parse error");
                Some(rpc_error(Value::Null, PARSE_ERROR, "Parse error"))
            }
        };
        if let Some(reply) = reply {
            if tx.send(reply).is_err() {
                break Ok(());
            }
        }
    };

    // Closing the engine ends the notification forwarder, which releases
    // the last sender and lets the writer drain and exit.
    engine.close();
    drop(engine);
    drop(tx);
    tracing::info!("stdio session closed");

    match writer.await {
        Ok(written) => result.and(written),
        Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e)),
    }
}
