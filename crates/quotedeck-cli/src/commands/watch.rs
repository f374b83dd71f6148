use std::io::{self, Write};
use std::time::Duration;

use quotedeck_core::{FetchError, MarketStore, Session, TrackOutcome};
use serde_json::json;
use tracing::info;

use crate::cli::WatchArgs;
use crate::error::CliError;
use crate::output::stream_writer::{NdjsonStreamWriter, StreamEventError};

use super::quote::parse_symbols;

/// Tracks the symbols, then writes one `chunk` event per store change until
/// the duration elapses or the process is interrupted.
pub async fn run(args: &WatchArgs, store: &MarketStore) -> Result<(), CliError> {
    let symbols = parse_symbols(&args.symbols)?.unique;
    let stdout = io::stdout();
    let mut writer = NdjsonStreamWriter::new(stdout.lock());

    writer.emit_start(Some(json!({
        "symbols": symbols.iter().map(|symbol| symbol.as_str()).collect::<Vec<_>>(),
        "duration_secs": args.duration_secs,
        "untracked_policy": store.untracked_policy(),
    })))?;

    let tracked = report_tracking(&mut writer, store.track_many(&symbols).await)?;

    if let Some(token) = &args.token {
        if let Err(error) = store.load_watchlist(&Session::from_token(token.as_str())).await {
            writer.emit_error(StreamEventError::new(error.code(), error.message()), None)?;
        }
    }

    let mut changes = store.subscribe();
    let initial = serde_json::to_value(&*changes.borrow_and_update())?;
    writer.emit_chunk(Some(initial))?;

    let deadline = tokio::time::sleep(Duration::from_secs(args.duration_secs));
    tokio::pin!(deadline);
    let mut updates = 0_u64;
    let reason = loop {
        tokio::select! {
            _ = &mut deadline => break "duration_elapsed",
            _ = tokio::signal::ctrl_c() => break "interrupted",
            changed = changes.changed() => {
                if changed.is_err() {
                    break "store_closed";
                }
                let snapshot = serde_json::to_value(&*changes.borrow_and_update())?;
                writer.emit_chunk(Some(snapshot))?;
                updates += 1;
            }
        }
    };

    info!(reason, updates, "watch finished");
    store.shutdown().await;
    writer.emit_end(Some(json!({
        "reason": reason,
        "updates": updates,
        "tracked": tracked,
    })))?;
    Ok(())
}

/// Emits one `error` event per failed symbol and returns how many were
/// tracked. When none were, the stream is closed with an `all_failed` end
/// event and the first failure is returned.
fn report_tracking<W: Write>(
    writer: &mut NdjsonStreamWriter<W>,
    outcomes: Vec<TrackOutcome>,
) -> Result<usize, CliError> {
    let mut first_failure: Option<FetchError> = None;
    let mut tracked = 0_usize;
    for outcome in outcomes {
        match outcome.result {
            Ok(_) => tracked += 1,
            Err(error) => {
                writer.emit_error(
                    StreamEventError::new(error.code(), error.message()),
                    Some(json!({ "symbol": outcome.symbol.as_str() })),
                )?;
                first_failure.get_or_insert(error);
            }
        }
    }

    match first_failure {
        Some(error) if tracked == 0 => {
            writer.emit_end(Some(json!({
                "reason": "all_failed",
                "updates": 0,
                "tracked": 0,
            })))?;
            Err(error.into())
        }
        _ => Ok(tracked),
    }
}
