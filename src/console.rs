//! Stdin listener. Parses each line and forwards edits to the main loop.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::Sender;
use tracing::warn;

use crate::parser::parse_edit;
use crate::types::Edit;

pub async fn run(tx: Sender<Edit>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_edit(&line) {
            Some(edit) => {
                let quit = edit == Edit::Quit;
                if tx.send(edit).await.is_err() || quit {
                    return Ok(());
                }
            }
            None => warn!("Unrecognized input: {} (type `help`)", line.trim()),
        }
    }
    // EOF behaves like quit.
    let _ = tx.send(Edit::Quit).await;
    Ok(())
}
