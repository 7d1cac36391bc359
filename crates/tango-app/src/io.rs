use std::io::BufRead;
use std::thread::JoinHandle;

use kanal::{AsyncSender, Sender};
use tango_types::{AppEvent, TextSource};
use tokio_util::sync::CancellationToken;

/// Forward learner input from stdin to the event loop.
///
/// Runs on a plain thread: a blocking stdin read cannot be cancelled, and the
/// runtime must not wait on it at shutdown.
pub fn watcher_io(
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<JoinHandle<()>> {
    let event_tx = event_tx.to_sync();

    let handle = std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            if let Err(e) = read_lines(stdin.lock(), &cancel, &event_tx) {
                tracing::error!("Input reader failed: {}", e);
            }
            tracing::info!("Input reader stopping");
        })?;

    Ok(handle)
}

/// One event per line: an empty line cancels the attempt in flight, EOF shuts down
pub fn read_lines<R: BufRead>(
    reader: R,
    cancel: &CancellationToken,
    event_tx: &Sender<AppEvent>,
) -> anyhow::Result<()> {
    for line in reader.lines() {
        if cancel.is_cancelled() {
            return Ok(());
        }

        let text = line?;
        let event = if text.trim().is_empty() {
            AppEvent::CancelAttempt
        } else {
            AppEvent::TextInput {
                text,
                source: TextSource::Keyboard,
            }
        };

        if let Err(e) = event_tx.send(event) {
            tracing::debug!("App no longer listening: {}", e);
            return Ok(());
        }
    }

    if !cancel.is_cancelled() {
        tracing::info!("Input closed");
        let _ = event_tx.send(AppEvent::Shutdown);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_lines_become_events() {
        let (tx, rx) = kanal::unbounded::<AppEvent>();
        let cancel = CancellationToken::new();

        read_lines(Cursor::new("the cat sat\n  \n3 7\n"), &cancel, &tx).unwrap();

        let events: Vec<AppEvent> = std::iter::from_fn(|| rx.try_recv().ok().flatten()).collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            &events[0],
            AppEvent::TextInput { text, source: TextSource::Keyboard } if text == "the cat sat"
        ));
        assert!(matches!(events[1], AppEvent::CancelAttempt));
        assert!(matches!(&events[2], AppEvent::TextInput { text, .. } if text == "3 7"));
        assert!(matches!(events[3], AppEvent::Shutdown));
    }

    #[test]
    fn test_cancelled_reader_sends_nothing() {
        let (tx, rx) = kanal::unbounded::<AppEvent>();
        let cancel = CancellationToken::new();
        cancel.cancel();

        read_lines(Cursor::new("ignored\n"), &cancel, &tx).unwrap();
        assert!(rx.try_recv().unwrap().is_none());
    }
}
