use crossterm::event::EventStream;
use futures_util::StreamExt;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use crate::event::DomainEvent;
use crate::nav::Ticket;
use crate::playback::{MediaSignal, PendingPlay};
use crate::session::CatalogHandle;

pub(crate) struct EventBusRuntime {
    tx: UnboundedSender<DomainEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl EventBusRuntime {
    pub(crate) fn spawn(
        media_signals: Option<flume::Receiver<MediaSignal>>,
    ) -> (
        UnboundedSender<DomainEvent>,
        UnboundedReceiver<DomainEvent>,
        Self,
    ) {
        let (tx, rx) = unbounded_channel();
        let mut runtime = Self::new(tx.clone());
        runtime.tasks.push(spawn_input_task(tx.clone()));
        if let Some(signals) = media_signals {
            runtime.tasks.push(spawn_media_task(tx.clone(), signals));
        }
        (tx, rx, runtime)
    }

    fn new(tx: UnboundedSender<DomainEvent>) -> Self {
        Self {
            tx,
            tasks: Vec::new(),
        }
    }

    /// Awaits a play request off the loop; the settlement comes back as an
    /// event carrying the request's ticket.
    pub(crate) fn spawn_play(&mut self, play: PendingPlay) {
        let tx = self.tx.clone();
        self.track(tokio::spawn(async move {
            let PendingPlay { ticket, future } = play;
            let result = future.await;
            let _ = tx.send(DomainEvent::PlaySettled { ticket, result });
        }));
    }

    pub(crate) fn spawn_catalog_fetch(
        &mut self,
        catalog: CatalogHandle,
        ticket: Ticket<()>,
        force_refresh: bool,
    ) {
        let tx = self.tx.clone();
        self.track(tokio::spawn(async move {
            let fetched = catalog.fetch_stories(force_refresh).await;
            let _ = tx.send(DomainEvent::CatalogLoaded { ticket, fetched });
        }));
    }

    pub(crate) fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    fn track(&mut self, task: JoinHandle<()>) {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(task);
    }
}

fn spawn_input_task(tx: UnboundedSender<DomainEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut input_stream = EventStream::new();
        while let Some(event) = input_stream.next().await {
            let loop_event = match event {
                Ok(event) => DomainEvent::Input(event),
                Err(err) => DomainEvent::InputError(err.to_string()),
            };
            if tx.send(loop_event).is_err() {
                return;
            }
        }
    })
}

fn spawn_media_task(
    tx: UnboundedSender<DomainEvent>,
    signals: flume::Receiver<MediaSignal>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Ok(signal) = signals.recv_async().await {
            if tx.send(DomainEvent::Media(signal)).is_err() {
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::FutureExt;

    use super::{EventBusRuntime, spawn_media_task};
    use crate::error::AppError;
    use crate::event::DomainEvent;
    use crate::nav::{GenerationGuard, Slot};
    use crate::playback::{MediaSignal, MediaSignalKind, MountId, PendingPlay};

    #[tokio::test]
    async fn media_signals_are_forwarded_to_the_loop() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let (signal_tx, signal_rx) = flume::unbounded();
        let task = spawn_media_task(tx, signal_rx);

        let signal = MediaSignal {
            mount: MountId {
                slot: Slot::new(0, 1),
                epoch: 3,
            },
            kind: MediaSignalKind::Loaded,
        };
        signal_tx.send(signal.clone()).expect("send");

        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("forwarded in time");
        assert!(matches!(received, Some(DomainEvent::Media(forwarded)) if forwarded == signal));
        task.abort();
    }

    #[tokio::test]
    async fn play_settlement_carries_its_ticket() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut runtime = EventBusRuntime::new(tx);
        let mut guard = GenerationGuard::default();
        let ticket = guard.issue(Slot::new(2, 0));
        runtime.spawn_play(PendingPlay {
            ticket,
            future: async { Ok::<(), AppError>(()) }.boxed(),
        });

        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("settled in time");
        match received {
            Some(DomainEvent::PlaySettled {
                ticket: settled,
                result,
            }) => {
                assert_eq!(settled, ticket);
                assert!(result.is_ok());
            }
            other => panic!("expected a play settlement, got {other:?}"),
        }
        runtime.shutdown();
    }
}
