use std::time::{Duration, Instant};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{self, MissedTickBehavior};
use tracing::info;

use crate::command::{ActionId, CommandOutcome};
use crate::error::AppResult;
use crate::event::DomainEvent;
use crate::playback::Indicator;

use super::actors::{InputActor, UiActor};
use super::core::App;
use super::event_bus::EventBusRuntime;
use super::terminal_session::TerminalSession;

struct LoopRuntime {
    input_poll_timeout: Duration,
    input_actor: InputActor,
    ui_actor: UiActor,
    session: TerminalSession,
    redraw_tick: time::Interval,
    loop_event_tx: UnboundedSender<DomainEvent>,
    loop_event_rx: UnboundedReceiver<DomainEvent>,
    loop_event_runtime: EventBusRuntime,
}

enum WaitEvent {
    Event(DomainEvent),
    Closed,
}

enum LoopControl {
    Continue,
    Break,
}

impl App {
    pub async fn run(&mut self) -> AppResult<()> {
        let mut runtime = self.initialize_loop_runtime()?;
        info!(source = %self.session.catalog().source_name(), "viewer started");

        loop {
            self.start_pending_work(&mut runtime);
            self.update_ui_and_render_frame(&mut runtime)?;

            let waited = wait_next_event(
                &mut runtime.loop_event_rx,
                &mut runtime.redraw_tick,
                runtime.input_poll_timeout,
            )
            .await;
            if matches!(
                self.handle_waited_event(waited, &mut runtime)?,
                LoopControl::Break
            ) {
                break;
            }
        }

        info!(location = self.location(), "viewer closed");
        runtime.loop_event_runtime.shutdown();
        runtime.session.restore()?;
        Ok(())
    }

    fn initialize_loop_runtime(&mut self) -> AppResult<LoopRuntime> {
        let loop_started_at = Instant::now();
        let redraw_interval = Duration::from_millis(self.config.render.redraw_interval_ms);
        let input_poll_timeout = Duration::from_millis(self.config.render.input_poll_timeout_ms);
        let input_actor = InputActor::new(loop_started_at);
        let ui_actor = UiActor::new(loop_started_at, redraw_interval);
        let session = TerminalSession::enter()?;

        let (loop_event_tx, loop_event_rx, loop_event_runtime) =
            EventBusRuntime::spawn(self.media_signals.take());
        let mut redraw_tick = time::interval(redraw_interval);
        redraw_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Ok(LoopRuntime {
            input_poll_timeout,
            input_actor,
            ui_actor,
            session,
            redraw_tick,
            loop_event_tx,
            loop_event_rx,
            loop_event_runtime,
        })
    }

    /// Hands everything queued while handling the last event to the runtime.
    fn start_pending_work(&mut self, runtime: &mut LoopRuntime) {
        for play in self.pending.plays.drain(..) {
            runtime.loop_event_runtime.spawn_play(play);
        }
        while let Some((ticket, force_refresh)) = self.next_catalog_fetch() {
            runtime
                .loop_event_runtime
                .spawn_catalog_fetch(self.session.catalog(), ticket, force_refresh);
        }
        for event in self.pending.events.drain(..) {
            let _ = runtime.loop_event_tx.send(DomainEvent::App(event));
        }
    }

    fn update_ui_and_render_frame(&mut self, runtime: &mut LoopRuntime) -> AppResult<()> {
        let now = Instant::now();
        if self.engine.carousels.tick(now) {
            runtime.ui_actor.mark_redraw();
        }
        let busy = !self.engine.carousels.is_settled()
            || self.state.catalog.loading
            || self.engine.playback.indicator() == Indicator::Loading;
        if runtime.ui_actor.should_request_animated_redraw(busy, now) {
            runtime.ui_actor.mark_redraw();
        }

        if runtime.ui_actor.needs_redraw() {
            self.render_frame(&mut runtime.session)?;
            runtime.ui_actor.clear_redraw();
            runtime.ui_actor.on_drawn(now);
        }
        Ok(())
    }

    fn handle_waited_event(
        &mut self,
        waited: WaitEvent,
        runtime: &mut LoopRuntime,
    ) -> AppResult<LoopControl> {
        match waited {
            WaitEvent::Event(DomainEvent::Input(event)) => {
                let input_outcome = self.handle_input_event(
                    event,
                    &mut runtime.session,
                    runtime.ui_actor.needs_redraw_mut(),
                    runtime.input_actor.last_input_at_mut(),
                )?;
                if input_outcome.quit_requested {
                    return Ok(LoopControl::Break);
                }
                if let Some(command) = input_outcome.command {
                    let _ = runtime.loop_event_tx.send(DomainEvent::Command(command));
                }
            }
            WaitEvent::Event(DomainEvent::InputError(message)) => {
                self.state.status.last_action_id = Some(ActionId::Input);
                self.state.status.message = format!("input error: {message}");
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::Command(command)) => {
                let dispatch = self.dispatch_command(command);
                for event in dispatch.emitted_events {
                    let _ = runtime.loop_event_tx.send(DomainEvent::App(event));
                }
                match dispatch.outcome {
                    CommandOutcome::QuitRequested => return Ok(LoopControl::Break),
                    CommandOutcome::Applied | CommandOutcome::Noop => {
                        runtime.ui_actor.mark_redraw()
                    }
                }
            }
            WaitEvent::Event(DomainEvent::App(event)) => {
                self.handle_app_event(&event);
            }
            WaitEvent::Event(DomainEvent::CatalogLoaded { ticket, fetched }) => {
                if self.apply_fetched_catalog(ticket, fetched) {
                    runtime.ui_actor.mark_redraw();
                }
            }
            WaitEvent::Event(DomainEvent::PlaySettled { ticket, result }) => {
                if self.engine.playback.settle_play(ticket, result) {
                    runtime.ui_actor.mark_redraw();
                }
            }
            WaitEvent::Event(DomainEvent::Media(signal)) => {
                if self.handle_media_signal(signal) {
                    runtime.ui_actor.mark_redraw();
                }
            }
            // Animation frames are decided in `update_ui_and_render_frame`.
            WaitEvent::Event(DomainEvent::RedrawTick) | WaitEvent::Event(DomainEvent::Wake) => {}
            WaitEvent::Closed => return Ok(LoopControl::Break),
        }
        Ok(LoopControl::Continue)
    }
}

async fn wait_next_event(
    loop_event_rx: &mut UnboundedReceiver<DomainEvent>,
    redraw_tick: &mut time::Interval,
    wake_timeout: Duration,
) -> WaitEvent {
    tokio::select! {
        biased;
        maybe_loop = loop_event_rx.recv() => {
            match maybe_loop {
                Some(event) => WaitEvent::Event(event),
                None => WaitEvent::Closed,
            }
        },
        _ = redraw_tick.tick() => {
            WaitEvent::Event(DomainEvent::RedrawTick)
        },
        _ = time::sleep(wake_timeout) => {
            WaitEvent::Event(DomainEvent::Wake)
        }
    }
}
