use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

use crate::config::PlaybackConfig;
use crate::error::AppError;

use super::host::{
    EmbedFrame, ImageElement, MediaHost, MediaSignal, MediaSignalKind, MountId, PlayFuture,
    PostError, VideoElement,
};

/// A terminal cannot decode media, so this host pretends to: sources "load"
/// after a delay and play requests settle after another. Videos buffer while
/// a play request is in flight and end after a fixed length. Local file
/// sources that do not exist fail, which exercises the placeholder path.
pub struct SimulatedHost {
    signals: flume::Sender<MediaSignal>,
    load_delay: Duration,
    play_delay: Duration,
    video_length: Option<Duration>,
    autoplay_allowed: bool,
    gesture_seen: Arc<AtomicBool>,
}

impl SimulatedHost {
    pub fn new(config: &PlaybackConfig, signals: flume::Sender<MediaSignal>) -> Self {
        Self {
            signals,
            load_delay: Duration::from_millis(config.simulated_load_ms),
            play_delay: Duration::from_millis(config.simulated_play_ms),
            video_length: (config.simulated_video_ms > 0)
                .then(|| Duration::from_millis(config.simulated_video_ms)),
            autoplay_allowed: config.autoplay_allowed,
            gesture_seen: Arc::new(AtomicBool::new(false)),
        }
    }

    fn loader(&self, mount: MountId) -> Loader {
        Loader {
            mount,
            signals: self.signals.clone(),
            delay: self.load_delay,
            ready: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }
}

struct Loader {
    mount: MountId,
    signals: flume::Sender<MediaSignal>,
    delay: Duration,
    ready: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl Loader {
    fn set_source(&mut self, url: Option<&str>) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.ready.store(false, Ordering::SeqCst);
        let Some(url) = url else {
            return;
        };

        let kind = match check_source(url) {
            Ok(()) => MediaSignalKind::Loaded,
            Err(message) => MediaSignalKind::Failed(message),
        };
        let signal = MediaSignal {
            mount: self.mount,
            kind,
        };
        let ready = Arc::clone(&self.ready);
        let signals = self.signals.clone();
        let delay = self.delay;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                self.task = Some(handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    deliver(&ready, &signals, signal);
                }));
            }
            Err(_) => deliver(&ready, &signals, signal),
        }
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn deliver(ready: &AtomicBool, signals: &flume::Sender<MediaSignal>, signal: MediaSignal) {
    if signal.kind == MediaSignalKind::Loaded {
        ready.store(true, Ordering::SeqCst);
    }
    trace!(?signal, "simulated media signal");
    let _ = signals.send(signal);
}

fn check_source(url: &str) -> Result<(), String> {
    let url = url.trim();
    if url.is_empty() {
        return Err("empty source".to_string());
    }
    if let Some(path) = url.strip_prefix("file://")
        && !Path::new(path).exists()
    {
        return Err(format!("{path} not found"));
    }
    Ok(())
}

struct SimulatedImage {
    loader: Loader,
}

impl ImageElement for SimulatedImage {
    fn set_source(&mut self, url: Option<&str>) {
        self.loader.set_source(url);
    }
}

struct SimulatedVideo {
    loader: Loader,
    muted: bool,
    play_delay: Duration,
    length: Option<Duration>,
    /// Bumped by every play, pause and seek; an end timer only fires if its
    /// run is still current.
    run: Arc<AtomicU64>,
    autoplay_allowed: bool,
    gesture_seen: Arc<AtomicBool>,
}

impl SimulatedVideo {
    fn signal(&self, kind: MediaSignalKind) -> MediaSignal {
        MediaSignal {
            mount: self.loader.mount,
            kind,
        }
    }
}

impl VideoElement for SimulatedVideo {
    fn set_source(&mut self, url: Option<&str>) {
        self.run.fetch_add(1, Ordering::SeqCst);
        self.loader.set_source(url);
    }

    fn set_current_time(&mut self, _seconds: f64) {
        self.run.fetch_add(1, Ordering::SeqCst);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn play(&mut self) -> PlayFuture {
        let allowed = self.autoplay_allowed || self.gesture_seen.load(Ordering::SeqCst);
        let delay = self.play_delay;
        let length = self.length;
        let run = Arc::clone(&self.run);
        let token = run.fetch_add(1, Ordering::SeqCst) + 1;
        let signals = self.loader.signals.clone();
        let waiting = self.signal(MediaSignalKind::Waiting);
        let playing = self.signal(MediaSignalKind::Playing);
        let ended = self.signal(MediaSignalKind::Ended);
        Box::pin(async move {
            if !allowed {
                tokio::time::sleep(delay).await;
                return Err(AppError::unsupported("playback requires a user gesture"));
            }
            let _ = signals.send(waiting);
            tokio::time::sleep(delay).await;
            let _ = signals.send(playing);
            if let Some(length) = length {
                tokio::spawn(async move {
                    tokio::time::sleep(length).await;
                    if run.load(Ordering::SeqCst) == token {
                        trace!(?ended, "simulated video ended");
                        let _ = signals.send(ended);
                    }
                });
            }
            Ok(())
        })
    }

    fn pause(&mut self) {
        self.run.fetch_add(1, Ordering::SeqCst);
    }
}

struct SimulatedFrame {
    loader: Loader,
    attached: bool,
}

impl EmbedFrame for SimulatedFrame {
    fn set_source(&mut self, url: Option<&str>) {
        self.attached = url.is_some();
        self.loader.set_source(url);
    }

    fn post_message(&mut self, message: &str) -> Result<(), PostError> {
        if !self.attached {
            return Err(PostError::Detached);
        }
        if !self.loader.ready.load(Ordering::SeqCst) {
            return Err(PostError::NotReady);
        }
        trace!(mount = ?self.loader.mount, message, "posted to player frame");
        Ok(())
    }
}

impl MediaHost for SimulatedHost {
    fn create_image(&mut self, mount: MountId) -> Box<dyn ImageElement> {
        Box::new(SimulatedImage {
            loader: self.loader(mount),
        })
    }

    fn create_video(&mut self, mount: MountId) -> Box<dyn VideoElement> {
        Box::new(SimulatedVideo {
            loader: self.loader(mount),
            muted: false,
            play_delay: self.play_delay,
            length: self.video_length,
            run: Arc::new(AtomicU64::new(0)),
            autoplay_allowed: self.autoplay_allowed,
            gesture_seen: Arc::clone(&self.gesture_seen),
        })
    }

    fn create_frame(&mut self, mount: MountId) -> Box<dyn EmbedFrame> {
        Box::new(SimulatedFrame {
            loader: self.loader(mount),
            attached: false,
        })
    }

    fn note_user_gesture(&mut self) {
        self.gesture_seen.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::SimulatedHost;
    use crate::config::PlaybackConfig;
    use crate::nav::Slot;
    use crate::playback::host::{MediaHost, MediaSignal, MediaSignalKind, MountId, PostError};

    fn config(autoplay_allowed: bool) -> PlaybackConfig {
        PlaybackConfig {
            simulated_load_ms: 1,
            simulated_play_ms: 1,
            simulated_video_ms: 5,
            autoplay_allowed,
            ..PlaybackConfig::default()
        }
    }

    fn mount() -> MountId {
        MountId {
            slot: Slot::new(0, 0),
            epoch: 1,
        }
    }

    #[tokio::test]
    async fn source_assignment_reports_loaded() {
        let (tx, rx) = flume::unbounded();
        let mut host = SimulatedHost::new(&config(true), tx);
        let mut image = host.create_image(mount());
        image.set_source(Some("https://cdn.example/a.jpg"));

        let signal = tokio::time::timeout(Duration::from_secs(1), rx.recv_async())
            .await
            .expect("signal in time")
            .expect("channel open");
        assert_eq!(signal.mount, mount());
        assert_eq!(signal.kind, MediaSignalKind::Loaded);
    }

    #[tokio::test]
    async fn missing_local_file_fails() {
        let (tx, rx) = flume::unbounded();
        let mut host = SimulatedHost::new(&config(true), tx);
        let mut video = host.create_video(mount());
        video.set_source(Some("file:///definitely/not/here.mp4"));

        let signal = rx.recv_async().await.expect("channel open");
        assert!(matches!(signal.kind, MediaSignalKind::Failed(_)));
    }

    async fn next_kind(rx: &flume::Receiver<MediaSignal>) -> MediaSignalKind {
        tokio::time::timeout(Duration::from_secs(1), rx.recv_async())
            .await
            .expect("signal in time")
            .expect("channel open")
            .kind
    }

    #[tokio::test]
    async fn play_buffers_then_plays_then_ends() {
        let (tx, rx) = flume::unbounded();
        let mut host = SimulatedHost::new(&config(true), tx);
        let mut video = host.create_video(mount());

        assert!(video.play().await.is_ok());
        assert_eq!(next_kind(&rx).await, MediaSignalKind::Waiting);
        assert_eq!(next_kind(&rx).await, MediaSignalKind::Playing);
        assert_eq!(next_kind(&rx).await, MediaSignalKind::Ended);
    }

    #[tokio::test]
    async fn pause_cancels_the_end_of_video() {
        let (tx, rx) = flume::unbounded();
        let mut config = config(true);
        config.simulated_video_ms = 20;
        let mut host = SimulatedHost::new(&config, tx);
        let mut video = host.create_video(mount());

        assert!(video.play().await.is_ok());
        video.pause();
        assert_eq!(next_kind(&rx).await, MediaSignalKind::Waiting);
        assert_eq!(next_kind(&rx).await, MediaSignalKind::Playing);
        let late = tokio::time::timeout(Duration::from_millis(100), rx.recv_async()).await;
        assert!(late.is_err(), "no end after pause: {late:?}");
    }

    #[tokio::test]
    async fn strict_autoplay_needs_a_gesture() {
        let (tx, _rx) = flume::unbounded();
        let mut host = SimulatedHost::new(&config(false), tx);
        let mut video = host.create_video(mount());
        assert!(video.play().await.is_err());

        host.note_user_gesture();
        assert!(video.play().await.is_ok());
    }

    #[tokio::test]
    async fn frame_rejects_messages_until_loaded() {
        let (tx, rx) = flume::unbounded();
        let mut host = SimulatedHost::new(&config(true), tx);
        let mut frame = host.create_frame(mount());
        assert_eq!(frame.post_message("{}"), Err(PostError::Detached));

        frame.set_source(Some("https://www.youtube.com/embed/dQw4w9WgXcQ"));
        assert_eq!(frame.post_message("{}"), Err(PostError::NotReady));
        rx.recv_async().await.expect("channel open");
        assert_eq!(frame.post_message("{}"), Ok(()));
    }
}
