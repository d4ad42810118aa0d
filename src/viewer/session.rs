//! History Viewer
//!
//! Per-camera state machine:
//!
//! ```text
//! LoadingHistory -> HasFrames -> LoadingFrame -> Ready
//!                -> NoHistory ----------------> Ready (direct image)
//! ```
//!
//! Each open camera gets a session token. Frame fetches, prefetches and the
//! auto-play timer run under child tokens of it, so switching camera or
//! closing cancels all of them at once. Results are applied only while their
//! token is live. At most one frame fetch is live; starting another cancels
//! the previous one.
//!
//! State sits behind a `std::sync::Mutex` that is never held across an await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::cache::ImageCache;
use super::frames::{frame_label, HistoryFrame};
use super::image::ImageHandle;
use super::playback::Playback;
use super::source::FrameSource;
use super::{ViewerError, ViewerPhase, ViewerSnapshot};
use crate::catalog::{image_url, Camera};
use crate::config::ViewerConfig;

/// Scrub/play viewer over a camera's historical frames
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct HistoryViewer {
    shared: Arc<Shared>,
}

struct Shared {
    source: Arc<dyn FrameSource>,
    config: ViewerConfig,
    /// Base for the direct image shown when there is no history
    image_base: String,
    state: Mutex<ViewerState>,
    snapshots: watch::Sender<ViewerSnapshot>,
}

struct ViewerState {
    camera: Option<Camera>,
    phase: ViewerPhase,
    frames: Vec<HistoryFrame>,
    index: usize,
    current: Option<ImageHandle>,
    cache: ImageCache,
    session: CancellationToken,
    live_fetch: Option<CancellationToken>,
    /// Frame on screen is waiting for its in-flight prefetch
    awaiting: Option<String>,
    tasks: Vec<JoinHandle<()>>,
    playback: Option<Playback>,
}

impl ViewerState {
    fn new() -> Self {
        Self {
            camera: None,
            phase: ViewerPhase::Closed,
            frames: Vec::new(),
            index: 0,
            current: None,
            cache: ImageCache::new(),
            session: CancellationToken::new(),
            live_fetch: None,
            awaiting: None,
            tasks: Vec::new(),
            playback: None,
        }
    }

    fn stop_playback(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.stop();
        }
    }

    /// Drop everything tied to the current camera
    fn reset(&mut self) {
        self.stop_playback();
        self.session.cancel();
        self.live_fetch = None;
        self.awaiting = None;
        self.cache.clear();
        self.frames.clear();
        self.index = 0;
        self.current = None;
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(handle);
    }

    fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            camera_id: self.camera.as_ref().map(|c| c.id.clone()),
            phase: self.phase,
            index: self.index,
            frame_count: self.frames.len(),
            playing: self.playback.is_some(),
            label: frame_label(self.frames.get(self.index)),
            has_image: self.current.is_some(),
        }
    }
}

impl HistoryViewer {
    pub fn new(
        source: Arc<dyn FrameSource>,
        config: ViewerConfig,
        image_base: impl Into<String>,
    ) -> Self {
        let state = ViewerState::new();
        let (snapshots, _) = watch::channel(state.snapshot());

        Self {
            shared: Arc::new(Shared {
                source,
                config,
                image_base: image_base.into(),
                state: Mutex::new(state),
                snapshots,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewerState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let snapshot = self.state().snapshot();
        self.shared.snapshots.send_replace(snapshot);
    }

    /// Base URL of direct images and thumbnails
    pub fn image_base_url(&self) -> &str {
        &self.shared.image_base
    }

    /// Watch state changes
    pub fn subscribe(&self) -> watch::Receiver<ViewerSnapshot> {
        self.shared.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        self.state().snapshot()
    }

    pub fn camera(&self) -> Option<Camera> {
        self.state().camera.clone()
    }

    pub fn phase(&self) -> ViewerPhase {
        self.state().phase
    }

    pub fn index(&self) -> usize {
        self.state().index
    }

    pub fn frames(&self) -> Vec<HistoryFrame> {
        self.state().frames.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state().playback.is_some()
    }

    /// Image to display, if resolved
    pub fn current_image(&self) -> Option<ImageHandle> {
        self.state().current.clone()
    }

    pub fn cached_urls(&self) -> Vec<String> {
        self.state().cache.keys().map(str::to_string).collect()
    }

    /// Open a camera, replacing whatever was open.
    ///
    /// Loads the history list, positions at the newest frame and starts
    /// resolving it. A failed history fetch falls back to the direct image.
    pub async fn open(&self, camera: Camera) {
        let session = {
            let mut st = self.state();
            st.reset();
            st.session = CancellationToken::new();
            st.camera = Some(camera.clone());
            st.phase = ViewerPhase::LoadingHistory;
            st.session.clone()
        };
        self.publish();

        tracing::debug!(camera_id = %camera.id, "Loading history");

        let result = tokio::select! {
            _ = session.cancelled() => return,
            result = self.shared.source.history(&camera.id) => result,
        };

        let frames = result.unwrap_or_else(|e| {
            tracing::error!(camera_id = %camera.id, error = %e, "Failed to fetch history");
            Vec::new()
        });

        let has_frames = {
            let mut st = self.state();
            if session.is_cancelled() {
                return;
            }

            if frames.is_empty() {
                st.phase = ViewerPhase::NoHistory;
                false
            } else {
                st.index = frames.len() - 1;
                st.frames = frames;
                st.phase = ViewerPhase::HasFrames;
                true
            }
        };

        tracing::info!(
            camera_id = %camera.id,
            frames = self.state().frames.len(),
            "History loaded"
        );

        // let subscribers observe the intermediate phase
        self.publish();
        tokio::task::yield_now().await;
        if session.is_cancelled() {
            return;
        }

        if has_frames {
            self.load_current();
        } else {
            {
                let mut st = self.state();
                st.current = Some(ImageHandle::Remote {
                    url: image_url(&self.shared.image_base, &camera.id),
                });
                st.phase = ViewerPhase::Ready;
            }
            self.publish();
        }
    }

    /// Close the viewer: stop playback, cancel work, drop the cache
    pub fn close(&self) {
        {
            let mut st = self.state();
            st.reset();
            st.camera = None;
            st.phase = ViewerPhase::Closed;
        }
        self.publish();
    }

    /// Step back one frame (stops auto-play)
    pub fn previous(&self) {
        self.navigate(|index, _| index.saturating_sub(1));
    }

    /// Step forward one frame (stops auto-play)
    pub fn next(&self) {
        self.navigate(|index, len| (index + 1).min(len - 1));
    }

    /// Slider position (stops auto-play)
    pub fn seek(&self, index: usize) {
        self.navigate(|_, len| index.min(len - 1));
    }

    /// Back to the newest frame (stops auto-play)
    pub fn jump_to_latest(&self) {
        self.navigate(|_, len| len - 1);
    }

    fn navigate<F>(&self, target: F)
    where
        F: FnOnce(usize, usize) -> usize,
    {
        let reload = {
            let mut st = self.state();
            st.stop_playback();
            if st.frames.is_empty() {
                false
            } else {
                let next = target(st.index, st.frames.len());
                let changed = next != st.index;
                st.index = next;
                changed || st.current.is_none()
            }
        };

        if reload {
            self.load_current();
        } else {
            self.publish();
        }
    }

    /// Start auto-play. Needs more than one frame.
    pub fn play(&self) {
        {
            let mut st = self.state();
            if st.frames.len() <= 1 || st.playback.is_some() {
                return;
            }

            let token = st.session.child_token();
            let tick_token = token.clone();
            let weak = Arc::downgrade(&self.shared);
            let period = Duration::from_millis(self.shared.config.play_interval_ms);

            st.playback = Some(Playback::start(period, token, move || {
                advance(&weak, &tick_token);
            }));
        }
        self.publish();
    }

    pub fn pause(&self) {
        self.state().stop_playback();
        self.publish();
    }

    pub fn toggle_play(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Wait for every spawned fetch to finish or observe its cancellation
    pub async fn settle(&self) {
        loop {
            let tasks = std::mem::take(&mut self.state().tasks);
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                let _ = task.await;
            }
        }
    }

    /// Show the frame at the current index, from cache or by fetching it,
    /// then prefetch the frames that follow.
    fn load_current(&self) {
        {
            let mut st = self.state();
            let Some(camera_id) = st.camera.as_ref().map(|c| c.id.clone()) else {
                return;
            };
            let Some(frame) = st.frames.get(st.index).cloned() else {
                return;
            };

            if let Some(previous) = st.live_fetch.take() {
                previous.cancel();
            }
            st.awaiting = None;

            let url = self.shared.source.frame_url(&camera_id, &frame);

            if let Some(handle) = st.cache.get(&url).cloned() {
                st.current = Some(handle);
                st.phase = ViewerPhase::Ready;
            } else if st.cache.is_pending(&url) {
                // the prefetch already in flight will deliver it
                st.awaiting = Some(url);
                st.phase = ViewerPhase::LoadingFrame;
            } else {
                let token = st.session.child_token();
                st.live_fetch = Some(token.clone());
                st.phase = ViewerPhase::LoadingFrame;

                let viewer = self.clone();
                let handle = tokio::spawn(async move {
                    viewer.resolve_live(url, token).await;
                });
                st.track(handle);
            }
        }

        self.prefetch();
        self.publish();
    }

    async fn resolve_live(&self, url: String, token: CancellationToken) {
        let result = tokio::select! {
            _ = token.cancelled() => return,
            result = self.fetch(&url) => result,
        };

        {
            let mut st = self.state();
            if token.is_cancelled() {
                return;
            }
            st.live_fetch = None;

            match result {
                Ok(Some(handle)) => {
                    st.cache.insert(url, handle.clone());
                    st.current = Some(handle);
                }
                Ok(None) => tracing::warn!(url = %url, "Frame response carried no image"),
                Err(e) => tracing::error!(url = %url, error = %e, "Error fetching historical image"),
            }
            st.phase = ViewerPhase::Ready;
        }

        self.publish();
    }

    /// Speculatively fetch the next frames in cyclic order
    fn prefetch(&self) {
        let mut st = self.state();
        let len = st.frames.len();
        if len <= 1 {
            return;
        }
        let Some(camera_id) = st.camera.as_ref().map(|c| c.id.clone()) else {
            return;
        };

        for step in 1..=self.shared.config.prefetch_count {
            let index = (st.index + step) % len;
            if index == st.index {
                break;
            }

            let url = self.shared.source.frame_url(&camera_id, &st.frames[index]);
            if st.cache.contains(&url) || !st.cache.mark_pending(&url) {
                continue;
            }

            let token = st.session.child_token();
            let viewer = self.clone();
            let handle = tokio::spawn(async move {
                let result = tokio::select! {
                    _ = token.cancelled() => return,
                    result = viewer.fetch(&url) => result,
                };

                let shown = {
                    let mut st = viewer.state();
                    if token.is_cancelled() {
                        return;
                    }

                    let image = match result {
                        Ok(image) => image,
                        Err(e) => {
                            tracing::debug!(url = %url, error = %e, "Prefetch failed");
                            None
                        }
                    };
                    let awaited = st.awaiting.as_deref() == Some(url.as_str());

                    match image {
                        Some(image) => {
                            if awaited {
                                st.current = Some(image.clone());
                            }
                            st.cache.insert(url, image);
                        }
                        None => st.cache.clear_pending(&url),
                    }

                    if awaited {
                        st.awaiting = None;
                        st.phase = ViewerPhase::Ready;
                    }
                    awaited
                };

                if shown {
                    viewer.publish();
                }
            });
            st.track(handle);
        }
    }

    async fn fetch(&self, url: &str) -> Result<Option<ImageHandle>, ViewerError> {
        self.shared.source.fetch_frame(url).await?.resolve()
    }
}

/// One auto-play tick: move to the next frame, wrapping after the last
fn advance(shared: &Weak<Shared>, token: &CancellationToken) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let viewer = HistoryViewer { shared };

    {
        let mut st = viewer.state();
        // navigation may have stopped playback while this tick was waiting
        if token.is_cancelled() || st.frames.len() <= 1 {
            return;
        }
        st.index = if st.index + 1 >= st.frames.len() {
            0
        } else {
            st.index + 1
        };
    }

    viewer.load_current();
}
