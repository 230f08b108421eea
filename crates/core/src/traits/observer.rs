//! Frame observation trait

use async_trait::async_trait;

use crate::{FramePushed, Result};

/// Receives a read-only copy of every frame-pushed event
///
/// Observers must not alter pipeline flow. Events are delivered one at a
/// time; an implementation may suspend inside `on_push_frame` (e.g. while
/// sending) and the caller awaits it before delivering the next event.
///
/// # Example Implementation
///
/// ```ignore
/// struct FrameCounter(AtomicUsize);
///
/// #[async_trait]
/// impl FrameObserver for FrameCounter {
///     async fn on_push_frame(&self, _event: &FramePushed) -> Result<()> {
///         self.0.fetch_add(1, Ordering::Relaxed);
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "frame_counter"
///     }
/// }
/// ```
#[async_trait]
pub trait FrameObserver: Send + Sync + 'static {
    /// Handle one frame-pushed event
    async fn on_push_frame(&self, event: &FramePushed) -> Result<()>;

    /// Observer name for tracing
    fn name(&self) -> &'static str;
}
