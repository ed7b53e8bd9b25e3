//! Busy-indicator coordination.
//!
//! The UI-facing sink sees a simple begin/end pair, but many requests may
//! be in flight at once, so the gauge counts outstanding requests and only
//! forwards the 0->1 and 1->0 transitions. Each request holds an RAII
//! guard; dropping it (normal return, error, or task cancellation) routes
//! through the same end path, so begin and end always pair.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// UI-facing busy signal receiver. The implementation owns dispatch onto
/// its UI context; calls are fire-and-forget.
pub trait IndicatorSink: Send + Sync {
    fn begin_busy(&self);
    fn end_busy(&self);
}

#[derive(Default)]
struct GaugeInner {
    outstanding: AtomicUsize,
    sink: Option<Arc<dyn IndicatorSink>>,
}

/// Counted busy gauge shared by all requests of one client.
#[derive(Clone, Default)]
pub struct BusyGauge {
    inner: Arc<GaugeInner>,
}

impl BusyGauge {
    pub fn new(sink: Option<Arc<dyn IndicatorSink>>) -> Self {
        Self {
            inner: Arc::new(GaugeInner {
                outstanding: AtomicUsize::new(0),
                sink,
            }),
        }
    }

    /// Marks one request as in flight. The sink's `begin_busy` fires only
    /// when the count rises from zero.
    pub fn begin(&self) -> BusyGuard {
        let previous = self.inner.outstanding.fetch_add(1, Ordering::SeqCst);
        if previous == 0
            && let Some(sink) = &self.inner.sink
        {
            sink.begin_busy();
        }
        BusyGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// True while at least one request is outstanding
    pub fn is_busy(&self) -> bool {
        self.inner.outstanding.load(Ordering::SeqCst) > 0
    }
}

/// RAII handle for one in-flight request.
pub struct BusyGuard {
    inner: Arc<GaugeInner>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let previous = self.inner.outstanding.fetch_sub(1, Ordering::SeqCst);
        if previous == 1
            && let Some(sink) = &self.inner.sink
        {
            sink.end_busy();
        }
    }
}
