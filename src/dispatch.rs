//! Fire-and-forget hand-off from the input path to the placement backend.
//!
//! The chord recognizer runs on the thread that receives input and must
//! never wait on window-system calls.  [`PlacementWorker`] owns the
//! [`LayoutEngine`] on a dedicated thread; intents are queued through an
//! [`mpsc`] channel and applied in order.  Failures are reported through a
//! [`Feedback`] cue and logged.  Nothing is retried.

use crate::chord::LayoutIntent;
use crate::engine::{LayoutEngine, Placement};
use crate::traits::{Feedback, ScreenProvider, WindowPlacer};
use log::{debug, error, warn};
use std::io::Write;
use std::sync::mpsc;
use std::thread::JoinHandle;

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Feedback for TerminalBell {
    fn failure(&self) {
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}

/// Apply one intent and translate the outcome into feedback.
///
/// Returns `true` if a window was placed.
pub fn apply_with_feedback<P, S, F>(engine: &LayoutEngine<P, S>, feedback: &F, intent: LayoutIntent) -> bool
where
    P: WindowPlacer,
    S: ScreenProvider,
    F: Feedback + ?Sized,
{
    match engine.apply(intent) {
        Ok(Placement::Placed(_)) => true,
        Ok(Placement::NoWindow) => {
            feedback.failure();
            false
        }
        Err(e) => {
            error!("placement failed for {}: {}", intent.position, e);
            feedback.failure();
            false
        }
    }
}

/// Handle to the placement thread.
///
/// Dropping the worker closes the queue; the thread finishes whatever is
/// already queued and exits.
pub struct PlacementWorker {
    tx: Option<mpsc::Sender<LayoutIntent>>,
    handle: Option<JoinHandle<()>>,
}

impl PlacementWorker {
    /// Move `engine` and `feedback` onto a new thread and start consuming
    /// intents.
    pub fn spawn<P, S, F>(engine: LayoutEngine<P, S>, feedback: F) -> Self
    where
        P: WindowPlacer + Send + 'static,
        S: ScreenProvider + Send + 'static,
        F: Feedback + 'static,
    {
        let (tx, rx) = mpsc::channel::<LayoutIntent>();
        let handle = std::thread::spawn(move || {
            for intent in rx {
                debug!("applying {} (keys {})", intent.position, intent.keys);
                apply_with_feedback(&engine, &feedback, intent);
            }
            debug!("placement queue closed");
        });
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Queue `intent` for placement.  Never blocks.
    ///
    /// Returns `false` if the worker thread is gone.
    pub fn submit(&self, intent: LayoutIntent) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        if tx.send(intent).is_err() {
            warn!("placement worker is not running, dropping {}", intent.position);
            return false;
        }
        true
    }

    /// Close the queue and wait for every queued intent to be applied.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("placement worker panicked");
            }
        }
    }
}

impl Drop for PlacementWorker {
    fn drop(&mut self) {
        self.close();
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, ScreenArea};
    use crate::layout::{Corner, LayoutPosition, Side};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, thiserror::Error)]
    #[error("mock failure")]
    struct MockError;

    #[derive(Clone, Default)]
    struct SharedPlacer {
        log: Arc<Mutex<Vec<Rect>>>,
        no_window: bool,
        fail: bool,
    }

    impl WindowPlacer for SharedPlacer {
        type Error = MockError;

        fn place(&self, rect: Rect) -> Result<bool, MockError> {
            if self.fail {
                return Err(MockError);
            }
            self.log.lock().unwrap().push(rect);
            Ok(!self.no_window)
        }
    }

    struct FixedScreen;

    impl ScreenProvider for FixedScreen {
        type Error = MockError;

        fn screen_area(&self) -> Result<ScreenArea, MockError> {
            Ok(ScreenArea {
                usable: Rect::new(0.0, 0.0, 1200.0, 900.0),
                reference_top: 900.0,
            })
        }
    }

    #[derive(Clone, Default)]
    struct CountingFeedback(Arc<AtomicUsize>);

    impl Feedback for CountingFeedback {
        fn failure(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn queued_intents_are_applied_in_order() {
        let placer = SharedPlacer::default();
        let log = placer.log.clone();
        let bell = CountingFeedback::default();
        let worker = PlacementWorker::spawn(LayoutEngine::new(placer, FixedScreen), bell.clone());

        assert!(worker.submit(LayoutIntent::direct(LayoutPosition::ScreenHalf(Side::Left))));
        assert!(worker.submit(LayoutIntent::direct(LayoutPosition::ScreenCorner(Corner::BottomRight))));
        worker.shutdown();

        assert_eq!(
            log.lock().unwrap().as_slice(),
            &[
                Rect::new(0.0, 0.0, 600.0, 900.0),
                Rect::new(600.0, 450.0, 600.0, 450.0),
            ]
        );
        assert_eq!(bell.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_window_rings_once_per_intent() {
        let placer = SharedPlacer {
            no_window: true,
            ..Default::default()
        };
        let bell = CountingFeedback::default();
        let worker = PlacementWorker::spawn(LayoutEngine::new(placer, FixedScreen), bell.clone());
        worker.submit(LayoutIntent::direct(LayoutPosition::FullScreen));
        worker.submit(LayoutIntent::direct(LayoutPosition::CenteredHalf));
        worker.shutdown();
        assert_eq!(bell.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn placer_error_rings_and_is_not_retried() {
        let placer = SharedPlacer {
            fail: true,
            ..Default::default()
        };
        let log = placer.log.clone();
        let bell = CountingFeedback::default();
        let worker = PlacementWorker::spawn(LayoutEngine::new(placer, FixedScreen), bell.clone());
        worker.submit(LayoutIntent::direct(LayoutPosition::FullScreen));
        worker.shutdown();
        assert_eq!(bell.0.load(Ordering::SeqCst), 1);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn apply_with_feedback_reports_success() {
        let engine = LayoutEngine::new(SharedPlacer::default(), FixedScreen);
        let bell = CountingFeedback::default();
        assert!(apply_with_feedback(&engine, &bell, LayoutIntent::direct(LayoutPosition::FullScreen)));
        assert_eq!(bell.0.load(Ordering::SeqCst), 0);
    }
}
