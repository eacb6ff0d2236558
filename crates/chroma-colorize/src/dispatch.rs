//! Background colorization.
//!
//! [`Colorizer::colorize_async`] runs the whole pipeline as one job on the
//! rayon pool and never blocks the caller. When the job finishes, the
//! completion callback is handed to a [`CompletionContext`], which decides
//! where it runs:
//!
//! - [`Immediate`] - on the worker thread, right away
//! - `mpsc::Sender<Job>` - on whichever thread drains the receiver
//!
//! The callback is dispatched exactly once per call, with either the image
//! or the error. A panicking predictor is caught inside the pipeline and
//! arrives as [`Error::Prediction`](crate::Error::Prediction).

use crate::error::Result;
use crate::pipeline::Colorizer;
use crate::predict::ChromaPredictor;
use chroma_core::Bitmap;
use chroma_icc::ProfileSource;
use rayon::ThreadPool;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tracing::{trace, warn};

/// A deferred completion callback.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Where completion callbacks run.
pub trait CompletionContext: Send + 'static {
    /// Runs or enqueues `job`.
    fn dispatch(&self, job: Job);
}

/// Runs completion callbacks on the worker thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl CompletionContext for Immediate {
    fn dispatch(&self, job: Job) {
        job();
    }
}

/// Sends completion callbacks to the receiving thread.
///
/// If the receiver is gone the callback is dropped unrun.
impl CompletionContext for Sender<Job> {
    fn dispatch(&self, job: Job) {
        if self.send(job).is_err() {
            warn!("completion receiver dropped; callback discarded");
        }
    }
}

impl<P, S> Colorizer<P, S>
where
    P: ChromaPredictor + 'static,
    S: ProfileSource + 'static,
{
    /// Colorizes `image` on the global rayon pool.
    ///
    /// Returns immediately. `on_complete` later receives the outcome via
    /// `context`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chroma_colorize::{ChromaPrediction, Colorizer, Job, PredictError};
    /// use chroma_core::Bitmap;
    /// use chroma_icc::ProfileSet;
    /// use ndarray::{Array4, ArrayView4};
    /// use std::sync::{mpsc, Arc};
    ///
    /// fn neutral(l: ArrayView4<'_, f32>) -> Result<ChromaPrediction, PredictError> {
    ///     Ok(ChromaPrediction {
    ///         a: Array4::zeros(l.raw_dim()),
    ///         b: Array4::zeros(l.raw_dim()),
    ///     })
    /// }
    ///
    /// let colorizer = Arc::new(Colorizer::new(neutral, ProfileSet::builtin().unwrap()));
    /// let (jobs, queue) = mpsc::channel::<Job>();
    /// let (done, result) = mpsc::channel();
    ///
    /// colorizer.colorize_async(Bitmap::filled_rgba8(8, 8, [60, 60, 60, 255]), jobs, move |r| {
    ///     done.send(r.map(|b| b.dimensions())).unwrap();
    /// });
    ///
    /// // run the callback here, on this thread
    /// (queue.recv().unwrap())();
    /// assert_eq!(result.recv().unwrap().unwrap(), (8, 8));
    /// ```
    pub fn colorize_async<C, F>(self: &Arc<Self>, image: Bitmap, context: C, on_complete: F)
    where
        C: CompletionContext,
        F: FnOnce(Result<Bitmap>) + Send + 'static,
    {
        rayon::spawn(Self::job(Arc::clone(self), image, context, on_complete));
    }

    /// Like [`colorize_async`](Self::colorize_async), on `pool`.
    pub fn colorize_in<C, F>(
        self: &Arc<Self>,
        pool: &ThreadPool,
        image: Bitmap,
        context: C,
        on_complete: F,
    ) where
        C: CompletionContext,
        F: FnOnce(Result<Bitmap>) + Send + 'static,
    {
        pool.spawn(Self::job(Arc::clone(self), image, context, on_complete));
    }

    fn job<C, F>(
        this: Arc<Self>,
        image: Bitmap,
        context: C,
        on_complete: F,
    ) -> impl FnOnce() + Send + 'static
    where
        C: CompletionContext,
        F: FnOnce(Result<Bitmap>) + Send + 'static,
    {
        move || {
            let result = this.colorize(&image);
            trace!(ok = result.is_ok(), "colorize job finished");
            context.dispatch(Box::new(move || on_complete(result)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    #[test]
    fn test_immediate_runs_inline() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        Immediate.dispatch(Box::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sender_defers() {
        let (tx, rx) = mpsc::channel::<Job>();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        tx.dispatch(Box::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        (rx.recv().unwrap())();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sender_without_receiver() {
        let (tx, rx) = mpsc::channel::<Job>();
        drop(rx);
        tx.dispatch(Box::new(|| panic!("must not run")));
    }
}
