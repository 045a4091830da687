//! Per-frame orchestration.
//!
//! Called once per render frame, after the physics step and before drawing.
//! Every call recomputes every emitter from scratch; nothing is cached
//! between frames.

use rayon::prelude::*;
use spectra_core::SceneQuery;

use crate::emitter::LaserEmitter;
use crate::trace::Tracer;

/// Totals for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Emitters traced
    pub emitters: usize,
    /// Segments produced across all emitters
    pub segments: usize,
    /// Emitters whose trace hit the bounce budget
    pub truncated: usize,
}

impl FrameStats {
    fn collect(emitters: &[LaserEmitter]) -> Self {
        emitters.iter().fold(Self::default(), |mut stats, emitter| {
            stats.emitters += 1;
            stats.segments += emitter.traced().len();
            stats.truncated += usize::from(emitter.traced().truncated);
            stats
        })
    }
}

/// Resyncs and traces a set of emitters each frame.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    tracer: Tracer,
}

impl FrameDriver {
    pub fn new(tracer: Tracer) -> Self {
        Self { tracer }
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    fn update_one<S: SceneQuery + ?Sized>(&self, emitter: &mut LaserEmitter, scene: &S) {
        emitter.resync(scene);
        let traced = self.tracer.trace(emitter, scene);
        emitter.set_traced(traced);
    }

    /// Resync and trace every emitter on the calling thread.
    pub fn update<S: SceneQuery + ?Sized>(
        &self,
        emitters: &mut [LaserEmitter],
        scene: &S,
    ) -> FrameStats {
        for emitter in emitters.iter_mut() {
            self.update_one(emitter, scene);
        }

        let stats = FrameStats::collect(emitters);
        log::trace!("Frame: {:?}", stats);
        stats
    }

    /// Like `update`, but traces emitters in parallel on the rayon pool.
    ///
    /// Emitters are independent, so the result is identical to `update`.
    pub fn update_parallel<S: SceneQuery + Sync + ?Sized>(
        &self,
        emitters: &mut [LaserEmitter],
        scene: &S,
    ) -> FrameStats {
        emitters
            .par_iter_mut()
            .for_each(|emitter| self.update_one(emitter, scene));

        let stats = FrameStats::collect(emitters);
        log::trace!("Frame (parallel): {:?}", stats);
        stats
    }
}
