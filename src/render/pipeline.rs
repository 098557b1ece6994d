use rayon::prelude::*;

use crate::{
    effects::base::Effect,
    foundation::error::{TrackerError, TrackerResult},
    render::frame::Frame,
};

#[derive(Clone, Debug, Default)]
/// Threading controls for multi-frame rendering.
pub struct RenderThreading {
    /// Render frames on a dedicated rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

/// Applies `effect` to every frame, each at its own [`Frame::number`].
///
/// Output order matches input order. The effect is only read, so frames can be
/// rendered concurrently.
pub fn render_frames<E: Effect + ?Sized>(
    effect: &E,
    frames: Vec<Frame>,
    threading: &RenderThreading,
) -> TrackerResult<Vec<Frame>> {
    if !threading.parallel {
        return Ok(frames
            .into_iter()
            .map(|f| {
                let n = f.number;
                effect.get_frame(f, n)
            })
            .collect());
    }

    let pool = build_thread_pool(threading.threads)?;
    tracing::debug!(
        frames = frames.len(),
        threads = pool.current_num_threads(),
        "rendering frames in parallel"
    );
    Ok(pool.install(|| {
        frames
            .into_par_iter()
            .map(|f| {
                let n = f.number;
                effect.get_frame(f, n)
            })
            .collect()
    }))
}

fn build_thread_pool(threads: Option<usize>) -> TrackerResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(TrackerError::validation("render threads must be > 0"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TrackerError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
