//! Progressive rendering: repeated passes folded into a running average.

use std::time::Instant;

use lumen_core::Scene;

use crate::{render_pass, ImageBuffer, RenderConfig, RenderError, TraceStats};

/// Accumulates passes so that the buffer always holds the mean of every
/// pass rendered so far and can be previewed between passes.
pub struct ProgressiveRenderer {
    config: RenderConfig,
    buffer: ImageBuffer,
    passes: u32,
    stats: TraceStats,
}

impl ProgressiveRenderer {
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        let buffer = ImageBuffer::new(config.width, config.height);
        Ok(Self {
            config,
            buffer,
            passes: 0,
            stats: TraceStats::default(),
        })
    }

    /// Render one more pass and fold it into the running average.
    ///
    /// Pass `k` (counting from zero) uses the seed `config.seed + k`.
    pub fn step(&mut self, scene: &Scene) -> Result<TraceStats, RenderError> {
        let start = Instant::now();
        let seed = self.config.seed.wrapping_add(self.passes as u64);

        // Back to the sum of all passes, add one more, divide again
        self.buffer.scale(self.passes as f32);
        let stats = match render_pass(scene, &self.config, &mut self.buffer, seed) {
            Ok(stats) => stats,
            Err(err) => {
                if self.passes > 0 {
                    self.buffer.scale(1.0 / self.passes as f32);
                }
                return Err(err);
            }
        };
        self.passes += 1;
        self.buffer.scale(1.0 / self.passes as f32);
        self.stats.merge(stats);

        log::info!(
            "Pass {} finished in {:?} ({} rays)",
            self.passes,
            start.elapsed(),
            stats.rays
        );
        Ok(stats)
    }

    /// Current preview: the mean of all passes so far.
    pub fn image(&self) -> &ImageBuffer {
        &self.buffer
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Totals over every pass so far.
    pub fn stats(&self) -> TraceStats {
        self.stats
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Drop all accumulated passes.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.passes = 0;
        self.stats = TraceStats::default();
    }
}
