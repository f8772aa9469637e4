use atomic_float::AtomicF32;
use nalgebra::Vector3;
use rayon::prelude::*;
use std::sync::atomic::Ordering;

/// Color and depth storage for one frame, optionally supersampled.
///
/// Both buffers are atomics so rows can be shaded in parallel without locks.
/// A pixel is only ever written by the thread that won its depth test.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub sample_count: usize,
    pub buffer_width: usize,
    pub buffer_height: usize,

    color_buffer: Vec<[AtomicF32; 3]>,
    depth_buffer: Vec<AtomicF32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        let buffer_width = width * sample_count;
        let buffer_height = height * sample_count;
        let size = buffer_width * buffer_height;

        Self {
            width,
            height,
            sample_count,
            buffer_width,
            buffer_height,
            color_buffer: (0..size)
                .map(|_| [AtomicF32::new(0.0), AtomicF32::new(0.0), AtomicF32::new(0.0)])
                .collect(),
            depth_buffer: (0..size).map(|_| AtomicF32::new(f32::INFINITY)).collect(),
        }
    }

    /// Resets every sample to `color` and `depth`.
    pub fn clear(&self, color: Vector3<f32>, depth: f32) {
        self.color_buffer
            .par_iter()
            .zip(self.depth_buffer.par_iter())
            .for_each(|(c, d)| {
                c[0].store(color.x, Ordering::Relaxed);
                c[1].store(color.y, Ordering::Relaxed);
                c[2].store(color.z, Ordering::Relaxed);
                d.store(depth, Ordering::Relaxed);
            });
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.buffer_width && y < self.buffer_height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.buffer_width + x
    }

    /// Depth test (`less`) and update.
    /// Returns true if the new depth is closer than the stored value.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let depth = &self.depth_buffer[self.index(x, y)];

        let mut current = depth.load(Ordering::Relaxed);
        loop {
            if new_depth >= current {
                return false;
            }
            match depth.compare_exchange_weak(
                current,
                new_depth,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated) => current = updated,
            }
        }
    }

    /// Should only be called after `depth_test_and_update` returned true.
    #[inline]
    pub fn set_sample(&self, x: usize, y: usize, color: Vector3<f32>) {
        if self.in_bounds(x, y) {
            let c = &self.color_buffer[self.index(x, y)];
            c[0].store(color.x, Ordering::Relaxed);
            c[1].store(color.y, Ordering::Relaxed);
            c[2].store(color.z, Ordering::Relaxed);
        }
    }

    pub fn get_sample(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let c = &self.color_buffer[self.index(x, y)];
        Some(Vector3::new(
            c[0].load(Ordering::Relaxed),
            c[1].load(Ordering::Relaxed),
            c[2].load(Ordering::Relaxed),
        ))
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        self.in_bounds(x, y)
            .then(|| self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed))
    }

    /// Resolved color of output pixel (x, y): the box-filtered average of its samples.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let start_x = x * self.sample_count;
        let start_y = y * self.sample_count;
        let mut sum_color = Vector3::zeros();
        for dy in 0..self.sample_count {
            for dx in 0..self.sample_count {
                sum_color += self.get_sample(start_x + dx, start_y + dy)?;
            }
        }

        let samples = (self.sample_count * self.sample_count) as f32;
        Some(sum_color / samples)
    }
}
