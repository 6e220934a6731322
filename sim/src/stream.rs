//! Frame generator.
//!
//! Turns a set of [`SimTarget`]s into per-frame vector sets with:
//! - uniform noise of half-width `noise` on every component
//! - miss probability `p_miss` per source and frame
//! - shuffled output order (the tracker must not rely on it)

use crate::target::SimTarget;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use vtrack_core::FeatureVec;

/// One generated frame. `labels[i]` is the ground-truth source of `vectors[i]`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub vectors: Vec<Vec<f64>>,
    pub labels: Vec<u64>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vectors in the tracker's input type.
    pub fn feature_vecs(&self) -> Vec<FeatureVec> {
        self.vectors
            .iter()
            .map(|v| FeatureVec::from_column_slice(v))
            .collect()
    }
}

/// Noise and detection parameters of a stream.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StreamParams {
    /// Half-width of the uniform noise added to each component
    pub noise: f64,
    /// Probability a source emits nothing in a frame
    pub p_miss: f64,
    /// Shuffle vector order within each frame
    pub shuffle: bool,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            noise: 0.5,
            p_miss: 0.0,
            shuffle: true,
        }
    }
}

/// Deterministic frame source for a fixed seed.
pub struct VectorStream {
    targets: Vec<SimTarget>,
    params: StreamParams,
    rng: ChaCha8Rng,
    next_index: u64,
}

impl VectorStream {
    pub fn new(targets: Vec<SimTarget>, params: StreamParams, seed: u64) -> Self {
        Self {
            targets,
            params,
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_index: 0,
        }
    }

    pub fn targets(&self) -> &[SimTarget] {
        &self.targets
    }

    /// Generate the next frame.
    pub fn next_frame(&mut self) -> Frame {
        let k = self.next_index;
        self.next_index += 1;

        let mut vectors = Vec::with_capacity(self.targets.len());
        let mut labels = Vec::with_capacity(self.targets.len());

        for target in &self.targets {
            if !target.is_active(k) {
                continue;
            }
            // Miss detection?
            if self.params.p_miss > 0.0 && self.rng.gen::<f64>() < self.params.p_miss {
                continue;
            }
            let noise = self.params.noise;
            let v: Vec<f64> = target
                .position_at(k)
                .into_iter()
                .map(|x| x + self.rng.gen::<f64>() * noise * 2.0 - noise)
                .collect();
            vectors.push(v);
            labels.push(target.label);
        }

        if self.params.shuffle {
            let mut order: Vec<usize> = (0..vectors.len()).collect();
            order.shuffle(&mut self.rng);
            vectors = order.iter().map(|&i| std::mem::take(&mut vectors[i])).collect();
            labels = order.iter().map(|&i| labels[i]).collect();
        }

        Frame {
            index: k,
            vectors,
            labels,
        }
    }

    /// Generate `n` consecutive frames.
    pub fn take_frames(&mut self, n: u64) -> Vec<Frame> {
        (0..n).map(|_| self.next_frame()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::MotionSpec;

    fn sources() -> Vec<SimTarget> {
        (0..4)
            .map(|i| SimTarget::new(i, vec![i as f64 * 100.0, 0.0], MotionSpec::Stationary))
            .collect()
    }

    #[test]
    fn same_seed_same_frames() {
        let a = VectorStream::new(sources(), StreamParams::default(), 9).take_frames(10);
        let b = VectorStream::new(sources(), StreamParams::default(), 9).take_frames(10);
        assert_eq!(a, b);
    }

    #[test]
    fn labels_follow_vectors_through_shuffle() {
        let mut s = VectorStream::new(sources(), StreamParams::default(), 1);
        for frame in s.take_frames(20) {
            assert_eq!(frame.len(), 4);
            for (v, &label) in frame.vectors.iter().zip(&frame.labels) {
                assert!((v[0] - label as f64 * 100.0).abs() <= 0.5);
                assert!(v[1].abs() <= 0.5);
            }
        }
    }

    #[test]
    fn misses_drop_vectors() {
        let params = StreamParams {
            p_miss: 0.5,
            ..Default::default()
        };
        let frames = VectorStream::new(sources(), params, 3).take_frames(50);
        let total: usize = frames.iter().map(Frame::len).sum();
        assert!(total < 4 * 50);
        assert!(total > 0);
    }

    #[test]
    fn feature_vecs_have_source_dimension() {
        let mut s = VectorStream::new(sources(), StreamParams::default(), 0);
        let frame = s.next_frame();
        assert!(frame.feature_vecs().iter().all(|v| v.len() == 2));
    }
}
