use crate::model::GazeSample;

/// Bounds a sample sequence to roughly `max_frames` by uniform stride
/// downsampling: keep every `len / max_frames`-th sample starting at index 0.
///
/// The bound is approximate on purpose. When `len` is only slightly above the
/// cap the integer stride is 1 and nothing is dropped, matching the output of
/// the original recorder tooling frame for frame.
pub fn reduce_samples(samples: Vec<GazeSample>, max_frames: usize) -> Vec<GazeSample> {
    if max_frames == 0 || samples.len() <= max_frames {
        return samples;
    }

    let stride = samples.len() / max_frames;
    if stride <= 1 {
        return samples;
    }

    samples.into_iter().step_by(stride).collect()
}
