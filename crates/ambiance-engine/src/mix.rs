//! Headroom-safe mixing.

use ambiance_core::Buffer;

/// Sum `buffers` sample by sample and normalize the result into `[-1, 1]`.
///
/// Shorter buffers are padded with trailing zeros, so the output is as long
/// as the longest input. When the summed peak exceeds 1.0 the whole buffer
/// is scaled by `1 / peak`, preserving the balance between inputs; nothing
/// is clipped. An empty input list mixes to a single zero sample.
///
/// The sum is accumulated in `f64`, so finite inputs near `f32::MAX` still
/// normalize to finite output.
pub fn mix(buffers: &[Buffer]) -> Buffer {
    let Some(len) = buffers.iter().map(Vec::len).max() else {
        return vec![0.0];
    };

    let mut sum = vec![0.0_f64; len];
    for input in buffers {
        for (out, &sample) in sum.iter_mut().zip(input) {
            *out += f64::from(sample);
        }
    }

    let peak = sum.iter().fold(0.0_f64, |peak, s| peak.max(s.abs()));
    let gain = if peak > 1.0 { 1.0 / peak } else { 1.0 };
    sum.into_iter().map(|s| (s * gain) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_longest() {
        let out = mix(&[vec![0.1, 0.1], vec![0.2, 0.2, 0.2, 0.2]]);
        assert_eq!(out.len(), 4);
        assert!((out[0] - 0.3).abs() < 1e-7);
        assert!((out[3] - 0.2).abs() < 1e-7);
    }

    #[test]
    fn normalizes_only_when_over_unity() {
        let quiet = mix(&[vec![0.4], vec![0.5]]);
        assert!((quiet[0] - 0.9).abs() < 1e-7);

        let loud = mix(&[vec![1.0, 0.5], vec![1.0, -0.5]]);
        assert!((loud[0] - 1.0).abs() < 1e-7);
        assert!(loud[1].abs() < 1e-7);
    }

    #[test]
    fn preserves_balance() {
        let out = mix(&[vec![2.0, 1.0], vec![2.0, 0.0]]);
        assert!((out[0] - 1.0).abs() < 1e-7);
        assert!((out[1] - 0.25).abs() < 1e-7);
    }

    #[test]
    #[allow(overflowing_literals)]
    fn huge_inputs_stay_finite() {
        let out = mix(&[vec![3.0e38, 0.5], vec![3.0e38, 0.5]]);
        assert!(out.iter().all(|s| s.is_finite()));
        assert!((out[0] - 1.0).abs() < 1e-7);
        assert!(out[1] > 0.0);
        assert!((out[1] - 1.0 / 6.0e38).abs() < 1e-30);
    }

    #[test]
    fn empty_list_is_single_zero() {
        assert_eq!(mix(&[]), vec![0.0]);
    }
}
