//! Core Effect trait and related types.
//!
//! The [`Effect`] trait is the buffer-to-buffer transform at the end of the
//! render pipeline. Effects are applied strictly in insertion order; they do
//! not commute, so order is part of a pipeline's meaning.
//!
//! ## Design Decisions
//!
//! - **Whole buffers**: the engine renders offline, so effects see a complete
//!   mono buffer per call rather than individual samples.
//!
//! - **Owned in, owned out**: `apply` takes the buffer by value and returns
//!   the processed buffer, which lets most effects work in place without
//!   copying.
//!
//! - **Persistent state**: effects take `&mut self` and may carry state from
//!   one call to the next (filter memory, delay history). That state lives as
//!   long as the instance and is cleared only by [`Effect::reset`].

use serde_json::Value;

use crate::buffer::Buffer;
use crate::error::DspResult;

/// Core trait for all buffer effects.
///
/// # Example
///
/// ```rust
/// use ambiance_core::{Buffer, DspResult, Effect};
///
/// struct Invert;
///
/// impl Effect for Invert {
///     fn kind(&self) -> &'static str {
///         "invert"
///     }
///
///     fn apply(&mut self, mut buffer: Buffer, _sample_rate: u32) -> DspResult<Buffer> {
///         for sample in buffer.iter_mut() {
///             *sample = -*sample;
///         }
///         Ok(buffer)
///     }
/// }
///
/// let out = Invert.apply(vec![0.5, -0.25], 48000).unwrap();
/// assert_eq!(out, vec![-0.5, 0.25]);
/// ```
pub trait Effect {
    /// Type identifier of the effect (registry tag, e.g. `"reverb"`).
    fn kind(&self) -> &'static str;

    /// Process a buffer, returning a buffer of the same length.
    fn apply(&mut self, buffer: Buffer, sample_rate: u32) -> DspResult<Buffer>;

    /// Clear any state carried between calls.
    fn reset(&mut self) {}

    /// Serializable description of this effect's configuration.
    fn to_config(&self) -> Value {
        serde_json::json!({ "type": self.kind() })
    }
}

/// Extension trait for chaining effects.
///
/// Provides a fluent interface for composing two effects with static
/// dispatch. For runtime-built pipelines, use `Vec<Box<dyn Effect>>`.
pub trait EffectExt: Effect + Sized {
    /// Chain this effect with another, creating a composite effect.
    ///
    /// The output of `self` feeds into the input of `next`.
    fn chain<E: Effect>(self, next: E) -> Chain<Self, E> {
        Chain {
            first: self,
            second: next,
        }
    }
}

impl<T: Effect> EffectExt for T {}

/// Two effects chained in series.
///
/// Created by [`EffectExt::chain`].
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A: Effect, B: Effect> Effect for Chain<A, B> {
    fn kind(&self) -> &'static str {
        "chain"
    }

    fn apply(&mut self, buffer: Buffer, sample_rate: u32) -> DspResult<Buffer> {
        let mid = self.first.apply(buffer, sample_rate)?;
        self.second.apply(mid, sample_rate)
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn to_config(&self) -> Value {
        serde_json::json!({
            "type": self.kind(),
            "effects": [self.first.to_config(), self.second.to_config()],
        })
    }
}

impl<A, B> Chain<A, B> {
    /// Get a reference to the first effect in the chain.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// Get a reference to the second effect in the chain.
    pub fn second(&self) -> &B {
        &self.second
    }
}

impl<E: Effect + ?Sized> Effect for Box<E> {
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    fn apply(&mut self, buffer: Buffer, sample_rate: u32) -> DspResult<Buffer> {
        (**self).apply(buffer, sample_rate)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn to_config(&self) -> Value {
        (**self).to_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scale(f32);

    impl Effect for Scale {
        fn kind(&self) -> &'static str {
            "scale"
        }

        fn apply(&mut self, mut buffer: Buffer, _: u32) -> DspResult<Buffer> {
            for s in buffer.iter_mut() {
                *s *= self.0;
            }
            Ok(buffer)
        }
    }

    struct Saturate(f32);

    impl Effect for Saturate {
        fn kind(&self) -> &'static str {
            "saturate"
        }

        fn apply(&mut self, mut buffer: Buffer, _: u32) -> DspResult<Buffer> {
            for s in buffer.iter_mut() {
                *s = s.clamp(-self.0, self.0);
            }
            Ok(buffer)
        }
    }

    struct Counter(usize);

    impl Effect for Counter {
        fn kind(&self) -> &'static str {
            "counter"
        }

        fn apply(&mut self, buffer: Buffer, _: u32) -> DspResult<Buffer> {
            self.0 += 1;
            Ok(buffer)
        }

        fn reset(&mut self) {
            self.0 = 0;
        }
    }

    #[test]
    fn test_chain() {
        let mut chain = Scale(2.0).chain(Scale(3.0));
        assert_eq!(chain.apply(vec![1.0], 48000).unwrap(), vec![6.0]);
    }

    #[test]
    fn test_chain_order_matters() {
        let input = vec![0.8, -0.8];
        let mut scale_then_clip = Scale(2.0).chain(Saturate(1.0));
        let mut clip_then_scale = Saturate(1.0).chain(Scale(2.0));

        let a = scale_then_clip.apply(input.clone(), 48000).unwrap();
        let b = clip_then_scale.apply(input, 48000).unwrap();

        assert_eq!(a, vec![1.0, -1.0]);
        assert_eq!(b, vec![1.6, -1.6]);
    }

    #[test]
    fn test_chain_reset_reaches_both() {
        let mut chain = Counter(0).chain(Counter(0));
        chain.apply(vec![0.0], 48000).unwrap();
        chain.apply(vec![0.0], 48000).unwrap();
        assert_eq!(chain.first().0, 2);
        chain.reset();
        assert_eq!(chain.first().0, 0);
        assert_eq!(chain.second().0, 0);
    }

    #[test]
    fn test_chain_config_lists_both() {
        let chain = Scale(2.0).chain(Saturate(1.0));
        let config = chain.to_config();
        assert_eq!(config["type"], "chain");
        assert_eq!(config["effects"][0]["type"], "scale");
        assert_eq!(config["effects"][1]["type"], "saturate");
    }

    #[test]
    fn test_boxed_effect() {
        let mut boxed: Box<dyn Effect> = Box::new(Scale(0.5));
        assert_eq!(boxed.kind(), "scale");
        assert_eq!(boxed.apply(vec![1.0], 48000).unwrap(), vec![0.5]);
    }
}
