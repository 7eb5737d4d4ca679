//! Scale factor resolution.

use crate::platform::{PlatformStrategy, ScaleSource};
use crate::toolkit::VisualContainer;
use std::sync::atomic::{AtomicU64, Ordering};

/// Device pixels per logical pixel. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub const ONE: ScaleFactor = ScaleFactor(1.0);

    /// `None` when `value` is not a positive finite number.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::ONE
    }
}

/// The scale currently cached by a host, shared with the input bridge.
#[derive(Debug)]
pub struct SharedScale(AtomicU64);

impl SharedScale {
    pub fn new(scale: ScaleFactor) -> Self {
        Self(AtomicU64::new(scale.get().to_bits()))
    }

    pub fn get(&self) -> ScaleFactor {
        ScaleFactor(f64::from_bits(self.0.load(Ordering::Acquire)))
    }

    pub fn set(&self, scale: ScaleFactor) {
        self.0.store(scale.get().to_bits(), Ordering::Release);
    }
}

impl Default for SharedScale {
    fn default() -> Self {
        Self::new(ScaleFactor::ONE)
    }
}

/// Computes the effective scale for a container. Pure query; callers cache the answer
/// until the container is added to a display again or repainted.
#[derive(Debug, Clone, Copy)]
pub struct ScaleResolver {
    source: ScaleSource,
}

impl ScaleResolver {
    pub fn new(strategy: &PlatformStrategy) -> Self {
        Self { source: strategy.scale }
    }

    /// Scale for a container that was just added to a (possibly different) display.
    pub fn resolve(&self, container: &dyn VisualContainer) -> ScaleFactor {
        match self.source {
            ScaleSource::Forced(v) => ScaleFactor::new(v).unwrap_or_default(),
            ScaleSource::Native => ScaleFactor::ONE,
            ScaleSource::Measured => container
                .display_scale()
                .and_then(ScaleFactor::new)
                .unwrap_or_default(),
        }
    }

    /// Scale at paint time. `transform_scale` is the horizontal scale of the paint
    /// transform, if the toolkit reported one; `current` is kept otherwise.
    pub fn resolve_paint(&self, transform_scale: Option<f64>, current: ScaleFactor) -> ScaleFactor {
        match self.source {
            ScaleSource::Forced(v) => ScaleFactor::new(v).unwrap_or(current),
            ScaleSource::Native => current,
            ScaleSource::Measured => transform_scale.and_then(ScaleFactor::new).unwrap_or(current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmbedConfig;
    use crate::platform::PlatformFamily;
    use crate::testing::TestContainer;

    fn resolver(family: PlatformFamily, forced: Option<f64>) -> ScaleResolver {
        let cfg = EmbedConfig::builder()
            .with(|c| c.forced_scale = forced)
            .build()
            .unwrap();
        ScaleResolver::new(&PlatformStrategy::for_family(family, &cfg))
    }

    #[test]
    fn rejects_non_positive_scales() {
        assert!(ScaleFactor::new(0.0).is_none());
        assert!(ScaleFactor::new(-2.0).is_none());
        assert!(ScaleFactor::new(f64::NAN).is_none());
        assert_eq!(ScaleFactor::new(1.25).map(|s| s.get()), Some(1.25));
    }

    #[test]
    fn shared_scale_keeps_the_exact_value() {
        let shared = SharedScale::default();
        assert_eq!(shared.get(), ScaleFactor::ONE);
        shared.set(ScaleFactor::new(1.75).unwrap());
        assert_eq!(shared.get().get(), 1.75);
    }

    #[test]
    fn measured_scale_reads_the_display() {
        let c = TestContainer::new(0, 0, 100, 100);
        c.set_display_scale(Some(1.5));
        assert_eq!(resolver(PlatformFamily::Windows, None).resolve(&c).get(), 1.5);
    }

    #[test]
    fn falls_back_to_one_before_first_paint() {
        let c = TestContainer::new(0, 0, 100, 100);
        c.set_display_scale(None);
        let r = resolver(PlatformFamily::Windows, None);
        assert_eq!(r.resolve(&c), ScaleFactor::ONE);
        assert_eq!(r.resolve_paint(None, ScaleFactor::ONE), ScaleFactor::ONE);
        assert_eq!(r.resolve_paint(Some(2.0), ScaleFactor::ONE).get(), 2.0);
    }

    #[test]
    fn forced_scale_wins_everywhere() {
        let c = TestContainer::new(0, 0, 100, 100);
        c.set_display_scale(Some(1.5));
        let r = resolver(PlatformFamily::Linux, Some(2.0));
        assert_eq!(r.resolve(&c).get(), 2.0);
        assert_eq!(r.resolve_paint(Some(1.0), ScaleFactor::ONE).get(), 2.0);
    }

    #[test]
    fn native_scaling_stays_at_one() {
        let c = TestContainer::new(0, 0, 100, 100);
        c.set_display_scale(Some(2.0));
        let r = resolver(PlatformFamily::MacOs, None);
        assert_eq!(r.resolve(&c), ScaleFactor::ONE);
        assert_eq!(r.resolve_paint(Some(2.0), ScaleFactor::ONE), ScaleFactor::ONE);
    }
}
