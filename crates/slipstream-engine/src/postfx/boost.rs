/// Intensity a boost trigger spikes to.
pub const BOOST_SPIKE: f32 = 2.5;

/// Linear decay rate, in intensity units per second.
pub const BOOST_DECAY_RATE: f32 = 3.5;

/// Remaining intensity below this snaps to zero.
///
/// Summing many small `dt` steps leaves float residue once the decay window
/// has elapsed.
pub const BOOST_REST_EPSILON: f32 = 1.0e-3;

/// The single dynamic effect parameter.
///
/// Only two operations mutate it: [`Boost::trigger`] resets it to the spike
/// value and [`Boost::decay`] walks it linearly back to zero. It is never
/// negative.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Boost {
    amount: f32,
}

impl Boost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current intensity (always `>= 0`).
    #[inline]
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Returns `true` while the effect would be visible.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.amount > 0.0
    }

    /// Sets the intensity to [`BOOST_SPIKE`]. Repeated triggers do not stack.
    pub fn trigger(&mut self) {
        self.amount = BOOST_SPIKE;
    }

    /// Advances the decay by `dt` seconds.
    ///
    /// Negative or non-finite `dt` is ignored so a bad clock sample can never
    /// push the intensity back up or below zero.
    pub fn decay(&mut self, dt: f32) {
        if self.amount <= 0.0 || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        self.amount -= dt * BOOST_DECAY_RATE;
        if self.amount < BOOST_REST_EPSILON {
            self.amount = 0.0;
        }
    }
}
