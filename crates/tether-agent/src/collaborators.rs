//! Interfaces to the hardware the agent does not own.

use tether_formation::{Color, Motion};

/// Opaque radio reading delivered alongside a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMeasurement(pub u16);

/// Turns a raw reading into a distance in millimetres.
pub trait DistanceEstimator {
    fn estimate_distance(&self, raw: RawMeasurement) -> u16;
}

impl<F> DistanceEstimator for F
where
    F: Fn(RawMeasurement) -> u16,
{
    fn estimate_distance(&self, raw: RawMeasurement) -> u16 {
        self(raw)
    }
}

/// Drive and status-light output. Fire and forget.
pub trait Actuator {
    fn set_motion(&mut self, motion: Motion);
    fn set_indicator(&mut self, color: Color);
}

impl<A: Actuator + ?Sized> Actuator for &mut A {
    fn set_motion(&mut self, motion: Motion) {
        (**self).set_motion(motion)
    }

    fn set_indicator(&mut self, color: Color) {
        (**self).set_indicator(color)
    }
}
