//! Motion sensor trait

/// Head-movement accelerometer
///
/// Only power control is needed by the loop; the sensor draws current
/// whenever it is awake, so it sleeps outside Recording.
pub trait Accelerometer {
    fn set_sleep(&mut self, sleep: bool);
}
