#[cfg(target_os = "none")]
pub mod adc;
pub mod hall;

#[cfg(target_os = "none")]
pub use adc::HallInput;
pub use hall::{AnalogSource, CalibrationError, Reading, SensorModel};
