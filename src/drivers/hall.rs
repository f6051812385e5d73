//! Linear Hall-effect current sensor model
//! ===========================================================
//!
//! The sensor outputs `zero_offset` volts at 0 A and moves by `sensitivity` volts per amp
//! in either direction. The ADC maps `0..=adc_max` onto `0..=reference` volts.

use crate::config::{
    ADC_MAX_READING, ADC_REFERENCE_VOLTS, SENSOR_SENSITIVITY_V_PER_A, SENSOR_ZERO_OFFSET_VOLTS,
    ZERO_OFFSET_TOLERANCE_VOLTS,
};

/// Anything that can hand out one raw ADC conversion on demand.
pub trait AnalogSource {
    fn read_raw(&mut self) -> u16;
}

impl<F: FnMut() -> u16> AnalogSource for F {
    fn read_raw(&mut self) -> u16 {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Reading {
    pub raw: u16,
    pub volts: f32,
    pub amps: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum CalibrationError {
    NoSamples,
    /// Sensitivity or ADC scale that would divide by zero
    InvalidModel,
    /// Measured midpoint (volts) too far from the nominal one
    OutOfRange(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct SensorModel {
    adc_max: u16,
    reference_volts: f32,
    zero_offset_volts: f32,
    sensitivity_volts_per_amp: f32,
}

impl SensorModel {
    pub const DATASHEET: Self = Self {
        adc_max: ADC_MAX_READING,
        reference_volts: ADC_REFERENCE_VOLTS,
        zero_offset_volts: SENSOR_ZERO_OFFSET_VOLTS,
        sensitivity_volts_per_amp: SENSOR_SENSITIVITY_V_PER_A,
    };

    /// Both divisors must be non-zero and finite, otherwise amps come out NaN/inf
    /// and encode as `null`.
    pub fn new(
        adc_max: u16,
        reference_volts: f32,
        zero_offset_volts: f32,
        sensitivity_volts_per_amp: f32,
    ) -> Result<Self, CalibrationError> {
        let usable = |v: f32| v.is_finite() && v != 0.0;
        if adc_max == 0
            || !usable(reference_volts)
            || !usable(sensitivity_volts_per_amp)
            || !zero_offset_volts.is_finite()
        {
            return Err(CalibrationError::InvalidModel);
        }
        Ok(Self {
            adc_max,
            reference_volts,
            zero_offset_volts,
            sensitivity_volts_per_amp,
        })
    }

    pub fn zero_offset_volts(&self) -> f32 {
        self.zero_offset_volts
    }

    pub fn sensitivity_volts_per_amp(&self) -> f32 {
        self.sensitivity_volts_per_amp
    }

    #[inline]
    pub fn raw_to_volts(&self, raw: u16) -> f32 {
        raw as f32 * self.reference_volts / self.adc_max as f32
    }

    #[inline]
    pub fn volts_to_amps(&self, volts: f32) -> f32 {
        (volts - self.zero_offset_volts) / self.sensitivity_volts_per_amp
    }

    /// No range check: a noisy or out-of-range raw value converts like any other.
    pub fn convert(&self, raw: u16) -> Reading {
        let volts = self.raw_to_volts(raw);
        Reading {
            raw,
            volts,
            amps: self.volts_to_amps(volts),
        }
    }

    /// Auto-zero: average readings taken with no current flowing and adopt the result
    /// as the zero offset. Rejected if it strays more than the configured tolerance
    /// from the current offset.
    pub fn with_measured_zero<I>(self, readings: I) -> Result<Self, CalibrationError>
    where
        I: IntoIterator<Item = u16>,
    {
        let (sum, count) = readings
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), raw| (sum + raw as u64, count + 1));

        if count == 0 {
            return Err(CalibrationError::NoSamples);
        }

        let mean_raw = (sum as f64 / count as f64) as f32;
        let measured = mean_raw * self.reference_volts / self.adc_max as f32;

        if (measured - self.zero_offset_volts).abs() > ZERO_OFFSET_TOLERANCE_VOLTS {
            return Err(CalibrationError::OutOfRange(measured));
        }

        Ok(Self {
            zero_offset_volts: measured,
            ..self
        })
    }
}

impl Default for SensorModel {
    fn default() -> Self {
        Self::DATASHEET
    }
}
