// Centralize all configuration constants
pub const SAMPLE_INTERVAL_MS: u64 = 5;
pub const UART_BAUDRATE: u32 = 9_600;

// ADC front end: 10-bit conversion referenced to 5 V
pub const ADC_MAX_READING: u16 = 1023;
pub const ADC_REFERENCE_VOLTS: f32 = 5.0;

// Hall sensor datasheet values (32 mV/A around a 2.5 V midpoint)
pub const SENSOR_ZERO_OFFSET_VOLTS: f32 = 2.5;
pub const SENSOR_SENSITIVITY_V_PER_A: f32 = 0.032;

// Auto-zero at boot; off keeps the datasheet offset
pub const AUTO_ZERO_ON_BOOT: bool = false;
pub const ZERO_CALIBRATION_SAMPLES: usize = 64;
pub const ZERO_CALIBRATION_SPACING_MS: u64 = 2;
pub const ZERO_OFFSET_TOLERANCE_VOLTS: f32 = 0.25;

// Buffer sizes
pub const LINE_BUFFER_SIZE: usize = 128;

pub const STATS_REPORT_PERIOD_MS: u64 = 1000;
