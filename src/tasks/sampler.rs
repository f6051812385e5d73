use defmt::*;
use embassy_executor::task;
use embassy_futures::yield_now;
use embassy_stm32::{mode::Async, usart::UartTx};
use embassy_time::{Duration, Instant, Timer};

use crate::config::{
    STATS_REPORT_PERIOD_MS, ZERO_CALIBRATION_SAMPLES, ZERO_CALIBRATION_SPACING_MS,
};
use crate::drivers::{AnalogSource, HallInput, SensorModel};
use crate::sampler::{Sampler, TransmitError};
use crate::stats::SampleStats;

/// Measure the sensor midpoint with no current flowing. Falls back to the given
/// model if the measurement looks wrong.
pub async fn auto_zero(input: &mut HallInput, model: SensorModel) -> SensorModel {
    info!(
        "Auto-zero: averaging {} readings, {}ms apart",
        ZERO_CALIBRATION_SAMPLES, ZERO_CALIBRATION_SPACING_MS
    );

    let mut readings = [0u16; ZERO_CALIBRATION_SAMPLES];
    for slot in readings.iter_mut() {
        *slot = input.read_raw();
        Timer::after(Duration::from_millis(ZERO_CALIBRATION_SPACING_MS)).await;
    }

    match model.with_measured_zero(readings) {
        Ok(calibrated) => {
            info!(
                "Auto-zero: offset {}V (datasheet {}V)",
                calibrated.zero_offset_volts(), model.zero_offset_volts()
            );
            calibrated
        }
        Err(e) => {
            warn!("Auto-zero rejected: {:?}, keeping datasheet offset", e);
            model
        }
    }
}

#[task]
pub async fn sampler_task(
    mut sampler: Sampler,
    mut input: HallInput,
    mut tx: UartTx<'static, Async>,
) {
    info!(
        "Sampler task started - sampling every {}ms, model {:?}",
        sampler.interval_ms(),
        sampler.model()
    );
    let mut stats = SampleStats::new(STATS_REPORT_PERIOD_MS, Instant::now().as_millis());

    loop {
        let now = Instant::now().as_millis();

        match sampler.step(now, &mut input, &mut tx).await {
            Ok(Some(sample)) => {
                debug!("t={}s I={}A", sample.time, sample.current);
                stats.record_sample();
            }
            Ok(None) => yield_now().await,
            Err(TransmitError::Encode(e)) => {
                stats.record_failure();
                warn!("Sample dropped, encode failed: {:?}", e);
            }
            Err(TransmitError::Io(e)) => {
                stats.record_failure();
                warn!("Serial write failed: {:?}", e);
            }
        }

        if let Some(report) = stats.report(now) {
            info!(
                "Sampler: {} Hz, {} failures in {}ms",
                report.rate_hz(),
                report.failures,
                report.window_ms
            );
        }
    }
}
