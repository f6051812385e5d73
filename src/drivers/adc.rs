use embassy_stm32::adc::{Adc, AnyAdcChannel};
use embassy_stm32::peripherals::ADC1;

use super::hall::AnalogSource;

/// Blocking one-shot reads of the Hall sensor channel.
pub struct HallInput {
    adc: Adc<'static, ADC1>,
    pin: AnyAdcChannel<ADC1>,
}

impl HallInput {
    pub fn new(adc: Adc<'static, ADC1>, pin: AnyAdcChannel<ADC1>) -> Self {
        Self { adc, pin }
    }
}

impl AnalogSource for HallInput {
    fn read_raw(&mut self) -> u16 {
        self.adc.blocking_read(&mut self.pin)
    }
}
