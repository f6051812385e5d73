use embassy_stm32::adc::{Adc, AdcChannel, AnyAdcChannel, Resolution, SampleTime};
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::ADC1;
use embassy_stm32::usart::{Config as UsartConfig, UartTx};
use embassy_stm32::{rcc, Config};

use crate::config::UART_BAUDRATE;

// ── Board struct ──────────────────────────────────────────
pub struct Board {
    pub adc: Adc<'static, ADC1>,
    pub hall_pin: AnyAdcChannel<ADC1>, // A0 on the Arduino header
    pub serial_tx: UartTx<'static, Async>, // ST-LINK VCP
}

impl Board {
    pub fn init() -> Self {
        let mut config = Config::default();

        // HSI16 -> PLL -> 64MHz SYSCLK
        config.rcc.hsi = Some(rcc::Hsi {
            sys_div: rcc::HsiSysDiv::DIV1,
        });
        config.rcc.pll = Some(rcc::Pll {
            source: rcc::PllSource::HSI,    // Use HSI as PLL source
            prediv: rcc::PllPreDiv::DIV2,   // 16MHz / 2 = 8MHz
            mul: rcc::PllMul::MUL16,        // 8MHz * 16 = 128MHz
            divp: None,                     // Not used
            divq: None,                     // Not used
            divr: Some(rcc::PllRDiv::DIV2), // 128MHz / 2 = 64MHz
        });
        config.rcc.sys = rcc::Sysclk::PLL1_R;
        let p = embassy_stm32::init(config);

        // 10-bit conversions so raw readings span 0..=1023
        let mut adc = Adc::new(p.ADC1);
        adc.set_resolution(Resolution::BITS10);
        adc.set_sample_time(SampleTime::CYCLES79_5);
        let hall_pin = p.PA0.degrade_adc();

        let mut us_cfg = UsartConfig::default();
        us_cfg.baudrate = UART_BAUDRATE;

        // USART2 TX only (DMA CH1)
        let serial_tx = UartTx::new(p.USART2, p.PA2, p.DMA1_CH1, us_cfg).unwrap();

        Self {
            adc,
            hall_pin,
            serial_tx,
        }
    }
}
