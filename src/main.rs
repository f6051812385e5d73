#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use defmt::*;
    use embassy_executor::Spawner;
    use {defmt_rtt as _, panic_probe as _};

    use hall_sampler::{
        config::{AUTO_ZERO_ON_BOOT, SAMPLE_INTERVAL_MS, UART_BAUDRATE},
        drivers::{HallInput, SensorModel},
        tasks::{auto_zero, sampler_task},
        Board, Sampler,
    };

    #[embassy_executor::main]
    async fn main(spawner: Spawner) {
        info!("Starting hall-sampler, {} baud", UART_BAUDRATE);
        let board = Board::init();
        let mut input = HallInput::new(board.adc, board.hall_pin);

        let model = if AUTO_ZERO_ON_BOOT {
            auto_zero(&mut input, SensorModel::DATASHEET).await
        } else {
            SensorModel::DATASHEET
        };

        let sampler = Sampler::new(model, SAMPLE_INTERVAL_MS);
        spawner
            .spawn(sampler_task(sampler, input, board.serial_tx))
            .unwrap();
        info!("Sampler task spawned on main executor");

        core::future::pending::<()>().await;
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("hall-sampler is firmware; build it for thumbv6m-none-eabi and flash the board");
}
