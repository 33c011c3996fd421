//! Farad - Portable Power Station Firmware
//!
//! Main firmware binary for RP2040-based power station controllers.
//!
//! The board carries three peripherals of interest: a companion sensor MCU
//! streaming binary telemetry frames on UART0, a radio co-processor
//! carrying the browser-facing control channel on UART1, and a WS2812
//! strip on PIO0. All coordination happens through static embassy-sync
//! channels; the core logic lives in board-agnostic crates.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{PIO0, UART0, UART1};
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::ws2812::PioWs2812Program;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use farad_core::animation::DEFAULT_LED_COUNT;
use farad_hal_rp2040::flash::FlashStorage;
use farad_hal_rp2040::gpio::OutputLine;
use farad_hal_rp2040::led::Ws2812Strip;

mod channels;
mod link;
mod persist;
mod tasks;

use channels::DEVICE_STATE;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static SENSOR_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static SENSOR_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static LINK_TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static LINK_RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Farad firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Load device state from flash before anything consumes it
    let mut flash = FlashStorage::new(p.FLASH, p.DMA_CH1);
    let state = persist::load_state(&mut flash).await;
    *DEVICE_STATE.lock().await = state;

    // Sensor MCU link on UART0 (115200 8N1)
    let sensor_tx_buf = SENSOR_TX_BUF.init([0u8; 256]);
    let sensor_rx_buf = SENSOR_RX_BUF.init([0u8; 256]);
    let sensor_uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default())
        .into_buffered(Irqs, sensor_tx_buf, sensor_rx_buf);
    let (_sensor_tx, sensor_rx) = sensor_uart.split();
    info!("Sensor UART initialized");

    // Radio co-processor link on UART1 (115200 8N1, newline-delimited JSON)
    let link_tx_buf = LINK_TX_BUF.init([0u8; 512]);
    let link_rx_buf = LINK_RX_BUF.init([0u8; 512]);
    let link_uart = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, UartConfig::default())
        .into_buffered(Irqs, link_tx_buf, link_rx_buf);
    let (link_tx, link_rx) = link_uart.split();
    info!("Link UART initialized");

    // WS2812 strip on PIO0 state machine 0, data on GPIO16
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let ws2812_program = PioWs2812Program::new(&mut common);
    let strip: Ws2812Strip<'static, PIO0, 0, DEFAULT_LED_COUNT> = Ws2812Strip::new(
        &mut common,
        sm0,
        p.DMA_CH0.into(),
        p.PIN_16,
        &ws2812_program,
    );
    info!("LED strip initialized");

    // Output lines driven from device state
    let screen_line = OutputLine::new(Output::new(p.PIN_14, Level::Low));
    let ac_relay = OutputLine::new(Output::new(p.PIN_15, Level::Low));

    // Spawn tasks
    spawner.spawn(tasks::telemetry_rx_task(sensor_rx)).unwrap();
    spawner.spawn(tasks::led_task(strip)).unwrap();
    spawner.spawn(tasks::link_rx_task(link_rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(link_tx)).unwrap();
    spawner
        .spawn(tasks::controller_task(screen_line, ac_relay))
        .unwrap();
    spawner.spawn(persist::persist_task(flash)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
