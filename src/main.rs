//! Wall clock on a strip of four FC16 MAX7219 modules, driven by a
//! Raspberry Pi Pico.
//!
//! - 1 Hz timer advances the clock and redraws the strip
//! - Button on GPIO15 adds a minute, holding it repeats with acceleration
//!
//! Firmware: `cargo build --release --features defmt --target thumbv6m-none-eabi`
//!
//! On the host the binary prints one rendered frame to the terminal instead.

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]
// The timer and button paths only exist in the firmware
#![cfg_attr(not(target_arch = "arm"), allow(dead_code))]

mod clock;
mod config;
mod display;

#[cfg(all(target_arch = "arm", not(feature = "defmt")))]
compile_error!("firmware builds need `--features defmt`");

#[cfg(target_arch = "arm")]
use {defmt_rtt as _, panic_halt as _};

#[cfg(target_arch = "arm")]
#[rtic::app(device = rp_pico::hal::pac, peripherals = true, dispatchers = [I2C0_IRQ])]
mod app {
    use crate::clock::WallClock;
    use crate::{config, display};
    use embedded_hal::digital::v2::{InputPin, ToggleableOutputPin};
    use max72xx_panel::{Panel, SpiConnector};
    use rp_pico::hal::clocks::{init_clocks_and_plls, Clock};
    use rp_pico::hal::fugit::{ExtU32, RateExtU32};
    use rp_pico::hal::gpio::bank0::{Gpio15, Gpio16, Gpio17, Gpio18, Gpio19, Gpio25};
    use rp_pico::hal::gpio::{FunctionSio, FunctionSpi, Interrupt, Pin, PullDown, PullUp, SioInput, SioOutput};
    use rp_pico::hal::pac::SPI0;
    use rp_pico::hal::spi::{Enabled, Spi};
    use rp_pico::hal::timer::{Alarm, Alarm0, Alarm1, Timer};
    use rp_pico::hal::{Sio, Watchdog};

    type SpiPin<G> = Pin<G, FunctionSpi, PullDown>;
    type OutPin<G> = Pin<G, FunctionSio<SioOutput>, PullDown>;
    type Bus = Spi<Enabled, SPI0, (SpiPin<Gpio19>, SpiPin<Gpio16>, SpiPin<Gpio18>)>;
    type Strip = Panel<SpiConnector<Bus, OutPin<Gpio17>>>;
    type Button = Pin<Gpio15, FunctionSio<SioInput>, PullUp>;

    #[shared]
    struct Shared {
        clock: WallClock,
        button: Button,
        alarm1: Alarm1,
        repeat_delay: u32,
    }

    #[local]
    struct Local {
        panel: Strip,
        led: OutPin<Gpio25>,
        alarm: Alarm0,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let clocks = init_clocks_and_plls(
            rp_pico::XOSC_CRYSTAL_FREQ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        // Alarm 0 drives the seconds, alarm 1 the button auto-repeat
        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = timer.alarm_0().unwrap();
        alarm.schedule(config::TICK_US.micros()).unwrap();
        alarm.enable_interrupt();
        let mut alarm1 = timer.alarm_1().unwrap();
        alarm1.enable_interrupt();

        let pins = rp_pico::Pins::new(pac.IO_BANK0, pac.PADS_BANK0, sio.gpio_bank0, &mut pac.RESETS);

        let led = pins.led.into_push_pull_output();
        let button = pins.gpio15.into_pull_up_input();
        button.set_interrupt_enabled(Interrupt::EdgeLow, true);

        let bus_pins = (
            pins.gpio19.into_function::<FunctionSpi>(),
            pins.gpio16.into_function::<FunctionSpi>(),
            pins.gpio18.into_function::<FunctionSpi>(),
        );
        let spi = Spi::<_, _, _, 8>::new(pac.SPI0, bus_pins).init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            config::SPI_FREQ_HZ.Hz(),
            &embedded_hal::spi::MODE_0,
        );

        let cs = pins.gpio17.into_push_pull_output();
        let mut panel = Panel::from_spi_cs(spi, cs, config::MODULES, 1).unwrap();
        display::configure(&mut panel);
        panel.set_intensity(config::INTENSITY).unwrap();
        defmt::info!("panel ready, {} modules", panel.displays());

        let (hours, mins, secs) = config::INITIAL_TIME;
        update_display::spawn().ok();

        (
            Shared {
                clock: WallClock::new(hours, mins, secs),
                button,
                alarm1,
                repeat_delay: config::REPEAT_DELAY_US,
            },
            Local { panel, led, alarm },
            init::Monotonics(),
        )
    }

    // 1 Hz
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [clock], local = [alarm, led])]
    fn timer_tick(mut ctx: timer_tick::Context) {
        ctx.local.alarm.clear_interrupt();
        ctx.local.alarm.schedule(config::TICK_US.micros()).unwrap();

        ctx.local.led.toggle().unwrap();

        ctx.shared.clock.lock(|c| c.tick());
        update_display::spawn().ok();
    }

    #[task(binds = IO_IRQ_BANK0, priority = 1, shared = [clock, button, alarm1, repeat_delay])]
    fn button_press(mut ctx: button_press::Context) {
        // Masked until release to ride out contact bounce
        ctx.shared.button.lock(|b| {
            b.set_interrupt_enabled(Interrupt::EdgeLow, false);
            b.clear_interrupt(Interrupt::EdgeLow);
        });

        ctx.shared.clock.lock(|c| c.add_minute());
        update_display::spawn().ok();

        let delay = config::REPEAT_DELAY_US;
        ctx.shared.repeat_delay.lock(|d| *d = delay);
        ctx.shared.alarm1.lock(|a| {
            a.clear_interrupt();
            a.schedule(delay.micros()).ok();
        });
    }

    #[task(binds = TIMER_IRQ_1, priority = 1, shared = [clock, button, alarm1, repeat_delay])]
    fn button_repeat(mut ctx: button_repeat::Context) {
        ctx.shared.alarm1.lock(|a| a.clear_interrupt());

        let is_held = ctx.shared.button.lock(|b| b.is_low().unwrap_or(false));
        if !is_held {
            ctx.shared.button.lock(|b| {
                b.clear_interrupt(Interrupt::EdgeLow);
                b.set_interrupt_enabled(Interrupt::EdgeLow, true);
            });
            return;
        }

        ctx.shared.clock.lock(|c| c.add_minute());
        update_display::spawn().ok();

        let delay = ctx.shared.repeat_delay.lock(|d| {
            *d = config::next_repeat_delay(*d);
            *d
        });
        ctx.shared.alarm1.lock(|a| {
            a.schedule(delay.micros()).ok();
        });
    }

    #[task(shared = [clock], local = [panel])]
    fn update_display(mut ctx: update_display::Context) {
        let clock = ctx.shared.clock.lock(|c| *c);
        let panel = ctx.local.panel;

        display::render(panel, &clock).ok();
        if let Err(e) = panel.write() {
            defmt::warn!("panel write failed: {}", e);
        }
    }
}

#[cfg(not(target_arch = "arm"))]
fn main() -> Result<(), max72xx_panel::DataError> {
    use max72xx_panel::{Connector, DataError, Panel};

    struct Discard;

    impl Connector for Discard {
        fn write_frame(&mut self, _frame: &[u8]) -> Result<(), DataError> {
            Ok(())
        }
    }

    let (hours, mins, secs) = config::INITIAL_TIME;
    let mut panel = Panel::new(Discard, config::MODULES, 1)?;
    display::configure(&mut panel);
    display::render(&mut panel, &clock::WallClock::new(hours, mins, secs)).ok();
    panel.write()?;

    for y in 0..panel.height() as i32 {
        let row: String = (0..panel.width() as i32)
            .map(|x| if panel.read_pixel(x, y) { '#' } else { '.' })
            .collect();
        println!("{}", row);
    }
    Ok(())
}
