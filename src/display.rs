use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use max72xx_panel::{Connector, Panel};

use crate::clock::WallClock;
use crate::config;

/// Applies the FC16 module order and orientation to a one row strip.
pub fn configure<C: Connector>(panel: &mut Panel<C>) {
    let modules = panel.h_displays();
    for slot in 0..modules {
        let display = if config::CHAIN_REVERSED { modules - 1 - slot } else { slot };
        panel.set_position(display, slot, 0);
        panel.set_module_rotation(display, config::MODULE_ROTATION);
    }
}

/// Renders `HH:MM:SS` across the strip, one 4px cell per character.
pub fn render<D>(target: &mut D, clock: &WallClock) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut buf = [0u8; 8];
    let text = clock.format(&mut buf).unwrap_or("--:--:--");

    target.clear(BinaryColor::Off)?;
    Text::with_baseline(
        text,
        Point::new(0, 1),
        MonoTextStyle::new(&FONT_4X6, BinaryColor::On),
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use max72xx_panel::DataError;

    #[derive(Default)]
    struct Frames(Vec<Vec<u8>>);

    impl Connector for Frames {
        fn write_frame(&mut self, frame: &[u8]) -> Result<(), DataError> {
            self.0.push(frame.to_vec());
            Ok(())
        }
    }

    fn strip() -> Panel<Frames> {
        let mut panel = Panel::new(Frames::default(), config::MODULES, 1).unwrap();
        configure(&mut panel);
        panel
    }

    #[test]
    fn test_configure_reverses_chain() {
        let panel = strip();
        assert_eq!(panel.position(0, 0), 3);
        assert_eq!(panel.position(3, 0), 0);
        assert_eq!(panel.module_rotation(2), config::MODULE_ROTATION);
    }

    #[test]
    fn test_fc16_rows_map_to_digit_registers() {
        let mut panel = strip();
        // Leftmost pixel of the top row: last module, Digit0, MSB
        panel.draw_pixel(0, 0, true);
        assert_eq!(panel.bitmap()[3 * 8], 0b1000_0000);
    }

    #[test]
    fn test_render_fits_strip() {
        let mut panel = strip();
        render(&mut panel, &WallClock::new(12, 34, 56)).unwrap();

        assert!(panel.bitmap().iter().any(|&b| b != 0));
        // The font leaves the top and bottom rows empty
        assert!((0..32).all(|x| !panel.read_pixel(x, 0)));
        assert!((0..32).all(|x| !panel.read_pixel(x, 7)));
    }

    #[test]
    fn test_render_replaces_previous_frame() {
        let mut first = strip();
        render(&mut first, &WallClock::new(8, 8, 8)).unwrap();
        render(&mut first, &WallClock::new(1, 1, 1)).unwrap();

        let mut second = strip();
        render(&mut second, &WallClock::new(1, 1, 1)).unwrap();

        assert_eq!(first.bitmap(), second.bitmap());
    }
}
