//! Wall clock state shared between the timer and button tasks.

/// Time of day, 24 hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    hours: u8,
    mins: u8,
    secs: u8,
}

impl WallClock {
    /// Out of range fields wrap into the valid range.
    pub const fn new(hours: u8, mins: u8, secs: u8) -> Self {
        Self {
            hours: hours % 24,
            mins: mins % 60,
            secs: secs % 60,
        }
    }

    pub const fn hours(&self) -> u8 {
        self.hours
    }

    pub const fn mins(&self) -> u8 {
        self.mins
    }

    pub const fn secs(&self) -> u8 {
        self.secs
    }

    /// Advance one second. Returns true if the minute changed too.
    pub fn tick(&mut self) -> bool {
        self.secs += 1;
        if self.secs < 60 {
            return false;
        }
        self.secs = 0;
        self.add_minute();
        true
    }

    /// Advance one minute, rolling over into hours and past midnight.
    pub fn add_minute(&mut self) {
        self.mins += 1;
        if self.mins >= 60 {
            self.mins = 0;
            self.hours = (self.hours + 1) % 24;
        }
    }

    /// `HH:MM:SS` into `buf`.
    pub fn format<'a>(&self, buf: &'a mut [u8]) -> Result<&'a str, core::fmt::Error> {
        format_no_std::show(
            buf,
            format_args!("{:02}:{:02}:{:02}", self.hours, self.mins, self.secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_rolls_over_minute() {
        let mut clock = WallClock::new(12, 34, 58);
        assert!(!clock.tick());
        assert_eq!(clock.secs(), 59);
        assert!(clock.tick());
        assert_eq!((clock.hours(), clock.mins(), clock.secs()), (12, 35, 0));
    }

    #[test]
    fn test_add_minute_wraps_midnight() {
        let mut clock = WallClock::new(23, 59, 30);
        clock.add_minute();
        assert_eq!((clock.hours(), clock.mins(), clock.secs()), (0, 0, 30));
    }

    #[test]
    fn test_new_wraps_fields() {
        assert_eq!(WallClock::new(25, 61, 60), WallClock::new(1, 1, 0));
    }

    #[test]
    fn test_format_zero_pads() {
        let mut buf = [0u8; 8];
        assert_eq!(WallClock::new(7, 5, 9).format(&mut buf), Ok("07:05:09"));
    }

    #[test]
    fn test_format_needs_room() {
        let mut buf = [0u8; 4];
        assert!(WallClock::new(7, 5, 9).format(&mut buf).is_err());
    }
}
