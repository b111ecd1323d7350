use serde::{Deserialize, Serialize};

/// Whole-second game clock advanced by an external periodic tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedTimer {
    elapsed_secs: u32,
    running: bool,
}

impl ElapsedTimer {
    pub const fn new() -> Self {
        Self {
            elapsed_secs: 0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances one second if running, returns whether the count changed.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.elapsed_secs == u32::MAX {
            return false;
        }
        self.elapsed_secs += 1;
        true
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_while_running() {
        let mut timer = ElapsedTimer::new();
        assert!(!timer.tick());

        timer.start();
        assert!(timer.tick());
        assert!(timer.tick());
        timer.stop();
        assert!(!timer.tick());

        assert_eq!(timer.elapsed_secs(), 2);
    }

    #[test]
    fn saturates_at_max() {
        let mut timer = ElapsedTimer {
            elapsed_secs: u32::MAX,
            running: true,
        };
        assert!(!timer.tick());
        assert_eq!(timer.elapsed_secs(), u32::MAX);
    }
}
