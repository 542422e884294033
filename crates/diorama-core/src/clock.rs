use crate::constants::MAX_FRAME_DT_SEC;

/// Frame counter and elapsed time for the per-frame update cascade.
#[derive(Clone, Debug)]
pub struct SimulationClock {
    frame: u64,
    elapsed_sec: f64,
    max_dt_sec: f32,
}

/// One tick handed to every component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    pub frame: u64,
    pub dt_sec: f32,
    pub elapsed_sec: f64,
}

impl SimulationClock {
    pub fn new(max_dt_sec: f32) -> Self {
        Self {
            frame: 0,
            elapsed_sec: 0.0,
            max_dt_sec,
        }
    }

    /// Register a frame of `dt_sec` host time. Negative or non-finite deltas
    /// count as zero; long stalls are clamped.
    pub fn advance(&mut self, dt_sec: f32) -> FrameTick {
        let dt = if dt_sec.is_finite() {
            dt_sec.clamp(0.0, self.max_dt_sec)
        } else {
            0.0
        };
        self.frame += 1;
        self.elapsed_sec += dt as f64;
        FrameTick {
            frame: self.frame,
            dt_sec: dt,
            elapsed_sec: self.elapsed_sec,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed_sec(&self) -> f64 {
        self.elapsed_sec
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT_SEC)
    }
}
