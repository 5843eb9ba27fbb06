// Thermal recording stopwatch
use crate::domain::sample::format_mm_ss;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Stopped,
    Recording { elapsed_secs: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingStopwatch {
    state: RecordingState,
}

impl RecordingStopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording { .. })
    }

    /// Begin counting from zero. Starting while already recording keeps the count.
    pub fn start(&mut self) {
        if !self.is_recording() {
            self.state = RecordingState::Recording { elapsed_secs: 0 };
        }
    }

    pub fn stop(&mut self) {
        self.state = RecordingState::Stopped;
    }

    /// One second elapsed. Ignored when stopped.
    pub fn tick(&mut self) -> bool {
        match &mut self.state {
            RecordingState::Recording { elapsed_secs } => {
                *elapsed_secs += 1;
                true
            }
            RecordingState::Stopped => false,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        match self.state {
            RecordingState::Recording { elapsed_secs } => elapsed_secs,
            RecordingState::Stopped => 0,
        }
    }

    /// `REC mm:ss` badge text while recording.
    pub fn badge(&self) -> Option<String> {
        self.is_recording()
            .then(|| format!("REC {}", format_mm_ss(self.elapsed_secs())))
    }
}
