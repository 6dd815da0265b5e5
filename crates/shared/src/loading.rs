//! Loading lifecycle for the startup overlay.

/// Startup phases shown by the loading overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LoadingStage {
    #[default]
    Initial,
    DataLoading,
    Rendering,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadingState {
    stage: LoadingStage,
    progress: f64,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> LoadingStage {
        self.stage
    }

    /// Percentage in [0, 100].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_loading(&self) -> bool {
        self.stage != LoadingStage::Completed
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 100.0)
        };
    }

    pub fn advance(&mut self, stage: LoadingStage) {
        self.stage = stage;
        if stage == LoadingStage::Completed {
            self.progress = 100.0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_clamped() {
        let mut state = LoadingState::new();
        state.set_progress(150.0);
        assert!((state.progress() - 100.0).abs() < 1e-9);
        state.set_progress(-3.0);
        assert!(state.progress().abs() < 1e-9);
        state.set_progress(f64::NAN);
        assert!(state.progress().abs() < 1e-9);
        state.set_progress(42.5);
        assert!((state.progress() - 42.5).abs() < 1e-9);
    }

    #[test]
    fn test_stages_and_reset() {
        let mut state = LoadingState::new();
        assert!(state.is_loading());
        state.advance(LoadingStage::DataLoading);
        state.set_progress(30.0);
        state.advance(LoadingStage::Completed);
        assert!(!state.is_loading());
        assert!((state.progress() - 100.0).abs() < 1e-9);
        state.reset();
        assert_eq!(state, LoadingState::new());
        assert_eq!(state.stage(), LoadingStage::Initial);
    }
}
