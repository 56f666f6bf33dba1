/// Events emitted while assemblies are enumerated and clustered.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// `Enumeration` or `Clustering` has started.
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// A level is about to evaluate `total_steps` candidate engaged sets.
    TaskStart { total_steps: u64 },
    /// One candidate has been evaluated; may arrive from worker threads.
    TaskIncrement,
    TaskFinish,

    /// One level of the engaged-set lattice has been evaluated.
    LevelComplete {
        level: usize,
        valid: usize,
        invalid: usize,
    },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback; silent by default.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.callback.is_none()
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
