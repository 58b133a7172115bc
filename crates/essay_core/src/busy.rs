/// Busy flag plus a human-readable status line for one async call site.
///
/// At most one call is outstanding per task: `try_begin` refuses while busy and
/// every completion path ends in `settle`, which always releases the flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BusyTask {
    busy: bool,
    status_message: String,
}

impl BusyTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the task. Returns `false` and changes nothing if already busy.
    pub fn try_begin(&mut self, status: impl Into<String>) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.status_message = status.into();
        true
    }

    /// Release the task with its final status line.
    pub fn settle(&mut self, status: impl Into<String>) {
        self.busy = false;
        self.status_message = status.into();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }
}

#[cfg(test)]
mod tests {
    use super::BusyTask;

    #[test]
    fn second_begin_is_refused_until_settled() {
        let mut task = BusyTask::new();
        assert!(task.try_begin("Uploading..."));
        assert!(!task.try_begin("again"));
        assert_eq!(task.status_message(), "Uploading...");

        task.settle("done");
        assert!(!task.is_busy());
        assert!(task.try_begin("next"));
    }
}
