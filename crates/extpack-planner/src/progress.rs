pub trait Progress: Send + Sync {
    fn push_level(&self, size: usize);
    fn step(&self);
    fn pop_level(&self);
}

pub struct NoProgress;

impl Progress for NoProgress {
    fn push_level(&self, _size: usize) {}
    fn step(&self) {}
    fn pop_level(&self) {}
}

// Closes the level when the scope drops, failing exits included.
pub(crate) struct ProgressScope<'a> {
    progress: &'a dyn Progress,
}

impl<'a> ProgressScope<'a> {
    pub(crate) fn enter(progress: &'a dyn Progress, size: usize) -> Self {
        progress.push_level(size);
        Self { progress }
    }

    pub(crate) fn step(&self) {
        self.progress.step();
    }
}

impl Drop for ProgressScope<'_> {
    fn drop(&mut self) {
        self.progress.pop_level();
    }
}
