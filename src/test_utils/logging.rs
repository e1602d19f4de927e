use std::fmt::Debug;
use std::time::Instant;

/// Step log for multi-stage directory scenarios.
///
/// Prints the outcome when dropped, so a scenario that panics midway still
/// shows which step it reached.
pub struct ScenarioLog {
    name: &'static str,
    started: Instant,
}

impl ScenarioLog {
    pub fn new(name: &'static str) -> Self {
        println!("[SCENARIO] {name}");
        Self {
            name,
            started: Instant::now(),
        }
    }

    pub fn step(&self, description: &str) {
        println!("[{:>8.2?}] {description}", self.started.elapsed());
    }

    /// Record a value read back from the directory.
    pub fn observed<T: Debug>(&self, label: &str, value: &T) {
        println!("           {label} = {value:?}");
    }
}

impl Drop for ScenarioLog {
    fn drop(&mut self) {
        let outcome = if std::thread::panicking() { "FAILED" } else { "ok" };
        println!("[SCENARIO] {} {outcome} after {:.2?}", self.name, self.started.elapsed());
    }
}
