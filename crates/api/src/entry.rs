/// Contract implemented by deferred application entry points.
pub trait Main: Send {
    /// Run with the raw command line; the result becomes the process exit status.
    fn run(&mut self, args: &[String]) -> i32;
}

/// Default constructor for an entry point bound to a type name.
pub type MainFactory = fn() -> Box<dyn Main>;

/// Process-wide string property table.
pub trait Environment: Send + Sync {
    fn set(&self, key: &str, value: &str);

    fn get(&self, key: &str) -> Option<String>;
}
