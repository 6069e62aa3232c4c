pub mod in_memory;
pub mod logging_notifier;
pub mod timeout;
