pub mod buffer;
pub mod channel;
pub mod config;
pub mod driver;
pub mod entry;
pub mod error;
pub mod io;
pub mod notify;
pub mod path;
pub mod target;

pub use buffer::ScratchBuffer;
pub use channel::ControlChannel;
pub use config::DriverConfig;
pub use driver::PersistentDriver;
pub use entry::{abort_on_panic, exit_fatal, fuzz_main, run_persistent};
pub use error::DriverError;
pub use notify::{Notifier, SelfSignal};
pub use path::PathMessage;
pub use target::{FuzzTarget, SymbolTarget, WithInitializer};
