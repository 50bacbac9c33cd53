use crate::channel::ControlChannel;
use crate::config::DriverConfig;
use crate::driver::PersistentDriver;
use crate::error::DriverError;
use crate::notify::SelfSignal;
use crate::target::FuzzTarget;
use std::ffi::OsString;

/// Builds a driver on the inherited control channel, runs the initializer
/// with `args` and loops until a fatal error, which is returned.
pub fn run_persistent<T: FuzzTarget>(
    config: &DriverConfig,
    target: T,
    args: &mut Vec<OsString>,
) -> DriverError {
    if let Err(e) = config.validate() {
        return e;
    }
    let signal = match config.signal() {
        Ok(signal) => signal,
        Err(e) => return e,
    };
    let channel = ControlChannel::new(config.channel_fd);
    let mut driver = match PersistentDriver::new(config, channel, target, SelfSignal::new(signal)) {
        Ok(driver) => driver,
        Err(e) => return e,
    };
    driver.initialize(args);
    driver.run()
}

/// Reports a fatal error on stderr and exits with its status.
pub fn exit_fatal(err: &DriverError) -> ! {
    eprintln!("ERROR: {err}");
    std::process::exit(err.exit_code())
}

/// Makes a panic in the target end the process with SIGABRT, after the usual
/// panic message, so the parent sees a crash instead of an exit status.
pub fn abort_on_panic() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_hook(info);
        std::process::abort();
    }));
}

/// Entry point for harness binaries written in Rust: runs `target` with the
/// default configuration and the process arguments, and never returns.
pub fn fuzz_main<T: FuzzTarget>(target: T) -> ! {
    abort_on_panic();
    let mut args: Vec<OsString> = std::env::args_os().collect();
    let err = run_persistent(&DriverConfig::default(), target, &mut args);
    exit_fatal(&err)
}
