use persistent_core::entry::fuzz_main;

// Example harness for a parent delivering inputs over fd 1023. "BAD" panics,
// which fuzz_main turns into SIGABRT; "CRASH" returns non-zero, so the driver
// exits with status 1 without acknowledging.
fn my_harness(data: &[u8]) -> i32 {
    if data.starts_with(b"BAD") {
        panic!("BAD input detected by harness!");
    }
    if data.starts_with(b"CRASH") {
        return -1;
    }
    0
}

fn main() {
    fuzz_main(my_harness)
}
