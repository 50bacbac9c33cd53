use crate::error::DriverError;
use libc::{c_char, c_int, c_void};
use std::ffi::{CStr, CString, OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::ptr;

/// Name of the required test entry point.
pub const TEST_ONE_INPUT_SYMBOL: &str = "LLVMFuzzerTestOneInput";
/// Name of the optional initialization entry point.
pub const INITIALIZE_SYMBOL: &str = "LLVMFuzzerInitialize";

/// The code under test, as seen by the persistent driver.
///
/// `test_one_input` returns 0 on success; anything else stops the driver.
/// `initialize` runs at most once, before the first input, and may rewrite
/// the argument vector. Targets without an initializer keep the default.
pub trait FuzzTarget {
    fn test_one_input(&mut self, data: &[u8]) -> i32;

    fn initialize(&mut self, _args: &mut Vec<OsString>) {}
}

impl<F> FuzzTarget for F
where
    F: FnMut(&[u8]) -> i32,
{
    fn test_one_input(&mut self, data: &[u8]) -> i32 {
        self(data)
    }
}

/// Pairs a test closure with an initializer closure.
pub struct WithInitializer<T, I> {
    target: T,
    init: I,
}

impl<T, I> WithInitializer<T, I>
where
    T: FnMut(&[u8]) -> i32,
    I: FnMut(&mut Vec<OsString>),
{
    pub fn new(target: T, init: I) -> Self {
        Self { target, init }
    }
}

impl<T, I> FuzzTarget for WithInitializer<T, I>
where
    T: FnMut(&[u8]) -> i32,
    I: FnMut(&mut Vec<OsString>),
{
    fn test_one_input(&mut self, data: &[u8]) -> i32 {
        (self.target)(data)
    }

    fn initialize(&mut self, args: &mut Vec<OsString>) {
        (self.init)(args)
    }
}

pub type TestOneInputFn = unsafe extern "C" fn(data: *const u8, size: usize) -> c_int;
pub type InitializeFn = unsafe extern "C" fn(argc: *mut c_int, argv: *mut *mut *mut c_char) -> c_int;

/// A target made of libFuzzer-style C entry points linked into this process.
pub struct SymbolTarget {
    test_one_input: TestOneInputFn,
    initialize: Option<InitializeFn>,
}

impl SymbolTarget {
    /// Looks the entry points up in the running process image. The
    /// initializer is optional; the test entry point is not.
    pub fn resolve() -> Result<Self, DriverError> {
        Self::resolve_named(TEST_ONE_INPUT_SYMBOL, INITIALIZE_SYMBOL)
    }

    fn resolve_named(test: &'static str, init: &'static str) -> Result<Self, DriverError> {
        let test_sym = lookup(test).ok_or(DriverError::MissingEntryPoint(test))?;
        // SAFETY: the symbol is documented to have the libFuzzer signature.
        let test_one_input = unsafe { std::mem::transmute::<*mut c_void, TestOneInputFn>(test_sym) };
        let initialize = lookup(init)
            // SAFETY: as above, for the initializer signature.
            .map(|sym| unsafe { std::mem::transmute::<*mut c_void, InitializeFn>(sym) });
        Ok(Self {
            test_one_input,
            initialize,
        })
    }

    pub fn from_fns(test_one_input: TestOneInputFn, initialize: Option<InitializeFn>) -> Self {
        Self {
            test_one_input,
            initialize,
        }
    }

    pub fn has_initializer(&self) -> bool {
        self.initialize.is_some()
    }
}

fn lookup(name: &str) -> Option<*mut c_void> {
    let name = CString::new(name).ok()?;
    // SAFETY: `name` is a valid C string; RTLD_DEFAULT searches the global scope.
    let sym = unsafe { libc::dlsym(libc::RTLD_DEFAULT, name.as_ptr()) };
    (!sym.is_null()).then_some(sym)
}

impl FuzzTarget for SymbolTarget {
    fn test_one_input(&mut self, data: &[u8]) -> i32 {
        // SAFETY: the pointer and length describe a live, initialized slice.
        unsafe { (self.test_one_input)(data.as_ptr(), data.len()) }
    }

    fn initialize(&mut self, args: &mut Vec<OsString>) {
        let Some(init) = self.initialize else {
            return;
        };

        // The initializer may keep pointers into argv, so it lives until exit.
        let mut raw: Vec<*mut c_char> = args
            .iter()
            .filter_map(|arg| CString::new(arg.as_bytes()).ok())
            .map(CString::into_raw)
            .collect();
        raw.push(ptr::null_mut());
        let raw: &'static mut [*mut c_char] = raw.leak();

        let mut argc = c_int::try_from(raw.len() - 1).unwrap_or(c_int::MAX);
        let mut argv = raw.as_mut_ptr();
        // SAFETY: argc/argv describe a NUL-terminated array of C strings.
        unsafe {
            init(&mut argc, &mut argv);
        }

        let mut rewritten = Vec::new();
        if !argv.is_null() {
            for i in 0..usize::try_from(argc).unwrap_or(0) {
                // SAFETY: the initializer promises argc valid entries in argv.
                let arg = unsafe { *argv.add(i) };
                if arg.is_null() {
                    break;
                }
                // SAFETY: non-null argv entries are C strings.
                let bytes = unsafe { CStr::from_ptr(arg) }.to_bytes();
                rewritten.push(OsStr::from_bytes(bytes).to_os_string());
            }
        }
        *args = rewritten;
    }
}
