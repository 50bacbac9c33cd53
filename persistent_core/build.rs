fn main() {
    // Integration tests define LLVMFuzzerTestOneInput themselves and look it
    // up with dlsym(RTLD_DEFAULT), which only sees exported symbols.
    println!("cargo:rustc-link-arg-tests=-rdynamic");
}
