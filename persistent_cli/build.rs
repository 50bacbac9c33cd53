fn main() {
    // Export the binary's symbols so dlsym(RTLD_DEFAULT) can find a target
    // that was linked in statically.
    println!("cargo:rustc-link-arg-bins=-rdynamic");
    if let Ok(target) = std::env::var("PERSISTENT_TARGET_OBJ") {
        println!("cargo:rustc-link-arg-bins=-Wl,--whole-archive");
        println!("cargo:rustc-link-arg-bins={target}");
        println!("cargo:rustc-link-arg-bins=-Wl,--no-whole-archive");
    }
    println!("cargo:rerun-if-env-changed=PERSISTENT_TARGET_OBJ");
}
