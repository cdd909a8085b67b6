use std::env;
use std::path::PathBuf;

// Bakes the checkout's section data directory into the binaries as a last
// resort for data-dir discovery.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=public/data");
    println!("cargo:rerun-if-env-changed=OSINT_CATALOG_ROOT_HINT");

    let Some(root) = env::var_os("OSINT_CATALOG_ROOT_HINT")
        .or_else(|| env::var_os("CARGO_MANIFEST_DIR"))
        .map(PathBuf::from)
    else {
        return;
    };

    let data = root.join("public").join("data");
    if !data.is_dir() {
        println!(
            "cargo:warning=no section data under {}; data-dir fallback disabled",
            root.display()
        );
        return;
    }
    let data = data.canonicalize().unwrap_or(data);
    println!("cargo:rustc-env=OSINT_CATALOG_DATA_HINT={}", data.display());
}
