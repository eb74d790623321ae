/// Build script for biosolar
/// Captures build environment so fixture runs can be traced to a binary

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=Cargo.lock");

    if let Ok(version) = std::env::var("CARGO_PKG_VERSION") {
        println!("cargo:rustc-env=BIOSOLAR_VERSION={version}");
    }

    // Git hash is optional; builds from a tarball simply omit it
    if let Ok(output) = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            if let Ok(hash) = String::from_utf8(output.stdout) {
                println!("cargo:rustc-env=BIOSOLAR_GIT_HASH={}", hash.trim());
            }
        }
    }
}
