use std::process::Command;

/// Exposes `LIGA_GIT_SHA` to the crate; reported by `GET /health`.
fn main() {
    let describe = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=10"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty());

    println!(
        "cargo:rustc-env=LIGA_GIT_SHA={}",
        describe.as_deref().unwrap_or("unknown")
    );
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}
