use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let git_hash = run("git", &["rev-parse", "--short", "HEAD"]).unwrap_or_else(unknown);
    emit("HASH", &git_hash);

    let git_status = match run("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean".to_string(),
        Some(_) => "dirty".to_string(),
        None => unknown(),
    };
    emit("STATUS", &git_status);

    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    emit("TIMESTAMP", &timestamp);

    emit(
        "TARGET",
        &env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string()),
    );
    emit(
        "PROFILE",
        &env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".to_string()),
    );
    emit(
        "RUSTC",
        &run("rustc", &["--version"]).unwrap_or_else(unknown),
    );
}

fn emit(name: &str, value: &str) {
    println!("cargo:rustc-env=MOVE_INTAKE_BUILD_{name}={value}");
}

/// Trimmed stdout of a successful command. `git status --porcelain` on a clean
/// tree yields `Some("")`, so emptiness is left to the caller.
fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}

fn unknown() -> String {
    "unknown".to_string()
}
