use std::process::Command;

use chrono::{SecondsFormat, TimeZone, Utc};

fn main() {
    let describe = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("v{}", env!("CARGO_PKG_VERSION")));

    // Reproducible builds pin the clock through SOURCE_DATE_EPOCH.
    let now = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .unwrap_or_else(Utc::now);

    println!("cargo:rustc-env=STEP3D_GIT_DESCRIBE={describe}");
    println!(
        "cargo:rustc-env=STEP3D_BUILD_TIMESTAMP={}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-changed=build.rs");
}
