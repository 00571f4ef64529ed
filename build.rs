fn main() {
    println!("cargo:rerun-if-env-changed=CHUVA_BUILD");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let target = match std::env::var("CHUVA_BUILD") {
        Ok(v) if !v.trim().is_empty() => v,
        _ => target_label(),
    };

    let build = match commit_sha() {
        Some(sha) => format!("{target} ({sha})"),
        None => target,
    };
    println!("cargo:rustc-env=CHUVA_BUILD={}", build);
}

fn target_label() -> String {
    let os = match std::env::var("CARGO_CFG_TARGET_OS").as_deref() {
        Ok("macos") => "darwin".to_string(),
        Ok(other) => other.to_string(),
        Err(_) => "unknown".to_string(),
    };
    let arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_else(|_| "unknown".to_string());
    format!("{os}-{arch}")
}

fn short_hex(s: &str) -> Option<String> {
    let short: String = s.trim().chars().take(7).collect();
    if short.is_empty() || !short.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(short.to_ascii_lowercase())
}

fn commit_sha() -> Option<String> {
    let from_git = std::process::Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .and_then(|s| short_hex(&s));

    from_git.or_else(|| std::env::var("GITHUB_SHA").ok().and_then(|s| short_hex(&s)))
}
