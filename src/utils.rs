use std::time::Instant;

/// Check if debug logging is enabled via environment variable
///
/// This is checked once to avoid repeated environment variable lookups.
static DEBUG_ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
static DEBUG_PERFORMANCE_ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();

fn is_debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| {
        (cfg!(debug_assertions)
            || std::env::var("GA_REPORT_DEBUG").unwrap_or_default() == "1"
            || std::env::var("GA_REPORT_DEBUG_PERFORMANCE").unwrap_or_default() != "")
            && std::env::var("GA_REPORT_DEBUG").unwrap_or_default() != "0"
    })
}

fn is_debug_performance_enabled() -> bool {
    *DEBUG_PERFORMANCE_ENABLED.get_or_init(|| {
        std::env::var("GA_REPORT_DEBUG_PERFORMANCE").unwrap_or_default() == "1"
    })
}

/// Debug logging utility function
///
/// Prints debug messages with a colored prefix when debug assertions are enabled or when
/// the `GA_REPORT_DEBUG` environment variable is set to "1". Setting it to "0" silences
/// debug builds too.
pub fn debug_log(msg: &str) {
    if is_debug_enabled() {
        eprintln!("\x1b[1;33m[ga-report]\x1b[0m {}", msg);
    }
}

pub fn debug_performance_log(msg: &str) {
    if is_debug_performance_enabled() {
        eprintln!("\x1b[1;33m[ga-report (perf)]\x1b[0m {}", msg);
    }
}

/// Run `f` and report how long it took under `GA_REPORT_DEBUG_PERFORMANCE=1`.
pub fn time_track<T>(operation: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    debug_performance_log(&format!(
        "{} took {}ms",
        operation,
        start.elapsed().as_millis()
    ));
    result
}

/// Shorten a secret for log output, keeping only the first few characters.
pub fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "[REDACTED]".to_string()
    } else {
        format!("{}...[REDACTED]", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_track_returns_value() {
        let value = time_track("noop", || 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_redact_long_secret() {
        let out = redact("ya29.a0AfH6SMBx");
        assert_eq!(out, "ya29...[REDACTED]");
        assert!(!out.contains("SMBx"));
    }

    #[test]
    fn test_redact_short_secret() {
        assert_eq!(redact("abc"), "[REDACTED]");
        assert_eq!(redact(""), "[REDACTED]");
    }
}
