use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `QRSCAN_QUIET=1` silences decorative human output
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("QRSCAN_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
