//! Banner shown before a text-format run.

pub fn print_header() {
    let version = env!("CARGO_PKG_VERSION");
    let spaces = " ".repeat(24usize.saturating_sub(version.len()));
    eprintln!(
        r#"
    ╭──────────────────────────────────────╮
    │                                      │
    │         TEMPGUARD  REWRITER          │
    │                                      │
    │     Secure temporary files for       │
    │     Java syntax trees                │
    │     Version: {version}{spaces}│
    │                                      │
    ╰──────────────────────────────────────╯
"#
    );
}
