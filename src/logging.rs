use tracing_subscriber::EnvFilter;

/// ログ出力を初期化（RUST_LOG があれば優先）
pub fn init(verbose: bool) {
    let default_directives = if verbose {
        "warn,plate_detect=debug,plate_detect_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
