use log::LevelFilter;

/// `RUST_LOG` wins when set. Otherwise this crate logs at debug in debug
/// builds and info in release, everything else at warn.
pub fn setup_logger() {
    let mut builder = env_logger::Builder::new();
    builder.filter(None, LevelFilter::Warn);
    if cfg!(debug_assertions) {
        builder.filter(Some("easy_bbox"), LevelFilter::Debug);
    } else {
        builder.filter(Some("easy_bbox"), LevelFilter::Info);
    }
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    // A second init (tests, embedding) is harmless.
    let _ = builder.try_init();
}
