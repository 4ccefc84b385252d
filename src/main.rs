//! Dot Grid entry point
//!
//! On the web the library's `mountDotGrid` export is the entry point. Natively
//! this runs a headless scripted session and logs what happened.
//!
//! Usage: `dot-grid [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dot_grid::GridConfig;
    use dot_grid::demo::Session;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dot Grid (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match GridConfig::load(std::path::Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded config from {path}");
                config
            }
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => GridConfig::default(),
    };

    let session = Session {
        config,
        settle_seconds: 3.0,
        ..Default::default()
    };
    log::info!(
        "Running {}s scripted session on {}x{} (seed {})",
        session.seconds,
        session.host.size.width,
        session.host.size.height,
        session.seed
    );

    let stats = session.run();
    log::info!(
        "{} frames ({} skipped), {} dots, {} clicks, {} pushes",
        stats.frames,
        stats.skipped,
        stats.dots,
        stats.clicks,
        stats.pushes
    );
    log::info!(
        "Peak displaced {}, peak highlighted {}, still moving at end {}",
        stats.peak_displaced,
        stats.peak_highlighted,
        stats.displaced_at_end
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is mountDotGrid, this is just to satisfy the compiler
}
