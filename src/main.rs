mod app;

fn main() {
    env_logger::init();
    log::info!("ReefPop starting up");

    let config_path = std::env::args().nth(1);
    if let Err(e) = app::run(config_path.as_deref()) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
