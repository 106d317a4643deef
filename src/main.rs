mod app;
mod assets;
mod cat;
mod config;
mod input;
mod overlay;
mod render;
mod scene;
mod sprite;
mod tub;
mod wash;

fn main() {
    env_logger::init();
    log::info!("catbath starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
