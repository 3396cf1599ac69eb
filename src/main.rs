mod app;
mod config;
mod locator;
mod metadata;
mod mpris;
mod picker;
mod runtime;
mod service;
mod song;
mod ui;

fn main() {
    if let Err(e) = runtime::run() {
        eprintln!("onetrack: {e:#}");
        std::process::exit(1);
    }
}
