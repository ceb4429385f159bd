#![forbid(unsafe_code)]

//! Console demo: two words, one repeat, starting from an already-typed word.
//!
//! Run with `RUST_LOG=debug` to see the controller's own transitions too.

use tracing_subscriber::EnvFilter;
use typer_core::{Hooks, InitialAction, Typer, TyperOptions};
use typer_runtime::TyperDriver;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let options = TyperOptions::new()
        .spool(["\u{1F389} Typer", "\u{1F38A} Hello World!"])
        .repeats(1)
        .initial_action(InitialAction::Erasing);

    let hooks = Hooks::new()
        .on_type(|typed| tracing::info!(typed, "on_type"))
        .on_typed(|text| tracing::info!(text, "on_typed"))
        .on_erase(|remaining| tracing::info!(remaining, "on_erase"))
        .on_erased(|text| tracing::info!(text, "on_erased"))
        .on_finish(|| tracing::info!("finished"));

    let typer = match Typer::new(options, hooks) {
        Ok(typer) => typer,
        Err(err) => {
            tracing::error!(%err, "invalid options");
            std::process::exit(2);
        }
    };

    let handle = TyperDriver::spawn(typer);
    for frame in handle.snapshots() {
        let caret = if frame.caret_visible() { "|" } else { "" };
        println!("[{:>8}] {}{caret}", frame.phase.as_str(), frame.typed_text());
    }

    match handle.wait() {
        Ok(typer) => tracing::info!(elapsed = ?typer.elapsed(), "done"),
        Err(_) => tracing::error!("driver thread panicked"),
    }
}
