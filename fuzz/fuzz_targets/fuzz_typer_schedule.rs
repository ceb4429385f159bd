#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use typer_core::{EraseStyle, Hooks, InitialAction, Phase, Typer, TyperOptions};

#[derive(Debug, Arbitrary)]
struct Input {
    spool: Vec<String>,
    repeats: u8,
    style: u8,
    erasing_first: bool,
    erase_on_complete: bool,
    shuffle_seed: Option<u64>,
    delays_ms: [u8; 5],
    ticks_ms: Vec<u16>,
    teardown_at: Option<u8>,
}

fuzz_target!(|input: Input| {
    let [pre_type, typing, pre_erase, erasing, pre_clear] =
        input.delays_ms.map(|d| Duration::from_millis(u64::from(d)));
    let mut options = TyperOptions::new()
        .spool(input.spool.into_iter().take(8))
        .repeats(u32::from(input.repeats % 4))
        .erase_style(EraseStyle::ALL[usize::from(input.style) % EraseStyle::ALL.len()])
        .erase_on_complete(input.erase_on_complete)
        .pre_type_delay(pre_type)
        .type_delay(typing)
        .pre_erase_delay(pre_erase)
        .erase_delay(erasing)
        .pre_clear_delay(pre_clear);
    if input.erasing_first {
        options = options.initial_action(InitialAction::Erasing);
    }
    if let Some(seed) = input.shuffle_seed {
        options = options.shuffle(true).shuffle_seed(seed);
    }

    // Invalid options must be rejected, never panic.
    let Ok(mut typer) = Typer::new(options, Hooks::new()) else {
        return;
    };
    typer.start();

    for (i, tick) in input.ticks_ms.iter().take(256).enumerate() {
        if input.teardown_at.is_some_and(|at| usize::from(at) == i) {
            typer.teardown();
        }
        typer.advance(Duration::from_millis(u64::from(*tick)));

        assert!(typer.cursor() <= typer.graphemes().len());
        assert!(typer.spool_index() < typer.spool_order().len());
        assert!(typer.live_timers() <= 2);
        if typer.phase() == Phase::Complete || typer.is_torn_down() {
            assert_eq!(typer.live_timers(), 0);
        }
    }
});
