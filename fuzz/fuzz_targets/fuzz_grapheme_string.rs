#![no_main]

use libfuzzer_sys::fuzz_target;
use typer_text::{GraphemeString, split};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let clusters = split(text);
    assert_eq!(clusters.concat(), text);
    assert!(clusters.iter().all(|c| !c.is_empty()));

    let word = GraphemeString::new(text);
    assert_eq!(word.len(), clusters.len());
    assert_eq!(word.as_str(), text);

    // Every boundary must slice cleanly and split the word in two.
    for n in 0..=word.len() {
        let prefix = word.prefix(n);
        let suffix = word.suffix(n);
        assert_eq!(format!("{prefix}{suffix}"), text);
        assert_eq!(prefix, clusters[..n].concat());
    }
    assert_eq!(word.prefix(word.len() + 1), text);
});
