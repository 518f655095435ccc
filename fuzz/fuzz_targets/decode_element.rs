#![no_main]

use libfuzzer_sys::fuzz_target;
use x690::{Element, Mode};

fuzz_target!(|data: &[u8]| {
    for mode in [Mode::Ber, Mode::Cer, Mode::Der] {
        let Ok((elem, consumed)) = Element::from_bytes(data, mode) else {
            continue
        };
        assert!(consumed <= data.len());

        // Whatever parsed re-encodes and parses back to the same element.
        let encoded = elem.to_bytes();
        let (again, consumed) = Element::from_bytes(
            encoded.as_ref(), mode
        ).expect("re-decoding own encoding failed");
        assert_eq!(consumed, encoded.len());
        assert_eq!(again, elem);
    }
});
