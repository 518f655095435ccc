#![no_main]

use libfuzzer_sys::fuzz_target;
use x690::{Element, Mode};

fuzz_target!(|data: &[u8]| {
    // DER encodings are unique: decoding and re-encoding must
    // reproduce the input octets bit for bit.
    if let Ok((elem, consumed)) = Element::from_bytes(data, Mode::Der) {
        assert_eq!(elem.to_bytes().as_ref(), &data[..consumed]);
    }
});
