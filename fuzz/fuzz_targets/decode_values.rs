#![no_main]

use libfuzzer_sys::fuzz_target;
use x690::{Element, Mode};

fuzz_target!(|data: &[u8]| {
    for mode in [Mode::Ber, Mode::Cer, Mode::Der] {
        let Ok((elem, _)) = Element::from_bytes(data, mode) else {
            continue
        };

        let _ = elem.to_bool();
        let _ = elem.to_i64();
        let _ = elem.to_enumerated();
        let _ = elem.to_f64();
        let _ = elem.to_null();
        let _ = elem.to_oid();
        let _ = elem.to_octets();
        let _ = elem.to_utf8();
        let _ = elem.to_numeric_string();
        let _ = elem.to_printable_string();
        let _ = elem.to_ia5_string();
        let _ = elem.to_visible_string();
        let _ = elem.to_graphic_string();
        let _ = elem.to_general_string();
        let _ = elem.to_object_descriptor();
        let _ = elem.to_universal_string();
        let _ = elem.to_bmp_string();
        let _ = elem.to_utc_time();
        let _ = elem.to_generalized_time();
        let _ = elem.children();
        let _ = elem.inner();
        let _ = elem.to_value();

        if let Ok(bits) = elem.to_bit_string() {
            assert!(bits.unused() < 8);
            assert!(bits.octet_len() > 0 || bits.unused() == 0);
        }
    }
});
