#![no_main]

use libfuzzer_sys::fuzz_target;
use xdr::XdrReader;

fuzz_target!(|data: &[u8]| {
    let mut reader = XdrReader::new(data);
    let mut ops = 0usize;
    while !reader.is_empty() && ops < 1024 {
        let selector = data[reader.position()] % 6;
        let result = match selector {
            0 => reader.read_u32().map(drop),
            1 => reader.read_string().map(drop),
            2 => reader.read_f64().map(drop),
            3 => reader.read_i16().map(drop),
            4 => reader.read_bytes(data.len() / 3).map(drop),
            _ => reader.skip_padding(reader.position() + 1),
        };
        if result.is_err() {
            break;
        }
        ops += 1;
    }
});
