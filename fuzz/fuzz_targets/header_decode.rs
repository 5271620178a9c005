#![no_main]

use classic::{ClassicFile, Limits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = Limits::for_testing();
    let Ok(file) = ClassicFile::parse(data, &limits) else {
        return;
    };

    for var in file.variables() {
        let _ = file.read_variable(&var.name);
        if let Ok(shape) = file.shape(&var.name) {
            let start: Vec<usize> = shape.iter().map(|&len| len / 2).collect();
            let count: Vec<usize> = shape.iter().map(|&len| len - len / 2).collect();
            let _ = file.read_slab(&var.name, &start, &count);
        }
    }
});
