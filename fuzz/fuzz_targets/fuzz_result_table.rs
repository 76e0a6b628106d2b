#![no_main]

use gaugeplot::metadata::HeaderMetadata;
use gaugeplot::spectrum::Spectrum;
use gaugeplot::table::{HeaderRows, ResultTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must either succeed or return an error, never panic
    for header_rows in [HeaderRows::Auto, HeaderRows::Fixed(0), HeaderRows::Fixed(2)] {
        let Ok(table) = ResultTable::parse("fuzz.out", text, header_rows) else {
            continue;
        };

        let metadata = HeaderMetadata::from_table(&table);
        let _ = metadata.run_parameters();
        let _ = table.spacing_deviation();

        if let Ok(values) = table.column(table.width() - 1) {
            if let Ok(spectrum) = Spectrum::compute(table.axis(), values) {
                let _ = spectrum.weighted(2);
            }
        }
    }
});
