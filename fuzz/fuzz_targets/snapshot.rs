#![no_main]

use libfuzzer_sys::fuzz_target;
use dotsizer::{metadata::snapshot::ModuleSnapshot, Sizer};

fuzz_target!(|data: &[u8]| {
    if let Ok(module) = ModuleSnapshot::from_slice(data) {
        let total = module.file_size.unwrap_or(u64::MAX);
        if let Ok(report) = Sizer::new().with_filter(16).analyze(&module, total) {
            assert!(report.tree().verify().is_ok());
        }
    }
});
