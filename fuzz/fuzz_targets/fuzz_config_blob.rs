//! Fuzz target: stored configuration blob
//!
//! Feeds arbitrary bytes to the config store as if they had been read
//! back from flash and verifies:
//! - No panics under arbitrary byte inputs
//! - Anything `load` accepts also passes `validate`
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use tempsampler::adapters::nvs::NvsAdapter;
use tempsampler::app::ports::ConfigPort;

fuzz_target!(|data: &[u8]| {
    let Ok(nvs) = NvsAdapter::new() else {
        return;
    };
    nvs.put_raw(data);
    if let Ok(cfg) = nvs.load() {
        assert!(cfg.validate().is_ok(), "load returned an invalid config");
        nvs.save(&cfg).expect("a loaded config must be storable");
        assert_eq!(nvs.load().ok(), Some(cfg));
    }
});
