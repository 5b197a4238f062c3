#![no_main]

use std::cmp::Ordering;

use libfuzzer_sys::fuzz_target;
use sem_ver::SemVer;

fuzz_target!(|data: &str| {
    let version = SemVer::new(data);
    if version.is_valid() {
        let canonical = SemVer::new(version.to_string());
        assert_eq!(canonical.compare(&version), Ok(Ordering::Equal));
        assert_eq!(canonical.to_string(), version.to_string());
    } else {
        assert_eq!(version.to_string(), data);
        assert!(version.major().is_none());
        assert!(version.compare(&version).is_err());
    }
});
