fn main() {
    // Emit esp-idf link/env metadata only when building for the device;
    // host builds (tests) skip it entirely.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
