// TouchlessConsole - Build Script

fn main() {
    // ESP-IDF environment setup, device builds only. Host builds and
    // `cargo test` must work without the ESP toolchain installed.
    if std::env::var_os("CARGO_FEATURE_ESP").is_some() {
        embuild::espidf::sysenv::output();
    }
}
