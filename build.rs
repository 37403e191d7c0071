fn main() {
    // ESP-IDF link arguments are only needed for the firmware image; host
    // builds (library, simulation binary, tests) skip the sysenv export.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
