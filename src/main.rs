fn main() {
    #[cfg(feature = "logging")]
    harrier::logging::init();
    harrier::uci::run_uci_loop();
}
