// WandWatch — Logger setup
//
// Everything logs through the `log` facade.  On the device the ESP-IDF logger
// prints over the serial console; on the host `env_logger` honours RUST_LOG
// and defaults to `info`.

#[cfg(target_os = "espidf")]
pub fn init() {
    esp_idf_svc::log::EspLogger::initialize_default();
}

#[cfg(not(target_os = "espidf"))]
pub fn init() {
    use std::io::Write;

    // A second call (tests, the simulator re-running) keeps the first logger.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} [{}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}
