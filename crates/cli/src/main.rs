fn main() {
    let status = match nestjar_cli::run() {
        Ok(status) => status,
        Err(e) => {
            nestjar_core::logging::report_failure(format_args!("{e:#}"));
            1
        }
    };
    std::process::exit(status);
}
