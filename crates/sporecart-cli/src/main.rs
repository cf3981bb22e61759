fn main() {
    if let Err(error) = sporecart_cli::run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
