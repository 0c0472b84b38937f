fn main() {
    if let Err(err) = mailmorph::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
