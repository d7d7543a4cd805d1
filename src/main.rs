fn main() {
    // Load .env early; ignore if missing.
    dotenvy::dotenv().ok();

    if let Err((err, robot)) = coverage_lookup::run() {
        if robot {
            eprintln!("{}", err.to_json());
        } else {
            eprintln!("{err}");
        }
        std::process::exit(err.code);
    }
}
