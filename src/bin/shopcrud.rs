use shopcrud::{lifecycle, ShopConfig};
use tracing::Level;

fn main() {
    // no flags, environment or config file: every run uses the defaults
    let config = ShopConfig::default();

    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout();
    if let Err(e) = lifecycle::run(&config, &mut stdout) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
