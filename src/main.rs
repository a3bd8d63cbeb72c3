use armada::ui::output;

fn main() {
    if let Err(err) = armada::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
