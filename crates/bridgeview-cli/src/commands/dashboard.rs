use crate::client::BridgeClient;
use crate::tui::app::App;

pub fn run(url: &str, refresh: f64, start_translation: bool) {
    let client = match BridgeClient::new(url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("client setup failed: {e}");
            std::process::exit(1);
        }
    };

    if start_translation {
        client.start_translation();
    }

    let mut app = App::new(client, refresh);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
