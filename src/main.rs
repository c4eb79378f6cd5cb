use std::sync::Arc;

use blanki::fonts::FontStore;
use blanki::server::{self, AppState};

#[tokio::main]
async fn main() {
    // Unicode faces are fetched once; a failed download degrades to the
    // built-in fonts and the service still starts.
    let fonts = Arc::new(FontStore::fetch());

    let app = server::app(AppState { fonts });

    let addr = std::env::var("BLANKI_LISTEN").unwrap_or_else(|_| "127.0.0.1:3001".to_string());
    println!("document service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
