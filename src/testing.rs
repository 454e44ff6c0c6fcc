// airguardian-radar/src/testing.rs
// In-process stand-ins for the OpenSky endpoints

use axum::Router;
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return its base url
pub async fn spawn_mock(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}
