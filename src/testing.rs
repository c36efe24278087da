//! Throwaway HTTP servers for exercising the blocking clients.

use axum::Router;
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::mpsc;
use std::thread;
use tokio::sync::oneshot;

pub(crate) struct MockServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockServer {
    /// Serves `router` on an ephemeral localhost port from a background thread.
    pub(crate) fn spawn(router: Router) -> Self {
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind mock server");
                addr_tx
                    .send(listener.local_addr().expect("mock server addr"))
                    .expect("report mock server addr");
                axum::serve(listener, router)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("mock server");
            });
        });

        let addr = addr_rx.recv().expect("mock server started");
        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A localhost URL on a port that was just released, so connections are refused.
pub(crate) fn unreachable_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind free port");
    let port = listener.local_addr().expect("free port addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}
