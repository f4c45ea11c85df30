//! HTTP surface — index page, MJPEG stream, and status JSON.
//!
//! Readers only: every handler works off [`SharedState`] snapshots, so
//! any number of browser connections can watch one worker.

use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::stream;
use tokio::net::TcpListener;
use tokio::time::sleep;
use tracing::info;

use crate::state::{SharedState, Status};

/// Pace of the multipart stream; also the retry delay before the first
/// frame exists.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>palmdrive</title>
<style>
body { font-family: sans-serif; background: #111; color: #eee; margin: 2em; }
img { border: 1px solid #444; max-width: 100%; }
pre { background: #1a1a1a; padding: 1em; display: inline-block; min-width: 20em; }
</style>
</head>
<body>
<h1>palmdrive</h1>
<p>Show 1-4 fingers to drive, fist or open palm to stop.</p>
<img src="/video_feed" alt="camera stream">
<pre id="status">waiting for status...</pre>
<script>
async function poll() {
  try {
    const response = await fetch('/status');
    const status = await response.json();
    document.getElementById('status').textContent = JSON.stringify(status, null, 2);
  } catch (e) { /* server restarting */ }
}
setInterval(poll, 1000);
poll();
</script>
</body>
</html>
"#;

// ── Router ─────────────────────────────────────────────────

/// Build the application router.
pub fn router(shared: Arc<SharedState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/video_feed", get(video_feed))
        .route("/status", get(status))
        .with_state(shared)
}

/// Serve on the bound listener until the shutdown future resolves.
///
/// Shutdown is flagged on [`SharedState`] before the graceful drain
/// starts, so open `/video_feed` streams end and the drain completes
/// even while viewers stay connected.
pub async fn serve(
    listener: TcpListener,
    shared: Arc<SharedState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    info!(addr = %listener.local_addr()?, "http server listening");
    let drain = Arc::clone(&shared);
    axum::serve(listener, router(shared))
        .with_graceful_shutdown(async move {
            shutdown.await;
            drain.begin_shutdown();
        })
        .await
}

// ── Handlers ───────────────────────────────────────────────

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn status(State(shared): State<Arc<SharedState>>) -> Json<Status> {
    Json(shared.status())
}

/// Multipart/x-mixed-replace JPEG stream.
///
/// Each part carries the latest published frame; before the first frame
/// exists the stream sends nothing rather than an empty part. Once
/// shutdown begins the stream ends instead of yielding another part.
async fn video_feed(State(shared): State<Arc<SharedState>>) -> impl IntoResponse {
    let frames = stream::unfold(shared, |shared| async move {
        let jpeg = loop {
            if shared.is_shutting_down() {
                return None;
            }
            sleep(FRAME_INTERVAL).await;
            if let Some(frame) = shared.latest_frame() {
                break frame;
            }
        };
        let mut part = Vec::with_capacity(jpeg.len() + 64);
        part.extend_from_slice(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n");
        part.extend_from_slice(&jpeg);
        part.extend_from_slice(b"\r\n");
        Some((Ok::<_, Infallible>(part), shared))
    });

    (
        [(
            header::CONTENT_TYPE,
            "multipart/x-mixed-replace; boundary=frame",
        )],
        Body::from_stream(frames),
    )
}

// ── Tests ──────────────────────────────────────────────────
