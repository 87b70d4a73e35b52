//! Filtered timetable endpoint

use std::io;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Uri, header},
    response::{IntoResponse, Response},
};
use futures::stream;
use tokio::sync::mpsc;

use timetable_core::{CalendarFilter, CourseCodes, LineSplitter, TimetableRequest};

use crate::routes::AppError;
use crate::state::AppState;

const CALENDAR_CONTENT_TYPE: &str = "text/calendar";

/// Output chunks buffered between the filter task and the response body.
const CHUNK_BUFFER: usize = 32;

type Chunk = io::Result<String>;

pub fn router() -> Router<AppState> {
    Router::new().fallback(filtered_timetable)
}

/// ANY /:id/:course_codes - Stream the timetable keeping only the given courses
async fn filtered_timetable(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Response, AppError> {
    let path = urlencoding::decode_binary(uri.path().as_bytes());
    let request = TimetableRequest::from_path(&String::from_utf8_lossy(&path))?;

    tracing::info!(
        identifier = %request.identifier,
        courses = request.course_codes.len(),
        "filtering timetable"
    );

    let upstream = state
        .upstream
        .fetch(&request.identifier)
        .await
        .map_err(AppError::Upstream)?;

    let (tx, rx) = mpsc::channel(CHUNK_BUFFER);
    tokio::spawn(stream_filtered(upstream, request.course_codes, tx));

    let body = Body::from_stream(stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    }));

    Ok(([(header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE)], body).into_response())
}

/// Read the upstream body line by line, sending filtered output to `tx`.
///
/// Stops as soon as the receiving side is dropped, i.e. the client went away,
/// even while the upstream is stalled or every line is being filtered out.
async fn stream_filtered(
    mut upstream: reqwest::Response,
    course_codes: CourseCodes,
    tx: mpsc::Sender<Chunk>,
) {
    let mut filter = CalendarFilter::new(course_codes);
    let mut splitter = LineSplitter::new();

    loop {
        let chunk = tokio::select! {
            chunk = upstream.chunk() => chunk,
            () = tx.closed() => {
                tracing::debug!("client disconnected, abandoning timetable");
                return;
            }
        };

        match chunk {
            Ok(Some(bytes)) => {
                splitter.push(&bytes);
                while let Some(line) = splitter.next_line() {
                    if !send_line(&mut filter, &line, &tx).await {
                        tracing::debug!("client disconnected, abandoning timetable");
                        return;
                    }
                }
            }
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(error = %err, "upstream body failed mid-stream");
                let _ = tx.send(Err(io::Error::other(err))).await;
                return;
            }
        }
    }

    if let Some(line) = splitter.finish() {
        send_line(&mut filter, &line, &tx).await;
    }
    filter.finish();
}

/// Feed one line to the filter. Returns false once the receiver is gone.
async fn send_line(filter: &mut CalendarFilter, line: &str, tx: &mpsc::Sender<Chunk>) -> bool {
    match filter.push_line(line) {
        Some(output) => tx.send(Ok(output)).await.is_ok(),
        None => true,
    }
}
