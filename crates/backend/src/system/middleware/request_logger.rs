use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Логирование HTTP запросов: метод, путь, статус, длительность, размер ответа.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                %method,
                %path,
                status = parts.status.as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "response body could not be read: {}",
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let status = parts.status.as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    let size = format_size(bytes.len());
    if parts.status.is_server_error() {
        tracing::error!(%method, %path, status, elapsed_ms, size = %size, "request");
    } else if parts.status.is_client_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, size = %size, "request");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, size = %size, "request");
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// `532 B`, `12.4 KB`, `3.1 MB`
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KB {
        format!("{} B", bytes)
    } else if value < KB * KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{:.1} MB", value / (KB * KB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(12_698), "12.4 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 100_000), "3.1 MB");
    }
}
