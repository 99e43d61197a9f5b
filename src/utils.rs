use once_cell::sync::Lazy;

pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

/// Runs `fut` on the shared runtime and hands its output to `on_done` on the GTK main loop.
#[cfg(feature = "gui")]
pub fn run_async_to_main<T, Fut, F>(fut: Fut, on_done: F)
where
    T: Send + 'static,
    Fut: std::future::Future<Output = T> + Send + 'static,
    F: FnOnce(T) + 'static,
{
    let handle = RUNTIME.spawn(fut);
    glib::spawn_future_local(async move {
        match handle.await {
            Ok(output) => on_done(output),
            Err(err) => log::error!("background task failed: {err}"),
        }
    });
}

pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Cuts `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("... (truncated)");
    out
}

#[cfg(test)]
mod tests {
    use super::{normalize_url, truncate_chars};

    #[test]
    fn normalize_url_adds_scheme_and_drops_trailing_slash() {
        assert_eq!(normalize_url("api.example.com/"), "https://api.example.com");
        assert_eq!(normalize_url(" http://localhost:8080 "), "http://localhost:8080");
        assert_eq!(normalize_url("   "), "");
    }

    #[test]
    fn truncate_chars_keeps_short_text() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc... (truncated)");
    }
}
