use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const FRAMES: &[&str] = &["◐", "◓", "◑", "◒", "●"];

/// Runs a backend request behind a spinner on stderr. The spinner is
/// removed once the request resolves, whatever the outcome, so the
/// command's own output starts on a clean line.
pub async fn with_spinner<F, T>(action: &str, request: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}…") {
        spinner.set_style(style.tick_strings(FRAMES));
    }
    spinner.set_message(action.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = request.await;
    spinner.finish_and_clear();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spinner_passes_through_the_outcome() {
        let ok: Result<u32, String> = with_spinner("Cargando", async { Ok(3) }).await;
        assert_eq!(ok, Ok(3));

        let err: Result<u32, String> =
            with_spinner("Cargando", async { Err("sin conexión".to_string()) }).await;
        assert_eq!(err.unwrap_err(), "sin conexión");
    }
}
