use anyhow::Result;

/// Resolve once the process is asked to stop (SIGTERM, SIGINT or Ctrl+C).
/// Returns the name of the signal that fired.
pub async fn wait_for_shutdown() -> Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
            _ = tokio::signal::ctrl_c() => "ctrl_c",
        };
        tracing::info!(signal = name, "shutdown signal received");
        Ok(name)
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!(signal = "ctrl_c", "shutdown signal received");
        Ok("ctrl_c")
    }
}
