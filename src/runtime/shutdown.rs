//! OS signal handling for graceful shutdown.
//!
//! [`wait_for_shutdown_signal`] completes when the process receives a
//! termination signal and reports which one, so the monitor can record why
//! the run ended. On Unix it listens for `SIGINT`, `SIGTERM`, and `SIGQUIT`;
//! elsewhere it falls back to [`tokio::signal::ctrl_c`].

/// Waits for a termination signal and returns its name.
///
/// Each call installs its own listeners. Fails only if signal registration
/// itself fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = sigint.recv() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

/// Waits for a termination signal and returns its name.
///
/// Each call installs its own listeners. Fails only if signal registration
/// itself fails.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
