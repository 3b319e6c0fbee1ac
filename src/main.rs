use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
  // stdout carries results only
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bip39check=warn")),
    )
    .init();

  match bip39check::run() {
    Ok(code) => code,
    Err(e) => {
      eprintln!("error: {e:#}");
      ExitCode::from(2)
    }
  }
}
