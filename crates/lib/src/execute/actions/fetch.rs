//! Source archive download.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::execute::types::PipelineError;

/// Downloads a URL to a file.
pub trait Fetcher {
  /// Writes the body of `url` to `dest`.
  ///
  /// On any failure `dest` must not be left behind.
  fn fetch(&self, url: &str, dest: &Path) -> Result<(), PipelineError>;
}

/// Blocking HTTP(S) fetcher. No timeout: large archives take as long as they take.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  pub fn new() -> Result<Self, PipelineError> {
    let client = Client::builder()
      .user_agent(concat!("stagehand/", env!("CARGO_PKG_VERSION")))
      .timeout(None::<Duration>)
      .build()
      .map_err(PipelineError::HttpClient)?;
    Ok(Self { client })
  }

  pub fn with_client(client: Client) -> Self {
    Self { client }
  }
}

impl Fetcher for HttpFetcher {
  fn fetch(&self, url: &str, dest: &Path) -> Result<(), PipelineError> {
    info!(url = %url, dest = %dest.display(), "fetching URL");

    let mut response = self.client.get(url).send().map_err(|e| download_error(url, &e))?;

    if !response.status().is_success() {
      return Err(PipelineError::Download {
        url: url.to_string(),
        message: format!("HTTP {}", response.status()),
      });
    }

    let mut file = File::create(dest).map_err(|e| PipelineError::io(dest, e))?;
    let result = response
      .copy_to(&mut file)
      .map_err(|e| download_error(url, &e))
      .and_then(|size| {
        file
          .sync_all()
          .map(|()| size)
          .map_err(|e| PipelineError::io(dest, e))
      });
    drop(file);

    match result {
      Ok(size) => {
        info!(path = %dest.display(), size, "download complete");
        Ok(())
      }
      Err(e) => {
        remove_partial(dest);
        Err(e)
      }
    }
  }
}

fn download_error(url: &str, error: &reqwest::Error) -> PipelineError {
  let mut message = error.to_string();
  let mut source = std::error::Error::source(error);
  while let Some(cause) = source {
    message.push_str(": ");
    message.push_str(&cause.to_string());
    source = cause.source();
  }
  PipelineError::Download {
    url: url.to_string(),
    message,
  }
}

fn remove_partial(dest: &Path) {
  if let Err(e) = std::fs::remove_file(dest) {
    if e.kind() != std::io::ErrorKind::NotFound {
      warn!(path = %dest.display(), error = %e, "failed to remove partial download");
    }
  }
}
