//! libcurl-backed resumable fetcher (HTTP(S), FTP, file URLs).
//!
//! Appends the response body to the target file, asking the server to start at the
//! target's current length. Exit codes are libcurl's `CURLcode` values, which match
//! what the `curl` command line tool reports.

use super::{FetchError, Fetcher, WRITE_ERROR_CODE};
use crate::config::FetchConfig;
use curl::easy::Easy;
use std::cell::{Cell, RefCell};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::str;
use std::time::Duration;

/// Exit code for HTTP error responses (`CURLE_HTTP_RETURNED_ERROR`, as with `curl --fail`).
pub const HTTP_ERROR_CODE: i32 = 22;

/// Server ignored the requested resume offset (`CURLE_RANGE_ERROR`).
const RANGE_ERROR_CODE: i32 = 33;

const RANGE_NOT_SATISFIABLE: u32 = 416;

#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    cfg: FetchConfig,
}

impl CurlFetcher {
    pub fn new(cfg: FetchConfig) -> Self {
        CurlFetcher { cfg }
    }

    fn configure(&self, easy: &mut Easy, url: &str, offset: u64) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.cfg.max_redirections)?;
        easy.fail_on_error(true)?;
        easy.connect_timeout(Duration::from_secs(self.cfg.connect_timeout_secs))?;
        easy.low_speed_limit(self.cfg.low_speed_limit)?;
        easy.low_speed_time(Duration::from_secs(self.cfg.low_speed_time_secs))?;
        if self.cfg.timeout_secs > 0 {
            easy.timeout(Duration::from_secs(self.cfg.timeout_secs))?;
        }
        if let Some(agent) = &self.cfg.user_agent {
            easy.useragent(agent)?;
        }
        if offset > 0 {
            easy.resume_from(offset)?;
        }
        Ok(())
    }

    /// One transfer appending to `target` from its current length.
    fn transfer(&self, url: &str, target: &Path) -> Result<(), FetchError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(target)
            .map_err(|e| write_failure(target, &e))?;
        let offset = file
            .metadata()
            .map_err(|e| write_failure(target, &e))?
            .len();

        let mut easy = Easy::new();
        self.configure(&mut easy, url, offset)
            .map_err(curl_failure)?;
        tracing::debug!(url, target = %target.display(), offset, "fetch start");

        let status = Cell::new(0u32);
        let write_error: RefCell<Option<io::Error>> = RefCell::new(None);
        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|line| {
                    if let Some(code) = parse_status_line(line) {
                        status.set(code);
                    }
                    true
                })
                .map_err(curl_failure)?;
            transfer
                .write_function(|data| {
                    // Body of a 416 answer to a resume request is an error page, not file data.
                    if status.get() == RANGE_NOT_SATISFIABLE {
                        return Ok(data.len());
                    }
                    match file.write_all(data) {
                        Ok(()) => Ok(data.len()),
                        Err(e) => {
                            *write_error.borrow_mut() = Some(e);
                            Ok(0) // abort transfer
                        }
                    }
                })
                .map_err(curl_failure)?;
            transfer.perform()
        };

        if let Some(e) = write_error.into_inner() {
            return Err(write_failure(target, &e));
        }
        if status.get() == RANGE_NOT_SATISFIABLE && offset > 0 {
            tracing::debug!(url, offset, "nothing left to fetch; file already complete");
            return Ok(());
        }
        performed.map_err(curl_failure)?;

        let code = easy.response_code().map_err(curl_failure)?;
        if code == RANGE_NOT_SATISFIABLE {
            return Err(FetchError::new(
                HTTP_ERROR_CODE,
                format!("{} returned HTTP {}", url, code),
            ));
        }
        tracing::debug!(url, code, "fetch complete");
        Ok(())
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, target: &Path) -> Result<(), FetchError> {
        match self.transfer(url, target) {
            Err(e) if e.code == RANGE_ERROR_CODE => {
                tracing::info!(url, "server cannot resume; restarting from byte 0");
                OpenOptions::new()
                    .write(true)
                    .truncate(true)
                    .open(target)
                    .map_err(|e| write_failure(target, &e))?;
                self.transfer(url, target)
            }
            other => other,
        }
    }
}

fn curl_failure(e: curl::Error) -> FetchError {
    FetchError::new(e.code() as i32, e.to_string())
}

fn write_failure(target: &Path, e: &io::Error) -> FetchError {
    FetchError::new(
        WRITE_ERROR_CODE,
        format!("write {}: {}", target.display(), e),
    )
}

/// Status code of an HTTP status line (`HTTP/1.1 206 Partial Content`), if `line` is one.
fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = str::from_utf8(line).ok()?;
    let mut parts = line.split_whitespace();
    if !parts.next()?.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}
