//! Resolution of `module:callable` references to built-in applications.

use std::io::Read;
use std::sync::Arc;

use anyhow::{bail, Context};

use crate::app::{from_fn, Application, Body, Environ, StartResponse};

type Handler = fn(&Environ, &mut StartResponse) -> anyhow::Result<Body>;

const APPLICATIONS: &[(&str, Handler)] = &[
    ("demo:hello", hello),
    ("demo:environ", environ),
    ("demo:echo", echo),
];

/// Names accepted by [`resolve`].
pub fn available() -> impl Iterator<Item = &'static str> {
    APPLICATIONS.iter().map(|(name, _)| *name)
}

pub fn resolve(reference: &str) -> anyhow::Result<Arc<dyn Application>> {
    let (module, callable) = reference
        .split_once(':')
        .context("application reference must look like module:callable")?;

    if module.is_empty() || callable.is_empty() || callable.contains(':') {
        bail!("application reference must look like module:callable, got {reference:?}");
    }

    match APPLICATIONS.iter().find(|(name, _)| *name == reference) {
        Some((_, handler)) => Ok(from_fn(*handler)),
        None => bail!(
            "unknown application {reference:?} (available: {})",
            available().collect::<Vec<_>>().join(", ")
        ),
    }
}

fn hello(_environ: &Environ, start_response: &mut StartResponse) -> anyhow::Result<Body> {
    start_response.start("200 OK", [("Content-Type", "text/plain")], None)?;
    Ok(Body::from("Hello, World!\n"))
}

fn environ(environ: &Environ, start_response: &mut StartResponse) -> anyhow::Result<Body> {
    start_response.start("200 OK", [("Content-Type", "text/plain")], None)?;

    let lines: Vec<String> = Environ::keys()
        .iter()
        .filter_map(|key| environ.get(key).map(|value| format!("{key}: {value}\n")))
        .collect();

    Ok(Body::from_chunks(lines))
}

fn echo(environ: &Environ, start_response: &mut StartResponse) -> anyhow::Result<Body> {
    let mut raw = Vec::new();
    environ.input().read_to_end(&mut raw)?;

    start_response.start(
        "200 OK",
        [
            ("Content-Type", "application/octet-stream".to_string()),
            ("Content-Length", raw.len().to_string()),
        ],
        None,
    )?;
    Ok(Body::from(raw))
}
