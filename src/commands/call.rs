use anyhow::{Context, Result, bail};
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::{
    api::{ApiClient, Json},
    http::FormPayload,
    runtime::Runtime,
};

/// One API call as requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        path: String,
        query: Vec<(String, String)>,
    },
    Post { path: String, body: Option<Json> },
    Put { path: String, body: Option<Json> },
    Delete { path: String },
    Upload { path: String, form: FormPayload },
}

/// Issues the call and prints the response body.
#[tracing::instrument(skip(api))]
pub async fn call(api: &ApiClient, call: Call) -> Result<()> {
    let body: Value = match call {
        // pairs go out as given, so repeated keys keep their order
        Call::Get { path, query } => api.get_with_query(&path, &query).await?,
        Call::Post { path, body } => api.post(&path, body.as_ref()).await?,
        Call::Put { path, body } => api.put(&path, body.as_ref()).await?,
        Call::Delete { path } => api.delete(&path).await?,
        Call::Upload { path, form } => api.upload(&path, form).await?,
    };

    if let Some(text) = render_body(&body)? {
        println!("{}", text);
    }
    Ok(())
}

/// Text to print for a body: nothing for `null`, strings verbatim, any
/// other JSON pretty-printed.
pub fn render_body(body: &Value) -> Result<Option<String>> {
    Ok(match body {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(serde_json::to_string_pretty(other)?),
    })
}

/// Parses `KEY=VALUE`.
pub fn parse_key_value(s: &str) -> Result<(String, String)> {
    let Some((key, value)) = s.split_once('=') else {
        bail!("Invalid KEY=VALUE pair '{}': no '=' found", s);
    };
    if key.is_empty() {
        bail!("Invalid KEY=VALUE pair '{}': empty key", s);
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parses a JSON object given on the command line.
pub fn parse_json_object(s: &str) -> Result<Json> {
    match serde_json::from_str::<Value>(s).context("Request body is not valid JSON")? {
        Value::Object(map) => Ok(map),
        _ => bail!("Request body must be a JSON object"),
    }
}

/// Builds a multipart form from text fields and `name=path` file parts.
pub fn build_form<R: Runtime + ?Sized>(
    runtime: &R,
    fields: Vec<(String, String)>,
    files: Vec<(String, PathBuf)>,
) -> Result<FormPayload> {
    let mut form = FormPayload::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }
    for (name, path) in files {
        let bytes = runtime
            .read(&path)
            .with_context(|| format!("Failed to read upload file {}", path.display()))?;
        let file_name = file_name_of(&path);
        debug!("Attaching {} ({} bytes) as '{}'", file_name, bytes.len(), name);
        form = form.file(name, file_name, bytes);
    }
    if form.is_empty() {
        bail!("Nothing to upload: add at least one --field or --file");
    }
    Ok(form)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string())
}
