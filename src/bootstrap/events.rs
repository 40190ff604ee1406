//! Wizard events as JSON lines.

use std::io::{self, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use ci_core::files::UploadedFile;
use ci_core::intake::SubmissionReceipt;
use ci_core::ports::WizardEventPort;
use ci_core::wizard::WizardState;
use serde_json::{json, Value};
use tracing::warn;

/// Writes one JSON object per event, e.g. `{"event":"state","state":{..}}`.
pub struct JsonLinesEventPort<W: Write + Send> {
    out: Mutex<W>,
}

impl JsonLinesEventPort<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonLinesEventPort<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_line(&self, line: Value) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(err) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            warn!(error = %err, "failed to write wizard event");
        }
    }
}

#[async_trait]
impl<W: Write + Send> WizardEventPort for JsonLinesEventPort<W> {
    async fn emit_state_changed(&self, state: &WizardState) {
        self.write_line(json!({ "event": "state", "state": state }));
    }

    async fn emit_files_changed(&self, files: &[UploadedFile]) {
        self.write_line(json!({ "event": "files", "files": files }));
    }

    async fn emit_intake_completed(&self, receipt: &SubmissionReceipt) {
        self.write_line(json!({ "event": "completed", "receipt": receipt }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_are_newline_delimited_json() {
        let port = JsonLinesEventPort::new(Vec::new());

        port.emit_state_changed(&WizardState::initial()).await;
        port.emit_intake_completed(&SubmissionReceipt {
            id: Some("cons-1".into()),
            message: None,
        })
        .await;

        let output = String::from_utf8(port.into_inner()).unwrap();
        let lines: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "state");
        assert_eq!(lines[0]["state"]["step"], "description");
        assert_eq!(lines[1]["receipt"]["id"], "cons-1");
    }
}
