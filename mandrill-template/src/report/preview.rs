//! PNG previews of template HTML

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, TemplateError};

/// Turns template HTML into an image file
#[async_trait]
pub trait PreviewRenderer: Send + Sync {
    async fn render_png(&self, html: &str, output: &Path) -> Result<()>;
}

/// Renders previews with the `wkhtmltoimage` command line tool
#[derive(Debug, Clone)]
pub struct WkhtmltoimageRenderer {
    program: String,
    quality: u8,
    width: u32,
}

impl WkhtmltoimageRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            quality: 60,
            width: 600,
        }
    }

    fn command(&self, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--quiet")
            .arg("--format")
            .arg("png")
            .arg("--quality")
            .arg(self.quality.to_string())
            .arg("--width")
            .arg(self.width.to_string())
            .arg("-")
            .arg(output);
        cmd
    }
}

impl Default for WkhtmltoimageRenderer {
    fn default() -> Self {
        Self::new("wkhtmltoimage")
    }
}

#[async_trait]
impl PreviewRenderer for WkhtmltoimageRenderer {
    async fn render_png(&self, html: &str, output: &Path) -> Result<()> {
        debug!("Rendering preview {} with {}", output.display(), self.program);

        let mut child = self
            .command(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TemplateError::Preview(format!("Failed to run {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(html.as_bytes()).await?;
        }

        let result = child.wait_with_output().await?;

        if !result.status.success() {
            let error = String::from_utf8_lossy(&result.stderr).to_string();
            return Err(TemplateError::Preview(format!(
                "{} exited with {}: {}",
                self.program, result.status, error
            )));
        }

        Ok(())
    }
}
