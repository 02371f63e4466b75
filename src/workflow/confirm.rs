//! Operator confirmation before replacing a stored configuration.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Prompt shown before each attempt.
pub const REPLACE_PROMPT: &str = "Config already exists... Do you want to replace? [Y/n] ";

/// Number of prompts before giving up.
pub const MAX_ATTEMPTS: usize = 3;

/// Operator decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// `Y`: overwrite the stored document.
    Replace,
    /// `n`: keep the stored document and fail the save.
    Abort,
    /// No decisive answer within [`MAX_ATTEMPTS`].
    Inconclusive,
}

/// Line-oriented Y/n prompt over an injected input source and output sink.
pub struct ReplacePrompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> ReplacePrompt<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask whether `name` should be replaced.
    ///
    /// Only an exact `Y` or `n` (surrounding whitespace ignored) decides.
    /// Anything else, end of input, or a failed read uses up one attempt.
    pub async fn confirm(&mut self, name: &str) -> Confirmation {
        for attempt in 1..=MAX_ATTEMPTS {
            if let Err(e) = self.ask().await {
                tracing::debug!(error = %e, "Failed to write replace prompt");
            }

            let mut line = String::new();
            match self.input.read_line(&mut line).await {
                Ok(0) => {
                    tracing::debug!(config = %name, attempt, "End of input while waiting for confirmation");
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(config = %name, attempt, error = %e, "Failed to read confirmation");
                    continue;
                }
            }

            match line.trim() {
                "Y" => return Confirmation::Replace,
                "n" => return Confirmation::Abort,
                other => {
                    tracing::debug!(config = %name, attempt, answer = %other, "Unrecognised answer");
                }
            }
        }

        Confirmation::Inconclusive
    }

    async fn ask(&mut self) -> std::io::Result<()> {
        self.output.write_all(REPLACE_PROMPT.as_bytes()).await?;
        self.output.flush().await
    }
}
