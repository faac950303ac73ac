use std::io::{self, BufRead, BufReader, Stdin, Write};

use anyhow::{Context, Result, bail};

const YES: &[&str] = &["y", "Y", "yes", "Yes", "YES"];
const NO: &[&str] = &["n", "N", "no", "No", "NO"];

const RETRY_MESSAGE: &str = "Please type yes or no and then press enter:";

/// Yes/no prompt over a line reader and a writer.
///
/// The copier owns one of these; `main` builds it over stdin/stderr and tests
/// feed it scripted input. Lines are read on tokio's blocking pool, so the
/// runtime thread keeps polling Ctrl-C while the user decides.
pub struct ConsolePrompt<R, W> {
    /// `None` once a read was abandoned mid-line.
    input: Option<R>,
    output: W,
}

impl ConsolePrompt<BufReader<Stdin>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R, W> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Some(input),
            output,
        }
    }

    /// Consume the prompt, returning the writer (used by tests to inspect
    /// what was printed).
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead + Send + 'static, W: Write> ConsolePrompt<R, W> {
    /// Print `question` once, then read lines until one is a recognised
    /// answer.
    ///
    /// Unrecognised input re-prompts without limit. End of input is an
    /// error: there is no safe default for a destructive question. Dropping
    /// the returned future abandons the pending read, and every later call
    /// fails instead of consuming an answer typed after the cancellation.
    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        writeln!(self.output, "{question} [y/n]:").context("writing prompt")?;
        self.output.flush().context("flushing prompt")?;

        loop {
            let line = self.read_line().await?;
            let answer = line.trim();
            if YES.iter().any(|t| *t == answer) {
                return Ok(true);
            }
            if NO.iter().any(|t| *t == answer) {
                return Ok(false);
            }

            writeln!(self.output, "{RETRY_MESSAGE}").context("writing prompt")?;
            self.output.flush().context("flushing prompt")?;
        }
    }

    async fn read_line(&mut self) -> Result<String> {
        let Some(mut input) = self.input.take() else {
            bail!("reading confirmation: an earlier read was interrupted");
        };
        let (input, read) = tokio::task::spawn_blocking(move || {
            let mut line = String::new();
            let read = input.read_line(&mut line).map(|_| line);
            (input, read)
        })
        .await
        .context("reading confirmation")?;
        self.input = Some(input);

        let line = read.context("reading confirmation")?;
        if line.is_empty() {
            bail!("reading confirmation: unexpected end of input");
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use super::*;

    fn prompt(input: &str) -> ConsolePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn affirmative_tokens() {
        for token in ["y", "Y", "yes", "Yes", "YES"] {
            let mut p = prompt(&format!("{token}\n"));
            assert!(p.confirm("delete?").await.unwrap(), "{token} should confirm");
        }
    }

    #[tokio::test]
    async fn negative_tokens() {
        for token in ["n", "N", "no", "No", "NO"] {
            let mut p = prompt(&format!("{token}\n"));
            assert!(!p.confirm("delete?").await.unwrap(), "{token} should decline");
        }
    }

    #[tokio::test]
    async fn near_miss_tokens_reprompt() {
        for token in ["yEs", "nO", "yeah", "ok", "1", ""] {
            let mut p = prompt(&format!("{token}\nn\n"));
            assert!(!p.confirm("delete?").await.unwrap());
            let out = String::from_utf8(p.into_output()).unwrap();
            assert_eq!(out.matches(RETRY_MESSAGE).count(), 1, "token {token:?}");
        }
    }

    #[tokio::test]
    async fn reprompts_until_answer() {
        let mut p = prompt("maybe\nwhat\nYES\n");
        assert!(p.confirm("delete?").await.unwrap());
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("delete? [y/n]:").count(), 1);
        assert_eq!(out.matches(RETRY_MESSAGE).count(), 2);
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_ignored() {
        let mut p = prompt("  yes \r\n");
        assert!(p.confirm("delete?").await.unwrap());
    }

    #[tokio::test]
    async fn last_line_without_newline_is_read() {
        let mut p = prompt("y");
        assert!(p.confirm("delete?").await.unwrap());
    }

    #[tokio::test]
    async fn end_of_input_is_an_error() {
        let mut p = prompt("");
        assert!(p.confirm("delete?").await.is_err());

        let mut p = prompt("perhaps\n");
        let err = p.confirm("delete?").await.unwrap_err();
        assert!(format!("{err:#}").contains("end of input"));
    }

    #[tokio::test]
    async fn successive_questions_consume_one_answer_each() {
        let mut p = prompt("y\nn\n");
        assert!(p.confirm("first?").await.unwrap());
        assert!(!p.confirm("second?").await.unwrap());
        assert!(p.confirm("third?").await.is_err());
    }

    #[tokio::test]
    async fn waiting_for_input_leaves_runtime_free() {
        let (reader, mut writer) = io::pipe().unwrap();
        let mut p = ConsolePrompt::new(BufReader::new(reader), Vec::new());

        let waited = tokio::time::timeout(Duration::from_millis(50), p.confirm("delete?")).await;
        assert!(waited.is_err(), "nothing has been typed yet");

        // An answer typed after the abandoned read must not be taken.
        writer.write_all(b"y\n").unwrap();
        drop(writer);
        let err = p.confirm("delete?").await.unwrap_err();
        assert!(format!("{err:#}").contains("interrupted"));
    }
}
