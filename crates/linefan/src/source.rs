use crate::error::FanError;
use std::io::Write;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader, Split};
use tokio::process::{Child, Command};
use tracing::{debug, info};

type BoxedSegments = Split<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Where input lines come from: a reader, or the stdout of a shell command
///
/// Lines are newline-delimited bytes in any encoding; they are never
/// rejected for not being UTF-8.
pub struct LineSource {
    segments: BoxedSegments,
    child: Option<Child>,
}

impl LineSource {
    /// Lines from the process's own standard input
    pub fn stdin() -> Self {
        Self::from_reader(tokio::io::stdin())
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffered: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(BufReader::new(reader));
        Self {
            segments: buffered.split(b'\n'),
            child: None,
        }
    }

    /// Run `command` through `sh -c`, reading its stdout and relaying its
    /// stderr to our stderr
    pub fn spawn_shell(command: &str) -> Result<Self, FanError> {
        Self::spawn_shell_with_relay(command, std::io::stderr())
    }

    /// Like [`LineSource::spawn_shell`] with the subprocess's stderr lines
    /// written to `relay_sink`
    ///
    /// The relay runs as its own task; its output is not ordered with
    /// anything the fan writes.
    pub fn spawn_shell_with_relay<S>(command: &str, relay_sink: S) -> Result<Self, FanError>
    where
        S: Write + Send + 'static,
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| FanError::Spawn {
            command: command.to_string(),
            source,
        })?;
        info!("Spawned `{}`", command);

        let stdout = child
            .stdout
            .take()
            .ok_or(FanError::MissingPipe("stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or(FanError::MissingPipe("stderr"))?;

        // Detached; never joined
        tokio::spawn(relay_lines(stderr, relay_sink));

        let mut source = Self::from_reader(stdout);
        source.child = Some(child);
        Ok(source)
    }

    pub fn has_child(&self) -> bool {
        self.child.is_some()
    }

    /// Next input line, or None once input has ended
    ///
    /// A trailing `\r` is dropped and invalid UTF-8 is replaced, so every
    /// line counts. Only an I/O error ends the input early.
    pub async fn next_line(&mut self) -> Option<String> {
        match self.segments.next_segment().await {
            Ok(Some(segment)) => Some(decode_line(&segment)),
            Ok(None) => None,
            Err(e) => {
                debug!("Stopped reading input: {}", e);
                None
            }
        }
    }

    /// Wait for the subprocess, if any, and report whether the run succeeded
    ///
    /// Without a subprocess the run always succeeds.
    pub async fn wait(self) -> bool {
        let Self { segments, child } = self;
        // Close our end of stdout so a child still writing cannot block on
        // a pipe nobody reads
        drop(segments);

        let Some(mut child) = child else {
            return true;
        };

        match child.wait().await {
            Ok(status) => {
                debug!("Subprocess exited with {:?}", status.code());
                status.success()
            }
            Err(e) => {
                debug!("Failed to wait for subprocess: {}", e);
                false
            }
        }
    }
}

fn decode_line(segment: &[u8]) -> String {
    let line = segment.strip_suffix(b"\r").unwrap_or(segment);
    String::from_utf8_lossy(line).into_owned()
}

/// Copy stderr to `sink` one line at a time, bytes untouched
async fn relay_lines<R, S>(stream: R, mut sink: S)
where
    R: AsyncRead + Unpin,
    S: Write,
{
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                if !line.ends_with(b"\n") {
                    line.push(b'\n');
                }
                let _ = sink.write_all(&line);
                let _ = sink.flush();
            }
            Err(e) => {
                debug!("Stopped relaying stderr: {}", e);
                break;
            }
        }
    }
}
