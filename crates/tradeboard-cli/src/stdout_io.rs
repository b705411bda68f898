use std::io::{self, Write};

/// Writes `text` as-is. A reader that closed the pipe early (`| head`) is
/// not an error.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    emit(&mut io::stdout().lock(), text, false)
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    emit(&mut io::stdout().lock(), text, true)
}

fn emit<W: Write>(writer: &mut W, text: &str, newline: bool) -> io::Result<()> {
    let written = writer
        .write_all(text.as_bytes())
        .and_then(|()| {
            if newline {
                writer.write_all(b"\n")
            } else {
                Ok(())
            }
        })
        .and_then(|()| writer.flush());
    tolerate_closed_pipe(written)
}

fn tolerate_closed_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed by reader");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::emit;

    struct FailingWriter(io::ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(self.0))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn line_mode_appends_newline() {
        let mut buffer = Vec::new();
        assert!(emit(&mut buffer, "Janeiro 2024", true).is_ok());
        assert_eq!(buffer, b"Janeiro 2024\n");

        let mut raw = Vec::new();
        assert!(emit(&mut raw, "help\n", false).is_ok());
        assert_eq!(raw, b"help\n");
    }

    #[test]
    fn closed_pipe_is_silent() {
        let mut writer = FailingWriter(io::ErrorKind::BrokenPipe);
        assert!(emit(&mut writer, "rows", true).is_ok());
    }

    #[test]
    fn other_write_errors_surface() {
        let mut writer = FailingWriter(io::ErrorKind::PermissionDenied);
        let result = emit(&mut writer, "rows", true);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.kind(), io::ErrorKind::PermissionDenied);
        }
    }
}
