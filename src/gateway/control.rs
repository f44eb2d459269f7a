//! Client side of BIRD's control socket.
//!
//! Every reply is a run of lines. A line is `DDDD-text` (more lines follow
//! for code `DDDD`), `DDDD text` (last line of the reply) or ` text`
//! (continuation of the previous code). Codes in the 8000 and 9000 ranges
//! are run-time and parse errors.

use std::path::Path;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;

/// Longest reply line accepted before the connection is considered broken,
/// not counting the line terminator.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// First reply code treated as an error.
const ERROR_CODE_FLOOR: u16 = 8000;

/// Run-time error BIRD answers when no route matches the queried network.
pub const NETWORK_NOT_FOUND: u16 = 8001;

/// One complete reply from the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Code on the final line.
    pub code: u16,
    /// Text of every line, code prefixes stripped, newline separated.
    pub text: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Coded { code: u16, last: bool, text: &'a str },
    Continuation(&'a str),
}

fn parse_line(line: &str) -> anyhow::Result<Line<'_>> {
    if let Some(text) = line.strip_prefix(' ') {
        return Ok(Line::Continuation(text));
    }
    let bytes = line.as_bytes();
    if bytes.len() < 4 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        anyhow::bail!("malformed reply line: {line:?}");
    }
    let code: u16 = line[..4].parse()?;
    match bytes.get(4) {
        None => Ok(Line::Coded {
            code,
            last: true,
            text: "",
        }),
        Some(b' ') => Ok(Line::Coded {
            code,
            last: true,
            text: &line[5..],
        }),
        Some(b'-') => Ok(Line::Coded {
            code,
            last: false,
            text: &line[5..],
        }),
        Some(_) => anyhow::bail!("malformed reply line: {line:?}"),
    }
}

impl Reply {
    pub fn is_error(&self) -> bool {
        self.code >= ERROR_CODE_FLOOR
    }
}

/// An open control connection. Dropping it closes the socket.
pub struct BirdControl {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    banner: Reply,
}

impl BirdControl {
    /// Connects and consumes the greeting banner.
    pub async fn connect(path: &Path) -> anyhow::Result<Self> {
        let stream = UnixStream::connect(path)
            .await
            .with_context(|| format!("connecting to bird at {}", path.display()))?;
        let (read_half, writer) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let banner = read_reply(&mut reader).await.context("reading bird banner")?;
        log::debug!("bird banner {}: {}", banner.code, banner.text);
        Ok(Self {
            reader,
            writer,
            banner,
        })
    }

    pub fn banner(&self) -> &Reply {
        &self.banner
    }

    /// Sends one command and waits for its complete reply, failing on an
    /// error code.
    pub async fn command(&mut self, command: &str) -> anyhow::Result<Reply> {
        let reply = self.request(command).await?;
        if reply.is_error() {
            anyhow::bail!("bird rejected {command:?} with {}: {}", reply.code, reply.text);
        }
        Ok(reply)
    }

    /// Sends one command and returns its reply whatever the code.
    pub async fn request(&mut self, command: &str) -> anyhow::Result<Reply> {
        if command.contains(['\n', '\r']) {
            anyhow::bail!("control command must be a single line: {command:?}");
        }
        log::debug!("bird <- {command}");
        self.writer
            .write_all(format!("{command}\n").as_bytes())
            .await
            .with_context(|| format!("sending {command:?}"))?;
        self.writer.flush().await?;
        let reply = read_reply(&mut self.reader)
            .await
            .with_context(|| format!("reading reply to {command:?}"))?;
        log::debug!("bird -> {} ({} bytes)", reply.code, reply.text.len());
        Ok(reply)
    }

    /// Shuts the write half down; the daemon then closes its side.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await.context("closing bird connection")
    }
}

async fn read_reply<R>(reader: &mut R) -> anyhow::Result<Reply>
where
    R: AsyncBufRead + Unpin,
{
    let mut text = String::new();
    let mut error_code: Option<u16> = None;
    let mut raw = Vec::new();
    loop {
        raw.clear();
        // Room for the content, a `\r\n` terminator and one byte to spot overflow.
        let n = (&mut *reader)
            .take(MAX_LINE_LEN as u64 + 3)
            .read_until(b'\n', &mut raw)
            .await?;
        if n == 0 {
            anyhow::bail!("connection closed before end of reply");
        }
        let content = raw.strip_suffix(b"\n").unwrap_or(&raw[..]);
        let content = content.strip_suffix(b"\r").unwrap_or(content);
        if content.len() > MAX_LINE_LEN {
            anyhow::bail!("reply line exceeds {MAX_LINE_LEN} bytes");
        }
        let line = String::from_utf8_lossy(content);
        let (code, last, body) = match parse_line(&line)? {
            Line::Coded { code, last, text } => (Some(code), last, text),
            Line::Continuation(text) => (None, false, text),
        };
        if let Some(code) = code.filter(|&c| c >= ERROR_CODE_FLOOR) {
            error_code.get_or_insert(code);
        }
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(body);
        if last {
            let code = code.unwrap_or_default();
            return Ok(Reply {
                code: error_code.unwrap_or(code),
                text,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_kinds() {
        assert_eq!(
            parse_line("0001 BIRD 2.0.8 ready.").unwrap(),
            Line::Coded {
                code: 1,
                last: true,
                text: "BIRD 2.0.8 ready."
            }
        );
        assert_eq!(
            parse_line("1007-1.1.1.0/24 unicast").unwrap(),
            Line::Coded {
                code: 1007,
                last: false,
                text: "1.1.1.0/24 unicast"
            }
        );
        assert_eq!(
            parse_line(" \tBGP.community: (1,2)").unwrap(),
            Line::Continuation("\tBGP.community: (1,2)")
        );
        assert_eq!(
            parse_line("0000").unwrap(),
            Line::Coded {
                code: 0,
                last: true,
                text: ""
            }
        );
        assert!(parse_line("hello").is_err());
        assert!(parse_line("0001+x").is_err());
    }

    #[tokio::test]
    async fn reads_multi_line_reply() -> anyhow::Result<()> {
        let raw: &[u8] = b"1007-1.1.1.0/24 unicast\n \tBGP.community: (23456,16385)\n0000 \n";
        let mut reader = BufReader::new(raw);
        let reply = read_reply(&mut reader).await?;
        assert_eq!(reply.code, 0);
        assert!(reply.text.contains("(23456,16385)"));
        Ok(())
    }

    #[tokio::test]
    async fn error_code_sticks_to_reply() -> anyhow::Result<()> {
        let raw: &[u8] = b"8001-Network not found\n0000 \n";
        let mut reader = BufReader::new(raw);
        let reply = read_reply(&mut reader).await?;
        assert_eq!(reply.code, 8001);
        Ok(())
    }

    #[tokio::test]
    async fn eof_mid_reply_is_an_error() {
        let raw: &[u8] = b"1007-partial\n";
        let mut reader = BufReader::new(raw);
        assert!(read_reply(&mut reader).await.is_err());
    }

    #[tokio::test]
    async fn line_of_exactly_max_len_is_accepted() -> anyhow::Result<()> {
        let mut raw = b"0000 ".to_vec();
        raw.resize(MAX_LINE_LEN, b'x');
        raw.extend_from_slice(b"\r\n");
        let mut reader = BufReader::new(raw.as_slice());
        let reply = read_reply(&mut reader).await?;
        assert_eq!(reply.text.len(), MAX_LINE_LEN - 5);
        Ok(())
    }

    #[tokio::test]
    async fn non_utf8_text_is_kept_lossily() -> anyhow::Result<()> {
        let raw: &[u8] = b"1007-1.1.1.0/24 unicast [caf\xe9]\n \tBGP.community: (23456,16385)\n0000 \n";
        let mut reader = BufReader::new(raw);
        let reply = read_reply(&mut reader).await?;
        assert!(reply.text.contains('\u{fffd}'));
        assert!(reply.text.contains("(23456,16385)"));
        Ok(())
    }

    #[tokio::test]
    async fn error_reply_is_flagged() -> anyhow::Result<()> {
        let raw: &[u8] = b"8001 Network not found\n";
        let mut reader = BufReader::new(raw);
        let reply = read_reply(&mut reader).await?;
        assert_eq!(reply.code, NETWORK_NOT_FOUND);
        assert!(reply.is_error());
        Ok(())
    }

    #[tokio::test]
    async fn oversized_line_is_rejected() {
        let mut raw = vec![b'1'; MAX_LINE_LEN + 10];
        raw.push(b'\n');
        let mut reader = BufReader::new(raw.as_slice());
        let err = read_reply(&mut reader).await.unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }
}
