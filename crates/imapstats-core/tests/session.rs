//! Whole sessions against a scripted server.

use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use imapstats_core::{
    AccountConfig, Error, Login, StatsConfig, TimeoutHandler, fetch_stats_from_stream,
};
use imapstats_imap::Config;

/// Replays canned server output and records what the client sent.
struct MockStream {
    responses: Cursor<Vec<u8>>,
    sent: Arc<Mutex<Vec<u8>>>,
}

impl MockStream {
    fn new(responses: &str) -> (Self, Arc<Mutex<Vec<u8>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let stream = Self {
            responses: Cursor::new(responses.as_bytes().to_vec()),
            sent: Arc::clone(&sent),
        };
        (stream, sent)
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let pos = usize::try_from(self.responses.position()).unwrap();
        let data = self.responses.get_ref();
        if pos >= data.len() {
            return Poll::Ready(Ok(()));
        }
        let n = (data.len() - pos).min(buf.remaining());
        buf.put_slice(&data[pos..pos + n]);
        self.responses.set_position((pos + n) as u64);
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.sent.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Counts timeouts instead of exiting.
#[derive(Default)]
struct CountTimeouts(Mutex<usize>);

impl TimeoutHandler for CountTimeouts {
    fn on_timeout(&self, _err: &imapstats_imap::Error) {
        *self.0.lock().unwrap() += 1;
    }
}

/// Log sink shared with a `tracing` subscriber.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn login() -> Login {
    Login {
        server: Config::new("imap.example.com"),
        user: "foo@bar.com".to_string(),
        password: "secret".to_string(),
    }
}

fn sent_lines(sent: &Arc<Mutex<Vec<u8>>>) -> Vec<String> {
    String::from_utf8(sent.lock().unwrap().clone())
        .unwrap()
        .split_terminator("\r\n")
        .map(str::to_string)
        .collect()
}

fn stats_from(yaml: &str) -> StatsConfig {
    AccountConfig::from_yaml(yaml)
        .unwrap()
        .resolve("foo@bar.com", "INBOX")
}

#[tokio::test]
async fn sample_config_session() {
    let config = AccountConfig::load(
        &std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/testdata/config.yaml"),
    )
    .unwrap();
    let stats = config.resolve("foo@bar.com", "INBOX");

    let script = concat!(
        "* OK [CAPABILITY IMAP4rev1] ready\r\n",
        "A0000 OK LOGIN completed\r\n",
        "* 40 EXISTS\r\n",
        "A0001 OK [READ-ONLY] EXAMINE completed\r\n",
        "* SEARCH 2 7\r\n",
        "A0002 OK SEARCH completed\r\n",
        "* SEARCH\r\n",
        "A0003 OK SEARCH completed\r\n",
        "* SEARCH 1 2 3 4 5\r\n",
        "A0004 OK SEARCH completed\r\n",
        "* SEARCH 2 7 9\r\n",
        "A0005 OK SEARCH completed\r\n",
        "* BYE logging out\r\n",
        "A0006 OK LOGOUT completed\r\n",
    );
    let (stream, sent) = MockStream::new(script);
    let handler = CountTimeouts::default();

    let result = fetch_stats_from_stream(stream, &login(), "INBOX", &stats, &handler)
        .await
        .unwrap();

    assert_eq!(
        result.to_json_line().unwrap(),
        b"{\"important_count\":2,\"notification_count\":0,\"seen_count\":5,\"unseen_count\":3}\n"
    );
    assert_eq!(
        sent_lines(&sent),
        vec![
            "A0000 LOGIN foo@bar.com secret",
            "A0001 EXAMINE INBOX",
            "A0002 SEARCH UNSEEN HEADER From boss@bar.com",
            "A0003 SEARCH UNSEEN BODY foo BODY bar HEADER Subject Notification:",
            "A0004 SEARCH ALL",
            "A0005 SEARCH UNSEEN",
            "A0006 LOGOUT",
        ]
    );
    assert_eq!(*handler.0.lock().unwrap(), 0);
}

#[tokio::test]
async fn three_way_or_on_the_wire() {
    let stats = stats_from(
        r"
accounts:
  foo@bar.com:
    INBOX:
      unseen_count:
        or:
          - headers: {Subject: foo}
          - headers: {Subject: bar}
          - headers: {Subject: fuzz}
",
    );
    let script = concat!(
        "* OK ready\r\n",
        "A0000 OK done\r\n",
        "A0001 OK done\r\n",
        "* SEARCH 4\r\n",
        "A0002 OK done\r\n",
        "A0003 OK done\r\n",
    );
    let (stream, sent) = MockStream::new(script);

    let result = fetch_stats_from_stream(
        stream,
        &login(),
        "INBOX",
        &stats,
        CountTimeouts::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.count("unseen_count"), Some(1));
    assert_eq!(
        sent_lines(&sent)[2],
        "A0002 SEARCH UNSEEN OR (UNSEEN HEADER Subject foo) OR (UNSEEN HEADER Subject bar) \
         (UNSEEN HEADER Subject fuzz)"
    );
}

#[tokio::test]
async fn truncated_fetch_warns_once() {
    let stats = stats_from(
        r"
accounts:
  foo@bar.com:
    INBOX:
      alerts:
        seen: true
        fetch_envelope: true
",
    );

    let mut script = String::from(concat!(
        "* OK ready\r\n",
        "A0000 OK done\r\n",
        "A0001 OK done\r\n",
        "* SEARCH 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15\r\n",
        "A0002 OK done\r\n",
    ));
    for seq in 1..=10 {
        script.push_str(&format!(
            "* {seq} FETCH (ENVELOPE (\"Tue, 1 Oct 2024 09:00:00 +0000\" \"msg {seq}\" NIL NIL NIL NIL NIL NIL NIL NIL))\r\n"
        ));
    }
    script.push_str("A0003 OK done\r\n* SEARCH\r\nA0004 OK done\r\nA0005 OK done\r\n");
    let (stream, sent) = MockStream::new(&script);

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let result = fetch_stats_from_stream(
        stream,
        &login(),
        "INBOX",
        &stats,
        CountTimeouts::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.count("alerts"), Some(15));
    let samples = result.samples("alerts").unwrap();
    assert_eq!(samples.len(), 10);
    assert_eq!(samples[0].subject, "msg 1");
    assert_eq!(samples[9].subject, "msg 10");
    assert_eq!(
        samples[0].date.unwrap().to_rfc3339(),
        "2024-10-01T09:00:00+00:00"
    );

    assert_eq!(sent_lines(&sent)[3], "A0003 FETCH 1:10 ENVELOPE");

    let output = logs.contents();
    assert_eq!(output.matches("too many matching messages").count(), 1);
    assert!(output.contains("stat=alerts"));
    assert!(output.contains("total=15"));
    assert!(output.contains("fetching=10"));
}

#[tokio::test]
async fn large_search_reply_is_counted() {
    let mut script = String::from("* OK ready\r\nA0000 OK done\r\nA0001 OK done\r\n* SEARCH");
    for seq in 1..=200_000 {
        script.push_str(&format!(" {seq}"));
    }
    script.push_str("\r\nA0002 OK done\r\nA0003 OK done\r\n");
    let (stream, _) = MockStream::new(&script);

    let result = fetch_stats_from_stream(
        stream,
        &login(),
        "INBOX",
        &stats_from(""),
        CountTimeouts::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.count("unseen_count"), Some(200_000));
}

#[tokio::test]
async fn rejected_login_is_a_connection_error() {
    let script = "* OK ready\r\nA0000 NO [AUTHENTICATIONFAILED] Invalid credentials\r\n";
    let (stream, sent) = MockStream::new(script);
    let handler = CountTimeouts::default();

    let err = fetch_stats_from_stream(
        stream,
        &login(),
        "INBOX",
        &stats_from(""),
        &handler,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Connection(imapstats_imap::Error::No(_))));
    assert!(!err.is_timeout());
    assert_eq!(*handler.0.lock().unwrap(), 0);
    assert_eq!(sent_lines(&sent).len(), 1);
}

#[tokio::test]
async fn failed_search_still_logs_out() {
    let script = concat!(
        "* OK ready\r\n",
        "A0000 OK done\r\n",
        "A0001 OK done\r\n",
        "A0002 BAD unsupported search key\r\n",
        "A0003 OK done\r\n",
    );
    let (stream, sent) = MockStream::new(script);

    let err = fetch_stats_from_stream(
        stream,
        &login(),
        "INBOX",
        &stats_from(""),
        CountTimeouts::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Search { ref stat, .. } if stat == "unseen_count"));
    assert_eq!(sent_lines(&sent).last().unwrap(), "A0003 LOGOUT");
}

#[tokio::test(start_paused = true)]
async fn silent_server_escalates() {
    let (client_side, server_side) = tokio::io::duplex(1024);
    let handler = CountTimeouts::default();
    let mut login = login();
    login.server = login.server.io_timeout(Duration::from_secs(10));

    let err = fetch_stats_from_stream(client_side, &login, "INBOX", &stats_from(""), &handler)
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(
        err,
        Error::Connection(imapstats_imap::Error::Timeout(d)) if d == Duration::from_secs(10)
    ));
    assert_eq!(*handler.0.lock().unwrap(), 1);
    drop(server_side);
}
