//! Sans-I/O response parser.
//!
//! Responses are parsed from complete frames (a line plus any embedded
//! literals, as produced by [`crate::FramedStream`]). The parser never
//! touches the network, which keeps it testable from byte strings alone.
//!
//! # Example
//!
//! ```
//! use imapstats_imap::parser::{Response, ResponseParser, UntaggedResponse};
//!
//! let response = ResponseParser::parse(b"* SEARCH 2 3 5\r\n").unwrap();
//! match response {
//!     Response::Untagged(UntaggedResponse::Search(ids)) => assert_eq!(ids.len(), 3),
//!     _ => panic!("expected SEARCH data"),
//! }
//! ```

pub mod lexer;
pub mod response;

pub use lexer::{Lexer, Token};
pub use response::{Address, Envelope, FetchItem, Response, ResponseParser, UntaggedResponse};
