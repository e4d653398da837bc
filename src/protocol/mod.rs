//! Protocol Module
//!
//! Defines the wire shapes exchanged with the group service.
//!
//! ## Requests
//! Requests are JSON arrays of heterogeneous values:
//! ```text
//! ["query",  "GroupMetadata", "<jid>"]
//! ["query",  "inviteCode",    "<jid>"]
//! ["action", "invite",        "<code>"]
//! ["action", "<group action>", { "id"?, "subject"?, "participants"? }]
//! ```
//!
//! ## Responses
//! Responses are JSON objects that always carry a numeric `status`.
//! Anything else in the object is operation-specific:
//! ```text
//! { "status": 200, "code": "ABCD1234" }
//! { "status": 200, "gid": "group123@g.us" }
//! { "status": 404 }
//! ```
//!
//! ## Framing
//! ```text
//! ┌──────────┬──────────────────────────────────┐
//! │ Len (4)  │   <tag> "," <json body>          │
//! └──────────┴──────────────────────────────────┘
//! ```

mod request;
mod envelope;
mod codec;

pub use request::{QueryKind, Request};
pub use envelope::{ResponseEnvelope, SUCCESS_STATUS};
pub use codec::{
    decode_envelope, encode_frame, encode_request, read_frame, split_frame, write_frame,
    LEN_PREFIX_SIZE, MAX_FRAME_SIZE,
};
