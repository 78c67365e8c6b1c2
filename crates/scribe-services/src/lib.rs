mod capability;
mod error;
mod notice;
mod session;
mod speech;

pub use capability::{Clipboard, RecognitionOptions, SpeechRecognizer};
pub use error::SessionError;
pub use notice::{Notice, NoticeBoard};
pub use session::{PendingRequest, RequestKind, Session, SessionBuilder};
pub use speech::{SpeechCapture, merge_transcript};
