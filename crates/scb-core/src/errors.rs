/// Core error type for the bot.
///
/// The adapter crate maps Telegram failures into this type so the flow layer
/// can decide user-facing messaging per kind at a single boundary: `Fetch`
/// and `Parse` produce a message for the user, everything else is logged and
/// swallowed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Network failure or non-2xx status while fetching the results site.
    #[error("{0}")]
    Fetch(String),

    /// Expected markup missing or shaped wrong. The payload is the
    /// user-visible "No data ..." message.
    #[error("{0}")]
    Parse(String),

    /// Malformed free-text user input. Never surfaced as an error; the
    /// number-prompt handler turns it into a skip notice.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook write failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
