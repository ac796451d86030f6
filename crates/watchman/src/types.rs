/// A search hit produced by a scan. Consumed right away by the trigger step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    /// Modification stamp (`%Y%m%d%H%M%S`, UTC) of the file when it was scanned.
    pub timestamp: String,
    pub event_name: String,
    /// The full matched line, trailing newline included.
    pub log_text: String,
    pub log_file_name: String,
}
