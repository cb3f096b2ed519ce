use crate::common::messages::AckCommand;

/// Action sent back for every accepted image.
pub const ACK_ACTION: &str = "ACK";

/// Build the acknowledgment for an image carrying `label`.
///
/// The label is echoed verbatim when present and non-empty; otherwise
/// `labelReceived` is left out of the command.
pub fn make_control_command(label: Option<&str>) -> AckCommand {
    AckCommand {
        action: ACK_ACTION.to_string(),
        label_received: label.filter(|l| !l.is_empty()).map(str::to_string),
    }
}
