//! Service-level result types

use serde::{Deserialize, Serialize};

/// A rendered template composed into send-ready form.
///
/// `from` is the full sender line, `"Name <address>"` when the template
/// carries a sender name, the bare address otherwise. Transporting the
/// message is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReadyEmail {
    pub from: String,
    pub subject: String,
    pub body: String,
}
