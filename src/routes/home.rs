//! Liveness route.

use crate::config::LIVENESS_MESSAGE;

/// Static liveness string. Touches nothing but the HTTP stack.
pub async fn index() -> &'static str {
    LIVENESS_MESSAGE
}
