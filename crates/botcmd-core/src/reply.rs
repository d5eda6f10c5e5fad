//! Cutting long replies to the transport's message length limit.

use botcmd_types::error::ReplyError;
use botcmd_types::utf16;
use tracing::warn;

use crate::event::Replier;

/// Split `text` into chunks of at most `limit` UTF-16 units.
///
/// Each cut falls after the last newline inside the window, else after the
/// last space, else hard at the limit. Concatenating the chunks gives back
/// `text`. A chunk always holds at least one character, even when that
/// character alone exceeds `limit`.
pub fn cut_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while utf16::len(rest) > limit {
        let mut hard = utf16::floor_byte_offset(rest, limit);
        if hard == 0 {
            hard = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let window = &rest[..hard];
        let cut = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .map(|idx| idx + 1)
            .unwrap_or(hard);

        chunks.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }

    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

/// Send `text` through `replier`, cut into `limit`-sized messages.
///
/// Chunks go out in order; the first delivery failure stops the rest.
pub async fn cut_message_and_send(
    replier: &dyn Replier,
    text: &str,
    limit: usize,
) -> Result<(), ReplyError> {
    for chunk in cut_message(text, limit) {
        if let Err(err) = replier.send_reply(chunk).await {
            warn!(error = %err, "failed to deliver command reply");
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect {
        sent: Mutex<Vec<String>>,
        fail_after: Option<usize>,
    }

    impl Replier for Collect {
        fn send_reply(
            &self,
            text: String,
        ) -> Pin<Box<dyn Future<Output = Result<(), ReplyError>> + Send + '_>> {
            Box::pin(async move {
                let mut sent = self.sent.lock().unwrap();
                if self.fail_after.is_some_and(|n| sent.len() >= n) {
                    return Err(ReplyError::Delivery("rate limited".to_string()));
                }
                sent.push(text);
                Ok(())
            })
        }
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(cut_message("usage: /ban <user>", 4096), vec!["usage: /ban <user>"]);
    }

    #[test]
    fn test_empty_text_is_no_chunks() {
        assert!(cut_message("", 10).is_empty());
    }

    #[test]
    fn test_prefers_newline_then_space_then_hard_cut() {
        assert_eq!(cut_message("aaa bbb\nccc", 9), vec!["aaa bbb\n", "ccc"]);
        assert_eq!(cut_message("aaa bbb ccc", 9), vec!["aaa bbb ", "ccc"]);
        assert_eq!(cut_message("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_chunks_fit_limit_and_rebuild_text() {
        let text = "error: the following required arguments were not provided:\n  <user>\n\nUsage: /ban <user>";
        let chunks = cut_message(text, 16);
        assert!(chunks.iter().all(|c| utf16::len(c) <= 16));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_never_splits_surrogate_pairs() {
        let chunks = cut_message("😀😀😀", 3);
        assert_eq!(chunks, vec!["😀", "😀", "😀"]);
    }

    #[test]
    fn test_oversized_single_char_still_progresses() {
        assert_eq!(cut_message("😀x", 1), vec!["😀", "x"]);
    }

    #[tokio::test]
    async fn test_sends_chunks_in_order() {
        let replier = Collect::default();
        cut_message_and_send(&replier, "one two three", 4).await.unwrap();
        assert_eq!(*replier.sent.lock().unwrap(), vec!["one ", "two ", "thre", "e"]);
    }

    #[tokio::test]
    async fn test_stops_at_first_delivery_failure() {
        let replier = Collect {
            fail_after: Some(1),
            ..Default::default()
        };
        let err = cut_message_and_send(&replier, "one two three", 4).await.unwrap_err();
        assert!(matches!(err, ReplyError::Delivery(_)));
        assert_eq!(replier.sent.lock().unwrap().len(), 1);
    }
}
