//! Argument tokenization in message coordinates.
//!
//! The argument text starts one unit after the matched command text. Each
//! token's `start` is the previous boundary and its `end` is one before the
//! lexer's read position (both shifted into message coordinates), so the
//! token ranges tile the argument text: leading whitespace belongs to the
//! token it precedes and the terminating whitespace to the token it ends.

use botcmd_types::argument::Argument;
use botcmd_types::entity::Entity;
use botcmd_types::error::TokenizeError;
use botcmd_types::message::Message;
use botcmd_types::utf16;

use crate::lexer::ShellLexer;

/// Result of tokenizing one command's argument text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Argument>,
    /// `tokens.len() + 1` strictly increasing offsets; the first one is the
    /// base offset where argument text begins.
    pub bounds: Vec<usize>,
}

/// Offset where the argument text of `matched` begins.
pub fn base_offset(matched: &str) -> usize {
    utf16::len(matched) + 1
}

/// Split the text after `matched` into shell-style tokens and attach the
/// message entities overlapping each one.
pub fn tokenize(message: &Message, matched: &str) -> Result<Tokenized, TokenizeError> {
    let base = base_offset(matched);
    // The separator after the command may be half of a surrogate pair; lex
    // from the char boundary below it so the pair is not dropped.
    let split = utf16::floor_byte_offset(&message.text, base);
    let origin = utf16::len(&message.text[..split]);
    let rest = &message.text[split..];

    let mut tokens = Vec::new();
    let mut bounds = vec![base];

    for word in ShellLexer::new(rest) {
        let word = word.map_err(|e| e.shifted(origin))?;
        let start = bounds[bounds.len() - 1];
        let end = word.position + origin;
        tokens.push(Argument::new(word.value, start, end - 1));
        bounds.push(end);
    }

    attach_entities(&mut tokens, &message.entities);

    Ok(Tokenized { tokens, bounds })
}

/// Whether `entity` touches the inclusive range `start..=end`.
///
/// Four inclusive tests: entity start inside the token, entity end inside the
/// token, token start inside the entity, token end inside the entity. The
/// entity end is `offset + length`, one past its last unit, so an entity
/// ending exactly where a token starts still counts.
pub fn overlaps(start: usize, end: usize, entity: &Entity) -> bool {
    let entity_start = entity.offset;
    let entity_end = entity.end();

    (start <= entity_start && entity_start <= end)
        || (start <= entity_end && entity_end <= end)
        || (entity_start <= start && start <= entity_end)
        || (entity_start <= end && end <= entity_end)
}

fn attach_entities(tokens: &mut [Argument], entities: &[Entity]) {
    for entity in entities {
        for token in tokens.iter_mut() {
            if overlaps(token.start, token.end, entity) {
                token.entities.push(entity.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botcmd_types::entity::EntityKind;

    fn values(t: &Tokenized) -> Vec<&str> {
        t.tokens.iter().map(|a| a.as_str()).collect()
    }

    #[test]
    fn test_quoted_argument_with_bot_suffix() {
        let text = r#"/ban@mybot 123 "spam reason""#;
        let msg = Message::new(text, vec![Entity::bot_command(0, 10)]);
        let t = tokenize(&msg, "/ban@mybot").unwrap();

        assert_eq!(values(&t), vec!["123", "spam reason"]);
        assert_eq!(t.bounds, vec![11, 15, 28]);
        assert_eq!((t.tokens[0].start, t.tokens[0].end), (11, 14));
        // second token covers both quote characters
        assert_eq!((t.tokens[1].start, t.tokens[1].end), (15, 27));
        assert_eq!(&text[15..=27], r#""spam reason""#);
    }

    #[test]
    fn test_no_arguments_yields_only_base_boundary() {
        let msg = Message::new("/ban", vec![Entity::bot_command(0, 4)]);
        let t = tokenize(&msg, "/ban").unwrap();
        assert!(t.tokens.is_empty());
        assert_eq!(t.bounds, vec![5]);
    }

    #[test]
    fn test_trailing_whitespace_only_yields_no_tokens() {
        let msg = Message::plain("/ban    ");
        let t = tokenize(&msg, "/ban").unwrap();
        assert!(t.tokens.is_empty());
        assert_eq!(t.bounds, vec![5]);
    }

    #[test]
    fn test_bounds_are_one_longer_than_tokens_and_increasing() {
        let msg = Message::plain("/kick  a 'b c'   d\te");
        let t = tokenize(&msg, "/kick").unwrap();
        assert_eq!(values(&t), vec!["a", "b c", "d", "e"]);
        assert_eq!(t.bounds.len(), t.tokens.len() + 1);
        assert_eq!(t.bounds[0], 6);
        assert!(t.bounds.windows(2).all(|w| w[0] < w[1]));
        for (i, token) in t.tokens.iter().enumerate() {
            assert_eq!(token.start, t.bounds[i]);
            assert_eq!(token.end, t.bounds[i + 1] - 1);
        }
    }

    #[test]
    fn test_token_ranges_reconstruct_argument_text() {
        let text = "/kick  a 'b c'   d\te";
        let msg = Message::plain(text);
        let t = tokenize(&msg, "/kick").unwrap();
        let rebuilt: String = t
            .tokens
            .iter()
            .map(|a| &text[a.start..=a.end])
            .collect();
        assert_eq!(rebuilt, &text[6..]);
    }

    #[test]
    fn test_entity_inside_one_token_attaches_only_there() {
        // "/cmd aa bb": "aa" spans 5..=7 (with its space), "bb" 8..=9
        let bold = Entity::new(8, 2, EntityKind::Bold);
        let msg = Message::new("/cmd aa bb", vec![Entity::bot_command(0, 4), bold.clone()]);
        let t = tokenize(&msg, "/cmd").unwrap();
        assert!(t.tokens[0].entities.is_empty());
        assert_eq!(t.tokens[1].entities, vec![bold]);
    }

    #[test]
    fn test_entity_straddling_tokens_attaches_to_both() {
        let italic = Entity::new(6, 3, EntityKind::Italic);
        let msg = Message::new("/cmd aa bb", vec![italic.clone()]);
        let t = tokenize(&msg, "/cmd").unwrap();
        assert_eq!(t.tokens[0].entities, vec![italic.clone()]);
        assert_eq!(t.tokens[1].entities, vec![italic]);
    }

    #[test]
    fn test_token_collects_several_entities_in_message_order() {
        let url = Entity::new(5, 19, EntityKind::Url);
        let bold = Entity::new(5, 4, EntityKind::Bold);
        let msg = Message::new("/get https://example.org", vec![url.clone(), bold.clone()]);
        let t = tokenize(&msg, "/get").unwrap();
        assert_eq!(t.tokens.len(), 1);
        assert_eq!(t.tokens[0].entities, vec![url, bold]);
    }

    #[test]
    fn test_command_entity_does_not_attach_to_first_token() {
        let cmd = Entity::bot_command(0, 4);
        let msg = Message::new("/ban 123", vec![cmd]);
        let t = tokenize(&msg, "/ban").unwrap();
        assert!(t.tokens[0].entities.is_empty());
    }

    #[test]
    fn test_overlap_is_inclusive_at_both_ends() {
        // entity end (offset + length) touching the token start counts
        assert!(overlaps(5, 7, &Entity::new(3, 2, EntityKind::Code)));
        // zero-length entity inside the token counts
        assert!(overlaps(5, 7, &Entity::new(6, 0, EntityKind::Code)));
        // entity starting right after the token end does not
        assert!(!overlaps(5, 7, &Entity::new(8, 2, EntityKind::Code)));
        // entity covering the token entirely
        assert!(overlaps(5, 7, &Entity::new(0, 20, EntityKind::Code)));
    }

    #[test]
    fn test_offsets_are_utf16_units() {
        // "😀" is two units, so "x" lives at offset 8
        let text = "/say 😀 x";
        let mention = Entity::new(8, 1, EntityKind::Mention);
        let msg = Message::new(text, vec![mention.clone()]);
        let t = tokenize(&msg, "/say").unwrap();
        assert_eq!(values(&t), vec!["😀", "x"]);
        assert_eq!(t.bounds, vec![5, 8, 9]);
        assert_eq!(t.tokens[1].entities, vec![mention]);
    }

    #[test]
    fn test_astral_char_right_after_command_is_kept() {
        let text = "/ban😀x";
        let msg = Message::new(text, vec![Entity::bot_command(0, 4)]);
        let t = tokenize(&msg, "/ban").unwrap();
        assert_eq!(values(&t), vec!["😀x"]);
        assert_eq!(t.bounds, vec![5, 7]);
        assert_eq!(t.tokens[0].end, utf16::len(text) - 1);
    }

    #[test]
    fn test_oversized_entity_does_not_overflow() {
        let huge = Entity::new(usize::MAX, 1, EntityKind::Bold);
        let msg = Message::new("/ban 123", vec![huge]);
        let t = tokenize(&msg, "/ban").unwrap();
        assert!(t.tokens[0].entities.is_empty());
    }

    #[test]
    fn test_lexer_errors_use_message_offsets() {
        let msg = Message::plain("/ban 1 \"open");
        let err = tokenize(&msg, "/ban").unwrap_err();
        assert_eq!(
            err,
            TokenizeError::UnclosedQuote {
                quote: '"',
                offset: 7
            }
        );
    }
}
