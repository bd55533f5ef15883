//! Reply Parser
//!
//! Splits the model's reply into [`IdeaRecord`]s using the
//! `"<number>. <Title>: <Description>"` convention, one idea per blank-line
//! separated block. Parsing is lossy: malformed blocks are dropped and
//! counted, never reported as errors.

use crate::idea::IdeaRecord;

const BLOCK_SEPARATOR: &str = "\n\n";
const NUMBER_DELIMITER: &str = ". ";
const TITLE_DELIMITER: &str = ": ";

/// The records recovered from a reply, plus how many blocks were discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    pub records: Vec<IdeaRecord>,
    /// Non-empty blocks that did not match the idea convention.
    pub dropped: usize,
}

/// Parses a raw reply into idea records, in encounter order.
pub fn parse_ideas_reply(reply: &str) -> Vec<IdeaRecord> {
    parse_ideas_reply_detailed(reply).records
}

/// Like [`parse_ideas_reply`], but also reports the number of dropped blocks.
pub fn parse_ideas_reply_detailed(reply: &str) -> ParsedReply {
    let mut parsed = ParsedReply::default();

    for block in reply.trim().split(BLOCK_SEPARATOR) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }

        match parse_block(block) {
            Some(record) => parsed.records.push(record),
            None => {
                tracing::debug!(block = %block, "Dropping malformed idea block");
                parsed.dropped += 1;
            }
        }
    }

    parsed
}

/// Parses one trimmed candidate block.
fn parse_block(block: &str) -> Option<IdeaRecord> {
    let number_end = block.find(NUMBER_DELIMITER)? + NUMBER_DELIMITER.len();
    // Search for the title delimiter only past the number.
    let rest = &block[number_end..];
    let colon = rest.find(TITLE_DELIMITER)?;

    IdeaRecord::new(&rest[..colon], &rest[colon + TITLE_DELIMITER.len()..])
}
