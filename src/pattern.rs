//! Pattern parsing.
//!
//! A pattern is cut into a static prefix followed by pieces. A catch-all sits
//! on the node its `/` ends at, next to where a parameter of the same segment
//! would sit: `/src/*filepath` parses into the prefix `/src/` and the
//! catch-all `*filepath`.

use crate::error::InsertError;
use crate::node::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Static(&'a [u8]),
    // sigil included
    Wild(NodeKind, &'a [u8]),
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Parsed<'a> {
    pub(crate) prefix: &'a [u8],
    pub(crate) pieces: Vec<Piece<'a>>,
}

fn is_sigil(c: u8) -> bool {
    c == b':' || c == b'*'
}

pub(crate) fn parse(pattern: &str) -> Result<Parsed<'_>, InsertError> {
    let path = pattern.as_bytes();
    let mut prefix: Option<&[u8]> = None;
    let mut pieces = Vec::new();
    let mut start = 0;

    while let Some(offset) = path[start..].iter().position(|&c| is_sigil(c)) {
        let sigil = start + offset;
        let end = path[sigil..]
            .iter()
            .position(|&c| c == b'/')
            .map_or(path.len(), |i| sigil + i);
        let wildcard = &path[sigil..end];
        let name = &wildcard[1..];

        if name.is_empty() {
            return Err(InsertError::EmptyWildcardName {
                pattern: pattern.to_owned(),
            });
        }
        if name.iter().any(|&c| is_sigil(c)) {
            return Err(InsertError::MultipleWildcards {
                pattern: pattern.to_owned(),
                segment: String::from_utf8_lossy(wildcard).into_owned(),
            });
        }

        let run = &path[start..sigil];
        let kind = if path[sigil] == b'*' {
            if end != path.len() {
                return Err(InsertError::CatchAllNotTrailing {
                    pattern: pattern.to_owned(),
                });
            }
            if run.last() != Some(&b'/') {
                return Err(InsertError::CatchAllMissingSlash {
                    pattern: pattern.to_owned(),
                });
            }
            NodeKind::CatchAll
        } else {
            NodeKind::Parameter
        };

        if prefix.is_none() {
            prefix = Some(run);
        } else if !run.is_empty() {
            pieces.push(Piece::Static(run));
        }
        pieces.push(Piece::Wild(kind, wildcard));
        start = end;
    }

    let tail = &path[start..];
    match prefix {
        None => prefix = Some(tail),
        Some(_) if !tail.is_empty() => pieces.push(Piece::Static(tail)),
        Some(_) => {}
    }

    Ok(Parsed {
        prefix: prefix.unwrap_or_default(),
        pieces,
    })
}
