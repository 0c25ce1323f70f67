//! Turning a validated line into a host command call.
//!
//! Wire format: `IDENT` or `IDENT=VALUE`.
//!
//! | line          | action           |
//! |---------------|------------------|
//! | `FLAP_UP`     | [`ActionKind::Once`]  |
//! | `FLAP_UP=1…`  | [`ActionKind::Begin`] |
//! | `FLAP_UP=0…`  | [`ActionKind::End`]   |
//! | `FLAP_UP=2`   | dropped          |
//!
//! Only the first character of `VALUE` matters. Nothing is trimmed.
//! Unmapped identifiers and unknown values are dropped without a diagnostic.

use crate::action::{ActionHandle, ActionHost, ActionKind};
use crate::mapping::Mapping;

/// A line split into identifier and optional value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub input: &'a str,
    pub value: Option<&'a str>,
}

/// Split at `=`, the way a tokenizer on `=` would.
///
/// The identifier runs up to the first `=`. The value is the next non-empty
/// `=`-delimited token, so `A=` is a bare `A` and `A==1` carries `1`.
/// Returns `None` for an empty line or one that does not start with a letter.
pub fn parse_line(line: &str) -> Option<ParsedLine<'_>> {
    if !line.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut tokens = line.split('=').filter(|t| !t.is_empty());
    let input = tokens.next()?;
    let value = tokens.next();
    Some(ParsedLine { input, value })
}

/// Kind of call a value asks for, or `None` if the encoding is unknown.
pub fn action_kind(value: Option<&str>) -> Option<ActionKind> {
    let Some(value) = value else {
        return Some(ActionKind::Once);
    };
    match value.as_bytes().first() {
        Some(b'0') => Some(ActionKind::End),
        Some(b'1') => Some(ActionKind::Begin),
        _ => None,
    }
}

/// A resolved call, ready for the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub handle: ActionHandle,
}

/// Why a line did not produce a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dropped {
    /// Not an input line at all.
    Malformed,
    /// Value starts with something other than `0` or `1`.
    UnknownValue,
    /// Identifier not in this device's mapping.
    Unmapped,
}

/// Build the request for `line` against `mapping`.
pub fn request(line: &str, mapping: &Mapping) -> Result<ActionRequest, Dropped> {
    let parsed = parse_line(line).ok_or(Dropped::Malformed)?;
    let kind = action_kind(parsed.value).ok_or(Dropped::UnknownValue)?;
    let handle = mapping.lookup(parsed.input).ok_or(Dropped::Unmapped)?;
    Ok(ActionRequest { kind, handle })
}

/// Parse, resolve and invoke. Returns the call made, if any.
pub fn dispatch<H>(line: &str, mapping: &Mapping, host: &mut H) -> Result<ActionRequest, Dropped>
where
    H: ActionHost + ?Sized,
{
    let req = request(line, mapping)?;
    host.invoke(req.kind, req.handle);
    Ok(req)
}
