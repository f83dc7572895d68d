// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier checks for names that end up inside Datalog string literals.

use crate::IrError;

/// Checks that `ident` can be emitted verbatim inside a quoted Datalog term.
///
/// Rejects the empty string, `"` and `\` (no escaping is performed), `.`
/// (the access-path separator), and whitespace or control characters.
pub fn validate_identifier(ident: &str) -> Result<(), IrError> {
    let reject = |reason| {
        Err(IrError::InvalidIdentifier {
            ident: ident.to_owned(),
            reason,
        })
    };
    if ident.is_empty() {
        return reject("identifier is empty");
    }
    for c in ident.chars() {
        match c {
            '"' | '\\' => return reject("quotes and backslashes are not escaped"),
            '.' => return reject("`.` separates access path components"),
            c if c.is_whitespace() || c.is_control() => {
                return reject("whitespace and control characters are not allowed");
            }
            _ => {}
        }
    }
    Ok(())
}
