//! Named placeholder substitution
//!
//! Placeholders are `{name}` sequences. Substitution is a single left-to-right
//! pass: inserted text is never scanned again, and brace sequences that do not
//! name a binding (CQL list literals, tuple selectors) are copied verbatim.

pub const VALUE: &str = "value";
pub const MAX_VALUE: &str = "max_value";
pub const EXTENSION: &str = "extension";
pub const ATOMIC: &str = "atomic";
pub const CODESYSTEMS: &str = "codesystems";
pub const ENTITY_TYPE: &str = "entity_type";
pub const DEFINITIONS: &str = "definitions";

/// Render `template`, replacing every bound placeholder
pub fn render(template: &str, bindings: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let bound = after.find('}').and_then(|close| {
            let key = &after[..close];
            bindings
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        match bound {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
