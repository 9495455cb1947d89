//! Purpose: Rewrite the upstream single-quoted object text into strict JSON text.
//! Exports: `normalize`.
//! Role: First pipeline stage; pure textual repair, paired with strict parsing downstream.
//! Invariants: Substitutions run in a fixed order; transition rules fire before separator rules.
//! Invariants: Text that is already strict JSON passes through byte-identical.
//! Notes: Heuristic by construction. Values containing `', '` or `': '` sequences
//! can be corrupted; the strict parse stage is what detects that, not this one.

/// Ordered substitution table. The upstream service emits a stringified
/// mapping with single quotes wherever JSON wants double quotes, so each
/// rule rewrites one structural pattern. Mixed-quote variants exist because
/// a rule that already ran may have produced a double quote on one side.
const RULES: &[(&str, &str)] = &[
    // structural braces
    ("{'", "{\""),
    ("'}", "\"}"),
    // value terminator -> next key opener; must precede the separator
    // rules so `', '` is never half-translated by them
    ("', '", "\", \""),
    ("\", '", "\", \""),
    ("', \"", "\", \""),
    // key/value separators
    ("': '", "\": \""),
    ("\": '", "\": \""),
    ("': \"", "\": \""),
];

/// Best-effort repair of the quasi-JSON dialect. Never fails; garbage in
/// stays garbage out and is caught by the parse stage.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.to_string();
    for (pattern, replacement) in RULES {
        if text.contains(pattern) {
            text = text.replace(pattern, replacement);
        }
    }
    text
}
