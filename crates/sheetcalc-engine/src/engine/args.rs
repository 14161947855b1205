//! Function-call text handling.
//!
//! Splits `NAME(...)` argument lists on top-level commas. Commas nested in
//! parentheses or inside `"..."` literals do not split.

/// If `inner` is the text between a call's opening parenthesis and the final
/// character `)`, check that the opening parenthesis is the one that closes
/// there, i.e. that parentheses in `inner` never dip below depth zero.
pub(crate) fn closes_at_end(inner: &str) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    for ch in inner.chars() {
        match ch {
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    true
}

/// Split an argument list on top-level commas. Pieces are trimmed.
/// An empty or all-whitespace list has no arguments.
pub(crate) fn split_args(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut start = 0;

    for (i, ch) in args.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 0 => {
                pieces.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(args[start..].trim());
    pieces
}

/// The contents of a `"..."` literal, if `arg` is exactly one.
pub(crate) fn string_literal(arg: &str) -> Option<&str> {
    arg.strip_prefix('"')?.strip_suffix('"')
}
