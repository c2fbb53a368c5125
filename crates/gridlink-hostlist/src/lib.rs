//! gridlink-hostlist — compressed hostlist expressions.
//!
//! Batch schedulers report the nodes of a job as a compact range
//! expression (`node[1-4,7],login1`) rather than an explicit list.
//! This crate expands such expressions into individual host names and
//! folds name lists back into range form.
//!
//! Zero padding is preserved: `node[08-10]` expands to `node08`,
//! `node09`, `node10`, and those names compress back to the same
//! expression.

pub mod error;

pub use error::{HostlistError, HostlistResult};

/// Expand a hostlist expression into individual host names.
///
/// Each comma-separated element is either a plain name or a
/// `prefix[ranges]suffix` expression where `ranges` is a comma-separated
/// list of numbers or `start-end` spans. An empty input expands to an
/// empty list.
pub fn expand(expr: &str) -> HostlistResult<Vec<String>> {
    let mut hosts = Vec::new();
    for element in split_elements(expr)? {
        if element.is_empty() {
            continue;
        }
        expand_element(&element, &mut hosts)?;
    }
    Ok(hosts)
}

/// Compress host names into a hostlist expression.
///
/// Names sharing a prefix and a numeric tail are folded into ranges;
/// names without a numeric tail pass through verbatim. The output is
/// deterministic: groups are ordered by prefix, numbers ascending.
pub fn compress<S: AsRef<str>>(names: &[S]) -> String {
    use std::collections::BTreeMap;

    // Group key: (prefix, digit-string width). Grouping by width keeps
    // zero padding exact: n08, n09, n10 all carry width 2 and render
    // padded, while n1 and n01 stay apart.
    let mut groups: BTreeMap<(String, usize), Vec<u64>> = BTreeMap::new();
    let mut plain: Vec<String> = Vec::new();

    for name in names {
        let name = name.as_ref();
        match split_numeric_tail(name) {
            Some((prefix, digits)) => {
                let value: u64 = digits.parse().unwrap_or_default();
                groups
                    .entry((prefix.to_string(), digits.len()))
                    .or_default()
                    .push(value);
            }
            None => plain.push(name.to_string()),
        }
    }

    let mut parts: Vec<String> = Vec::new();
    for ((prefix, width), mut values) in groups {
        values.sort_unstable();
        values.dedup();
        parts.push(render_group(&prefix, width, &values));
    }
    plain.sort_unstable();
    parts.extend(plain);
    parts.join(",")
}

/// Split a hostlist expression at top-level commas. Commas inside a
/// bracket pair belong to the range list and do not split.
fn split_elements(expr: &str) -> HostlistResult<Vec<String>> {
    let mut elements = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in expr.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                if depth == 0 {
                    return Err(HostlistError::UnbalancedBrackets(expr.to_string()));
                }
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                elements.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if depth != 0 {
        return Err(HostlistError::UnbalancedBrackets(expr.to_string()));
    }
    elements.push(current);
    Ok(elements)
}

/// Expand a single `prefix[ranges]suffix` element (or plain name) into `out`.
fn expand_element(element: &str, out: &mut Vec<String>) -> HostlistResult<()> {
    let Some(open) = element.find('[') else {
        out.push(element.to_string());
        return Ok(());
    };
    let Some(close) = element.rfind(']') else {
        return Err(HostlistError::UnbalancedBrackets(element.to_string()));
    };
    let prefix = &element[..open];
    let body = &element[open + 1..close];
    let suffix = &element[close + 1..];

    if body.is_empty() {
        return Err(HostlistError::EmptyRange(element.to_string()));
    }

    for span in body.split(',') {
        let (start_str, end_str) = match span.split_once('-') {
            Some((s, e)) => (s, e),
            None => (span, span),
        };
        if start_str.is_empty() || end_str.is_empty() {
            return Err(HostlistError::EmptyRange(element.to_string()));
        }
        let start: u64 = start_str
            .parse()
            .map_err(|_| HostlistError::InvalidBound(start_str.to_string()))?;
        let end: u64 = end_str
            .parse()
            .map_err(|_| HostlistError::InvalidBound(end_str.to_string()))?;
        if start > end {
            return Err(HostlistError::ReversedRange { start, end });
        }
        let width = if start_str.starts_with('0') && start_str.len() > 1 {
            start_str.len()
        } else {
            0
        };
        for value in start..=end {
            out.push(format!("{prefix}{:0width$}{suffix}", value, width = width));
        }
    }
    Ok(())
}

/// Split a name into (prefix, numeric tail). `None` when the name does
/// not end in a digit.
fn split_numeric_tail(name: &str) -> Option<(&str, &str)> {
    let tail_len = name.chars().rev().take_while(|c| c.is_ascii_digit()).count();
    if tail_len == 0 {
        return None;
    }
    let split = name.len() - tail_len;
    Some((&name[..split], &name[split..]))
}

/// Render one (prefix, width) group of sorted, deduplicated numbers.
fn render_group(prefix: &str, width: usize, values: &[u64]) -> String {
    let mut spans: Vec<String> = Vec::new();
    let mut i = 0;
    while i < values.len() {
        let start = values[i];
        let mut end = start;
        while i + 1 < values.len() && values[i + 1] == end + 1 {
            end = values[i + 1];
            i += 1;
        }
        if start == end {
            spans.push(format!("{:0width$}", start, width = width));
        } else {
            spans.push(format!(
                "{:0width$}-{:0width$}",
                start,
                end,
                width = width
            ));
        }
        i += 1;
    }

    if spans.len() == 1 && !spans[0].contains('-') {
        format!("{prefix}{}", spans[0])
    } else {
        format!("{prefix}[{}]", spans.join(","))
    }
}
