//! Interface name templates
//!
//! `Ethernet[1-4]/1` stands for `Ethernet1/1` .. `Ethernet4/1`. Several ranges
//! multiply out, the leftmost range varying slowest.

use once_cell::sync::Lazy;
use regex::Regex;

// Upper bound on the names one template may produce.
const MAX_EXPANSION: u64 = 10_000;

static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([0-9]+)-([0-9]+)\]").expect("valid range regex"));

pub fn has_ranges(template: &str) -> bool {
    RANGE_RE.is_match(template)
}

/// Expand every `[start-end]` range in `template`. A template without ranges
/// expands to itself.
pub fn expand_name_template(template: &str) -> Result<Vec<String>, String> {
    let mut names = vec![String::new()];
    let mut last_end = 0;

    for caps in RANGE_RE.captures_iter(template) {
        let (Some(whole), Some(start), Some(end)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let literal = &template[last_end..whole.start()];
        last_end = whole.end();

        let start: u64 = start
            .as_str()
            .parse()
            .map_err(|_| format!("range start too large in '{template}'"))?;
        let end: u64 =
            end.as_str().parse().map_err(|_| format!("range end too large in '{template}'"))?;
        if start > end {
            return Err(format!("descending range [{start}-{end}] in '{template}'"));
        }

        let width = (end - start).saturating_add(1);
        let total = (names.len() as u64).saturating_mul(width);
        if total > MAX_EXPANSION {
            return Err(format!("'{template}' expands to more than {MAX_EXPANSION} names"));
        }

        let mut next = Vec::with_capacity(total as usize);
        for prefix in &names {
            for value in start..=end {
                next.push(format!("{prefix}{literal}{value}"));
            }
        }
        names = next;
    }

    let tail = &template[last_end..];
    for name in &mut names {
        name.push_str(tail);
    }
    Ok(names)
}
