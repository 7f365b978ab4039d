//! Mapping from node ids to host element ids, and delegation of input focus.

const SEPARATOR: char = '_';

/// Builds the host element id for a node.
///
/// The prefix is escaped so it never contains the separator, which keeps the
/// mapping collision-free across prefixes: `element_id("nav", "a")` is `nav_a`.
pub fn element_id(prefix: &str, node_id: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + node_id.len() + 1);
    for ch in prefix.chars() {
        match ch {
            '%' => out.push_str("%25"),
            SEPARATOR => out.push_str("%5F"),
            _ => out.push(ch),
        }
    }
    out.push(SEPARATOR);
    out.push_str(node_id);
    out
}

/// Splits an element id built by [`element_id`] back into `(prefix, node_id)`.
pub fn parse_element_id(element_id: &str) -> Option<(String, &str)> {
    let (escaped, node_id) = element_id.split_once(SEPARATOR)?;
    let prefix = escaped.replace("%5F", "_").replace("%25", "%");
    Some((prefix, node_id))
}

/// Host side of focus handling.
///
/// Returning `false` means the element is not currently rendered; the engine
/// treats that as a routine no-op.
pub trait FocusHost {
    fn focus_element(&mut self, element_id: &str) -> bool;
}

impl<F> FocusHost for F
where
    F: FnMut(&str) -> bool,
{
    #[inline]
    fn focus_element(&mut self, element_id: &str) -> bool {
        self(element_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ids_are_prefixed() {
        assert_eq!(element_id("explorer", "button-1"), "explorer_button-1");
        assert_eq!(element_id("", "a"), "_a");
    }

    #[test]
    fn prefixes_with_separator_do_not_collide() {
        let left = element_id("a_b", "c");
        let right = element_id("a", "b_c");

        assert_ne!(left, right);
        assert_eq!(parse_element_id(&left), Some(("a_b".to_string(), "c")));
        assert_eq!(parse_element_id(&right), Some(("a".to_string(), "b_c")));
    }

    #[test]
    fn escapes_survive_parsing() {
        let id = element_id("50%_off", "x");

        assert_eq!(parse_element_id(&id), Some(("50%_off".to_string(), "x")));
    }
}
