/// Build a `prefix-index-parts` key. Empty parts are skipped; if every part
/// is empty, a literal `"empty"` stands in so the key never ends ambiguous.
pub fn format_key(prefix: &str, index: usize, parts: &[&str]) -> String {
    let kept: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    if kept.is_empty() {
        format!("{prefix}-{index}-empty")
    } else {
        format!("{prefix}-{index}-{}", kept.join("-"))
    }
}

/// Monotonic key generator for one pipeline pass.
///
/// The index is strictly increasing across the whole pass — one instance is
/// shared across every account — so keys stay unique even when the
/// descriptive parts collide. This is what lets residual, wireline, and
/// merged rows share a single keyed list.
#[derive(Debug, Default)]
pub struct KeyGen {
    next: usize,
}

impl KeyGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_key(&mut self, prefix: &str, parts: &[&str]) -> String {
        let index = self.next;
        self.next += 1;
        format_key(prefix, index, parts)
    }

    /// Number of keys issued so far.
    pub fn issued(&self) -> usize {
        self.next
    }
}
