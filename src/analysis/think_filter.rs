//! @ai:module:intent Drop a model's reasoning preamble and forward only the markdown report
//! @ai:module:layer domain
//! @ai:module:public_api ThinkFilter, FilterState
//! @ai:module:stateless false

/// @ai:intent Forwarding state of the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// No heading seen yet; fragments are held back
    Buffering,
    /// Report has started; fragments pass through unchanged
    Streaming,
}

/// @ai:intent Two-state filter over incremental text fragments
/// @ai:invariant once Streaming, the state never returns to Buffering
#[derive(Debug)]
pub struct ThinkFilter {
    state: FilterState,
    buffer: String,
}

impl ThinkFilter {
    /// @ai:intent Create a filter in the Buffering state with an empty buffer
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            state: FilterState::Buffering,
            buffer: String::new(),
        }
    }

    /// @ai:intent Current state
    /// @ai:effects pure
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// @ai:intent Feed one fragment, returning the text to forward now (if any)
    /// @ai:effects state:write
    pub fn push(&mut self, fragment: &str) -> Option<String> {
        if fragment.is_empty() {
            return None;
        }

        match self.state {
            FilterState::Streaming => Some(fragment.to_string()),
            FilterState::Buffering => {
                let scan_from = rescan_offset(&self.buffer);
                self.buffer.push_str(fragment);

                let start = report_start(&self.buffer, scan_from)?;
                let report = self.buffer.split_off(start);
                self.buffer.clear();
                self.state = FilterState::Streaming;

                Some(report)
            }
        }
    }

    /// @ai:intent Flush held-back text at end of stream so nothing is dropped
    /// @ai:post returns None once Streaming or when nothing was buffered
    /// @ai:effects state:write
    pub fn finish(&mut self) -> Option<String> {
        if self.state == FilterState::Buffering && !self.buffer.is_empty() {
            Some(std::mem::take(&mut self.buffer))
        } else {
            None
        }
    }
}

impl Default for ThinkFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Where to resume scanning so a newline at the old tail still pairs with a new '#'
/// @ai:effects pure
fn rescan_offset(buffer: &str) -> usize {
    let tail = buffer.len().saturating_sub(1);
    if buffer.is_char_boundary(tail) {
        tail
    } else {
        buffer.len()
    }
}

/// @ai:intent Byte offset of the first markdown heading: buffer start, or right after a newline
/// @ai:effects pure
fn report_start(buffer: &str, scan_from: usize) -> Option<usize> {
    if buffer.starts_with('#') {
        return Some(0);
    }

    buffer[scan_from..].find("\n#").map(|i| scan_from + i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(fragments: &[&str]) -> (Vec<String>, ThinkFilter) {
        let mut filter = ThinkFilter::new();
        let events = fragments.iter().filter_map(|f| filter.push(f)).collect();
        (events, filter)
    }

    #[test]
    fn test_reasoning_before_heading_is_discarded() {
        let (events, mut filter) = run(&["some reasoning ", "more reasoning\n# Report\n", "Body text"]);

        assert_eq!(events, vec!["# Report\n".to_string(), "Body text".to_string()]);
        assert_eq!(events.concat(), "# Report\nBody text");
        assert_eq!(filter.state(), FilterState::Streaming);
        assert!(filter.finish().is_none());
    }

    #[test]
    fn test_no_heading_flushes_everything_at_finish() {
        let (events, mut filter) = run(&["just reasoning", " more reasoning"]);

        assert!(events.is_empty());
        assert_eq!(filter.state(), FilterState::Buffering);
        assert_eq!(filter.finish().as_deref(), Some("just reasoning more reasoning"));
        assert!(filter.finish().is_none());
    }

    #[test]
    fn test_heading_at_very_start_forwards_immediately() {
        let (events, _) = run(&["# Title", "\nbody"]);
        assert_eq!(events, vec!["# Title".to_string(), "\nbody".to_string()]);
    }

    #[test]
    fn test_newline_and_hash_split_across_fragments() {
        let (events, _) = run(&["thinking...\n", "## Overview", " text"]);
        assert_eq!(events, vec!["## Overview".to_string(), " text".to_string()]);
    }

    #[test]
    fn test_earliest_heading_wins() {
        let (events, _) = run(&["plan\n# A\nstuff\n# B"]);
        assert_eq!(events, vec!["# A\nstuff\n# B".to_string()]);
    }

    #[test]
    fn test_hash_mid_line_is_not_a_heading() {
        let (events, mut filter) = run(&["issue #42 is ", "relevant"]);
        assert!(events.is_empty());
        assert_eq!(filter.finish().as_deref(), Some("issue #42 is relevant"));
    }

    #[test]
    fn test_streaming_state_is_sticky() {
        let (events, filter) = run(&["# Report\n", "plain", "\n# Another"]);
        assert_eq!(filter.state(), FilterState::Streaming);
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], "plain");
    }

    #[test]
    fn test_multibyte_tail_before_heading() {
        let (events, _) = run(&["분석 중입니다", "\n# 보고서"]);
        assert_eq!(events, vec!["# 보고서".to_string()]);
    }

    #[test]
    fn test_empty_fragments_are_ignored() {
        let (events, mut filter) = run(&["", ""]);
        assert!(events.is_empty());
        assert!(filter.finish().is_none());
    }
}
