use crate::stream_parser::{
    errors::{ParserError, ParserResult},
    helpers::floor_char_boundary,
    tag_matcher::{self, TagMatch},
    types::{OpenTagState, ParsedTag, ParserConfig, StreamEvent},
};

/// Incremental tokenizer over a chunked character stream.
///
/// Two states: IDLE (outside any tag) and IN_TAG (an open tag's end has
/// not arrived), plus a pending run of plain text. `parse_chunk` never
/// blocks and never errors on malformed input; content is emitted as
/// soon as it is unambiguously safe, so long tag bodies render live.
///
/// Not thread-safe; one instance serves exactly one in-flight stream.
#[derive(Debug, Clone)]
pub struct StreamTokenizer {
    config: ParserConfig,
    /// Unconsumed tail of all chunks fed so far
    buffer: String,
    /// Plain text pending emission
    text_run: String,
    /// The single open tag, if any (tags do not nest)
    open_tag: Option<OpenTagState>,
    /// Whether any non-whitespace content has been seen; leading
    /// whitespace before that is not a markdown preamble
    started: bool,
}

impl StreamTokenizer {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            buffer: String::new(),
            text_run: String::new(),
            open_tag: None,
            started: false,
        }
    }

    /// Whether the tokenizer is currently inside an open tag.
    pub fn is_in_tag(&self) -> bool {
        self.open_tag.is_some()
    }

    /// Feed one chunk, returning the events it unlocks (possibly none).
    ///
    /// An empty chunk is a no-op. The only error is `BufferOverflow`;
    /// malformed input degrades per the recovery rules instead of failing.
    pub fn parse_chunk(&mut self, chunk: &str) -> ParserResult<Vec<StreamEvent>> {
        if chunk.is_empty() {
            return Ok(Vec::new());
        }
        let pending = self.buffer.len() + self.text_run.len() + chunk.len();
        if pending > self.config.max_buffer_size {
            return Err(ParserError::BufferOverflow(pending));
        }

        self.buffer.push_str(chunk);
        let mut events = Vec::new();
        loop {
            let progressed = if self.open_tag.is_some() {
                self.advance_in_tag(&mut events)
            } else {
                self.advance_idle(&mut events)
            };
            if !progressed {
                break;
            }
        }
        Ok(events)
    }

    /// Flush whatever remains and reset to the initial state.
    ///
    /// Pending text becomes a final `Text` event; an unterminated tag is
    /// dumped verbatim (header plus the content never emitted as deltas)
    /// as `RawTail` — nothing the model produced is lost. The instance
    /// is reusable afterwards.
    pub fn finalize(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        self.flush_text_boundary(&mut events);

        let tail = match self.open_tag.take() {
            Some(open) => {
                let mut raw = open.raw_header;
                raw.push_str(&self.buffer[open.emitted..]);
                raw
            }
            None => std::mem::take(&mut self.buffer),
        };
        if !tail.trim().is_empty() {
            events.push(StreamEvent::RawTail { content: tail });
        }

        self.buffer.clear();
        self.text_run.clear();
        self.started = false;
        events
    }

    /// One IDLE step; returns whether progress was made.
    fn advance_idle(&mut self, events: &mut Vec<StreamEvent>) -> bool {
        match tag_matcher::match_buffer(&self.buffer) {
            TagMatch::NoTag => {
                if !self.buffer.is_empty() {
                    let text = std::mem::take(&mut self.buffer);
                    self.text_run.push_str(&text);
                }
                self.flush_text_eager(events);
                false
            }
            TagMatch::TextPrefix { len } => {
                self.text_run.push_str(&self.buffer[..len]);
                self.buffer = self.buffer.split_off(len);
                true
            }
            TagMatch::StrayClose { consumed } => {
                tracing::debug!(
                    fragment = &self.buffer[..consumed],
                    "discarding stray closing tag"
                );
                self.buffer = self.buffer.split_off(consumed);
                true
            }
            TagMatch::SelfClosing { tag, consumed } | TagMatch::Complete { tag, consumed } => {
                self.flush_text_boundary(events);
                self.started = true;
                self.buffer = self.buffer.split_off(consumed);
                events.push(StreamEvent::TagClose { tag });
                true
            }
            TagMatch::Open {
                name,
                attributes,
                raw_header,
                header_len,
                close_re,
            } => {
                self.flush_text_boundary(events);
                self.started = true;
                self.buffer = self.buffer.split_off(header_len);
                events.push(StreamEvent::TagOpen {
                    name: name.clone(),
                    attributes: attributes.clone(),
                });
                // the margin guards a closing marker split across chunks,
                // so derive it from this tag's actual marker length
                let safety_margin = self.config.tag_safety_margin.max(name.len() + 2);
                self.open_tag = Some(OpenTagState {
                    name,
                    attributes,
                    raw_header,
                    close_re,
                    emitted: 0,
                    safety_margin,
                });
                true
            }
            TagMatch::Pending => {
                self.flush_text_eager(events);
                false
            }
        }
    }

    /// One IN_TAG step; returns whether progress was made.
    fn advance_in_tag(&mut self, events: &mut Vec<StreamEvent>) -> bool {
        let close = match &self.open_tag {
            Some(open) => open.close_re.find(&self.buffer).map(|m| (m.start(), m.end())),
            None => return false,
        };

        match close {
            Some((content_end, consumed)) => {
                if let Some(open) = self.open_tag.take() {
                    if content_end > open.emitted {
                        events.push(StreamEvent::TagContent {
                            name: open.name.clone(),
                            delta: self.buffer[open.emitted..content_end].to_string(),
                        });
                    }
                    let content = self.buffer[..content_end].to_string();
                    self.buffer = self.buffer.split_off(consumed);
                    events.push(StreamEvent::TagClose {
                        tag: ParsedTag {
                            name: open.name,
                            attributes: open.attributes,
                            content,
                        },
                    });
                }
                true
            }
            None => {
                if let Some(open) = self.open_tag.as_mut() {
                    let safe = floor_char_boundary(
                        &self.buffer,
                        self.buffer.len().saturating_sub(open.safety_margin),
                    );
                    if safe > open.emitted {
                        events.push(StreamEvent::TagContent {
                            name: open.name.clone(),
                            delta: self.buffer[open.emitted..safe].to_string(),
                        });
                        open.emitted = safe;
                    }
                }
                false
            }
        }
    }

    /// Flush the pending text run at an exact tag boundary: trim fully,
    /// skip if nothing remains.
    fn flush_text_boundary(&mut self, events: &mut Vec<StreamEvent>) {
        if self.text_run.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text_run);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.started = true;
        events.push(StreamEvent::Text {
            content: trimmed.to_string(),
        });
    }

    /// Eagerly flush a long pending text run, holding back the tail in
    /// case a tag start is split across chunk boundaries.
    fn flush_text_eager(&mut self, events: &mut Vec<StreamEvent>) {
        if !self.started {
            let lead = self.text_run.len() - self.text_run.trim_start().len();
            if lead > 0 {
                self.text_run = self.text_run.split_off(lead);
            }
        }
        if self.text_run.len() <= self.config.text_flush_threshold {
            return;
        }
        let keep_from = floor_char_boundary(
            &self.text_run,
            self.text_run.len().saturating_sub(self.config.text_hold_back),
        );
        if keep_from == 0 {
            return;
        }
        let tail = self.text_run.split_off(keep_from);
        let flushed = std::mem::replace(&mut self.text_run, tail);
        self.started = true;
        events.push(StreamEvent::Text { content: flushed });
    }
}

impl Default for StreamTokenizer {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}
