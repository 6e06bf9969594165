//!
//! The generic engine behind every master (container) element.
//!
//! A [`MasterParser`] is configured with a dispatch table mapping child IDs
//! to slots.  It repeatedly decodes a child header, routes the body to the
//! matching slot (or to the unknown/Void handlers), and stitches completed
//! child values into its aggregate.  The same engine drives pure containers
//! (`MasterParser<()>`) and value-producing masters alike.
//!
//! Masters are the only elements that may carry an unknown size.  An
//! unknown-size master ends when it decodes a header that is not one of its
//! children, when it exhausts the bytes its parent can supply, or when the
//! stream ends.  A foreign header read that way is cached so the parent can
//! dispatch it without reading it twice.
//!

use log::debug;

use crate::callback::{Action, Callback, SkipCallback};
use crate::element::{Element, ElementMetadata, UNKNOWN_ELEMENT_POSITION, UNKNOWN_HEADER_SIZE};
use crate::element::UNKNOWN_ELEMENT_SIZE;
use crate::errors::{ParseError, ParseResult};
use crate::ids::Id;
use crate::parser::{ElementParser, FeedStatus, ValueParser};
use crate::reader::Reader;
use crate::skip_parser::{SkipParser, UnknownParser, VoidParser};
use crate::vint::{IdParser, SizeParser};
use crate::webm_parser::Ancestory;

type BeginFn<T> = fn(&mut dyn Callback, &ElementMetadata, &T) -> ParseResult<Action>;
type EndFn<T> = fn(&mut dyn Callback, &ElementMetadata, &T) -> ParseResult<()>;

///
/// One slot in a master's dispatch table.  Object-safe so heterogeneous
/// children can share the table.
///
trait MasterChild<T> {
    /// Writes the slot's schema default into the aggregate.
    fn prime(&self, value: &mut T);

    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()>;

    fn init_after_seek(&mut self, ancestory: Ancestory, child_metadata: ElementMetadata);

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus>;

    /// Moves the completed child value into the aggregate.
    fn finish(
        &mut self,
        callback: &mut dyn Callback,
        metadata: &ElementMetadata,
        value: &mut T,
    ) -> ParseResult<()>;

    fn cached_metadata(&self) -> Option<ElementMetadata>;
}

/// A child stored into a single [`Element`] field, last occurrence winning.
struct FieldSlot<T, P: ValueParser> {
    parser: P,
    accessor: fn(&mut T) -> &mut Element<P::Value>,
}

impl<T, P: ValueParser> MasterChild<T> for FieldSlot<T, P> {
    fn prime(&self, value: &mut T) {
        *(self.accessor)(value) = Element::absent(self.parser.default_value());
    }

    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        self.parser.init(metadata, max_size)
    }

    fn init_after_seek(&mut self, ancestory: Ancestory, child_metadata: ElementMetadata) {
        self.parser.init_after_seek(ancestory, child_metadata);
    }

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        self.parser.feed(callback, reader, bytes_read)
    }

    fn finish(
        &mut self,
        _callback: &mut dyn Callback,
        _metadata: &ElementMetadata,
        value: &mut T,
    ) -> ParseResult<()> {
        *(self.accessor)(value) = Element::present(self.parser.take_value());
        Ok(())
    }

    fn cached_metadata(&self) -> Option<ElementMetadata> {
        self.parser.cached_metadata()
    }
}

/// A child accumulated into a vector, one entry per occurrence.
struct VecSlot<T, P: ValueParser> {
    parser: P,
    accessor: fn(&mut T) -> &mut Vec<Element<P::Value>>,
}

impl<T, P: ValueParser> MasterChild<T> for VecSlot<T, P> {
    fn prime(&self, _value: &mut T) {}

    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        self.parser.init(metadata, max_size)
    }

    fn init_after_seek(&mut self, ancestory: Ancestory, child_metadata: ElementMetadata) {
        self.parser.init_after_seek(ancestory, child_metadata);
    }

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        self.parser.feed(callback, reader, bytes_read)
    }

    fn finish(
        &mut self,
        _callback: &mut dyn Callback,
        _metadata: &ElementMetadata,
        value: &mut T,
    ) -> ParseResult<()> {
        (self.accessor)(value).push(Element::present(self.parser.take_value()));
        Ok(())
    }

    fn cached_metadata(&self) -> Option<ElementMetadata> {
        self.parser.cached_metadata()
    }
}

/// A child that is parsed for its side effects (its own callbacks) and
/// stores nothing in the aggregate.
struct NodeSlot<P> {
    parser: P,
}

impl<T, P: ElementParser> MasterChild<T> for NodeSlot<P> {
    fn prime(&self, _value: &mut T) {}

    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        self.parser.init(metadata, max_size)
    }

    fn init_after_seek(&mut self, ancestory: Ancestory, child_metadata: ElementMetadata) {
        self.parser.init_after_seek(ancestory, child_metadata);
    }

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        self.parser.feed(callback, reader, bytes_read)
    }

    fn finish(
        &mut self,
        _callback: &mut dyn Callback,
        _metadata: &ElementMetadata,
        _value: &mut T,
    ) -> ParseResult<()> {
        Ok(())
    }

    fn cached_metadata(&self) -> Option<ElementMetadata> {
        self.parser.cached_metadata()
    }
}

struct ChildEntry<T> {
    id: Id,
    slot: Box<dyn MasterChild<T>>,
    /// Dispatching this child fires the deferred begin hook, if any.
    starts_parent: bool,
}

struct BeginHook<T> {
    hook: BeginFn<T>,
    /// Deferred hooks fire when a flagged child is first dispatched (or at
    /// completion if none appears) instead of before the first child.
    deferred: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Begin,
    ReadingChildId,
    ReadingChildSize,
    Dispatching,
    FeedingChild,
    FinishingChild,
    SkippingSelf,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveChild {
    None,
    Entry(usize),
    Unknown,
    Void,
    Skipped,
}

///
/// The engine.  `T` is the aggregate the master produces; pure containers
/// use `MasterParser<()>`.
///
pub struct MasterParser<T: Default> {
    children: Vec<ChildEntry<T>>,
    begin_hook: Option<BeginHook<T>>,
    end_hook: Option<EndFn<T>>,

    metadata: ElementMetadata,
    /// Body bytes this master may consume: its declared size, or the
    /// parent's remaining bytes when the size is unknown.
    bound: u64,
    total_read: u64,
    state: State,
    value: T,

    id_parser: IdParser,
    id_in_progress: bool,
    size_parser: SizeParser,
    child_metadata: ElementMetadata,
    active: ActiveChild,
    pending_metadata: Option<ElementMetadata>,
    cached: Option<ElementMetadata>,

    begin_fired: bool,
    begin_skipped: bool,
    suppress: bool,
    child_suppressed: bool,
    skip_callback: SkipCallback,

    unknown_parser: UnknownParser,
    void_parser: VoidParser,
    skip_parser: SkipParser,
}

impl<T: Default> Default for MasterParser<T> {
    fn default() -> Self {
        MasterParser::new()
    }
}

impl<T: Default> MasterParser<T> {
    pub fn new() -> Self {
        MasterParser {
            children: Vec::new(),
            begin_hook: None,
            end_hook: None,
            metadata: ElementMetadata::default(),
            bound: 0,
            total_read: 0,
            state: State::Done,
            value: T::default(),
            id_parser: IdParser::default(),
            id_in_progress: false,
            size_parser: SizeParser::default(),
            child_metadata: ElementMetadata::default(),
            active: ActiveChild::None,
            pending_metadata: None,
            cached: None,
            begin_fired: false,
            begin_skipped: false,
            suppress: false,
            child_suppressed: false,
            skip_callback: SkipCallback,
            unknown_parser: UnknownParser::default(),
            void_parser: VoidParser::default(),
            skip_parser: SkipParser::default(),
        }
    }

    /// Fires before any child is parsed.  [`Action::Skip`] discards the
    /// whole body without further events.
    pub fn with_begin(mut self, hook: BeginFn<T>) -> Self {
        self.begin_hook = Some(BeginHook {
            hook,
            deferred: false,
        });
        self
    }

    /// Fires when the first child marked by [`starts_begin`] is dispatched,
    /// with the aggregate as parsed so far.  If no such child appears the
    /// hook fires at completion, just before the end hook.
    ///
    /// [`starts_begin`]: MasterParser::starts_begin
    pub fn with_deferred_begin(mut self, hook: BeginFn<T>) -> Self {
        self.begin_hook = Some(BeginHook {
            hook,
            deferred: true,
        });
        self
    }

    /// Fires once the master completes, with the finished aggregate.
    pub fn with_end(mut self, hook: EndFn<T>) -> Self {
        self.end_hook = Some(hook);
        self
    }

    pub fn field<P>(
        mut self,
        id: Id,
        parser: P,
        accessor: fn(&mut T) -> &mut Element<P::Value>,
    ) -> Self
    where
        P: ValueParser + 'static,
        T: 'static,
    {
        self.children.push(ChildEntry {
            id,
            slot: Box::new(FieldSlot { parser, accessor }),
            starts_parent: false,
        });
        self
    }

    pub fn repeated<P>(
        mut self,
        id: Id,
        parser: P,
        accessor: fn(&mut T) -> &mut Vec<Element<P::Value>>,
    ) -> Self
    where
        P: ValueParser + 'static,
        T: 'static,
    {
        self.children.push(ChildEntry {
            id,
            slot: Box::new(VecSlot { parser, accessor }),
            starts_parent: false,
        });
        self
    }

    pub fn node<P>(mut self, id: Id, parser: P) -> Self
    where
        P: ElementParser + 'static,
        T: 'static,
    {
        self.children.push(ChildEntry {
            id,
            slot: Box::new(NodeSlot { parser }),
            starts_parent: false,
        });
        self
    }

    /// Marks the child with `id` as a trigger for the deferred begin hook.
    pub fn starts_begin(mut self, id: Id) -> Self {
        if let Some(entry) = self.children.iter_mut().find(|entry| entry.id == id) {
            entry.starts_parent = true;
        } else {
            debug_assert!(false, "starts_begin on an id with no slot");
        }
        self
    }

    fn remaining(&self) -> u64 {
        if self.bound == u64::MAX {
            u64::MAX
        } else {
            self.bound - self.total_read
        }
    }

    fn child_index(&self, id: Id) -> Option<usize> {
        self.children.iter().position(|entry| entry.id == id)
    }

    ///
    /// Fires the deferred begin hook (if still owed) and the end hook, then
    /// marks the parse complete.
    ///
    fn complete(&mut self, callback: &mut dyn Callback) -> ParseResult<FeedStatus> {
        if !self.suppress && !self.begin_skipped {
            if let Some(hook) = &self.begin_hook {
                if hook.deferred && !self.begin_fired {
                    self.begin_fired = true;
                    if (hook.hook)(callback, &self.metadata, &self.value)? == Action::Skip {
                        self.begin_skipped = true;
                    }
                }
            }
            if !self.begin_skipped {
                if let Some(hook) = self.end_hook {
                    hook(callback, &self.metadata, &self.value)?;
                }
            }
        }
        self.state = State::Done;
        Ok(FeedStatus::Complete)
    }
}

impl<T: Default> ElementParser for MasterParser<T> {
    fn init(&mut self, metadata: &ElementMetadata, max_size: u64) -> ParseResult<()> {
        if !metadata.has_unknown_size() && metadata.size > max_size {
            return Err(ParseError::InvalidElementSize {
                position: metadata.position,
            });
        }
        self.metadata = *metadata;
        self.bound = if metadata.has_unknown_size() {
            max_size
        } else {
            metadata.size
        };
        self.total_read = 0;
        self.state = State::Begin;
        self.value = T::default();
        for entry in &self.children {
            entry.slot.prime(&mut self.value);
        }
        self.id_parser = IdParser::default();
        self.id_in_progress = false;
        self.size_parser = SizeParser::default();
        self.active = ActiveChild::None;
        self.pending_metadata = None;
        self.cached = None;
        self.begin_fired = false;
        self.begin_skipped = false;
        self.suppress = false;
        self.child_suppressed = false;
        Ok(())
    }

    fn init_after_seek(&mut self, mut ancestory: Ancestory, child_metadata: ElementMetadata) {
        let own_id = ancestory.pop_front().unwrap_or(child_metadata.id);
        self.metadata = ElementMetadata {
            id: own_id,
            header_size: UNKNOWN_HEADER_SIZE,
            size: UNKNOWN_ELEMENT_SIZE,
            position: UNKNOWN_ELEMENT_POSITION,
        };
        self.bound = u64::MAX;
        self.total_read = 0;
        self.value = T::default();
        for entry in &self.children {
            entry.slot.prime(&mut self.value);
        }
        self.id_parser = IdParser::default();
        self.id_in_progress = false;
        self.size_parser = SizeParser::default();
        self.active = ActiveChild::None;
        self.pending_metadata = None;
        self.cached = None;
        // Seeks never replay begin events.
        self.begin_fired = true;
        self.begin_skipped = false;
        self.suppress = false;
        self.child_suppressed = false;

        if let Some(next_id) = ancestory.front() {
            if let Some(index) = self.child_index(next_id) {
                self.child_metadata = ElementMetadata {
                    id: next_id,
                    header_size: UNKNOWN_HEADER_SIZE,
                    size: UNKNOWN_ELEMENT_SIZE,
                    position: UNKNOWN_ELEMENT_POSITION,
                };
                self.children[index]
                    .slot
                    .init_after_seek(ancestory, child_metadata);
                self.active = ActiveChild::Entry(index);
                self.state = State::FeedingChild;
                return;
            }
            debug_assert!(false, "seek ancestory names an id with no slot");
        }
        self.pending_metadata = Some(child_metadata);
        self.state = State::ReadingChildId;
    }

    fn feed(
        &mut self,
        callback: &mut dyn Callback,
        reader: &mut dyn Reader,
        bytes_read: &mut u64,
    ) -> ParseResult<FeedStatus> {
        *bytes_read = 0;
        loop {
            match self.state {
                State::Begin => {
                    if let Some(hook) = &self.begin_hook {
                        if !hook.deferred {
                            self.begin_fired = true;
                            if (hook.hook)(callback, &self.metadata, &self.value)? == Action::Skip
                            {
                                self.begin_skipped = true;
                                if self.bound == u64::MAX {
                                    // No byte count to skip by; walk the
                                    // structure with events suppressed.
                                    self.suppress = true;
                                } else {
                                    self.state = State::SkippingSelf;
                                    continue;
                                }
                            }
                        }
                    }
                    self.state = State::ReadingChildId;
                }

                State::SkippingSelf => loop {
                    let remaining = self.bound - self.total_read;
                    if remaining == 0 {
                        self.state = State::Done;
                        return Ok(FeedStatus::Complete);
                    }
                    let skipped = reader.skip(remaining)?;
                    if skipped == 0 {
                        return Ok(FeedStatus::Partial);
                    }
                    *bytes_read += skipped;
                    self.total_read += skipped;
                },

                State::ReadingChildId => {
                    if let Some(pending) = self.pending_metadata.take() {
                        // A header an unknown-size child already consumed;
                        // dispatch it without touching the reader.
                        self.child_metadata = pending;
                        self.state = State::Dispatching;
                        continue;
                    }
                    if self.remaining() == 0 {
                        return self.complete(callback);
                    }
                    let mut count = 0;
                    let result = self.id_parser.feed(reader, &mut count);
                    *bytes_read += count;
                    self.total_read += count;
                    if count > 0 {
                        self.id_in_progress = true;
                    }
                    match result {
                        Ok(FeedStatus::Complete) => {
                            self.state = State::ReadingChildSize;
                        }
                        Ok(FeedStatus::Partial) => return Ok(FeedStatus::Partial),
                        Err(ParseError::EndOfFile)
                            if !self.id_in_progress && self.metadata.has_unknown_size() =>
                        {
                            // End of stream is a valid terminator for an
                            // unknown-size master.
                            return self.complete(callback);
                        }
                        Err(error) => return Err(error),
                    }
                }

                State::ReadingChildSize => {
                    let mut count = 0;
                    let status = self.size_parser.feed(reader, &mut count);
                    *bytes_read += count;
                    self.total_read += count;
                    match status? {
                        FeedStatus::Partial => return Ok(FeedStatus::Partial),
                        FeedStatus::Complete => {
                            let id = self.id_parser.id();
                            let header_size =
                                id.encoded_length() + self.size_parser.encoded_length();
                            self.child_metadata = ElementMetadata {
                                id,
                                header_size,
                                size: self.size_parser.size(),
                                position: reader.position() - u64::from(header_size),
                            };
                            self.id_parser = IdParser::default();
                            self.id_in_progress = false;
                            self.size_parser = SizeParser::default();
                            self.state = State::Dispatching;
                        }
                    }
                }

                State::Dispatching => {
                    let child = self.child_metadata;
                    if self.bound != u64::MAX && self.total_read > self.bound {
                        // The child header straddles this master's end.
                        return Err(ParseError::InvalidElementSize {
                            position: child.position,
                        });
                    }
                    let index = self.child_index(child.id);
                    if self.metadata.has_unknown_size()
                        && index.is_none()
                        && child.id != Id::VOID
                    {
                        // Not ours: this header ends the master.  Surface it
                        // so the parent can dispatch it without re-reading.
                        self.cached = Some(child);
                        return self.complete(callback);
                    }

                    if let Some(hook) = &self.begin_hook {
                        if hook.deferred
                            && !self.begin_fired
                            && !self.suppress
                            && index.is_some_and(|i| self.children[i].starts_parent)
                        {
                            self.begin_fired = true;
                            if (hook.hook)(callback, &self.metadata, &self.value)? == Action::Skip
                            {
                                self.begin_skipped = true;
                                self.suppress = true;
                            }
                        }
                    }

                    let action = if self.suppress {
                        Action::Skip
                    } else {
                        callback.on_element_begin(&child)?
                    };

                    let max_size = self.remaining();
                    match action {
                        Action::Skip if !child.has_unknown_size() => {
                            self.skip_parser.init(&child, max_size)?;
                            self.active = ActiveChild::Skipped;
                        }
                        action => {
                            self.child_suppressed = action == Action::Skip;
                            match index {
                                Some(i) => {
                                    self.children[i].slot.init(&child, max_size)?;
                                    self.active = ActiveChild::Entry(i);
                                }
                                None if child.id == Id::VOID => {
                                    self.void_parser.init(&child, max_size)?;
                                    self.active = ActiveChild::Void;
                                }
                                None => {
                                    debug!(
                                        "unrecognized element {} inside {} at {}",
                                        child.id, self.metadata.id, child.position
                                    );
                                    self.unknown_parser.init(&child, max_size)?;
                                    self.active = ActiveChild::Unknown;
                                }
                            }
                        }
                    }
                    self.state = State::FeedingChild;
                }

                State::FeedingChild => {
                    let mut count = 0;
                    let suppressed = self.suppress || self.child_suppressed;
                    let status = {
                        let cb: &mut dyn Callback = if suppressed {
                            &mut self.skip_callback
                        } else {
                            callback
                        };
                        match self.active {
                            ActiveChild::Entry(i) => {
                                self.children[i].slot.feed(cb, reader, &mut count)
                            }
                            ActiveChild::Unknown => {
                                self.unknown_parser.feed(cb, reader, &mut count)
                            }
                            ActiveChild::Void => self.void_parser.feed(cb, reader, &mut count),
                            ActiveChild::Skipped => self.skip_parser.feed(cb, reader, &mut count),
                            ActiveChild::None => unreachable!("no active child"),
                        }
                    };
                    *bytes_read += count;
                    self.total_read += count;
                    match status? {
                        FeedStatus::Partial => return Ok(FeedStatus::Partial),
                        FeedStatus::Complete => self.state = State::FinishingChild,
                    }
                }

                State::FinishingChild => {
                    if let ActiveChild::Entry(i) = self.active {
                        if !self.suppress && !self.child_suppressed {
                            let metadata = self.child_metadata;
                            self.children[i].slot.finish(
                                callback,
                                &metadata,
                                &mut self.value,
                            )?;
                        }
                        self.pending_metadata = self.children[i].slot.cached_metadata();
                    }
                    self.active = ActiveChild::None;
                    self.child_suppressed = false;
                    self.state = State::ReadingChildId;
                }

                State::Done => return Ok(FeedStatus::Complete),
            }
        }
    }

    fn cached_metadata(&self) -> Option<ElementMetadata> {
        self.cached
    }
}

impl<T: Default> ValueParser for MasterParser<T> {
    type Value = T;

    fn value(&self) -> &T {
        &self.value
    }

    fn take_value(&mut self) -> T {
        std::mem::take(&mut self.value)
    }
}
