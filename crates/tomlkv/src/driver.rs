//! The grammar-event driver: turns parse events into store keys.
//!
//! One handler per grammar event, dispatched from the [`ParseCallback`]
//! impl. The driver keeps three stacks whose lifetimes overlap: parent
//! frames for the open key scopes, an index stack for nested inline arrays,
//! and a table-array stack tracking the current index of every open
//! `[[name]]`. After the first error every handler short-circuits; the rest
//! of the event stream is consumed cheaply.

use std::collections::HashMap;

use tomlkv_parse::{is_bare_string, Event, Location, ParseCallback, Scalar, ScalarKind};
use tomlkv_store::{key_handle, Key, KeyHandle, KeyName, KeySet};

use crate::comment::{write_inline_comment, CommentList};
use crate::datetime::is_valid_datetime;
use crate::error::{set_error, set_out_of_memory, ErrorKind, ReadError};
use crate::special::handle_special_string;

/// One open `[[name]]` and the index of its current element.
struct TableArrayFrame {
    key: KeyHandle,
    curr_index: usize,
}

/// How a new table-array header relates to the innermost open one.
enum HeaderRelation {
    /// Same name: the next element of the same array.
    Same,
    /// A descendant name: a nested array of tables.
    Nested,
    /// No relation (or no open array at all).
    Unrelated,
}

pub(crate) struct Driver<'a> {
    root: KeyHandle,
    keys: &'a mut KeySet,

    /// The key currently being assembled from dotted segments.
    curr_key: Option<KeyHandle>,
    /// The most recently finalized key; receives trailing inline comments.
    prev_key: Option<KeyHandle>,
    /// Value waiting to be committed at the end of its production.
    last_scalar: Option<Scalar>,

    parent_stack: Vec<KeyHandle>,
    index_stack: Vec<usize>,
    table_array_stack: Vec<TableArrayFrame>,
    /// Highest element index used per top-level table array name. Frames
    /// are popped when an unrelated header interleaves; revisiting the name
    /// extends the existing array instead of restarting at `#0`.
    table_array_indices: HashMap<String, usize>,

    comments: CommentList,
    newline_count: u32,

    order: usize,
    curr_line: u32,
    curr_loc: Location,
    simple_table_active: bool,
    drain_comments_on_key_exit: bool,
    error: Option<ReadError>,
}

impl<'a> Driver<'a> {
    pub fn new(root: KeyHandle, keys: &'a mut KeySet) -> Self {
        // The bottom of the parent stack is a duplicate of the root and
        // stays there for the whole parse.
        let bottom = key_handle(root.borrow().clone());
        Self {
            root,
            keys,
            curr_key: None,
            prev_key: None,
            last_scalar: None,
            parent_stack: vec![bottom],
            index_stack: Vec::new(),
            table_array_stack: Vec::new(),
            table_array_indices: HashMap::new(),
            comments: CommentList::new(),
            newline_count: 0,
            order: 0,
            curr_line: 0,
            curr_loc: Location::default(),
            simple_table_active: false,
            drain_comments_on_key_exit: true,
            error: None,
        }
    }

    /// Tear down and report whether the parse succeeded.
    pub fn finish(self) -> Result<(), ReadError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    #[inline]
    fn latched(&self) -> bool {
        self.error.is_some()
    }

    /// Latch the first error, mirroring it onto the root key.
    fn fail(&mut self, kind: ErrorKind, line: u32, loc: Location, message: String) {
        if self.error.is_some() {
            return;
        }
        if kind == ErrorKind::Memory {
            self.error = Some(set_out_of_memory(&self.root));
            return;
        }
        self.error = Some(set_error(&self.root, kind, line, loc, message));
    }

    fn fail_here(&mut self, kind: ErrorKind, line: u32, message: String) {
        let loc = self.curr_loc;
        self.fail(kind, line, loc, message);
    }

    fn fail_internal(&mut self, message: &str) {
        let loc = self.curr_loc;
        self.fail(ErrorKind::Internal, 0, loc, message.to_string());
    }

    // ------------------------------------------------------------------
    // Keys
    // ------------------------------------------------------------------

    fn key_start(&mut self) {
        if self.latched() {
            return;
        }
        self.reset_curr_key();
    }

    fn simple_key(&mut self, name: Scalar) {
        if self.latched() {
            return;
        }
        match name.kind {
            // Always valid as a key segment.
            ScalarKind::StringLiteral | ScalarKind::StringBasic | ScalarKind::StringBare => {}
            ScalarKind::StringMlLiteral | ScalarKind::StringMlBasic => {
                self.fail(
                    ErrorKind::Semantic,
                    name.line,
                    name.loc,
                    "Malformed input: Invalid simple key: Found multiline string, but is not \
                     allowed"
                        .to_string(),
                );
            }
            // Plain dotted-decimal floats were already split into two bare
            // segments by the parser; anything still arriving as a float
            // (exponent or sign) cannot be a key.
            ScalarKind::FloatNum => {
                self.fail(
                    ErrorKind::Semantic,
                    name.line,
                    name.loc,
                    invalid_bare_key_message(&name.text),
                );
            }
            _ => {
                if !is_bare_string(&name.translate()) {
                    self.fail(
                        ErrorKind::Semantic,
                        name.line,
                        name.loc,
                        invalid_bare_key_message(&name.text),
                    );
                }
            }
        }
        if name.kind != ScalarKind::FloatNum {
            let translated = name.translate();
            self.extend_curr_key(&translated);
        }
        self.curr_line = name.line;
        self.curr_loc = name.loc;
    }

    fn key_end(&mut self) {
        if self.latched() {
            return;
        }
        let curr = match self.curr_key.clone() {
            Some(curr) => curr,
            None => {
                self.fail_internal("Wanted to push current key, but current key is unset.");
                return;
            }
        };
        let curr_name = curr.borrow().name().clone();
        if let Some(existing) = self.keys.lookup(&curr_name) {
            let (existing_name, is_table_array) = {
                let key = existing.borrow();
                (
                    key.name().to_string(),
                    key.meta("tomltype") == Some("tablearray"),
                )
            };
            // Only table array keys may be read multiple times.
            if !is_table_array && existing_name != self.root.borrow().name().to_string() {
                let line = self.curr_line;
                self.fail_here(
                    ErrorKind::Semantic,
                    line,
                    format!(
                        "Malformed input: Multiple occurences of keyname '{existing_name}', but \
                         keynames must be unique."
                    ),
                );
            }
        }

        self.parent_stack.push(curr.clone());
        if self.drain_comments_on_key_exit {
            self.drain_comments_to(Some(&curr));
        }
        curr.borrow_mut().set_meta("order", self.order.to_string());
        self.order += 1;
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    fn value(&mut self, scalar: Scalar) {
        if self.latched() {
            return;
        }
        match scalar.kind {
            // No bare strings on the right-hand side.
            ScalarKind::StringBare => {
                self.fail(
                    ErrorKind::Semantic,
                    scalar.line,
                    scalar.loc,
                    "Malformed input: Found a bare string value, which is not allowed. Consider \
                     adding quotations around the string."
                        .to_string(),
                );
            }
            kind if kind.is_datetime() => {
                if !is_valid_datetime(&scalar) {
                    self.fail(
                        ErrorKind::Semantic,
                        scalar.line,
                        scalar.loc,
                        format!("Malformed input: Invalid datetime: '{}'", scalar.text),
                    );
                }
            }
            _ => {}
        }
        self.curr_line = scalar.line;
        self.curr_loc = scalar.loc;
        self.last_scalar = Some(scalar);
    }

    fn key_pair_end(&mut self) {
        if self.latched() {
            return;
        }
        self.commit_last_scalar_to_parent();
        self.prev_key = self.parent_stack.pop();
    }

    fn key_pair_comment_end(&mut self) {
        if self.latched() || self.comments.is_empty() {
            return;
        }
        let prev = match self.prev_key.clone() {
            Some(prev) => prev,
            None => {
                self.fail_internal(
                    "Wanted to assign inline comment to keypair, but keypair key is unset.",
                );
                return;
            }
        };
        if self.comments.len() > 1 {
            self.fail_internal(
                "More than one comment existing after exiting keypair, expected up to one.",
            );
            return;
        }
        if let Some(entry) = self.comments.pop_front() {
            write_inline_comment(&mut prev.borrow_mut(), &entry);
        }
        self.comments.clear();
    }

    fn table_comment_end(&mut self) {
        if self.latched() || self.comments.is_empty() {
            return;
        }
        let top = match self.parent_stack.last().cloned() {
            Some(top) => top,
            None => {
                self.fail_internal(
                    "Wanted to assign inline comment to table, but table key is unset.",
                );
                return;
            }
        };
        if self.comments.len() > 1 {
            self.fail_internal(
                "More than one comment existing after exiting table, expected up to one.",
            );
            return;
        }
        if let Some(entry) = self.comments.pop_front() {
            write_inline_comment(&mut top.borrow_mut(), &entry);
        }
        self.comments.clear();

        if !self.simple_table_active {
            // We just closed a table array header. Emit the indexed key if
            // it is not in the store yet, otherwise the inline comment is
            // lost when the element stays empty.
            let name = top.borrow().name().clone();
            if self.keys.lookup(&name).is_none() {
                self.keys.append(top);
            }
        }
    }

    // ------------------------------------------------------------------
    // Simple tables
    // ------------------------------------------------------------------

    fn simple_table_start(&mut self) {
        if self.latched() {
            return;
        }
        if self.simple_table_active {
            // Close the scope of the previous simple table.
            self.parent_stack.pop();
        } else {
            self.simple_table_active = true;
        }
        self.reset_curr_key();
    }

    fn simple_table_end(&mut self) {
        if self.latched() {
            return;
        }
        if let Some(top) = self.parent_stack.last().cloned() {
            top.borrow_mut().set_meta("tomltype", "simpletable");
            self.keys.append(top);
        }
    }

    // ------------------------------------------------------------------
    // Arrays of tables
    // ------------------------------------------------------------------

    fn table_array_start(&mut self) {
        if self.latched() {
            return;
        }
        if self.simple_table_active {
            self.parent_stack.pop();
            self.simple_table_active = false;
        }
        if !self.table_array_stack.is_empty() {
            // Pop the previous table array's indexed key.
            self.parent_stack.pop();
        }
        let root = self.root.clone();
        self.set_curr_key(&root);
        // The unindexed header must not absorb pending comments; they
        // belong to the indexed element key built on header exit.
        self.drain_comments_on_key_exit = false;
    }

    fn table_array_end(&mut self) {
        if self.latched() {
            return;
        }
        let header = match self.parent_stack.last().cloned() {
            Some(header) => header,
            None => {
                self.fail_internal("Wanted to close table array, but parent stack is empty.");
                return;
            }
        };
        let header_name = header.borrow().name().clone();

        let relation = match self.table_array_stack.last() {
            Some(frame) => {
                let frame_name = frame.key.borrow().name().clone();
                if frame_name == header_name {
                    HeaderRelation::Same
                } else if frame_name.is_ancestor_of(&header_name) {
                    HeaderRelation::Nested
                } else {
                    HeaderRelation::Unrelated
                }
            }
            None => HeaderRelation::Unrelated,
        };
        match relation {
            HeaderRelation::Same => {
                if let Some(frame) = self.table_array_stack.last_mut() {
                    frame.curr_index += 1;
                }
            }
            HeaderRelation::Nested => {
                self.table_array_stack.push(TableArrayFrame {
                    key: header.clone(),
                    curr_index: 0,
                });
            }
            HeaderRelation::Unrelated => {
                // Pop until a matching header is on top, or re-open the
                // array under this name.
                loop {
                    let matches = match self.table_array_stack.last() {
                        Some(frame) => *frame.key.borrow().name() == header_name,
                        None => break,
                    };
                    if matches {
                        break;
                    }
                    self.table_array_stack.pop();
                }
                match self.table_array_stack.last_mut() {
                    Some(frame) => frame.curr_index += 1,
                    None => {
                        // The header's frame may have been popped by an
                        // interleaved array; its subsequent occurrences
                        // extend the existing element count.
                        let curr_index = self
                            .table_array_indices
                            .get(&header_name.to_string())
                            .map(|last| last + 1)
                            .unwrap_or(0);
                        self.table_array_stack.push(TableArrayFrame {
                            key: header.clone(),
                            curr_index,
                        });
                    }
                }
            }
        }

        // Remember how far a top-level array has grown; nested frames are
        // scoped to their enclosing element and always restart.
        if self.table_array_stack.len() == 1 {
            if let Some(frame) = self.table_array_stack.last() {
                self.table_array_indices
                    .insert(frame.key.borrow().name().to_string(), frame.curr_index);
            }
        }

        // Pop the unindexed header and give back the order slot it took on
        // key exit; the slot belongs to the indexed variant.
        self.parent_stack.pop();
        self.order -= 1;

        let indexed_name = match build_table_array_key_name(&self.table_array_stack) {
            Some(name) => name,
            None => {
                self.fail_internal("Wanted to name a table array element, but no array is open.");
                return;
            }
        };
        let descriptor_name = match indexed_name.parent() {
            Some(name) => name,
            None => {
                self.fail_internal("Table array element key has no parent name.");
                return;
            }
        };
        let indexed = key_handle(Key::new(indexed_name));

        match self.keys.lookup(&descriptor_name) {
            None => {
                let descriptor = key_handle(Key::new(descriptor_name));
                {
                    let mut key = descriptor.borrow_mut();
                    key.set_meta("tomltype", "tablearray");
                    key.set_meta("array", "#0");
                    key.set_meta("order", self.order.to_string());
                }
                self.order += 1;
                self.keys.append(descriptor);
            }
            Some(descriptor) => {
                let index = self
                    .table_array_stack
                    .last()
                    .map(|frame| frame.curr_index)
                    .unwrap_or(0);
                descriptor.borrow_mut().set_meta("array", format!("#{index}"));
            }
        }

        self.parent_stack.push(indexed.clone());
        if self.drain_comments_to(Some(&indexed)) {
            // The element key has comments from previous lines; emit it even
            // if it never receives children.
            self.keys.append(indexed);
        }
        self.drain_comments_on_key_exit = true;
    }

    // ------------------------------------------------------------------
    // Arrays
    // ------------------------------------------------------------------

    fn array_start(&mut self) {
        if self.latched() {
            return;
        }
        self.index_stack.push(0);
        let top = match self.parent_stack.last().cloned() {
            Some(top) => top,
            None => {
                self.fail_internal("Wanted to open array, but parent stack is empty.");
                return;
            }
        };
        if top.borrow().meta("array").is_some() {
            // An array directly inside an array shares its parent key; the
            // inner one gets its own index-0 child.
            let child = key_append_index(0, &top);
            child.borrow_mut().set_meta("order", self.order.to_string());
            self.order += 1;
            self.parent_stack.push(child);
        }
        if let Some(top) = self.parent_stack.last() {
            top.borrow_mut().set_meta("array", "");
        }
    }

    fn array_end(&mut self) {
        if self.latched() {
            return;
        }
        self.first_comment_as_inline_to_prev_key();
        // TODO: decide where comments between the last element and the
        // closing bracket should be stored; until then they are dropped.
        self.drain_comments_to(None);

        self.index_stack.pop();
        if let Some(top) = self.parent_stack.last().cloned() {
            self.keys.append(top);
        }
    }

    fn array_empty(&mut self) {
        if self.latched() {
            return;
        }
        self.array_start();
        self.array_end();
    }

    fn array_element_start(&mut self) {
        if self.latched() {
            return;
        }
        let index = match self.index_stack.last() {
            Some(&index) => index,
            None => {
                self.fail_internal("Wanted to start array element, but no array is open.");
                return;
            }
        };
        if index == usize::MAX {
            self.fail_internal("Array index at maximum range of usize");
            return;
        }

        if index > 0 && !self.comments.is_empty() {
            // The first comment after a previous element is that element's
            // inline comment.
            self.first_comment_as_inline_to_prev_key();
        }

        let top = match self.parent_stack.last().cloned() {
            Some(top) => top,
            None => {
                self.fail_internal("Wanted to start array element, but parent stack is empty.");
                return;
            }
        };
        let child = key_append_index(index, &top);
        let base = child.borrow().base_name().to_string();
        top.borrow_mut().set_meta("array", base);
        self.parent_stack.push(child.clone());
        if let Some(index) = self.index_stack.last_mut() {
            *index += 1;
        }
        self.drain_comments_to(Some(&child));
    }

    fn array_element_end(&mut self) {
        if self.latched() {
            return;
        }
        // No pending scalar happens for e.g. inline tables as elements.
        if self.last_scalar.is_some() {
            self.commit_last_scalar_to_parent();
        }
        self.prev_key = self.parent_stack.pop();
    }

    // ------------------------------------------------------------------
    // Inline tables
    // ------------------------------------------------------------------

    fn inline_table_start(&mut self) {
        if self.latched() {
            return;
        }
        if let Some(top) = self.parent_stack.last().cloned() {
            top.borrow_mut().set_meta("tomltype", "inlinetable");
            self.keys.append(top);
        }
    }

    fn inline_table_end(&mut self) {
        if self.latched() {
            return;
        }
        self.last_scalar = None;
    }

    fn inline_table_empty(&mut self) {
        if self.latched() {
            return;
        }
        // No scalar can be pending inside an empty inline table, entering
        // is enough.
        self.inline_table_start();
    }

    // ------------------------------------------------------------------
    // Comments and newlines
    // ------------------------------------------------------------------

    fn comment(&mut self, comment: Scalar) {
        if self.latched() {
            return;
        }
        let blanks = std::mem::take(&mut self.newline_count);
        let orig = format!("#{}", comment.text);
        self.comments.push_comment(comment.text, orig, blanks);
        self.curr_line = comment.line;
        self.curr_loc = comment.loc;
    }

    fn newline(&mut self) {
        if self.latched() {
            return;
        }
        if self.newline_count == u32::MAX {
            self.fail_internal("Newline counter at maximum range of u32");
            return;
        }
        self.newline_count += 1;
    }

    fn document_end(&mut self) {
        if self.latched() {
            return;
        }
        if !self.comments.is_empty() {
            // Comments trailing the whole document hang off a synthesized
            // key with the root's name.
            let key = key_handle(Key::new(self.root.borrow().name().clone()));
            self.keys.append(key.clone());
            self.drain_comments_to(Some(&key));
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn set_curr_key(&mut self, key: &KeyHandle) {
        let name = key.borrow().name().clone();
        self.curr_key = Some(key_handle(Key::new(name)));
    }

    fn reset_curr_key(&mut self) {
        match self.parent_stack.last().cloned() {
            Some(top) => self.set_curr_key(&top),
            None => self.fail_internal("Wanted to reset current key, but parent stack is empty."),
        }
    }

    fn extend_curr_key(&mut self, segment: &str) {
        match self.curr_key.clone() {
            Some(key) => key.borrow_mut().name_mut().push(segment),
            None => {
                self.fail_internal("Wanted to extend current key, but current key is unset.");
            }
        }
    }

    /// Materialize pending blank lines, then move all pending comments to
    /// `key` (or drop them). Returns whether any comments were pending.
    fn drain_comments_to(&mut self, key: Option<&KeyHandle>) -> bool {
        let blanks = std::mem::take(&mut self.newline_count);
        if blanks > 0 {
            self.comments.push_blanks(blanks);
        }
        let drained = !self.comments.is_empty();
        match key {
            Some(key) => self.comments.write_to(&mut key.borrow_mut()),
            None => self.comments.clear(),
        }
        drained
    }

    fn first_comment_as_inline_to_prev_key(&mut self) {
        if self.comments.is_empty() {
            return;
        }
        let prev = match self.prev_key.clone() {
            Some(prev) => prev,
            None => {
                self.fail_internal(
                    "Wanted to assign inline comment, but previous key is unset.",
                );
                return;
            }
        };
        if let Some(entry) = self.comments.pop_front() {
            write_inline_comment(&mut prev.borrow_mut(), &entry);
        }
    }

    /// Translate the pending scalar, store it as the top parent's value,
    /// attach the kind-specific metadata, and append the key.
    fn commit_last_scalar_to_parent(&mut self) {
        let scalar = match self.last_scalar.take() {
            Some(scalar) => scalar,
            None => return,
        };
        let parent = match self.parent_stack.last().cloned() {
            Some(parent) => parent,
            None => {
                self.fail_internal(
                    "Wanted to assign scalar to top parent key, but top parent key is unset.",
                );
                return;
            }
        };

        let translated = scalar.translate();
        parent.borrow_mut().set_string(translated.clone());

        match scalar.kind {
            kind if kind.is_quoted_string() => {
                if !handle_special_string(&translated, &parent) {
                    assign_string_metakeys(&parent, &scalar.text, &translated);
                }
                assign_string_toml_type(&parent, kind);
            }
            ScalarKind::Boolean => {
                parent.borrow_mut().set_meta("type", "boolean");
            }
            ScalarKind::FloatNum
            | ScalarKind::FloatInf
            | ScalarKind::FloatPosInf
            | ScalarKind::FloatNegInf
            | ScalarKind::FloatNan
            | ScalarKind::FloatPosNan
            | ScalarKind::FloatNegNan => {
                parent.borrow_mut().set_meta("type", "double");
                assign_orig_value_if_different(&parent, &scalar.text);
            }
            ScalarKind::IntDec => {
                parent.borrow_mut().set_meta("type", "long_long");
                assign_orig_value_if_different(&parent, &scalar.text);
            }
            ScalarKind::IntBin | ScalarKind::IntOct | ScalarKind::IntHex => {
                parent.borrow_mut().set_meta("type", "unsigned_long_long");
                assign_orig_value_if_different(&parent, &scalar.text);
            }
            _ => {
                assign_orig_value_if_different(&parent, &scalar.text);
            }
        }

        self.keys.append(parent);
    }
}

impl ParseCallback for Driver<'_> {
    fn event(&mut self, event: Event) -> bool {
        match event {
            Event::DocumentEnd => self.document_end(),
            Event::KeyStart => self.key_start(),
            Event::SimpleKey(scalar) => self.simple_key(scalar),
            Event::KeyEnd => self.key_end(),
            Event::Value(scalar) => self.value(scalar),
            Event::KeyPairEnd => self.key_pair_end(),
            Event::KeyPairCommentEnd => self.key_pair_comment_end(),
            Event::TableCommentEnd => self.table_comment_end(),
            Event::SimpleTableStart => self.simple_table_start(),
            Event::SimpleTableEnd => self.simple_table_end(),
            Event::TableArrayStart => self.table_array_start(),
            Event::TableArrayEnd => self.table_array_end(),
            Event::ArrayStart => self.array_start(),
            Event::ArrayEnd => self.array_end(),
            Event::ArrayEmpty => self.array_empty(),
            Event::ArrayElementStart => self.array_element_start(),
            Event::ArrayElementEnd => self.array_element_end(),
            Event::InlineTableStart => self.inline_table_start(),
            Event::InlineTableEnd => self.inline_table_end(),
            Event::InlineTableEmpty => self.inline_table_empty(),
            Event::Comment(scalar) => self.comment(scalar),
            Event::Newline => self.newline(),
            Event::Error { line, loc, message } => {
                self.fail(ErrorKind::Syntactic, line, loc, message);
            }
        }
        true
    }
}

fn invalid_bare_key_message(text: &str) -> String {
    format!(
        "Malformed input: Invalid bare simple key: '{text}' contains invalid characters, only \
         alphanumeric, underline, hyphen allowed. Consider adding quotations around the string."
    )
}

fn assign_orig_value_if_different(key: &KeyHandle, orig: &str) {
    let differs = key.borrow().string() != orig;
    if differs {
        key.borrow_mut().set_meta("origvalue", orig);
    }
}

fn assign_string_metakeys(key: &KeyHandle, orig: &str, translated: &str) {
    // Binary-typed keys keep their type; empty strings get no type at all.
    let keeps_type = key.borrow().meta("type") == Some("binary");
    if !keeps_type && !translated.is_empty() {
        key.borrow_mut().set_meta("type", "string");
    }
    if orig != translated {
        key.borrow_mut().set_meta("origvalue", orig);
    }
}

fn assign_string_toml_type(key: &KeyHandle, kind: ScalarKind) {
    let toml_type = match kind {
        ScalarKind::StringBasic => "string_basic",
        ScalarKind::StringMlBasic => "string_ml_basic",
        ScalarKind::StringLiteral => "string_literal",
        ScalarKind::StringMlLiteral => "string_ml_literal",
        _ => return,
    };
    key.borrow_mut().set_meta("tomltype", toml_type);
}

/// A fresh key named `parent/#index`.
fn key_append_index(index: usize, parent: &KeyHandle) -> KeyHandle {
    let mut name = parent.borrow().name().clone();
    name.push_index(index);
    key_handle(Key::new(name))
}

/// The fully-qualified name of the current element of the innermost table
/// array: the header name with the composed index path of every frame on
/// the stack.
fn build_table_array_key_name(frames: &[TableArrayFrame]) -> Option<KeyName> {
    let (top, rest) = frames.split_last()?;
    let top_name = top.key.borrow().name().clone();

    let nested = rest
        .last()
        .map(|next| next.key.borrow().name().is_ancestor_of(&top_name))
        .unwrap_or(false);
    if !nested {
        let mut name = top_name;
        name.push_index(top.curr_index);
        return Some(name);
    }

    let mut name = build_table_array_key_name(rest)?;
    let next_name = rest
        .last()
        .map(|next| next.key.borrow().name().clone())
        .unwrap_or_default();
    if let Some(rel) = top_name.rel_to(&next_name) {
        for segment in rel {
            name.push(segment);
        }
    }
    name.push_index(top.curr_index);
    Some(name)
}
