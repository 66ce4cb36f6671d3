//! The object graph renderer.
//!
//! [`Renderer`] walks a value through its [`Shape`] and writes a single-line
//! description. It is fail-soft: getter errors, panics in user code, cycles,
//! excessive depth and long sequences all degrade to inline markers, so
//! rendering itself never fails.
//!
//! ## Markers
//!
//! | Situation | Output |
//! |-----------|--------|
//! | null value | [`NULL_MARKER`] |
//! | object already on the current path | [`CYCLE_MARKER`] |
//! | nesting deeper than `max_recursion_level` | [`RECURSION_LIMIT_MARKER`] |
//! | getter or iterator failure | `<Error: message>` |
//!
//! ## Direct Renderer Usage
//!
//! Most users should call [`to_string`](crate::to_string). The renderer can
//! also append several values to one buffer:
//!
//! ```rust
//! use propstring::{Renderer, RenderOptions};
//!
//! let mut renderer = Renderer::new(RenderOptions::new());
//! renderer.render(&vec![1, 2, 3]);
//! renderer.render_str(" / ");
//! renderer.render(&"done");
//! assert_eq!(renderer.into_inner(), "[1, 2, 3] / \"done\"");
//! ```

use crate::error::{guarded, FieldError};
use crate::format;
use crate::inspect::{Compound, CompoundKind, Identity, Inspect, Items, Object, Sequence, Shape};
use crate::options::RenderOptions;
use crate::visited::VisitedSet;
use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::{debug, trace};

/// Rendered in place of a null value.
pub const NULL_MARKER: &str = "null";

/// Rendered in place of an object that is already being rendered further up.
pub const CYCLE_MARKER: &str = "<Circular reference>";

/// Rendered in place of an object or sequence nested too deeply.
pub const RECURSION_LIMIT_MARKER: &str = "<Recursion limit reached>";

// Wrappers and inline compounds do not count towards the depth limit; this
// bounds a chain of them that never reaches an object.
const MAX_INLINE_NESTING: usize = 64;

// Unknown-length sequences are counted this far after truncation.
const MAX_COUNTED_ITEMS: usize = 65_536;

/// Renders values into a string buffer.
///
/// Holds the per-call state: options, the identities on the active path and
/// the current depth. Both are back to empty after every
/// [`render`](Renderer::render) call.
pub struct Renderer {
    output: String,
    options: RenderOptions,
    visited: VisitedSet,
    depth: usize,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Renderer {
            output: String::with_capacity(128),
            options,
            visited: VisitedSet::new(),
            depth: 0,
        }
    }

    /// Appends the rendering of `value` as a root value.
    pub fn render<T: Inspect + ?Sized>(&mut self, value: &T) {
        let annotate = self.options.render_root_actual_type;
        self.render_value(&value, annotate, 0);
        debug_assert!(self.visited.is_empty());
        debug_assert_eq!(self.depth, 0);
    }

    /// Appends raw text.
    pub fn render_str(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn render_value(&mut self, value: &dyn Inspect, annotate: bool, nesting: usize) {
        let shape = guarded(|| value.classify()).unwrap_or_else(Shape::Failed);

        if annotate && has_runtime_type(&shape) {
            self.write_actual_type(value);
        }

        match shape {
            Shape::Null => self.output.push_str(NULL_MARKER),
            Shape::Primitive(primitive) => format::write_primitive(&mut self.output, &primitive),
            Shape::Pointer(address) => self.output.push_str(&format::pointer(address)),
            Shape::Metadata(text) => self.output.push_str(&text),
            Shape::Delegate { signature, target } => {
                self.output.push_str(&signature);
                if let Some(target) = target {
                    self.output.push_str(" @ ");
                    self.output.push_str(&target);
                }
            }
            Shape::Sequence(sequence) => {
                self.render_nested(value, move |renderer| renderer.render_sequence(sequence));
            }
            Shape::Compound(compound) => {
                if nesting >= MAX_INLINE_NESTING {
                    self.output.push_str(RECURSION_LIMIT_MARKER);
                } else {
                    self.render_compound(compound, nesting + 1);
                }
            }
            Shape::Flags(flags) => format::write_flags(&mut self.output, &flags),
            Shape::Object(object) => {
                if self.depth > 0 && !self.options.render_complex_properties {
                    self.write_description(value);
                } else {
                    self.render_nested(value, move |renderer| renderer.render_object(object));
                }
            }
            Shape::Transparent(inner) => {
                if nesting >= MAX_INLINE_NESTING {
                    self.output.push_str(RECURSION_LIMIT_MARKER);
                    return;
                }
                // Wrappers stay on the path too, so a back-edge through a lock
                // is caught before it tries to lock again.
                let identity = value.identity();
                if !self.visited.enter(identity) {
                    self.write_back_edge(value);
                    return;
                }
                let mut scope = Descent::inline(self, identity);
                scope.render_value(inner.get(), annotate, nesting + 1);
            }
            Shape::Failed(error) => {
                // A wrapper we are already inside cannot be borrowed again.
                if self.visited.contains(&value.identity()) {
                    self.write_back_edge(value);
                } else {
                    self.write_error(&error);
                }
            }
        }
    }

    /// Writes the marker for a value already on the active path. The depth
    /// limit takes precedence over the cycle.
    fn write_back_edge(&mut self, value: &dyn Inspect) {
        if self.options.exceeds_depth(self.depth) {
            trace!(depth = self.depth, "recursion limit reached");
            self.output.push_str(RECURSION_LIMIT_MARKER);
        } else {
            self.write_cycle(value);
        }
    }

    fn write_cycle(&mut self, value: &dyn Inspect) {
        trace!(
            type_name = value.type_name(),
            depth = self.depth,
            "circular reference"
        );
        self.output.push_str(CYCLE_MARKER);
    }

    /// Runs `body` one level down with `value` on the active path, or writes
    /// the depth or cycle marker instead.
    fn render_nested<F>(&mut self, value: &dyn Inspect, body: F)
    where
        F: FnOnce(&mut Renderer),
    {
        if self.options.exceeds_depth(self.depth) {
            trace!(depth = self.depth, "recursion limit reached");
            self.output.push_str(RECURSION_LIMIT_MARKER);
            return;
        }

        let identity = value.identity();
        if !self.visited.enter(identity) {
            self.write_cycle(value);
            return;
        }

        let mut scope = Descent::new(self, identity);
        body(&mut *scope);
    }

    fn render_object(&mut self, object: Object<'_>) {
        if object.is_empty() {
            self.output.push_str("{}");
            return;
        }

        let annotate = self.options.render_actual_type;
        self.output.push_str("{ ");
        for (index, property) in object.into_properties().into_iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            self.output.push_str(property.name());
            if self.options.render_member_type {
                self.output.push_str(" (");
                self.output
                    .push_str(&format::short_type_name(property.declared_type()));
                self.output.push(')');
            }
            self.output.push_str(": ");

            match property.resolve() {
                Ok(member) => self.render_value(member.get(), annotate, 0),
                Err(error) => {
                    debug!(%error, "property getter failed");
                    self.write_error(&error);
                }
            }
        }
        self.output.push_str(" }");
    }

    fn render_sequence(&mut self, sequence: Sequence<'_>) {
        let (len, mut items) = sequence.into_parts();
        let annotate = self.options.render_actual_type;
        let mut rendered = 0;

        self.output.push('[');
        while !self.options.truncates_at(rendered) {
            let next = guarded(|| items.next())
                .unwrap_or_else(|panic| Some(Err(FieldError::broken(panic))));
            let Some(item) = next else {
                self.output.push(']');
                return;
            };

            if rendered > 0 {
                self.output.push_str(", ");
            }
            rendered += 1;

            match item {
                Ok(member) => self.render_value(member.get(), annotate, 0),
                Err(error) => {
                    debug!(%error, index = rendered - 1, "sequence item failed");
                    self.write_error(&error);
                    if error.ends_sequence() {
                        self.output.push(']');
                        return;
                    }
                }
            }
        }

        let (remaining, capped) = match len {
            Some(len) => (len.saturating_sub(rendered), false),
            None => count_remaining(&mut items),
        };
        if remaining > 0 {
            if rendered > 0 {
                self.output.push_str(", ");
            }
            self.output.push('+');
            self.output.push_str(&remaining.to_string());
            if capped {
                self.output.push('+');
            }
            self.output.push_str(" more");
        }
        self.output.push(']');
    }

    fn render_compound(&mut self, compound: Compound<'_>, nesting: usize) {
        let annotate = self.options.render_actual_type;
        let kind = compound.kind();
        let items = compound.into_items();

        match kind {
            CompoundKind::Pair => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        self.output.push_str(" => ");
                    }
                    self.render_value(item.get(), annotate, nesting);
                }
            }
            CompoundKind::Tuple => {
                self.output.push('(');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        self.output.push_str(", ");
                    }
                    self.render_value(item.get(), annotate, nesting);
                }
                if items.len() == 1 {
                    self.output.push(',');
                }
                self.output.push(')');
            }
        }
    }

    fn write_actual_type(&mut self, value: &dyn Inspect) {
        match guarded(|| format::short_type_name(value.type_name())) {
            Ok(name) => self.output.push_str(&name),
            Err(_) => self.output.push('?'),
        }
        self.output.push_str(" :: ");
    }

    fn write_description(&mut self, value: &dyn Inspect) {
        match guarded(|| value.describe()) {
            Ok(text) => self.output.push_str(&text),
            Err(error) => self.write_error(&error),
        }
    }

    fn write_error(&mut self, error: &FieldError) {
        self.output.push_str("<Error: ");
        self.output.push_str(&error.to_string());
        self.output.push('>');
    }
}

/// One level of descent: the identity stays on the active path and the
/// depth stays incremented until this guard drops, including on unwind.
///
/// Wrappers descend inline, without a depth step.
struct Descent<'r> {
    renderer: &'r mut Renderer,
    identity: Identity,
    step: usize,
}

impl<'r> Descent<'r> {
    fn new(renderer: &'r mut Renderer, identity: Identity) -> Self {
        Self::with_step(renderer, identity, 1)
    }

    fn inline(renderer: &'r mut Renderer, identity: Identity) -> Self {
        Self::with_step(renderer, identity, 0)
    }

    fn with_step(renderer: &'r mut Renderer, identity: Identity, step: usize) -> Self {
        renderer.depth += step;
        Descent {
            renderer,
            identity,
            step,
        }
    }
}

impl Deref for Descent<'_> {
    type Target = Renderer;

    fn deref(&self) -> &Renderer {
        self.renderer
    }
}

impl DerefMut for Descent<'_> {
    fn deref_mut(&mut self) -> &mut Renderer {
        self.renderer
    }
}

impl Drop for Descent<'_> {
    fn drop(&mut self) {
        self.renderer.depth -= self.step;
        self.renderer.visited.leave(&self.identity);
    }
}

fn has_runtime_type(shape: &Shape<'_>) -> bool {
    !matches!(
        shape,
        Shape::Null | Shape::Transparent(_) | Shape::Failed(_)
    )
}

fn count_remaining(items: &mut Items<'_>) -> (usize, bool) {
    let mut count = 0;
    while count < MAX_COUNTED_ITEMS {
        match guarded(|| items.next()) {
            Ok(Some(Ok(_))) => count += 1,
            Ok(Some(Err(error))) => {
                count += 1;
                if error.ends_sequence() {
                    return (count, false);
                }
            }
            Ok(None) | Err(_) => return (count, false),
        }
    }
    let more = matches!(guarded(|| items.next()), Ok(Some(_)));
    (count, more)
}

/// Returns `true` if `value`, seen through any wrappers, is null.
pub(crate) fn resolves_to_null(value: &dyn Inspect) -> bool {
    fn resolve(value: &dyn Inspect, nesting: usize) -> bool {
        match guarded(|| value.classify()) {
            Ok(Shape::Null) => true,
            Ok(Shape::Transparent(inner)) if nesting < MAX_INLINE_NESTING => {
                resolve(inner.get(), nesting + 1)
            }
            _ => false,
        }
    }
    resolve(value, 0)
}

/// A lazily rendered value, for use with `format!` and logging macros.
///
/// # Examples
///
/// ```rust
/// use propstring::{display, RenderOptions};
///
/// let scores = vec![10, 20, 30];
/// assert_eq!(format!("scores = {}", display(&scores)), "scores = [10, 20, 30]");
///
/// let short = display(&scores).with_options(RenderOptions::new().with_max_collection_item_count(1));
/// assert_eq!(short.to_string(), "[10, +2 more]");
/// ```
pub struct Rendered<'a, T: ?Sized> {
    value: &'a T,
    options: RenderOptions,
}

impl<'a, T: ?Sized> Rendered<'a, T> {
    pub(crate) fn new(value: &'a T) -> Self {
        Rendered {
            value,
            options: RenderOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }
}

impl<T: Inspect + ?Sized> fmt::Display for Rendered<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer::new(self.options);
        renderer.render(self.value);
        f.write_str(&renderer.into_inner())
    }
}

impl<T: Inspect + ?Sized> fmt::Debug for Rendered<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
