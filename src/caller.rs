// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Call-site attribution.
//!
//! File and line are propagated by the compiler through `#[track_caller]` on every public
//! emission method. The function name is found by walking the stack: frames are skipped
//! until the walk enters this crate, then this crate's frames and transparent runtime frames
//! are skipped too, and the first frame left is the caller.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::path::Path;

const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

// Frames from these crates never own a log call.
const TRANSPARENT_PREFIXES: &[&str] = &[
    "core::",
    "std::",
    "alloc::",
    "test::",
    "log::",
    "backtrace::",
    "__rust_",
];

const UNKNOWN_FUNCTION: &str = "unknown";

/// The source location a log record is attributed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    file: Cow<'static, str>,
    line: u32,
    function: Cow<'static, str>,
}

impl Caller {
    /// Creates a caller from its parts.
    ///
    /// `file` is reduced to its final path segment and `function` to its leaf name.
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        line: u32,
        function: impl Into<Cow<'static, str>>,
    ) -> Self {
        let file = file.into();
        let stripped = match base_name(&file) {
            Some(base) if base.len() != file.len() => Some(Cow::Owned(base.to_owned())),
            _ => None,
        };
        let file = stripped.unwrap_or(file);

        let function = function.into();
        let stripped = match leaf_function(&function) {
            Some(leaf) if leaf.len() != function.len() => Some(Cow::Owned(leaf.to_owned())),
            Some(_) => None,
            None => Some(Cow::Borrowed(UNKNOWN_FUNCTION)),
        };
        let function = stripped.unwrap_or(function);

        Self {
            file,
            line,
            function,
        }
    }

    /// The base name of the source file.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The line in the source file.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The leaf name of the calling function, without qualifiers.
    pub fn function(&self) -> &str {
        &self.function
    }
}

/// Formats as `file:line:function()`.
impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}()", self.file, self.line, self.function)
    }
}

/// Resolves the caller of the public method that `location` was tracked from.
pub(crate) fn resolve(location: &'static Location<'static>) -> Caller {
    let function = resolve_function().map_or(Cow::Borrowed(UNKNOWN_FUNCTION), Cow::Owned);
    Caller::new(location.file(), location.line(), function)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Own,
    OwnTest,
    Transparent,
    Foreign,
}

fn classify(symbol: &str) -> FrameKind {
    // `<Self as Trait>::method` is foreign if either side is, then ours if either side is.
    if let Some((self_ty, trait_path)) = qualified_self(symbol) {
        let sides = [Some(self_ty), trait_path];
        let mut kinds = sides.into_iter().flatten().map(classify_path);
        return match (kinds.next(), kinds.next()) {
            (Some(FrameKind::Foreign), _) | (_, Some(FrameKind::Foreign)) => FrameKind::Foreign,
            (Some(own @ (FrameKind::Own | FrameKind::OwnTest)), _) => own,
            (_, Some(kind)) | (Some(kind), None) => kind,
            (None, None) => FrameKind::Foreign,
        };
    }

    classify_path(symbol)
}

fn classify_path(path: &str) -> FrameKind {
    if path.starts_with(CRATE_PREFIX) {
        if path_segments(path).any(|segment| segment == "tests") {
            FrameKind::OwnTest
        } else {
            FrameKind::Own
        }
    } else if TRANSPARENT_PREFIXES.iter().any(|p| path.starts_with(p)) {
        FrameKind::Transparent
    } else {
        FrameKind::Foreign
    }
}

/// Splits `<Self as Trait>::rest` into its `Self` and `Trait` paths.
fn qualified_self(symbol: &str) -> Option<(&str, Option<&str>)> {
    let inner = symbol.strip_prefix('<')?;
    let end = depth_positions(inner).find(|&(_, depth)| depth < 0)?.0;
    let inner = &inner[..end];

    let split = depth_positions(inner)
        .find(|&(idx, depth)| depth == 0 && inner.as_bytes()[idx..].starts_with(b" as "))
        .map(|(idx, _)| idx);
    Some(match split {
        Some(idx) => (&inner[..idx], Some(&inner[idx + 4..])),
        None => (inner, None),
    })
}

/// Yields each byte offset of `s` with the angle-bracket depth after that byte.
fn depth_positions(s: &str) -> impl Iterator<Item = (usize, i32)> + '_ {
    let mut depth = 0;
    let mut prev = 0u8;
    s.bytes().enumerate().map(move |(idx, b)| {
        match b {
            b'<' => depth += 1,
            // `->` in fn pointer types is not a bracket.
            b'>' if prev != b'-' => depth -= 1,
            _ => {}
        }
        prev = b;
        (idx, depth)
    })
}

/// Splits a path at the `::` separators outside of any generic argument list.
fn path_segments(path: &str) -> impl Iterator<Item = &str> + '_ {
    let mut bounds = depth_positions(path)
        .filter(|&(idx, depth)| depth == 0 && path.as_bytes()[idx..].starts_with(b"::"))
        .map(|(idx, _)| idx)
        .peekable();
    let mut start = 0;
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        while bounds.next_if(|&idx| idx < start).is_some() {}
        match bounds.next() {
            Some(idx) => {
                let segment = &path[start..idx];
                start = idx + 2;
                Some(segment)
            }
            None => {
                done = true;
                Some(&path[start..])
            }
        }
    })
}

pub(crate) fn resolve_function() -> Option<String> {
    let mut entered = false;
    let mut found = None;

    backtrace::trace(|frame| {
        // Inlined frames resolve to several symbols, innermost first.
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            let Some(name) = symbol.name() else {
                return;
            };
            let name = format!("{name:#}");

            match classify(&name) {
                FrameKind::Own => entered = true,
                FrameKind::OwnTest | FrameKind::Foreign if entered => found = Some(name),
                FrameKind::OwnTest | FrameKind::Foreign | FrameKind::Transparent => {}
            }
        });
        found.is_none()
    });

    found
}

fn base_name(file: &str) -> Option<&str> {
    Path::new(file).file_name().and_then(|name| name.to_str())
}

/// Strips a symbol down to the name of the innermost named function.
pub(crate) fn leaf_function(symbol: &str) -> Option<&str> {
    // Qualifiers like `<Type as Trait>` and generic lists like `<u32>` are whole segments here.
    path_segments(symbol)
        .map(str::trim)
        .filter(|segment| {
            !segment.is_empty() && !segment.starts_with('{') && !segment.starts_with('<')
        })
        .last()
}

/// Captures the current source location and enclosing function as a [`Caller`].
///
/// Use with [`Entry::with_caller`](crate::Entry::with_caller) to pin the attribution of an
/// entry that is stored and emitted away from where it was built.
///
/// # Examples
///
/// ```
/// fn handler() -> fieldlog::Caller {
///     fieldlog::caller!()
/// }
///
/// let caller = handler();
/// assert_eq!(caller.function(), "handler");
/// ```
#[macro_export]
macro_rules! caller {
    () => {{
        fn __fieldlog_here() {}
        fn __fieldlog_type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __fieldlog_type_name_of(__fieldlog_here);
        let name = name.strip_suffix("::__fieldlog_here").unwrap_or(name);
        $crate::Caller::new(::std::file!(), ::std::line!(), name)
    }};
}
