//! Pull-style input sources feeding code units or raw bytes to a parser.
//!
//! One contract, several backings: an in-memory slice, an arbitrary
//! iterator, and a streaming byte reader. No operation returns an error to
//! the caller; transport failures are captured, made sticky and surfaced
//! through [`Source::is_error`] plus permanent EOF.
use std::io::Read;
use std::marker::PhantomData;

/// A uniform reader over code units of some width.
pub trait Source {
    /// The code-unit type produced by this source.
    type Value: Copy;

    /// Look at the next unit without consuming it.
    fn peek(&mut self) -> Option<Self::Value>;

    /// Consume and return the next unit.
    fn get_character(&mut self) -> Option<Self::Value>;

    /// Advance up to `count` units, setting EOF on a short skip.
    fn ignore(&mut self, count: usize);

    /// Copy up to `dst.len()` units into `dst`, setting EOF on a short
    /// read. Returns the number of units copied.
    fn read(&mut self, dst: &mut [Self::Value]) -> usize;

    /// Monotonically non-decreasing position: the 1-based index of the
    /// next unit for buffer sources, the count of units consumed for
    /// streaming sources.
    fn position(&self) -> usize;

    /// Whether the end of input was hit.
    fn eof(&self) -> bool;

    /// Whether the underlying transport failed. Sticky.
    fn is_error(&self) -> bool;
}

/// The always-empty source backing "null" readers so every method stays
/// total.
#[derive(Debug, Default)]
pub struct NullSource<T> {
    _marker: PhantomData<T>,
}

impl<T> NullSource<T> {
    #[must_use]
    pub fn new() -> NullSource<T> {
        NullSource {
            _marker: PhantomData,
        }
    }
}

impl<T: Copy> Source for NullSource<T> {
    type Value = T;

    fn peek(&mut self) -> Option<T> {
        None
    }
    fn get_character(&mut self) -> Option<T> {
        None
    }
    fn ignore(&mut self, _count: usize) {}
    fn read(&mut self, _dst: &mut [T]) -> usize {
        0
    }
    fn position(&self) -> usize {
        0
    }
    fn eof(&self) -> bool {
        true
    }
    fn is_error(&self) -> bool {
        false
    }
}

/// In-memory buffer source. The first unit reports position 1.
#[derive(Debug)]
pub struct SliceSource<'a, T> {
    data: &'a [T],
    cursor: usize,
    eof: bool,
}

impl<'a, T: Copy> SliceSource<'a, T> {
    #[must_use]
    pub fn new(data: &'a [T]) -> SliceSource<'a, T> {
        SliceSource {
            data,
            cursor: 0,
            eof: data.is_empty(),
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }
}

impl<'a> SliceSource<'a, u8> {
    /// Convenience constructor for textual input.
    #[must_use]
    pub fn from_text(text: &'a str) -> SliceSource<'a, u8> {
        SliceSource::new(text.as_bytes())
    }
}

impl<T: Copy> Source for SliceSource<'_, T> {
    type Value = T;

    fn peek(&mut self) -> Option<T> {
        self.data.get(self.cursor).copied()
    }

    fn get_character(&mut self) -> Option<T> {
        match self.data.get(self.cursor) {
            Some(&unit) => {
                self.cursor += 1;
                Some(unit)
            }
            None => {
                self.eof = true;
                None
            }
        }
    }

    fn ignore(&mut self, count: usize) {
        let len = if self.remaining() < count {
            self.eof = true;
            self.remaining()
        } else {
            count
        };
        self.cursor += len;
    }

    fn read(&mut self, dst: &mut [T]) -> usize {
        let len = if self.remaining() < dst.len() {
            self.eof = true;
            self.remaining()
        } else {
            dst.len()
        };
        dst[..len].copy_from_slice(&self.data[self.cursor..self.cursor + len]);
        self.cursor += len;
        len
    }

    fn position(&self) -> usize {
        self.cursor + 1
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn is_error(&self) -> bool {
        false
    }
}

/// Source pulling units out of any iterator; position counts consumed
/// units.
pub struct IteratorSource<I: Iterator> {
    iterator: std::iter::Peekable<I>,
    position: usize,
    eof: bool,
}

impl<I: Iterator> std::fmt::Debug for IteratorSource<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IteratorSource")
            .field("position", &self.position)
            .field("eof", &self.eof)
            .finish()
    }
}

impl<I> IteratorSource<I>
where
    I: Iterator,
    I::Item: Copy,
{
    pub fn new(iterator: I) -> IteratorSource<I> {
        IteratorSource {
            iterator: iterator.peekable(),
            position: 0,
            eof: false,
        }
    }
}

impl<I> Source for IteratorSource<I>
where
    I: Iterator,
    I::Item: Copy,
{
    type Value = I::Item;

    fn peek(&mut self) -> Option<I::Item> {
        self.iterator.peek().copied()
    }

    fn get_character(&mut self) -> Option<I::Item> {
        match self.iterator.next() {
            Some(unit) => {
                self.position += 1;
                Some(unit)
            }
            None => {
                self.eof = true;
                None
            }
        }
    }

    fn ignore(&mut self, count: usize) {
        for _ in 0..count {
            if self.get_character().is_none() {
                return;
            }
        }
    }

    fn read(&mut self, dst: &mut [I::Item]) -> usize {
        let mut actual = 0;
        while actual < dst.len() {
            match self.get_character() {
                Some(unit) => {
                    dst[actual] = unit;
                    actual += 1;
                }
                None => break,
            }
        }
        if actual < dst.len() {
            self.eof = true;
        }
        actual
    }

    fn position(&self) -> usize {
        self.position
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn is_error(&self) -> bool {
        false
    }
}

/// Streaming byte source over any [`Read`] implementation.
///
/// Transport errors never escape: the first failure marks the source as
/// errored and at EOF, and every later operation behaves like reading an
/// empty source.
#[derive(Debug)]
pub struct ReadSource<R: Read> {
    reader: R,
    peeked: Option<u8>,
    position: usize,
    eof: bool,
    error: bool,
}

impl<R: Read> ReadSource<R> {
    pub fn new(reader: R) -> ReadSource<R> {
        ReadSource {
            reader,
            peeked: None,
            position: 0,
            eof: false,
            error: false,
        }
    }

    fn pull(&mut self) -> Option<u8> {
        if self.eof {
            return None;
        }
        let mut byte = [0_u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    self.eof = true;
                    return None;
                }
                Ok(_) => return Some(byte[0]),
                Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => {
                    self.error = true;
                    self.eof = true;
                    return None;
                }
            }
        }
    }
}

impl<R: Read> Source for ReadSource<R> {
    type Value = u8;

    fn peek(&mut self) -> Option<u8> {
        if self.peeked.is_none() {
            self.peeked = self.pull();
        }
        self.peeked
    }

    fn get_character(&mut self) -> Option<u8> {
        let unit = match self.peeked.take() {
            Some(unit) => Some(unit),
            None => self.pull(),
        };
        if unit.is_some() {
            self.position += 1;
        }
        unit
    }

    fn ignore(&mut self, count: usize) {
        for _ in 0..count {
            if self.get_character().is_none() {
                return;
            }
        }
    }

    fn read(&mut self, dst: &mut [u8]) -> usize {
        let mut actual = 0;
        if let Some(unit) = self.peeked.take() {
            if dst.is_empty() {
                self.peeked = Some(unit);
                return 0;
            }
            dst[0] = unit;
            self.position += 1;
            actual = 1;
        }
        while actual < dst.len() && !self.eof {
            match self.reader.read(&mut dst[actual..]) {
                Ok(0) => self.eof = true,
                Ok(n) => {
                    self.position += n;
                    actual += n;
                }
                Err(error) if error.kind() == std::io::ErrorKind::Interrupted => {}
                Err(_) => {
                    self.error = true;
                    self.eof = true;
                }
            }
        }
        if actual < dst.len() {
            self.eof = true;
        }
        actual
    }

    fn position(&self) -> usize {
        self.position
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn is_error(&self) -> bool {
        self.error
    }
}

/// Bulk reader over any source, chunked so a hostile length cannot force a
/// single huge allocation.
///
/// Two paths, depending on what the target container supports: a fast one
/// for contiguous buffers that expose their storage, copying whole chunks
/// through [`Source::read`], and a per-unit one for push-only containers.
#[derive(Debug)]
pub struct SourceReader;

impl SourceReader {
    pub const MAX_BUFFER_LENGTH: usize = 16_384;

    /// Read up to `length` units into `target`, growing it as needed and
    /// copying chunk-wise into its storage. Stops at EOF and returns the
    /// number of units actually read.
    pub fn read_into<S>(source: &mut S, target: &mut Vec<S::Value>, length: usize) -> usize
    where
        S: Source,
        S::Value: Copy + Default,
    {
        let mut unread = length;
        let mut chunk = Self::MAX_BUFFER_LENGTH.min(unread);
        while chunk > 0 && !source.eof() {
            let offset = target.len();
            target.resize(offset + chunk, S::Value::default());
            let actual = source.read(&mut target[offset..]);
            target.truncate(offset + actual);
            unread -= actual;
            chunk = Self::MAX_BUFFER_LENGTH.min(unread);
        }
        length - unread
    }

    /// The slow path for push-only containers: same chunked accounting,
    /// one [`Source::get_character`] per unit.
    pub fn read_into_extend<S, C>(source: &mut S, target: &mut C, length: usize) -> usize
    where
        S: Source,
        C: Extend<S::Value>,
    {
        let mut unread = length;
        let mut chunk = Self::MAX_BUFFER_LENGTH.min(unread);
        while chunk > 0 && !source.eof() {
            let mut actual = 0;
            while actual < chunk {
                match source.get_character() {
                    Some(unit) => {
                        target.extend(std::iter::once(unit));
                        actual += 1;
                    }
                    None => break,
                }
            }
            unread -= actual;
            chunk = Self::MAX_BUFFER_LENGTH.min(unread);
        }
        length - unread
    }
}
