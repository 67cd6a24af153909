//! Compile-time layout constants and the per-array `Config`.
use slog::{Discard, Logger};
use std::fmt;
use std::mem::size_of;

/// Number of bits in one storage word.  Bit `k` lives in word `k / BITS_PER_WORD` at offset
/// `k % BITS_PER_WORD`, offset 0 being the least significant bit.
pub const BITS_PER_WORD: usize = size_of::<u64>() * 8; //64 bits

/// What to do when `copy_within`/`swap_within` are handed two ranges that share bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Don't look.  The result of an overlapping copy or swap is unspecified (but never memory
    /// unsafe).  Debug builds still assert.
    Unchecked,

    /// Fail with `Error::Overlap` before any bit is touched.
    Reject,
}

impl Default for OverlapPolicy {
    fn default() -> OverlapPolicy {
        OverlapPolicy::Unchecked
    }
}

/// Per-array settings.  The default is unchecked overlap and a logger which discards everything.
#[derive(Clone)]
pub struct Config {
    pub(crate) overlap: OverlapPolicy,
    pub(crate) logger: Logger,
}

impl Config {
    pub fn overlap(mut self, overlap: OverlapPolicy) -> Config {
        self.overlap = overlap;
        self
    }

    /// Routes the array's log records to `logger`.  Construction and every range copy or swap log
    /// at debug level, the latter with the strategy chosen.  Rejected overlaps log a warning.
    pub fn logger(mut self, logger: Logger) -> Config {
        self.logger = logger;
        self
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            overlap: OverlapPolicy::default(),
            logger: Logger::root(Discard, o!()),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("overlap", &self.overlap)
            .finish()
    }
}

/// A drain which renders each record as `LEVL message key=value ...` into a shared buffer.
#[cfg(test)]
pub(crate) struct Capture(pub std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[cfg(test)]
impl Capture {
    /// A `Config` logging into a fresh buffer, and that buffer.
    pub fn config() -> (Config, std::sync::Arc<std::sync::Mutex<Vec<String>>>) {
        let lines = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let logger = Logger::root(Capture(lines.clone()), o!());
        (Config::default().logger(logger), lines)
    }
}

#[cfg(test)]
impl slog::Drain for Capture {
    type Ok = ();
    type Err = slog::Never;

    fn log(
        &self,
        record: &slog::Record,
        _values: &slog::OwnedKVList,
    ) -> std::result::Result<(), slog::Never> {
        use slog::KV;

        let mut line = format!("{} {}", record.level().as_short_str(), record.msg());
        let _ = record.kv().serialize(record, &mut KeyValues(&mut line));
        self.0.lock().unwrap().push(line);
        Ok(())
    }
}

#[cfg(test)]
struct KeyValues<'a>(&'a mut String);

#[cfg(test)]
impl<'a> slog::Serializer for KeyValues<'a> {
    fn emit_arguments(&mut self, key: slog::Key, val: &fmt::Arguments) -> slog::Result {
        self.0.push_str(&format!(" {}={}", key, val));
        Ok(())
    }
}
