//! Coroutine frames
//!
//! A frame is a single suspended computation. Each call to
//! [`CoroutineFrame::resume`] advances it by exactly one logical step and
//! reports what the frame wants the scheduler to do next.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// What a frame produced on its latest step
pub enum Yielded<S> {
    /// Start a child frame; the yielding frame is suspended beneath it
    Nested(Box<dyn CoroutineFrame<S>>),
    /// Suspend for the given number of ticks
    Wait(f32),
    /// Hand a value out to the caller of `update()`
    Signal(S),
    /// The frame has finished and will not be resumed again
    Done,
}

impl<S> Yielded<S> {
    /// Convenience constructor for [`Yielded::Nested`]
    pub fn nested<F>(frame: F) -> Self
    where
        F: CoroutineFrame<S> + 'static,
    {
        Yielded::Nested(Box::new(frame))
    }

    /// Short name of the yield kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Yielded::Nested(_) => "nested",
            Yielded::Wait(_) => "wait",
            Yielded::Signal(_) => "signal",
            Yielded::Done => "done",
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Yielded<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Yielded::Nested(frame) => f.debug_tuple("Nested").field(&frame.name()).finish(),
            Yielded::Wait(d) => f.debug_tuple("Wait").field(d).finish(),
            Yielded::Signal(s) => f.debug_tuple("Signal").field(s).finish(),
            Yielded::Done => f.write_str("Done"),
        }
    }
}

/// A resumable step sequence
pub trait CoroutineFrame<S> {
    /// Advance by one step
    fn resume(&mut self) -> Yielded<S>;

    /// Identity class of the code that created this frame
    fn producer(&self) -> ProducerId {
        ProducerId::anonymous()
    }

    fn name(&self) -> &str {
        "coroutine"
    }
}

impl<S, F> CoroutineFrame<S> for F
where
    F: FnMut() -> Yielded<S>,
{
    fn resume(&mut self) -> Yielded<S> {
        (self)()
    }
}

/// Identity of a frame within one stack, assigned on push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity class of a frame's creator (a plugin, a module, or the host itself)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProducerId(Arc<str>);

impl ProducerId {
    pub const ANONYMOUS: &'static str = "anonymous";

    pub fn new(id: impl AsRef<str>) -> Self {
        ProducerId(Arc::from(id.as_ref()))
    }

    pub fn anonymous() -> Self {
        ProducerId::new(Self::ANONYMOUS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProducerId {
    fn from(id: &str) -> Self {
        ProducerId::new(id)
    }
}

impl From<String> for ProducerId {
    fn from(id: String) -> Self {
        ProducerId(Arc::from(id))
    }
}

impl fmt::Display for ProducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ProducerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProducerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ProducerId::from)
    }
}

/// Snapshot of a stack slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    pub id: FrameId,
    pub producer: ProducerId,
    pub name: Arc<str>,
}

impl fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} ({})", self.name, self.id, self.producer)
    }
}

/// Attaches a name and producer to any frame
pub struct Named<F> {
    name: String,
    producer: ProducerId,
    inner: F,
}

impl<F> Named<F> {
    pub fn new(name: impl Into<String>, producer: impl Into<ProducerId>, inner: F) -> Self {
        Named {
            name: name.into(),
            producer: producer.into(),
            inner,
        }
    }
}

impl<S, F: CoroutineFrame<S>> CoroutineFrame<S> for Named<F> {
    fn resume(&mut self) -> Yielded<S> {
        self.inner.resume()
    }

    fn producer(&self) -> ProducerId {
        self.producer.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Frame backed by an iterator; reports `Done` once the iterator is exhausted
pub struct IterFrame<I> {
    iter: I,
}

impl<S, I> CoroutineFrame<S> for IterFrame<I>
where
    I: Iterator<Item = Yielded<S>>,
{
    fn resume(&mut self) -> Yielded<S> {
        self.iter.next().unwrap_or(Yielded::Done)
    }
}

/// Wrap a lazy sequence of yields as a frame
pub fn from_iter<S, I>(iter: I) -> IterFrame<I::IntoIter>
where
    I: IntoIterator<Item = Yielded<S>>,
{
    IterFrame { iter: iter.into_iter() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_is_a_frame() {
        let mut count = 0;
        let mut frame = move || {
            count += 1;
            if count < 3 {
                Yielded::<()>::Wait(0.0)
            } else {
                Yielded::Done
            }
        };
        assert!(matches!(frame.resume(), Yielded::Wait(_)));
        assert!(matches!(frame.resume(), Yielded::Wait(_)));
        assert!(matches!(frame.resume(), Yielded::Done));
        assert_eq!(CoroutineFrame::<()>::producer(&frame), ProducerId::anonymous());
    }

    #[test]
    fn iter_frame_reports_done_when_exhausted() {
        let mut frame = from_iter(vec![Yielded::Signal(1), Yielded::Signal(2)]);
        assert!(matches!(frame.resume(), Yielded::Signal(1)));
        assert!(matches!(frame.resume(), Yielded::Signal(2)));
        assert!(matches!(frame.resume(), Yielded::Done));
        assert!(matches!(frame.resume(), Yielded::Done));
    }

    #[test]
    fn named_overrides_identity() {
        let frame = Named::new("intro", "host", from_iter(Vec::<Yielded<()>>::new()));
        assert_eq!(CoroutineFrame::<()>::name(&frame), "intro");
        assert_eq!(CoroutineFrame::<()>::producer(&frame).as_str(), "host");
    }

    #[test]
    fn yield_kind_and_debug() {
        let nested: Yielded<()> = Yielded::nested(Named::new("child", "mod", from_iter(Vec::<Yielded<()>>::new())));
        assert_eq!(nested.kind(), "nested");
        assert_eq!(format!("{:?}", nested), "Nested(\"child\")");
        assert_eq!(format!("{:?}", Yielded::<()>::Wait(1.5)), "Wait(1.5)");
    }

    #[test]
    fn frame_info_display() {
        let info = FrameInfo {
            id: FrameId(3),
            producer: ProducerId::new("celeste"),
            name: Arc::from("intro"),
        };
        assert_eq!(info.to_string(), "intro#3 (celeste)");
    }
}
