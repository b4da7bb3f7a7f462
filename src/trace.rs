//! Call tracing for fallible functions.
//!
//! A [`Tracer`] wraps a call so that its invocation (name plus rendered
//! arguments) and its outcome (returned value or raised error) are emitted
//! to a sink, without changing the call's behavior: values come back
//! untouched and errors propagate unmodified. Two sink shapes exist:
//! plain text streams ([`StreamSink`]) and the structured `tracing`
//! subscriber ([`LogSink`]).

use std::fmt;
use std::fs::{File, OpenOptions};
use std::future::Future;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, info};

/// Severity of a single trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceLevel {
    Info,
    Error,
}

/// Destination for trace records.
pub trait TraceSink {
    fn emit(&self, level: TraceLevel, message: &str);
}

impl<S: TraceSink + ?Sized> TraceSink for &S {
    fn emit(&self, level: TraceLevel, message: &str) {
        (**self).emit(level, message);
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Arc<S> {
    fn emit(&self, level: TraceLevel, message: &str) {
        (**self).emit(level, message);
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Box<S> {
    fn emit(&self, level: TraceLevel, message: &str) {
        (**self).emit(level, message);
    }
}

/// Text sink: each record becomes one `INFO: `/`ERROR: ` prefixed line.
///
/// Writes on a shared sink are sequenced through the internal mutex.
pub struct StreamSink<W: Write> {
    inner: Mutex<W>,
}

impl<W: Write> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        StreamSink {
            inner: Mutex::new(writer),
        }
    }

    /// Consumes the sink and hands back the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl StreamSink<io::Stdout> {
    pub fn stdout() -> Self {
        StreamSink::new(io::stdout())
    }
}

impl StreamSink<File> {
    /// Appends records to a log file, creating it on first use.
    pub fn file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(StreamSink::new(file))
    }
}

impl<W: Write> TraceSink for StreamSink<W> {
    fn emit(&self, level: TraceLevel, message: &str) {
        let prefix = match level {
            TraceLevel::Info => "INFO",
            TraceLevel::Error => "ERROR",
        };
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        // A failed sink write has nowhere to report itself; the record is
        // dropped rather than failing the traced call.
        let _ = writeln!(writer, "{prefix}: {message}");
    }
}

/// Structured sink: forwards each record as-is to the `tracing`
/// subscriber at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn emit(&self, level: TraceLevel, message: &str) {
        match level {
            TraceLevel::Info => info!("{message}"),
            TraceLevel::Error => error!("{message}"),
        }
    }
}

/// Implemented by errors the tracer can name in its records.
pub trait Traceable: fmt::Display {
    /// Short kind name, e.g. `InvalidArgument`.
    fn kind(&self) -> &'static str;
}

/// Argument tuples renderable into a call signature.
///
/// Each element is rendered with its `Debug` representation and the
/// elements are comma-joined, so `(2, 3)` renders as `2, 3` and
/// `(vec!["USD"],)` as `["USD"]`.
pub trait CallArgs {
    fn render(&self) -> String;
}

impl CallArgs for () {
    fn render(&self) -> String {
        String::new()
    }
}

macro_rules! impl_call_args {
    ($($arg:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($arg: fmt::Debug),+> CallArgs for ($($arg,)+) {
            fn render(&self) -> String {
                let ($($arg,)+) = self;
                let parts = [$(format!("{:?}", $arg)),+];
                parts.join(", ")
            }
        }
    };
}

impl_call_args!(A);
impl_call_args!(A, B);
impl_call_args!(A, B, C);
impl_call_args!(A, B, C, D);

/// Wraps function calls with entry and outcome records on a sink.
pub struct Tracer<S> {
    sink: S,
}

impl Default for Tracer<StreamSink<io::Stdout>> {
    fn default() -> Self {
        Tracer::new(StreamSink::stdout())
    }
}

impl<S: TraceSink> Tracer<S> {
    pub fn new(sink: S) -> Self {
        Tracer { sink }
    }

    /// Runs `call`, emitting `Running <name>(<args>)` on entry and then
    /// either the returned value or the raised error. The outcome itself
    /// passes through untouched.
    pub fn call<A, T, E, F>(&self, name: &str, args: &A, call: F) -> Result<T, E>
    where
        A: CallArgs,
        T: fmt::Debug,
        E: Traceable,
        F: FnOnce() -> Result<T, E>,
    {
        self.enter(name, args);
        self.exit(name, call())
    }

    /// Async variant of [`Tracer::call`]; the future is awaited inline
    /// between the entry and outcome records.
    pub async fn call_async<A, T, E, Fut>(&self, name: &str, args: &A, fut: Fut) -> Result<T, E>
    where
        A: CallArgs,
        T: fmt::Debug,
        E: Traceable,
        Fut: Future<Output = Result<T, E>>,
    {
        self.enter(name, args);
        self.exit(name, fut.await)
    }

    /// Decorator form: turns `f` into a function with the same call shape
    /// whose every invocation goes through the same records as
    /// [`Tracer::call`].
    pub fn wrap<A, T, E, F>(self, name: &'static str, f: F) -> impl Fn(A) -> Result<T, E>
    where
        A: CallArgs,
        T: fmt::Debug,
        E: Traceable,
        F: Fn(A) -> Result<T, E>,
    {
        move |args| {
            self.enter(name, &args);
            self.exit(name, f(args))
        }
    }

    fn enter<A: CallArgs>(&self, name: &str, args: &A) {
        self.sink
            .emit(TraceLevel::Info, &format!("Running {name}({})", args.render()));
    }

    fn exit<T: fmt::Debug, E: Traceable>(&self, name: &str, outcome: Result<T, E>) -> Result<T, E> {
        match &outcome {
            Ok(value) => self
                .sink
                .emit(TraceLevel::Info, &format!("{name} returned {value:?}")),
            Err(err) => self.sink.emit(
                TraceLevel::Error,
                &format!("Error in {name}: {}: {err}", err.kind()),
            ),
        }
        outcome
    }
}
