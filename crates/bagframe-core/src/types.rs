use eyre::Result;
use indexmap::IndexMap;
use std::fmt;

/// A sample value stored in a stream and written to the table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            Value::Text(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl fmt::Display for Value {
    /// Formats numbers with their shortest round-trip digits. Integral
    /// floats keep a trailing `.0`, magnitudes outside `[1e-4, 1e16)` use
    /// a signed two-digit exponent (`1e-05`, `1.5e+16`) and NaN is an
    /// empty cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(value) if value.is_nan() => Ok(()),
            Value::Number(value) => write_float(f, *value),
            Value::Text(text) => f.write_str(text),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    // Shortest round-trip digits, e.g. `1.5e16` or `0e0`.
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        // Infinities.
        return write!(f, "{value}");
    };
    let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

    if (-4..16).contains(&exponent) {
        if value.fract() == 0.0 {
            write!(f, "{value:.1}")
        } else {
            write!(f, "{value}")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// A leaf value produced by flattening a message.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

/// Flattened message fields keyed by `/`-joined paths, in declaration
/// order.
pub type FieldMap = IndexMap<String, FieldValue>;

/// Turns a typed message into flat key/value pairs.
///
/// Nested structures are joined with `/` (`header/stamp/secs`) and list
/// elements use their position (`orientation_covariance/0`). The output
/// must only depend on the message shape and content.
pub trait Flatten {
    fn flatten(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        self.flatten_into(&mut FieldWriter::new(&mut fields));
        fields
    }

    fn flatten_into(&self, out: &mut FieldWriter<'_>);
}

/// Helper used by [Flatten] implementations to emit nested fields.
pub struct FieldWriter<'a> {
    fields: &'a mut FieldMap,
    prefix: String,
}

impl<'a> FieldWriter<'a> {
    pub fn new(fields: &'a mut FieldMap) -> Self {
        Self {
            fields,
            prefix: String::new(),
        }
    }

    fn key(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.prefix, name)
        }
    }

    pub fn int(&mut self, name: &str, value: impl Into<i64>) -> &mut Self {
        let key = self.key(name);
        self.fields.insert(key, FieldValue::Int(value.into()));
        self
    }

    pub fn float(&mut self, name: &str, value: f64) -> &mut Self {
        let key = self.key(name);
        self.fields.insert(key, FieldValue::Float(value));
        self
    }

    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        let key = self.key(name);
        self.fields.insert(key, FieldValue::Text(value.to_string()));
        self
    }

    pub fn bytes(&mut self, name: &str, value: &[u8]) -> &mut Self {
        let key = self.key(name);
        self.fields.insert(key, FieldValue::Bytes(value.to_vec()));
        self
    }

    pub fn floats(&mut self, name: &str, values: &[f64]) -> &mut Self {
        self.scope(name, |out| {
            for (index, value) in values.iter().enumerate() {
                out.float(&index.to_string(), *value);
            }
        })
    }

    /// Emits a nested value under `name`.
    pub fn nested<T: Flatten + ?Sized>(&mut self, name: &str, value: &T) -> &mut Self {
        self.scope(name, |out| value.flatten_into(out))
    }

    pub fn scope(&mut self, name: &str, f: impl FnOnce(&mut FieldWriter<'_>)) -> &mut Self {
        let prefix = self.key(name);
        let mut child = FieldWriter {
            fields: &mut *self.fields,
            prefix,
        };
        f(&mut child);
        self
    }
}

/// Basic statistics about one topic in a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicInfo {
    pub msg_type: String,
    pub message_count: usize,
    /// Recording time of the first message in seconds.
    pub first_time: Option<f64>,
    /// Recording time of the last message in seconds.
    pub last_time: Option<f64>,
}

impl TopicInfo {
    pub fn new(msg_type: impl Into<String>) -> Self {
        Self {
            msg_type: msg_type.into(),
            message_count: 0,
            first_time: None,
            last_time: None,
        }
    }

    /// Accounts for one more message recorded at `time`.
    pub fn observe(&mut self, time: f64) {
        self.message_count += 1;
        self.first_time = Some(self.first_time.map_or(time, |t| t.min(time)));
        self.last_time = Some(self.last_time.map_or(time, |t| t.max(time)));
    }
}

/// One message read from a recording.
#[derive(Debug, Clone)]
pub struct Record<M> {
    pub topic: String,
    pub message: M,
    /// Recording (receive) time in seconds.
    pub time: f64,
}

/// The iterator returned by [RecordSource::records].
pub type RecordIter<'a, M> = Box<dyn Iterator<Item = Result<Record<M>>> + 'a>;

/// A recorded log that can be enumerated and replayed.
pub trait RecordSource {
    type Message: Flatten;

    /// Lists every topic in the recording with its statistics.
    fn topics(&mut self) -> Result<IndexMap<String, TopicInfo>>;

    /// Replays messages on the given topics in recording order.
    fn records(&mut self, topics: &[String]) -> Result<RecordIter<'_, Self::Message>>;
}
