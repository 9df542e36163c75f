//! Tagged value tree with source positions.

/// A 1-based line/column location in the source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single node of the tree: its shape plus where it started.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonValue {
    /// The node's shape and payload.
    pub kind: ValueKind,
    /// Position of the first character of the node.
    pub position: Position,
}

/// The shape of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Object(JsonObject),
    Array(Vec<JsonValue>),
    String(String),
    /// Numbers keep their source text; descriptors never do arithmetic on them.
    Number(String),
    Bool(bool),
    Null,
}

impl JsonValue {
    pub fn new(kind: ValueKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match &self.kind {
            ValueKind::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match &self.kind {
            ValueKind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ValueKind::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null)
    }

    /// The elements of an array whose members are all strings.
    pub fn as_string_array(&self) -> Option<Vec<String>> {
        self.as_array()?
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    }

    /// Human-readable name of the node's shape, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Object(_) => "object",
            ValueKind::Array(_) => "array",
            ValueKind::String(_) => "string",
            ValueKind::Number(_) => "number",
            ValueKind::Bool(_) => "boolean",
            ValueKind::Null => "null",
        }
    }
}

/// An object node. Keys keep document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    entries: Vec<(String, JsonValue)>,
}

impl JsonObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member. A repeated key replaces the earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The member as a string, or `None` if missing or not a string.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(JsonValue::as_str)
    }

    /// The member as an object, or `None` if missing or not an object.
    pub fn object(&self, key: &str) -> Option<&JsonObject> {
        self.get(key).and_then(JsonValue::as_object)
    }

    /// The member as a boolean, or `None` if missing or not a boolean.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(JsonValue::as_bool)
    }

    /// The member as a list of strings, or `None` if missing, not an
    /// array, or holding anything other than strings.
    pub fn string_array(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).and_then(JsonValue::as_string_array)
    }
}

impl FromIterator<(String, JsonValue)> for JsonObject {
    fn from_iter<T: IntoIterator<Item = (String, JsonValue)>>(iter: T) -> Self {
        let mut object = JsonObject::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}
