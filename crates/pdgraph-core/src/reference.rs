//! Path context and durable node references.
//!
//! A [`PathContext`] is the ordered list of `{field, args}` frames walked from
//! the root to reach a node. Entity identity is always re-derived from it,
//! never from fetched data, which is what lets a [`GraphRef`] be handed out
//! and resolved again in a later, unrelated invocation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{PdgError, PdgResult};

pub const INCIDENTS: &str = "incidents";
pub const ALERTS: &str = "alerts";
pub const ONE: &str = "one";
pub const PAGE: &str = "page";

/// Operation key of an incident reached through `root.incidents.one`.
pub const INCIDENT_OP: &str = "incidents.one";

/// Operation key of an alert reached through `root.incidents.one.alerts.one`.
pub const ALERT_OP: &str = "incidents.one.alerts.one";

/// One traversal step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub field: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl Frame {
    /// A step without arguments, e.g. a descender.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            args: Map::new(),
        }
    }

    /// A step with a single argument.
    pub fn with_arg(field: impl Into<String>, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut frame = Self::new(field);
        frame.args.insert(key.into(), value.into());
        frame
    }
}

/// Argument chain used to reach a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathContext(Vec<Frame>);

impl PathContext {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.0
    }

    /// Field names from the root, in order.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|frame| frame.field.as_str()).collect()
    }

    /// This path extended by one step.
    pub fn child(&self, frame: Frame) -> Self {
        let mut next = self.clone();
        next.0.push(frame);
        next
    }

    /// The last step and the path leading to it.
    pub fn split_last(&self) -> Option<(&Frame, PathContext)> {
        self.0
            .split_last()
            .map(|(last, rest)| (last, PathContext(rest.to_vec())))
    }

    /// Arguments recorded for the ancestor operation named `operation`.
    ///
    /// `operation` is the dotted field path from the root, e.g. `incidents.one`.
    pub fn args_at(&self, operation: &str) -> PdgResult<&Map<String, Value>> {
        let mut key = String::new();
        for frame in &self.0 {
            if !key.is_empty() {
                key.push('.');
            }
            key.push_str(&frame.field);
            if key == operation {
                return Ok(&frame.args);
            }
        }
        Err(PdgError::MissingAncestor(operation.to_string()))
    }

    /// A single scalar argument of an ancestor, rendered as a string.
    pub fn arg_at(&self, operation: &str, argument: &str) -> PdgResult<String> {
        let missing = || PdgError::MissingArgument {
            operation: operation.to_string(),
            argument: argument.to_string(),
        };
        match self.args_at(operation)?.get(argument) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(missing()),
        }
    }
}

impl fmt::Display for PathContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for frame in &self.0 {
            write!(f, ".{}", frame.field)?;
            if !frame.args.is_empty() {
                f.write_str("(")?;
                for (i, (key, value)) in frame.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str(")")?;
            }
        }
        Ok(())
    }
}

impl FromStr for PathContext {
    type Err = PdgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new(s).path()
    }
}

/// Durable handle to an incident or alert node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRef(PathContext);

impl GraphRef {
    /// `root.incidents.one(id: <id>)`
    pub fn incident(id: impl Into<String>) -> Self {
        Self(
            PathContext::root()
                .child(Frame::new(INCIDENTS))
                .child(Frame::with_arg(ONE, "id", id.into())),
        )
    }

    /// `root.incidents.one(id: <incident>).alerts.one(alert_id: <alert>)`
    pub fn alert(incident: impl Into<String>, alert: impl Into<String>) -> Self {
        let GraphRef(path) = Self::incident(incident);
        Self(
            path.child(Frame::new(ALERTS))
                .child(Frame::with_arg(ONE, "alert_id", alert.into())),
        )
    }

    /// Wrap a path that ends at an entity node.
    pub fn from_path(path: PathContext) -> PdgResult<Self> {
        match path.fields().as_slice() {
            [INCIDENTS, ONE] | [INCIDENTS, ONE, ALERTS, ONE] => Ok(Self(path)),
            _ => Err(PdgError::InvalidReference(path.to_string())),
        }
    }

    pub fn path(&self) -> &PathContext {
        &self.0
    }

    pub fn into_path(self) -> PathContext {
        self.0
    }

    pub fn is_alert(&self) -> bool {
        self.0.frames().len() == 4
    }

    /// Provider path of the referenced entity, derived without any fetch.
    pub fn provider_path(&self) -> PdgResult<String> {
        let incident = self.0.arg_at(INCIDENT_OP, "id")?;
        if self.is_alert() {
            let alert = self.0.arg_at(ALERT_OP, "alert_id")?;
            Ok(format!("incidents/{}/alerts/{}", incident, alert))
        } else {
            Ok(format!("incidents/{}", incident))
        }
    }
}

impl fmt::Display for GraphRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for GraphRef {
    type Err = PdgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s.parse()?)
    }
}

impl Serialize for GraphRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GraphRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Reader for the `root.field(key: value).field` notation.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.trim(),
            pos: 0,
        }
    }

    fn path(mut self) -> PdgResult<PathContext> {
        if self.ident()? != "root" {
            return Err(self.error("expected 'root'"));
        }

        let mut frames = Vec::new();
        while !self.at_end() {
            self.expect('.')?;
            let field = self.ident()?;
            let mut frame = Frame::new(field);
            if self.peek() == Some('(') {
                frame.args = self.args()?;
            }
            frames.push(frame);
        }
        Ok(PathContext(frames))
    }

    fn args(&mut self) -> PdgResult<Map<String, Value>> {
        self.expect('(')?;
        let mut args = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(')') {
                self.pos += 1;
                return Ok(args);
            }
            if !args.is_empty() {
                self.expect(',')?;
                self.skip_ws();
            }
            let key = self.ident()?;
            self.skip_ws();
            self.expect(':')?;
            let value = self.value()?;
            args.insert(key.to_string(), value);
        }
    }

    /// A JSON literal running to the next top-level `,` or `)`.
    fn value(&mut self) -> PdgResult<Value> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        while let Some(c) = self.peek() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
            } else {
                match c {
                    '"' => in_string = true,
                    '[' | '{' => depth += 1,
                    ']' | '}' => depth = depth.saturating_sub(1),
                    ',' | ')' if depth == 0 => break,
                    _ => {}
                }
            }
            self.pos += c.len_utf8();
        }

        let literal = self.input[start..self.pos].trim();
        serde_json::from_str(literal).map_err(|e| self.error(&format!("bad value '{}': {}", literal, e)))
    }

    fn ident(&mut self) -> PdgResult<&'a str> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error("expected a name"));
        }
        Ok(&self.input[start..self.pos])
    }

    fn expect(&mut self, c: char) -> PdgResult<()> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", c)))
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn error(&self, msg: &str) -> PdgError {
        PdgError::InvalidReference(format!("{} at offset {} in '{}'", msg, self.pos, self.input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_at_walks_dotted_path() {
        let gref = GraphRef::alert("X", "Y");
        let path = gref.path();

        assert_eq!(path.arg_at(INCIDENT_OP, "id").unwrap(), "X");
        assert_eq!(path.arg_at(ALERT_OP, "alert_id").unwrap(), "Y");
    }

    #[test]
    fn test_missing_ancestor_is_reported() {
        let path = PathContext::root().child(Frame::new(INCIDENTS));
        let err = path.args_at(INCIDENT_OP).unwrap_err();
        assert!(matches!(err, PdgError::MissingAncestor(op) if op == INCIDENT_OP));
    }

    #[test]
    fn test_missing_argument_is_reported() {
        let path = PathContext::root()
            .child(Frame::new(INCIDENTS))
            .child(Frame::new(ONE));
        let err = path.arg_at(INCIDENT_OP, "id").unwrap_err();
        assert!(matches!(err, PdgError::MissingArgument { .. }));
    }

    #[test]
    fn test_reference_renders_and_parses_back() {
        let gref = GraphRef::alert("PX1", "AY2");
        let rendered = gref.to_string();
        assert_eq!(rendered, r#"root.incidents.one(id: "PX1").alerts.one(alert_id: "AY2")"#);

        let parsed: GraphRef = rendered.parse().unwrap();
        assert_eq!(parsed, gref);
        assert_eq!(parsed.provider_path().unwrap(), "incidents/PX1/alerts/AY2");
    }

    #[test]
    fn test_incident_reference_provider_path() {
        assert_eq!(GraphRef::incident("X").provider_path().unwrap(), "incidents/X");
    }

    #[test]
    fn test_parse_tolerates_spacing_and_escapes() {
        let parsed: GraphRef = r#"root.incidents.one( id : "a\"b,c)" )"#.parse().unwrap();
        assert_eq!(parsed.path().arg_at(INCIDENT_OP, "id").unwrap(), "a\"b,c)");
    }

    #[test]
    fn test_parse_skips_multibyte_whitespace() {
        let parsed: GraphRef = "root.incidents.one(\u{3000}id: \"X\"\u{a0})".parse().unwrap();
        assert_eq!(parsed, GraphRef::incident("X"));

        let err = "root.incidents.one(\u{3000}\u{3000})x".parse::<GraphRef>().unwrap_err();
        assert!(matches!(err, PdgError::InvalidReference(_)));
    }

    #[test]
    fn test_reference_must_end_at_an_entity() {
        assert!("root.incidents".parse::<GraphRef>().is_err());
        assert!("incidents.one(id: \"X\")".parse::<GraphRef>().is_err());
        assert!("root.incidents.one(id: X)".parse::<GraphRef>().is_err());
    }

    #[test]
    fn test_reference_serializes_as_string() {
        let json = serde_json::to_value(GraphRef::incident("X")).unwrap();
        assert_eq!(json, serde_json::json!(r#"root.incidents.one(id: "X")"#));
        let back: GraphRef = serde_json::from_value(json).unwrap();
        assert_eq!(back, GraphRef::incident("X"));
    }
}
