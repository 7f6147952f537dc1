//! XML-RPC method call encoding.
//!
//! Only the scalar types the VisTrails calls need are modelled.

use quick_xml::escape::escape;

/// A positional XML-RPC parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    String(String),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int(i32::from(value))
    }
}

/// A named remote procedure plus its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub params: Vec<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Serialize as a `<methodCall>` request body.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\"?>\n<methodCall>\n");
        xml.push_str(&format!("<methodName>{}</methodName>\n", escape(&self.method)));
        xml.push_str("<params>\n");
        for param in &self.params {
            let value = match param {
                Value::Int(n) => format!("<int>{n}</int>"),
                Value::String(s) => format!("<string>{}</string>", escape(s.as_str())),
            };
            xml.push_str(&format!("<param><value>{value}</value></param>\n"));
        }
        xml.push_str("</params>\n</methodCall>\n");
        xml
    }
}
