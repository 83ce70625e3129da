use constmsg_parser::AnnotationTable;

pub const DEFAULT_VALUE_TYPE: &str = "i32";
pub const DEFAULT_UNKNOWN_MSG: &str = "unknown error";

/// Everything a render call reads. Nothing is carried between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub package: String,
    pub value_type: String,
    pub unknown_msg: String,
    pub table: AnnotationTable,
}

impl RenderContext {
    pub fn new(package: impl Into<String>, table: AnnotationTable) -> Self {
        Self {
            package: package.into(),
            value_type: DEFAULT_VALUE_TYPE.to_string(),
            unknown_msg: DEFAULT_UNKNOWN_MSG.to_string(),
            table,
        }
    }

    pub fn with_value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = value_type.into();
        self
    }

    pub fn with_unknown_msg(mut self, unknown_msg: impl Into<String>) -> Self {
        self.unknown_msg = unknown_msg.into();
        self
    }
}
