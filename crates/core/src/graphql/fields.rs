//! Selection-set fields.

/// One selected field, optionally with a nested selection. Reference
/// targets are selected with `Field::new("... on Class")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    /// `name` or `name{a b}`.
    pub fn to_text(&self) -> String {
        if self.fields.is_empty() {
            self.name.clone()
        } else {
            format!("{}{{{}}}", self.name, fields_text(&self.fields))
        }
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::new(name)
    }
}

/// Fields joined by a single space.
pub fn fields_text(fields: &[Field]) -> String {
    let parts: Vec<String> = fields.iter().map(Field::to_text).collect();
    parts.join(" ")
}
