/// One extracted item: every configured field mapped to a string value
///
/// A record is created with the full field set already present and empty, so its
/// keys always match the configured field names exactly. An empty value means the
/// field was not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<(String, String)>,
}

impl Record {
    /// Creates a record with every field present and empty
    pub fn new<I, S>(field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: field_names
                .into_iter()
                .map(|name| (name.into(), String::new()))
                .collect(),
        }
    }

    /// Sets the value of an existing field
    ///
    /// Returns false (and changes nothing) when `name` is not part of the field set.
    pub(crate) fn set(&mut self, name: &str, value: String) -> bool {
        match self.values.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Returns the value of a field, or None if the field is not in the set
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(key, _)| key.as_str())
    }

    /// (name, value) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the field set is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of fields with a non-empty value
    pub fn filled(&self) -> usize {
        self.values.iter().filter(|(_, v)| !v.is_empty()).count()
    }

    /// Values laid out in the given column order
    pub fn row<'a>(&'a self, columns: &[String]) -> Vec<&'a str> {
        columns
            .iter()
            .map(|column| self.get(column).unwrap_or(""))
            .collect()
    }
}
