use crate::Result;
use cel_interpreter::Program;
use ohno::app_err;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// A named, pre-compiled query.
#[derive(Debug, Clone)]
pub struct Query {
    name: String,
    description: Option<String>,
    program: Arc<Program>,
    source: String,
}

impl Query {
    /// Compile `source` into a query.
    ///
    /// # Errors
    /// Returns an error if the source does not parse.
    pub fn new(name: impl Into<String>, description: Option<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();
        let program = Program::compile(&source).map_err(|e| app_err!("could not parse query '{name}': {e}"))?;

        Ok(Self {
            name,
            description,
            program: Arc::new(program),
            source,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }
}

impl Serialize for Query {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let fields = if self.description.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("Query", fields)?;
        state.serialize_field("name", &self.name)?;
        if let Some(description) = &self.description {
            state.serialize_field("description", description)?;
        }
        state.serialize_field("query", &self.source)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Query {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct QueryData {
            name: String,
            description: Option<String>,
            query: String,
        }

        let data = QueryData::deserialize(deserializer)?;
        Self::new(data.name, data.description, data.query).map_err(D::Error::custom)
    }
}
