use std::sync::Arc;

use gridcore::{Column, Row};

use crate::plugin::{Plugin, PluginDefinition, PluginRegistration};
use crate::value::Value;

use super::names;

/// Root plugin providing the base `rows` and `columns` getters.
///
/// The getters hand out the same allocation on every pass, so downstream
/// chained getters can pass them through without breaking identity.
#[derive(Debug, Clone, Default)]
pub struct GridCore {
    rows: Arc<Vec<Row>>,
    columns: Arc<Vec<Column>>,
}

impl GridCore {
    pub const NAME: &'static str = "GridCore";

    pub fn new(rows: impl Into<Arc<Vec<Row>>>, columns: impl Into<Arc<Vec<Column>>>) -> Self {
        Self {
            rows: rows.into(),
            columns: columns.into(),
        }
    }

    pub fn rows(&self) -> &Arc<Vec<Row>> {
        &self.rows
    }

    pub fn columns(&self) -> &Arc<Vec<Column>> {
        &self.columns
    }
}

impl Plugin for GridCore {
    fn definition(&self) -> PluginDefinition {
        let rows = Arc::clone(&self.rows);
        let columns = Arc::clone(&self.columns);
        PluginDefinition::new(Self::NAME)
            .getter(names::ROWS, &[], move |_| Ok(Value::from_arc(Arc::clone(&rows))))
            .getter(names::COLUMNS, &[], move |_| {
                Ok(Value::from_arc(Arc::clone(&columns)))
            })
    }
}

fn default_definition() -> PluginDefinition {
    GridCore::default().definition()
}

inventory::submit! {
    PluginRegistration::new(GridCore::NAME, default_definition)
}
