//! Typed filter clauses over activity records.
//!
//! Clauses are accumulated by [`FilterBuilder`] and rendered at the edge into the syntax of the
//! backend that evaluates them: a DynamoDB `FilterExpression` with aliased attribute names, or a
//! Typesense `filter_by` string. Rendering never validates; validation never renders.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::{
	Item,
	activity::{ACTION, DEVICE, METADATA, USER_ID},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
	UserId,
	Action,
	Device,
}
impl Field {
	/// Attribute path of the field inside a stored record.
	pub const fn record_path(self) -> &'static [&'static str] {
		match self {
			Self::UserId => &[USER_ID],
			Self::Action => &[ACTION],
			Self::Device => &[METADATA, DEVICE],
		}
	}

	/// Field name in the flattened search document.
	pub const fn document_field(self) -> &'static str {
		match self {
			Self::UserId => USER_ID,
			Self::Action => ACTION,
			Self::Device => DEVICE,
		}
	}

	pub const fn value_placeholder(self) -> &'static str {
		match self {
			Self::UserId => ":userId",
			Self::Action => ":action",
			Self::Device => ":device",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
	Eq,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
	pub field: Field,
	pub operator: Operator,
	pub value: String,
}
impl Clause {
	fn matches(&self, candidate: Option<&Value>) -> bool {
		match self.operator {
			Operator::Eq => candidate.and_then(Value::as_str) == Some(self.value.as_str()),
		}
	}
}

/// Optional equality filters accepted by the query endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFilter {
	pub user_id: Option<String>,
	pub action: Option<String>,
	pub device: Option<String>,
}

/// A conjunction of clauses. An empty filter matches every record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
	clauses: Vec<Clause>,
}
impl Filter {
	pub fn builder() -> FilterBuilder {
		FilterBuilder::default()
	}

	pub fn clauses(&self) -> &[Clause] {
		&self.clauses
	}

	pub fn is_empty(&self) -> bool {
		self.clauses.is_empty()
	}

	/// Renders a DynamoDB filter expression, or `None` when there is nothing to filter.
	pub fn to_expression(&self) -> Option<FilterExpression> {
		if self.clauses.is_empty() {
			return None;
		}

		let mut names = BTreeMap::new();
		let mut values = BTreeMap::new();
		let mut rendered = Vec::with_capacity(self.clauses.len());

		for clause in &self.clauses {
			let path = clause
				.field
				.record_path()
				.iter()
				.map(|segment| {
					let alias = format!("#{segment}");

					names.insert(alias.clone(), (*segment).to_string());

					alias
				})
				.collect::<Vec<_>>()
				.join(".");
			let placeholder = clause.field.value_placeholder();

			values.insert(placeholder.to_string(), clause.value.clone());

			match clause.operator {
				Operator::Eq => rendered.push(format!("{path} = {placeholder}")),
			}
		}

		Some(FilterExpression { expression: rendered.join(" AND "), names, values })
	}

	/// Renders a Typesense `filter_by` string, or `None` when there is nothing to filter.
	///
	/// Values are wrapped in backticks so spaces and operator characters stay literal.
	pub fn to_filter_by(&self) -> Option<String> {
		if self.clauses.is_empty() {
			return None;
		}

		let rendered = self
			.clauses
			.iter()
			.map(|clause| match clause.operator {
				Operator::Eq => format!("{}:=`{}`", clause.field.document_field(), clause.value),
			})
			.collect::<Vec<_>>();

		Some(rendered.join(" && "))
	}

	/// Evaluates the filter against a stored record, following nested attribute paths.
	pub fn matches_record(&self, item: &Item) -> bool {
		self.clauses.iter().all(|clause| clause.matches(lookup_path(item, clause.field.record_path())))
	}

	/// Evaluates the filter against a flattened search document.
	pub fn matches_document(&self, document: &Item) -> bool {
		self.clauses.iter().all(|clause| clause.matches(document.get(clause.field.document_field())))
	}
}
impl From<&ActivityFilter> for Filter {
	fn from(params: &ActivityFilter) -> Self {
		Filter::builder()
			.eq(Field::UserId, params.user_id.as_deref())
			.eq(Field::Action, params.action.as_deref())
			.eq(Field::Device, params.device.as_deref())
			.build()
	}
}

#[derive(Debug, Default)]
pub struct FilterBuilder {
	clauses: Vec<Clause>,
}
impl FilterBuilder {
	/// Adds an equality clause. Absent and empty values are skipped; a repeated field keeps its
	/// first position and takes the latest value.
	pub fn eq(mut self, field: Field, value: Option<&str>) -> Self {
		let Some(value) = value.filter(|value| !value.is_empty()) else {
			return self;
		};

		if let Some(existing) = self.clauses.iter_mut().find(|clause| clause.field == field) {
			existing.value = value.to_string();
		} else {
			self.clauses.push(Clause { field, operator: Operator::Eq, value: value.to_string() });
		}

		self
	}

	pub fn build(self) -> Filter {
		Filter { clauses: self.clauses }
	}
}

/// A rendered DynamoDB filter: the expression plus the name and value bindings it references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterExpression {
	pub expression: String,
	pub names: BTreeMap<String, String>,
	pub values: BTreeMap<String, String>,
}

fn lookup_path<'a>(item: &'a Item, path: &[&str]) -> Option<&'a Value> {
	let (first, rest) = path.split_first()?;
	let mut current = item.get(*first)?;

	for segment in rest {
		current = current.as_object()?.get(*segment)?;
	}

	Some(current)
}
