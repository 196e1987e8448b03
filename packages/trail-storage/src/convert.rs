//! Conversion between DynamoDB attribute values and JSON.
//!
//! Items cross the storage boundary as JSON maps so the rest of the workspace never sees SDK
//! types. Numbers keep integer precision when they fit in `i64`/`u64` and fall back to `f64`.

use std::collections::HashMap;

use aws_sdk_dynamodb::{primitives::Blob, types::AttributeValue};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Map, Number, Value};

use trail_domain::{Item, cursor::ContinuationKey};

use crate::{Error, Result};

pub type DynamoItem = HashMap<String, AttributeValue>;

pub fn item_to_dynamo(item: &Item) -> DynamoItem {
	item.iter().map(|(key, value)| (key.clone(), value_to_attribute(value))).collect()
}

pub fn item_from_dynamo(item: &DynamoItem) -> Result<Item> {
	let mut out = Map::with_capacity(item.len());

	for (key, value) in item {
		out.insert(key.clone(), attribute_to_value(value)?);
	}

	Ok(out)
}

pub fn key_to_dynamo(key: &ContinuationKey) -> DynamoItem {
	item_to_dynamo(key.attributes())
}

pub fn key_from_dynamo(key: Option<&DynamoItem>) -> Result<Option<ContinuationKey>> {
	match key {
		Some(key) if !key.is_empty() => Ok(Some(ContinuationKey::new(item_from_dynamo(key)?))),
		_ => Ok(None),
	}
}

pub fn value_to_attribute(value: &Value) -> AttributeValue {
	match value {
		Value::Null => AttributeValue::Null(true),
		Value::Bool(flag) => AttributeValue::Bool(*flag),
		Value::Number(number) => AttributeValue::N(number.to_string()),
		Value::String(text) => AttributeValue::S(text.clone()),
		Value::Array(values) => AttributeValue::L(values.iter().map(value_to_attribute).collect()),
		Value::Object(map) => AttributeValue::M(
			map.iter().map(|(key, value)| (key.clone(), value_to_attribute(value))).collect(),
		),
	}
}

pub fn attribute_to_value(value: &AttributeValue) -> Result<Value> {
	let value = match value {
		AttributeValue::S(text) => Value::String(text.clone()),
		AttributeValue::N(raw) => Value::Number(parse_number(raw)?),
		AttributeValue::Bool(flag) => Value::Bool(*flag),
		AttributeValue::Null(_) => Value::Null,
		AttributeValue::B(blob) => Value::String(encode_blob(blob)),
		AttributeValue::L(values) =>
			Value::Array(values.iter().map(attribute_to_value).collect::<Result<_>>()?),
		AttributeValue::M(map) => Value::Object(item_from_dynamo(map)?),
		AttributeValue::Ss(values) =>
			Value::Array(values.iter().cloned().map(Value::String).collect()),
		AttributeValue::Ns(values) => Value::Array(
			values.iter().map(|raw| parse_number(raw).map(Value::Number)).collect::<Result<_>>()?,
		),
		AttributeValue::Bs(values) =>
			Value::Array(values.iter().map(|blob| Value::String(encode_blob(blob))).collect()),
		other => return Err(Error::InvalidItem(format!("unsupported attribute value {other:?}"))),
	};

	Ok(value)
}

fn parse_number(raw: &str) -> Result<Number> {
	if let Ok(int) = raw.parse::<i64>() {
		return Ok(Number::from(int));
	}
	if let Ok(uint) = raw.parse::<u64>() {
		return Ok(Number::from(uint));
	}

	raw.parse::<f64>()
		.ok()
		.and_then(Number::from_f64)
		.ok_or_else(|| Error::InvalidItem(format!("number attribute {raw:?} is not representable")))
}

fn encode_blob(blob: &Blob) -> String {
	STANDARD.encode(blob.as_ref())
}
