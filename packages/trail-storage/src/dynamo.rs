use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{
	Client,
	config::{Builder, Region},
	types::{AttributeValue, ReturnValue},
};
use aws_smithy_types::timeout::TimeoutConfig;

use trail_domain::{
	BoxFuture, Item,
	activity::STATIC_KEY,
	cursor::ContinuationKey,
	user::{USER_KEY, UserPatch},
};

use crate::{
	Error, IndexQuery, Order, Page, RecordStore, Result, UserStore,
	convert::{item_from_dynamo, item_to_dynamo, key_from_dynamo, key_to_dynamo},
};

#[derive(Clone, Debug)]
pub struct DynamoStore {
	client: Client,
	activity_table: String,
	users_table: String,
	time_index: String,
}
impl DynamoStore {
	pub async fn connect(cfg: &trail_config::DynamoDb) -> Self {
		let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
		let mut builder = Builder::from(&sdk_config);

		if let Some(region) = &cfg.region {
			builder = builder.region(Region::new(region.clone()));
		}
		if let Some(endpoint) = &cfg.endpoint {
			builder = builder.endpoint_url(endpoint);
		}

		let timeout = TimeoutConfig::builder()
			.operation_timeout(Duration::from_millis(cfg.timeout_ms))
			.build();

		builder = builder.timeout_config(timeout);

		Self::from_client(Client::from_conf(builder.build()), cfg)
	}

	pub fn from_client(client: Client, cfg: &trail_config::DynamoDb) -> Self {
		Self {
			client,
			activity_table: cfg.activity_table.clone(),
			users_table: cfg.users_table.clone(),
			time_index: cfg.time_index.clone(),
		}
	}

	async fn query_index_inner(&self, query: &IndexQuery) -> Result<Page> {
		let mut request = self
			.client
			.query()
			.table_name(&self.activity_table)
			.index_name(&self.time_index)
			.key_condition_expression("#partition = :partition")
			.expression_attribute_names("#partition", STATIC_KEY)
			.expression_attribute_values(":partition", AttributeValue::S(query.partition.clone()))
			.scan_index_forward(query.order == Order::Ascending);

		if let Some(limit) = query.limit {
			request = request.limit(i32::try_from(limit).unwrap_or(i32::MAX));
		}
		if let Some(filter) = query.filter.to_expression() {
			request = request.filter_expression(filter.expression);

			for (alias, name) in filter.names {
				request = request.expression_attribute_names(alias, name);
			}
			for (placeholder, value) in filter.values {
				request = request.expression_attribute_values(placeholder, AttributeValue::S(value));
			}
		}
		if let Some(start_key) = &query.start_key {
			request = request.set_exclusive_start_key(Some(key_to_dynamo(start_key)));
		}

		let response = request.send().await.map_err(|err| Error::dynamo("Query", err))?;
		let items = response.items().iter().map(item_from_dynamo).collect::<Result<Vec<_>>>()?;
		let last_key = key_from_dynamo(response.last_evaluated_key())?;

		tracing::debug!(
			index = %self.time_index,
			count = items.len(),
			more = last_key.is_some(),
			"Queried time index."
		);

		Ok(Page { items, last_key })
	}

	async fn scan_page_inner(
		&self,
		table: &str,
		limit: Option<u32>,
		start_key: Option<&ContinuationKey>,
	) -> Result<Page> {
		let mut request = self.client.scan().table_name(table);

		if let Some(limit) = limit {
			request = request.limit(i32::try_from(limit).unwrap_or(i32::MAX));
		}
		if let Some(start_key) = start_key {
			request = request.set_exclusive_start_key(Some(key_to_dynamo(start_key)));
		}

		let response = request.send().await.map_err(|err| Error::dynamo("Scan", err))?;
		let items = response.items().iter().map(item_from_dynamo).collect::<Result<Vec<_>>>()?;
		let last_key = key_from_dynamo(response.last_evaluated_key())?;

		Ok(Page { items, last_key })
	}

	async fn put_item(&self, table: &str, item: &Item) -> Result<()> {
		self.client
			.put_item()
			.table_name(table)
			.set_item(Some(item_to_dynamo(item)))
			.send()
			.await
			.map_err(|err| Error::dynamo("PutItem", err))?;

		Ok(())
	}

	async fn scan_users_inner(&self) -> Result<Vec<Item>> {
		let mut users = Vec::new();
		let mut start_key = None;

		loop {
			let page = self.scan_page_inner(&self.users_table, None, start_key.as_ref()).await?;

			users.extend(page.items);

			match page.last_key {
				Some(key) => start_key = Some(key),
				None => break,
			}
		}

		Ok(users)
	}

	async fn get_user_inner(&self, user_id: &str) -> Result<Option<Item>> {
		let response = self
			.client
			.get_item()
			.table_name(&self.users_table)
			.key(USER_KEY, AttributeValue::S(user_id.to_string()))
			.send()
			.await
			.map_err(|err| Error::dynamo("GetItem", err))?;

		response.item().map(item_from_dynamo).transpose()
	}

	async fn update_user_inner(&self, user_id: &str, patch: &UserPatch) -> Result<Item> {
		let assignments = patch.assignments();

		if assignments.is_empty() {
			return Err(Error::InvalidItem("update has no attributes to set".to_string()));
		}

		let expression = assignments
			.iter()
			.map(|(attribute, _)| format!("#{attribute} = :{attribute}"))
			.collect::<Vec<_>>()
			.join(", ");
		let mut request = self
			.client
			.update_item()
			.table_name(&self.users_table)
			.key(USER_KEY, AttributeValue::S(user_id.to_string()))
			.update_expression(format!("SET {expression}"))
			.return_values(ReturnValue::AllNew);

		for (attribute, value) in assignments {
			request = request
				.expression_attribute_names(format!("#{attribute}"), attribute)
				.expression_attribute_values(
					format!(":{attribute}"),
					AttributeValue::S(value.to_string()),
				);
		}

		let response = request.send().await.map_err(|err| Error::dynamo("UpdateItem", err))?;
		let attributes = response
			.attributes()
			.ok_or_else(|| Error::InvalidItem("update returned no attributes".to_string()))?;

		item_from_dynamo(attributes)
	}
}
impl RecordStore for DynamoStore {
	fn query_index<'a>(&'a self, query: &'a IndexQuery) -> BoxFuture<'a, Result<Page>> {
		Box::pin(self.query_index_inner(query))
	}

	fn scan_page<'a>(
		&'a self,
		limit: u32,
		start_key: Option<&'a ContinuationKey>,
	) -> BoxFuture<'a, Result<Page>> {
		Box::pin(self.scan_page_inner(&self.activity_table, Some(limit), start_key))
	}

	fn put_record<'a>(&'a self, item: &'a Item) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.put_item(&self.activity_table, item))
	}
}
impl UserStore for DynamoStore {
	fn scan_users(&self) -> BoxFuture<'_, Result<Vec<Item>>> {
		Box::pin(self.scan_users_inner())
	}

	fn get_user<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<Item>>> {
		Box::pin(self.get_user_inner(user_id))
	}

	fn put_user<'a>(&'a self, item: &'a Item) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.put_item(&self.users_table, item))
	}

	fn update_user<'a>(
		&'a self,
		user_id: &'a str,
		patch: &'a UserPatch,
	) -> BoxFuture<'a, Result<Item>> {
		Box::pin(self.update_user_inner(user_id, patch))
	}
}
